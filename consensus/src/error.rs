use agora_types::{Address, Capabilities, ProposalId, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("caller lacks the {required} capability")]
    Unauthorized { required: Role },

    #[error("operation not permitted on the founder seat")]
    InvalidOperationOnFounder,

    #[error("{0} is already a consensus member")]
    AlreadyMember(Address),

    #[error("{0} is not a consensus member")]
    NotMember(Address),

    #[error("review proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("review proposal {0} already exists")]
    ProposalAlreadyExists(ProposalId),

    #[error("proposal {0} has already been reviewed")]
    ProposalAlreadyReviewed(ProposalId),

    #[error("proposal {0} has not been reviewed")]
    ProposalNotReviewed(ProposalId),

    #[error("proposal {0} has already been finalized")]
    ProposalAlreadyFinalized(ProposalId),

    #[error("execution proposal {0} not found")]
    ExecutionProposalNotFound(u64),

    #[error("execution proposal {0} has already been executed")]
    AlreadyExecuted(u64),

    #[error("member {member} has already voted on proposal {proposal}")]
    AlreadyVoted { member: Address, proposal: u64 },
}

impl ConsensusError {
    /// Reject unless `caller` holds `role`.
    pub(crate) fn require(caller: Capabilities, role: Role) -> Result<(), Self> {
        if caller.has(role) {
            Ok(())
        } else {
            Err(Self::Unauthorized { required: role })
        }
    }
}
