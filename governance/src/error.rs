use agora_consensus::ConsensusError;
use agora_types::{Address, BlockHeight, ProposalId, Role, SettingKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("caller lacks the {required} capability")]
    Unauthorized { required: Role },

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("insufficient tokens for proposal cost: have {have}, need {need}")]
    InsufficientTokensForStake { have: u128, need: u128 },

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },

    #[error("value {value} is out of range for setting {key}")]
    SettingOutOfRange { key: SettingKey, value: u128 },

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { voter: Address, proposal: ProposalId },

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("stake must be non-zero")]
    ZeroStake,

    #[error("stake {stake} exceeds the voting power cap of {cap}")]
    VotingPowerCapExceeded { stake: u128, cap: u128 },

    #[error("proposal {0} has not been reviewed")]
    NotReviewed(ProposalId),

    #[error("proposal {0} has not been approved")]
    NotApproved(ProposalId),

    #[error("emergency reset proposal {0} can only execute through voting")]
    EmergencyResetIsAutomatic(ProposalId),

    #[error("quorum not met: {votes} < {needed}")]
    QuorumNotMet { votes: u128, needed: u128 },

    #[error("majority not reached: {votes_for} for, {votes_against} against")]
    MajorityNotReached { votes_for: u128, votes_against: u128 },

    #[error("voting period runs until {ends_at}")]
    VotingPeriodActive { ends_at: BlockHeight },

    #[error("proposal {0} has not been executed or finalized")]
    NotExecuted(ProposalId),

    #[error("stakes on proposal {0} are already settled")]
    AlreadySettled(ProposalId),

    #[error("{staker} has no stake on proposal {proposal}")]
    NoStake { staker: Address, proposal: ProposalId },

    #[error("{remaining} tokens are still staked on proposal {proposal}")]
    StakesOutstanding { proposal: ProposalId, remaining: u128 },

    #[error("no residual rewards to burn for proposal {0}")]
    NoResidualRewards(ProposalId),

    #[error("{0} is not wired")]
    CollaboratorNotWired(&'static str),

    #[error("token transfer failed: {0}")]
    TransferFailed(&'static str),

    #[error("collaborator call failed: {0}")]
    CollaboratorCallFailed(&'static str),

    #[error("re-entrant call into {0}")]
    ReentrantCall(&'static str),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("consensus error: {0}")]
    Consensus(#[from] ConsensusError),
}

impl GovernanceError {
    /// Reject unless `caller` holds `role`.
    pub(crate) fn require(caller: agora_types::Capabilities, role: Role) -> Result<(), Self> {
        if caller.has(role) {
            Ok(())
        } else {
            Err(Self::Unauthorized { required: role })
        }
    }
}
