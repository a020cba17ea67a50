use agora_types::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouncilError {
    #[error("consensus error: {0}")]
    Consensus(#[from] agora_consensus::ConsensusError),

    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("caller lacks the {required} capability")]
    Unauthorized { required: Role },

    #[error("{0} is not wired")]
    CollaboratorNotWired(&'static str),

    #[error("collaborator call failed: {0}")]
    CollaboratorCallFailed(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
