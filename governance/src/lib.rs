//! Stake-weighted governance for the Agora protocol.
//!
//! Any electorate member may open a proposal by paying its cost into the
//! reward pool. The consensus body reviews and approves it (some types are
//! auto-approved); the electorate then votes by staking tokens. Once the
//! thresholds are met the proposal is executed by type:
//! whitelist additions, membership changes, setting updates, upgrades.
//!
//! Emergency resets never go through the generic path: they fire inside the
//! vote that pushes participation to 40% of supply with 80% support.
//!
//! Stakers reclaim their principal plus a pro-rata share of the proposal's
//! rewards after execution or finalization; the undistributed residual can
//! be burned once every stake is withdrawn.

pub mod engine;
pub mod error;
pub mod guard;
pub mod proposal;
pub mod stake;

pub use engine::{
    ExecutionReport, GovernanceEngine, GovernanceState, ProposalCreated, VoteReceipt,
    EMERGENCY_QUORUM_PCT, EMERGENCY_SUPPORT_PCT, EXECUTION_QUORUM_PCT,
};
pub use error::GovernanceError;
pub use guard::{EntryGuard, ReentrancyGuard};
pub use proposal::{Ballot, GovernanceProposal, ProposalStatus};
pub use stake::{Settlement, StakeLedger, Withdrawal};
