//! The consensus body: a small set of members that reviews and ratifies
//! governance proposals and votes on its own execution proposals.
//!
//! ## Module overview
//!
//! - [`registry`]: Seated members; the founder seat is permanent.
//! - [`history`]: Per-member record of proposal ids voted, with bounded purge.
//! - [`quorum`]: Review, approval and execution thresholds over live membership.
//! - [`review`]: Review/approval records for governance proposals, auto-approval table.
//! - [`execution`]: Execution proposals voted and executed by the body itself.
//! - [`authority`]: [`ConsensusAuthority`], which owns all of the above.
//! - [`config`]: Maintenance knobs (purge cadence, retention, inactivity window).
//! - [`error`]: Consensus error types.

pub mod authority;
pub mod config;
pub mod error;
pub mod execution;
pub mod history;
pub mod quorum;
pub mod registry;
pub mod review;

pub use authority::{ConsensusAuthority, ReviewCreated};
pub use config::ConsensusConfig;
pub use error::ConsensusError;
pub use execution::{ExecutionAction, ExecutionId, ExecutionProposal, ExecutionVote};
pub use history::VoteHistory;
pub use registry::MemberRegistry;
pub use review::{ReviewProposal, ReviewStatus, ReviewUpdate};
