//! The Agora council: a consensus body and a token-weighted electorate
//! governing one asset ledger together.
//!
//! [`Council`] owns the [`ConsensusAuthority`](agora_consensus::ConsensusAuthority)
//! and the [`GovernanceEngine`](agora_governance::GovernanceEngine), resolves
//! caller identities to capabilities, runs every operation against a
//! checkpoint, and publishes [`CouncilEvent`]s once an operation commits.

pub mod config;
pub mod council;
pub mod error;
pub mod event;
pub mod logging;
pub mod spans;

pub use config::CouncilConfig;
pub use council::{Council, CouncilIdentities};
pub use error::CouncilError;
pub use event::{CouncilEvent, EventBus};
pub use logging::{init_logging, LogFormat};
