//! Collaborator interfaces for the Agora governance engine.
//!
//! The asset ledger, the reward pool, the liquidity manager and the upgrade
//! target live outside this workspace. Governance consumes them only through
//! the traits below; in-memory implementations for tests live in
//! `agora-nullables`.
//!
//! Every mutating call returns `bool`. A `false` is a hard failure for the
//! caller, which must abort the enclosing operation.

pub mod asset;
pub mod liquidity;
pub mod reward;
pub mod upgrade;

pub use asset::AssetLedger;
pub use liquidity::LiquidityManager;
pub use reward::RewardLedger;
pub use upgrade::UpgradeTarget;
