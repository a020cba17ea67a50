//! Nullable collaborators: in-memory, deterministic implementations of the
//! ledger traits for tests.
//!
//! Every nullable is thread-safe and can be told to fail its next calls, so
//! tests can drive the rollback paths without a real token contract.

pub mod asset;
pub mod liquidity;
pub mod reward;
pub mod upgrade;

pub use asset::NullAssetLedger;
pub use liquidity::NullLiquidityManager;
pub use reward::NullRewardLedger;
pub use upgrade::NullUpgradeTarget;
