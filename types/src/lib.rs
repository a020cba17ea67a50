//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! member identities, block heights, proposal actions, governable settings,
//! capability roles and basis-point arithmetic.

pub mod address;
pub mod amount;
pub mod height;
pub mod proposal;
pub mod role;
pub mod setting;

pub use address::Address;
pub use amount::{bps_of, mul_div, percent_of, BPS_DENOMINATOR};
pub use height::BlockHeight;
pub use proposal::{MembershipChange, ProposalAction, ProposalId, ProposalKind};
pub use role::{AccessControl, Capabilities, Role};
pub use setting::SettingKey;
