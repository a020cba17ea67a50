//! Proposal payloads shared by the governance and consensus stores.

use crate::address::Address;
use crate::setting::SettingKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a governance proposal (and of its consensus review record).
pub type ProposalId = u64;

/// The type tag of a proposal. Drives auto-approval and execution dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    WhitelistChange,
    MembershipChange,
    EmergencyReset,
    SettingUpdate,
    ContractUpgrade,
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WhitelistChange => "whitelist_change",
            Self::MembershipChange => "membership_change",
            Self::EmergencyReset => "emergency_reset",
            Self::SettingUpdate => "setting_update",
            Self::ContractUpgrade => "contract_upgrade",
        };
        f.write_str(name)
    }
}

/// Direction of a membership change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    /// Seat a new consensus member.
    Grant(Address),
    /// Remove an existing consensus member.
    Revoke(Address),
}

/// What a proposal does once executed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    /// Add a game contract to the asset ledger's whitelist.
    WhitelistChange { game: Address },
    /// Grant or revoke a consensus seat.
    MembershipChange(MembershipChange),
    /// Reset the consensus body to the founder alone.
    EmergencyReset,
    /// Write a new value for a governable setting.
    SettingUpdate { key: SettingKey, value: u128 },
    /// Point the upgradeable target at a new implementation.
    ContractUpgrade { implementation: Address, data: Vec<u8> },
}

impl ProposalAction {
    pub fn kind(&self) -> ProposalKind {
        match self {
            Self::WhitelistChange { .. } => ProposalKind::WhitelistChange,
            Self::MembershipChange(_) => ProposalKind::MembershipChange,
            Self::EmergencyReset => ProposalKind::EmergencyReset,
            Self::SettingUpdate { .. } => ProposalKind::SettingUpdate,
            Self::ContractUpgrade { .. } => ProposalKind::ContractUpgrade,
        }
    }
}
