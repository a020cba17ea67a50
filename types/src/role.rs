//! Capability roles and the identity-to-role predicate.
//!
//! Every state-mutating operation checks the caller's [`Capabilities`] on
//! entry. Capabilities are derived, never stored: the authority identities
//! are fixed at wiring time and consensus membership comes from the registry.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability a caller may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Wires collaborators after construction.
    Admin,
    /// The governance store's own identity (registry changes, review creation).
    GovernanceAuthority,
    /// The consensus body acting as a whole (execute, finalize, burn, status push).
    ConsensusAuthority,
    /// A seated consensus member (review, approve, execution votes).
    ConsensusMember,
}

impl Role {
    fn bit(self) -> u8 {
        match self {
            Self::Admin => 1 << 0,
            Self::GovernanceAuthority => 1 << 1,
            Self::ConsensusAuthority => 1 << 2,
            Self::ConsensusMember => 1 << 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::GovernanceAuthority => "governance authority",
            Self::ConsensusAuthority => "consensus authority",
            Self::ConsensusMember => "consensus member",
        };
        f.write_str(name)
    }
}

/// The set of roles held by one caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);

    pub fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub fn has(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<Role> for Capabilities {
    fn from(role: Role) -> Self {
        Self::NONE.with(role)
    }
}

/// The fixed authority identities of a deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    pub admin: Address,
    pub governance: Address,
    pub consensus: Address,
}

impl AccessControl {
    pub fn new(admin: Address, governance: Address, consensus: Address) -> Self {
        Self {
            admin,
            governance,
            consensus,
        }
    }

    /// Roles held by `who`. Membership is supplied by the caller because the
    /// registry, not this mapping, is the source of truth for seats.
    pub fn capabilities_of(&self, who: &Address, is_consensus_member: bool) -> Capabilities {
        let mut caps = Capabilities::NONE;
        if *who == self.admin {
            caps = caps.with(Role::Admin);
        }
        if *who == self.governance {
            caps = caps.with(Role::GovernanceAuthority);
        }
        if *who == self.consensus {
            caps = caps.with(Role::ConsensusAuthority);
        }
        if is_consensus_member {
            caps = caps.with(Role::ConsensusMember);
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access() -> AccessControl {
        AccessControl::new(
            Address::new("agr_admin"),
            Address::new("agr_governance"),
            Address::new("agr_consensus"),
        )
    }

    #[test]
    fn authority_identities_map_to_their_roles() {
        let acl = access();
        let gov = acl.capabilities_of(&Address::new("agr_governance"), false);
        assert!(gov.has(Role::GovernanceAuthority));
        assert!(!gov.has(Role::ConsensusAuthority));
        assert!(!gov.has(Role::Admin));
    }

    #[test]
    fn membership_is_supplied_by_caller() {
        let acl = access();
        let outsider = Address::new("agr_alice");
        assert!(acl.capabilities_of(&outsider, false).is_empty());
        let member = acl.capabilities_of(&outsider, true);
        assert!(member.has(Role::ConsensusMember));
        assert!(!member.has(Role::Admin));
    }
}
