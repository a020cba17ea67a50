//! Consensus member registry.
//!
//! Invariants: the founder is always a member and the count never drops
//! below one. Every quorum in the system is computed against the live
//! [`MemberRegistry::count`], so a grant or revoke moves the threshold of
//! every proposal still in flight.

use crate::error::ConsensusError;
use agora_types::{Address, Capabilities, Role};
use serde::{Deserialize, Serialize};

/// The set of members with ratification rights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberRegistry {
    founder: Address,
    /// Seat order matters only for swap-remove; the founder starts at index 0.
    members: Vec<Address>,
}

impl MemberRegistry {
    pub fn new(founder: Address) -> Self {
        Self {
            members: vec![founder.clone()],
            founder,
        }
    }

    /// Seat a new member. Governance authority only.
    pub fn grant(&mut self, caller: Capabilities, member: Address) -> Result<(), ConsensusError> {
        ConsensusError::require(caller, Role::GovernanceAuthority)?;
        if member == self.founder {
            return Err(ConsensusError::InvalidOperationOnFounder);
        }
        if self.is_member(&member) {
            return Err(ConsensusError::AlreadyMember(member));
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member. Governance authority only; the founder cannot be revoked.
    pub fn revoke(&mut self, caller: Capabilities, member: &Address) -> Result<(), ConsensusError> {
        ConsensusError::require(caller, Role::GovernanceAuthority)?;
        self.remove(member)
    }

    /// Remove every member except the founder. Returns the removed members.
    pub fn revoke_all(&mut self, caller: Capabilities) -> Result<Vec<Address>, ConsensusError> {
        ConsensusError::require(caller, Role::GovernanceAuthority)?;
        let founder = self.founder.clone();
        let removed: Vec<Address> = self
            .members
            .drain(..)
            .filter(|m| *m != founder)
            .collect();
        self.members.push(founder);
        Ok(removed)
    }

    /// Swap-with-last removal shared by `revoke` and the inactivity sweep.
    pub(crate) fn remove(&mut self, member: &Address) -> Result<(), ConsensusError> {
        if *member == self.founder {
            return Err(ConsensusError::InvalidOperationOnFounder);
        }
        let idx = self
            .members
            .iter()
            .position(|m| m == member)
            .ok_or_else(|| ConsensusError::NotMember(member.clone()))?;
        self.members.swap_remove(idx);
        Ok(())
    }

    pub fn is_member(&self, who: &Address) -> bool {
        self.members.iter().any(|m| m == who)
    }

    pub fn is_founder(&self, who: &Address) -> bool {
        *who == self.founder
    }

    pub fn founder(&self) -> &Address {
        &self.founder
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> Address {
        Address::new(format!("agr_{name}"))
    }

    fn governance() -> Capabilities {
        Role::GovernanceAuthority.into()
    }

    #[test]
    fn founder_is_seated_on_creation() {
        let registry = MemberRegistry::new(member("founder"));
        assert!(registry.is_member(&member("founder")));
        assert!(registry.is_founder(&member("founder")));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn grant_and_revoke_adjust_count() {
        let mut registry = MemberRegistry::new(member("founder"));
        registry.grant(governance(), member("a")).unwrap();
        registry.grant(governance(), member("b")).unwrap();
        assert_eq!(registry.count(), 3);

        registry.revoke(governance(), &member("a")).unwrap();
        assert_eq!(registry.count(), 2);
        assert!(!registry.is_member(&member("a")));
        assert!(registry.is_member(&member("b")));
    }

    #[test]
    fn founder_cannot_be_granted_or_revoked() {
        let mut registry = MemberRegistry::new(member("founder"));
        assert!(matches!(
            registry.grant(governance(), member("founder")),
            Err(ConsensusError::InvalidOperationOnFounder)
        ));
        assert!(matches!(
            registry.revoke(governance(), &member("founder")),
            Err(ConsensusError::InvalidOperationOnFounder)
        ));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn duplicate_grant_rejected() {
        let mut registry = MemberRegistry::new(member("founder"));
        registry.grant(governance(), member("a")).unwrap();
        assert!(matches!(
            registry.grant(governance(), member("a")),
            Err(ConsensusError::AlreadyMember(_))
        ));
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn revoke_unknown_member_rejected() {
        let mut registry = MemberRegistry::new(member("founder"));
        assert!(matches!(
            registry.revoke(governance(), &member("ghost")),
            Err(ConsensusError::NotMember(_))
        ));
    }

    #[test]
    fn mutations_require_governance_authority() {
        let mut registry = MemberRegistry::new(member("founder"));
        let member_caps: Capabilities = Role::ConsensusMember.into();
        assert!(matches!(
            registry.grant(member_caps, member("a")),
            Err(ConsensusError::Unauthorized {
                required: Role::GovernanceAuthority
            })
        ));
        assert!(registry.revoke_all(Capabilities::NONE).is_err());
    }

    #[test]
    fn revoke_all_keeps_only_founder() {
        let mut registry = MemberRegistry::new(member("founder"));
        for name in ["a", "b", "c"] {
            registry.grant(governance(), member(name)).unwrap();
        }
        let removed = registry.revoke_all(governance()).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(registry.members(), &[member("founder")]);
        assert_eq!(registry.count(), 1);
    }
}
