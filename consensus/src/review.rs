//! Review and approval records for governance proposals.
//!
//! A governance proposal gets exactly one review record, keyed by the same
//! id. The record moves `Created → Reviewed → Approved | Rejected`; some
//! proposal types skip straight to approved at creation (see
//! [`auto_approves`]).

use agora_types::{Address, MembershipChange, ProposalAction, ProposalId, ProposalKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Observable stage of a review record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Created,
    Reviewed,
    Approved,
    /// Against-votes reached the approval quorum before for-votes did.
    Rejected,
}

/// Consensus-side review record of a governance proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewProposal {
    pub id: ProposalId,
    pub action: ProposalAction,
    pub for_review: usize,
    pub for_approval: usize,
    pub against: usize,
    pub reviewed_by: BTreeSet<Address>,
    /// Everyone who cast an approval-phase vote, for or against.
    pub approved_by: BTreeSet<Address>,
    pub reviewed: bool,
    pub approved: bool,
    pub rejected: bool,
    pub auto_approved: bool,
}

impl ReviewProposal {
    pub fn new(id: ProposalId, action: ProposalAction, auto_approved: bool) -> Self {
        Self {
            id,
            action,
            for_review: 0,
            for_approval: 0,
            against: 0,
            reviewed_by: BTreeSet::new(),
            approved_by: BTreeSet::new(),
            reviewed: auto_approved,
            approved: auto_approved,
            rejected: false,
            auto_approved,
        }
    }

    pub fn kind(&self) -> ProposalKind {
        self.action.kind()
    }

    pub fn status(&self) -> ReviewStatus {
        if self.approved {
            ReviewStatus::Approved
        } else if self.rejected {
            ReviewStatus::Rejected
        } else if self.reviewed {
            ReviewStatus::Reviewed
        } else {
            ReviewStatus::Created
        }
    }

    pub fn update(&self) -> ReviewUpdate {
        ReviewUpdate {
            proposal_id: self.id,
            reviewed: self.reviewed,
            approved: self.approved,
        }
    }
}

/// The `(reviewed, approved)` pair mirrored into the governance store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub proposal_id: ProposalId,
    pub reviewed: bool,
    pub approved: bool,
}

/// Whether a new proposal skips manual review and approval.
///
/// | kind                      | auto-approved            |
/// |---------------------------|--------------------------|
/// | SettingUpdate             | always                   |
/// | EmergencyReset            | always                   |
/// | MembershipChange (revoke) | always                   |
/// | MembershipChange (grant)  | only with a lone founder |
/// | WhitelistChange           | never                    |
/// | ContractUpgrade           | never                    |
pub fn auto_approves(action: &ProposalAction, member_count: usize) -> bool {
    match action {
        ProposalAction::SettingUpdate { .. } | ProposalAction::EmergencyReset => true,
        ProposalAction::MembershipChange(MembershipChange::Revoke(_)) => true,
        ProposalAction::MembershipChange(MembershipChange::Grant(_)) => member_count == 1,
        ProposalAction::WhitelistChange { .. } | ProposalAction::ContractUpgrade { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::SettingKey;

    fn addr(name: &str) -> Address {
        Address::new(format!("agr_{name}"))
    }

    #[test]
    fn auto_approval_table() {
        let setting = ProposalAction::SettingUpdate {
            key: SettingKey::BurnFee,
            value: 50,
        };
        let grant = ProposalAction::MembershipChange(MembershipChange::Grant(addr("x")));
        let revoke = ProposalAction::MembershipChange(MembershipChange::Revoke(addr("x")));
        let whitelist = ProposalAction::WhitelistChange { game: addr("game") };
        let upgrade = ProposalAction::ContractUpgrade {
            implementation: addr("impl"),
            data: Vec::new(),
        };

        assert!(auto_approves(&setting, 5));
        assert!(auto_approves(&ProposalAction::EmergencyReset, 5));
        assert!(auto_approves(&revoke, 5));
        assert!(auto_approves(&grant, 1));
        assert!(!auto_approves(&grant, 2));
        assert!(!auto_approves(&whitelist, 1));
        assert!(!auto_approves(&upgrade, 1));
    }

    #[test]
    fn auto_approved_record_starts_approved() {
        let record = ReviewProposal::new(1, ProposalAction::EmergencyReset, true);
        assert_eq!(record.status(), ReviewStatus::Approved);
        assert!(record.reviewed);

        let manual = ReviewProposal::new(2, ProposalAction::WhitelistChange { game: addr("g") }, false);
        assert_eq!(manual.status(), ReviewStatus::Created);
        assert_eq!(manual.kind(), ProposalKind::WhitelistChange);
    }
}
