use agora_types::{Address, BlockHeight, ProposalAction, ProposalId, ProposalKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One electorate vote, backed by the stake held in custody.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub support: bool,
    pub stake: u128,
}

/// Where a governance proposal sits in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Waiting on consensus review or approval.
    AwaitingConsensus,
    /// Cleared by consensus, open for staked votes.
    Voting,
    /// Executed with effect.
    Passed,
    /// Finalized after the voting period without effect.
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceProposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub action: ProposalAction,
    pub votes_for: u128,
    pub votes_against: u128,
    pub ballots: BTreeMap<Address, Ballot>,
    pub executed: bool,
    pub result: bool,
    /// Mirrors of the consensus verdict.
    pub reviewed: bool,
    pub approved: bool,
    pub auto_approved: bool,
    pub created_at: BlockHeight,
}

impl GovernanceProposal {
    pub fn new(
        id: ProposalId,
        proposer: Address,
        action: ProposalAction,
        created_at: BlockHeight,
    ) -> Self {
        Self {
            id,
            proposer,
            action,
            votes_for: 0,
            votes_against: 0,
            ballots: BTreeMap::new(),
            executed: false,
            result: false,
            reviewed: false,
            approved: false,
            auto_approved: false,
            created_at,
        }
    }

    pub fn kind(&self) -> ProposalKind {
        self.action.kind()
    }

    /// `None` only if the tallies overflow, which custody rules out.
    pub fn total_votes(&self) -> Option<u128> {
        self.votes_for.checked_add(self.votes_against)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    pub fn status(&self) -> ProposalStatus {
        match (self.executed, self.result) {
            (true, true) => ProposalStatus::Passed,
            (true, false) => ProposalStatus::Expired,
            _ if self.reviewed && self.approved => ProposalStatus::Voting,
            _ => ProposalStatus::AwaitingConsensus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_flags() {
        let mut p = GovernanceProposal::new(
            1,
            Address::new("agr_alice"),
            ProposalAction::EmergencyReset,
            BlockHeight::GENESIS,
        );
        assert_eq!(p.status(), ProposalStatus::AwaitingConsensus);
        p.reviewed = true;
        assert_eq!(p.status(), ProposalStatus::AwaitingConsensus);
        p.approved = true;
        assert_eq!(p.status(), ProposalStatus::Voting);
        p.executed = true;
        assert_eq!(p.status(), ProposalStatus::Expired);
        p.result = true;
        assert_eq!(p.status(), ProposalStatus::Passed);
    }
}
