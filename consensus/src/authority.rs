//! The consensus authority: owns the registry, the vote history and both
//! consensus proposal kinds.
//!
//! Member-facing operations (`review`, `approve`, `propose_execution`,
//! `vote_execution`) take the acting member's address and check seat
//! membership against the registry. Authority-facing operations take the
//! caller's [`Capabilities`].

use crate::config::ConsensusConfig;
use crate::error::ConsensusError;
use crate::execution::{ExecutionAction, ExecutionId, ExecutionProposal, ExecutionVote};
use crate::history::VoteHistory;
use crate::quorum::{review_quorum, supermajority};
use crate::registry::MemberRegistry;
use crate::review::{auto_approves, ReviewProposal, ReviewUpdate};
use agora_types::{Address, Capabilities, ProposalAction, ProposalId, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Outcome of [`ConsensusAuthority::review_create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewCreated {
    pub auto_approved: bool,
    /// Entries removed when this creation triggered a history purge.
    pub purged_entries: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusAuthority {
    config: ConsensusConfig,
    registry: MemberRegistry,
    history: VoteHistory,
    reviews: BTreeMap<ProposalId, ReviewProposal>,
    executions: BTreeMap<ExecutionId, ExecutionProposal>,
    next_execution_id: ExecutionId,
    /// Review records created so far; drives the purge cadence.
    review_count: u64,
    next_purge_threshold: u64,
}

impl ConsensusAuthority {
    pub fn new(founder: Address, config: ConsensusConfig) -> Self {
        let next_purge_threshold = if config.purge_step == 0 {
            u64::MAX
        } else {
            config.purge_step
        };
        Self {
            registry: MemberRegistry::new(founder),
            history: VoteHistory::new(),
            reviews: BTreeMap::new(),
            executions: BTreeMap::new(),
            next_execution_id: 1,
            review_count: 0,
            next_purge_threshold,
            config,
        }
    }

    // ── Registry ─────────────────────────────────────────────────────────

    pub fn grant(&mut self, caller: Capabilities, member: Address) -> Result<(), ConsensusError> {
        self.registry.grant(caller, member.clone())?;
        info!(%member, count = self.registry.count(), "consensus member granted");
        Ok(())
    }

    pub fn revoke(&mut self, caller: Capabilities, member: &Address) -> Result<(), ConsensusError> {
        self.registry.revoke(caller, member)?;
        info!(%member, count = self.registry.count(), "consensus member revoked");
        Ok(())
    }

    /// Emergency reset: drop every seat except the founder's.
    pub fn revoke_all(&mut self, caller: Capabilities) -> Result<Vec<Address>, ConsensusError> {
        let removed = self.registry.revoke_all(caller)?;
        warn!(removed = removed.len(), "consensus body reset to founder");
        Ok(removed)
    }

    pub fn registry(&self) -> &MemberRegistry {
        &self.registry
    }

    pub fn is_member(&self, who: &Address) -> bool {
        self.registry.is_member(who)
    }

    pub fn member_count(&self) -> usize {
        self.registry.count()
    }

    fn require_member(&self, who: &Address) -> Result<(), ConsensusError> {
        if self.registry.is_member(who) {
            Ok(())
        } else {
            Err(ConsensusError::Unauthorized {
                required: Role::ConsensusMember,
            })
        }
    }

    // ── Review / approval ────────────────────────────────────────────────

    /// Open the review record for governance proposal `id`.
    ///
    /// Governance authority only. Evaluates the auto-approval table against
    /// the current member count and runs the periodic history purge when the
    /// review counter reaches its next threshold.
    pub fn review_create(
        &mut self,
        caller: Capabilities,
        id: ProposalId,
        action: ProposalAction,
    ) -> Result<ReviewCreated, ConsensusError> {
        ConsensusError::require(caller, Role::GovernanceAuthority)?;
        if self.reviews.contains_key(&id) {
            return Err(ConsensusError::ProposalAlreadyExists(id));
        }

        let auto_approved = auto_approves(&action, self.registry.count());
        let kind = action.kind();
        self.reviews
            .insert(id, ReviewProposal::new(id, action, auto_approved));
        self.review_count += 1;
        info!(proposal = id, %kind, auto_approved, "review proposal created");

        let purged_entries = if self.review_count >= self.next_purge_threshold {
            self.next_purge_threshold = self
                .next_purge_threshold
                .saturating_add(self.config.purge_step);
            Some(self.purge_history())
        } else {
            None
        };

        Ok(ReviewCreated {
            auto_approved,
            purged_entries,
        })
    }

    /// Cast `member`'s review vote on proposal `id`.
    pub fn review(&mut self, member: &Address, id: ProposalId) -> Result<ReviewUpdate, ConsensusError> {
        self.require_member(member)?;
        let quorum = review_quorum(self.registry.count());
        let proposal = self
            .reviews
            .get_mut(&id)
            .ok_or(ConsensusError::ProposalNotFound(id))?;
        if proposal.reviewed {
            return Err(ConsensusError::ProposalAlreadyReviewed(id));
        }
        if !proposal.reviewed_by.insert(member.clone()) {
            return Err(ConsensusError::AlreadyVoted {
                member: member.clone(),
                proposal: id,
            });
        }
        proposal.for_review += 1;
        if proposal.for_review >= quorum {
            proposal.reviewed = true;
            info!(proposal = id, votes = proposal.for_review, quorum, "proposal reviewed");
        } else {
            debug!(proposal = id, votes = proposal.for_review, quorum, "review vote recorded");
        }
        let update = proposal.update();
        self.history.record(member, id);
        Ok(update)
    }

    /// Cast `member`'s approval-phase vote on proposal `id`.
    ///
    /// Once approved, further support is rejected; against-votes are still
    /// counted but never undo the approval.
    pub fn approve(
        &mut self,
        member: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<ReviewUpdate, ConsensusError> {
        self.require_member(member)?;
        let quorum = supermajority(self.registry.count());
        let proposal = self
            .reviews
            .get_mut(&id)
            .ok_or(ConsensusError::ProposalNotFound(id))?;
        if !proposal.reviewed {
            return Err(ConsensusError::ProposalNotReviewed(id));
        }
        if support && proposal.approved {
            return Err(ConsensusError::ProposalAlreadyFinalized(id));
        }
        if !proposal.approved_by.insert(member.clone()) {
            return Err(ConsensusError::AlreadyVoted {
                member: member.clone(),
                proposal: id,
            });
        }

        if support {
            proposal.for_approval += 1;
            if proposal.for_approval >= quorum {
                proposal.approved = true;
                info!(proposal = id, votes = proposal.for_approval, quorum, "proposal approved");
            }
        } else {
            proposal.against += 1;
            if proposal.against >= quorum && !proposal.approved {
                proposal.rejected = true;
                info!(proposal = id, votes = proposal.against, quorum, "proposal rejected");
            }
        }
        let update = proposal.update();
        self.history.record(member, id);
        Ok(update)
    }

    pub fn review_proposal(&self, id: ProposalId) -> Option<&ReviewProposal> {
        self.reviews.get(&id)
    }

    pub fn review_count(&self) -> u64 {
        self.review_count
    }

    // ── Execution proposals ──────────────────────────────────────────────

    /// Open an execution proposal. Any seated member may propose, as may
    /// the consensus authority itself.
    pub fn propose_execution(
        &mut self,
        caller: Capabilities,
        proposer: &Address,
        action: ExecutionAction,
    ) -> Result<ExecutionId, ConsensusError> {
        if !caller.has(Role::ConsensusAuthority) {
            self.require_member(proposer)?;
        }
        let id = self.next_execution_id;
        self.next_execution_id += 1;
        debug!(execution = id, ?action, %proposer, "execution proposal created");
        self.executions
            .insert(id, ExecutionProposal::new(id, proposer.clone(), action));
        Ok(id)
    }

    /// Cast `member`'s vote on execution proposal `id`.
    ///
    /// Crossing the supermajority runs, in order: the inactivity sweep,
    /// marking the proposal executed, and returning the action for dispatch.
    pub fn vote_execution(
        &mut self,
        member: &Address,
        id: ExecutionId,
    ) -> Result<ExecutionVote, ConsensusError> {
        self.require_member(member)?;
        let needed = supermajority(self.registry.count());
        let proposal = self
            .executions
            .get_mut(&id)
            .ok_or(ConsensusError::ExecutionProposalNotFound(id))?;
        if proposal.executed {
            return Err(ConsensusError::AlreadyExecuted(id));
        }
        if !proposal.voted_by.insert(member.clone()) {
            return Err(ConsensusError::AlreadyVoted {
                member: member.clone(),
                proposal: id,
            });
        }
        proposal.votes += 1;
        let votes = proposal.votes;
        self.history.record(member, id);

        if votes < needed {
            debug!(execution = id, votes, needed, "execution vote recorded");
            return Ok(ExecutionVote::Pending { votes, needed });
        }

        let evicted = self.sweep_inactive();
        let proposal = self
            .executions
            .get_mut(&id)
            .ok_or(ConsensusError::ExecutionProposalNotFound(id))?;
        proposal.executed = true;
        info!(execution = id, votes, needed, evicted = evicted.len(), "execution proposal passed");
        Ok(ExecutionVote::Executed {
            action: proposal.action.clone(),
            evicted,
        })
    }

    pub fn execution_proposal(&self, id: ExecutionId) -> Option<&ExecutionProposal> {
        self.executions.get(&id)
    }

    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    /// Evict every non-founder member whose recent history does not cover the
    /// latest `inactivity_window` execution proposals.
    ///
    /// A member survives only if their most recent vote is the latest
    /// execution id and their `window`th most recent is `latest - (window - 1)`.
    /// Histories shorter than the window count as inactive.
    fn sweep_inactive(&mut self) -> Vec<Address> {
        let window = self.config.inactivity_window;
        if window == 0 || self.executions.len() < window {
            return Vec::new();
        }
        let latest = self.next_execution_id - 1;
        let oldest_expected = latest.saturating_sub(window as u64 - 1);

        let inactive: Vec<Address> = self
            .registry
            .members()
            .iter()
            .filter(|m| !self.registry.is_founder(m))
            .filter(|m| {
                let active = self.history.recent(m, 1) == Some(latest)
                    && self.history.recent(m, window) == Some(oldest_expected);
                !active
            })
            .cloned()
            .collect();

        for member in &inactive {
            if self.registry.remove(member).is_ok() {
                warn!(%member, latest, "consensus member evicted for inactivity");
            }
        }
        inactive
    }

    // ── History ──────────────────────────────────────────────────────────

    /// Trim every member's vote history to the configured retention.
    pub fn purge_history(&mut self) -> usize {
        let removed = self.history.purge(self.config.history_keep_count);
        info!(
            removed,
            keep = self.config.history_keep_count,
            "member vote history purged"
        );
        removed
    }

    pub fn history(&self) -> &VoteHistory {
        &self.history
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }
}
