//! The council facade.
//!
//! Every public operation takes the acting identity, resolves it to
//! [`Capabilities`], and runs inside [`Council::transact`]: the consensus and
//! governance state are checkpointed first and restored if any step fails,
//! so a rejected operation leaves no partial writes behind. Events are only
//! published after the operation commits.
//!
//! Collaborator calls (`AssetLedger`, `RewardLedger`, `LiquidityManager`,
//! `UpgradeTarget`) are assumed to be atomic per call; a `false` return
//! aborts the enclosing operation.

use std::sync::Arc;

use agora_consensus::{
    ConsensusAuthority, ExecutionAction, ExecutionId, ExecutionVote, ReviewUpdate,
};
use agora_governance::{
    ExecutionReport, GovernanceEngine, GovernanceState, ProposalCreated, VoteReceipt, Withdrawal,
};
use agora_ledger::{AssetLedger, LiquidityManager, RewardLedger, UpgradeTarget};
use agora_types::{
    AccessControl, Address, BlockHeight, Capabilities, ProposalAction, ProposalId, Role,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::CouncilConfig;
use crate::error::CouncilError;
use crate::event::{CouncilEvent, EventBus};
use crate::spans;

/// The fixed identities a council is deployed with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CouncilIdentities {
    pub admin: Address,
    /// Custody address of staked tokens; acts as the governance authority.
    pub governance: Address,
    /// Acts as the consensus authority towards collaborators.
    pub consensus: Address,
    /// First, irrevocable consensus member.
    pub founder: Address,
}

#[derive(Serialize, Deserialize)]
struct CouncilSnapshot {
    consensus: ConsensusAuthority,
    governance: GovernanceState,
}

pub struct Council {
    access: AccessControl,
    consensus: ConsensusAuthority,
    governance: GovernanceEngine,
    asset: Arc<dyn AssetLedger>,
    liquidity: Option<Arc<dyn LiquidityManager>>,
    events: EventBus,
}

fn consensus_authority() -> Capabilities {
    Role::ConsensusAuthority.into()
}

impl Council {
    pub fn new(
        config: &CouncilConfig,
        identities: CouncilIdentities,
        asset: Arc<dyn AssetLedger>,
    ) -> Self {
        let CouncilIdentities {
            admin,
            governance,
            consensus,
            founder,
        } = identities;
        info!(%founder, %governance, %consensus, "council created");
        Self {
            access: AccessControl::new(admin, governance.clone(), consensus),
            consensus: ConsensusAuthority::new(founder, config.consensus.clone()),
            governance: GovernanceEngine::new(governance, Arc::clone(&asset)),
            asset,
            liquidity: None,
            events: EventBus::new(),
        }
    }

    /// Roles `who` holds right now. Membership is read from the registry.
    pub fn capabilities_of(&self, who: &Address) -> Capabilities {
        self.access
            .capabilities_of(who, self.consensus.is_member(who))
    }

    fn require(&self, caller: &Address, role: Role) -> Result<Capabilities, CouncilError> {
        let caps = self.capabilities_of(caller);
        if caps.has(role) {
            Ok(caps)
        } else {
            Err(CouncilError::Unauthorized { required: role })
        }
    }

    /// Run `op` against a checkpoint of the consensus and governance state.
    ///
    /// On success the returned events are published in order; on failure the
    /// checkpoint is restored and nothing is published.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<(T, Vec<CouncilEvent>), CouncilError>,
    ) -> Result<T, CouncilError> {
        let consensus = self.consensus.clone();
        let governance = self.governance.state().clone();
        match op(self) {
            Ok((value, events)) => {
                for event in &events {
                    self.events.emit(event);
                }
                Ok(value)
            }
            Err(e) => {
                self.consensus = consensus;
                self.governance.replace_state(governance);
                warn!(error = %e, "council operation rolled back");
                Err(e)
            }
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&CouncilEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Wiring ──────────────────────────────────────────────────────────

    pub fn wire_reward_ledger(
        &mut self,
        caller: &Address,
        rewards: Arc<dyn RewardLedger>,
    ) -> Result<(), CouncilError> {
        let caps = self.capabilities_of(caller);
        self.governance.set_reward_ledger(caps, rewards)?;
        Ok(())
    }

    pub fn wire_upgrade_target(
        &mut self,
        caller: &Address,
        target: Arc<dyn UpgradeTarget>,
    ) -> Result<(), CouncilError> {
        let caps = self.capabilities_of(caller);
        self.governance.set_upgrade_target(caps, target)?;
        Ok(())
    }

    pub fn wire_liquidity_manager(
        &mut self,
        caller: &Address,
        liquidity: Arc<dyn LiquidityManager>,
    ) -> Result<(), CouncilError> {
        self.require(caller, Role::Admin)?;
        info!(router = %liquidity.router_address(), "liquidity manager wired");
        self.liquidity = Some(liquidity);
        Ok(())
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Seat a consensus member directly. Governance authority only.
    pub fn grant_member(&mut self, caller: &Address, member: Address) -> Result<(), CouncilError> {
        let caps = self.capabilities_of(caller);
        self.transact(|c| {
            c.consensus.grant(caps, member)?;
            Ok(((), Vec::new()))
        })
    }

    /// Unseat a consensus member directly. Governance authority only.
    pub fn revoke_member(&mut self, caller: &Address, member: &Address) -> Result<(), CouncilError> {
        let caps = self.capabilities_of(caller);
        self.transact(|c| {
            c.consensus.revoke(caps, member)?;
            Ok(((), Vec::new()))
        })
    }

    // ── Governance proposals ────────────────────────────────────────────

    pub fn create_proposal(
        &mut self,
        proposer: &Address,
        action: ProposalAction,
        now: BlockHeight,
    ) -> Result<ProposalCreated, CouncilError> {
        let _span = spans::create_span(proposer).entered();
        let kind = action.kind();
        self.transact(|c| {
            let created = c
                .governance
                .create(&mut c.consensus, proposer, action, now)?;
            let mut events = vec![CouncilEvent::ProposalCreated {
                id: created.id,
                kind,
                proposer: proposer.clone(),
                cost: created.cost,
                auto_approved: created.auto_approved,
            }];
            if let Some(removed) = created.purged_entries {
                events.push(CouncilEvent::HistoryPurged { removed });
            }
            Ok((created, events))
        })
    }

    /// A consensus member's review vote; the verdict is mirrored into the
    /// governance proposal.
    pub fn review_proposal(
        &mut self,
        member: &Address,
        id: ProposalId,
    ) -> Result<ReviewUpdate, CouncilError> {
        let _span = spans::review_span("review", id, member).entered();
        self.transact(|c| {
            let update = c.consensus.review(member, id)?;
            c.governance
                .update_review_status(consensus_authority(), update)?;
            let event = CouncilEvent::ProposalReviewed {
                id,
                member: member.clone(),
                reviewed: update.reviewed,
            };
            Ok((update, vec![event]))
        })
    }

    /// A consensus member's approval vote (`support = false` votes against).
    pub fn approve_proposal(
        &mut self,
        member: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<ReviewUpdate, CouncilError> {
        let _span = spans::review_span("approve", id, member).entered();
        self.transact(|c| {
            let update = c.consensus.approve(member, id, support)?;
            c.governance
                .update_review_status(consensus_authority(), update)?;
            let event = CouncilEvent::ProposalApproved {
                id,
                member: member.clone(),
                support,
                approved: update.approved,
            };
            Ok((update, vec![event]))
        })
    }

    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: ProposalId,
        support: bool,
        stake: u128,
    ) -> Result<VoteReceipt, CouncilError> {
        let _span = spans::vote_span(id, voter).entered();
        self.transact(|c| {
            let receipt = c
                .governance
                .vote(&mut c.consensus, voter, id, support, stake)?;
            let mut events = vec![CouncilEvent::VoteCast {
                id,
                voter: voter.clone(),
                support,
                stake,
            }];
            if let Some(report) = &receipt.emergency {
                events.push(CouncilEvent::EmergencyExecuted {
                    id,
                    removed_members: report.removed_members.clone(),
                });
            }
            Ok((receipt, events))
        })
    }

    /// Execute a governance proposal. Consensus authority only; consensus
    /// members reach this through an [`ExecutionAction::ExecuteProposal`].
    pub fn execute_proposal(
        &mut self,
        caller: &Address,
        id: ProposalId,
    ) -> Result<ExecutionReport, CouncilError> {
        let _span = spans::settle_span("execute", id).entered();
        let caps = self.capabilities_of(caller);
        self.transact(|c| {
            let report = c.governance.execute(caps, &mut c.consensus, id)?;
            let event = CouncilEvent::ProposalExecuted {
                id,
                kind: report.kind,
            };
            Ok((report, vec![event]))
        })
    }

    pub fn finalize_proposal(
        &mut self,
        caller: &Address,
        id: ProposalId,
        now: BlockHeight,
    ) -> Result<ExecutionReport, CouncilError> {
        let _span = spans::settle_span("finalize", id).entered();
        let caps = self.capabilities_of(caller);
        self.transact(|c| {
            let report = c.governance.finalize(caps, id, now)?;
            Ok((report, vec![CouncilEvent::ProposalFinalized { id }]))
        })
    }

    pub fn unstake(&mut self, staker: &Address, id: ProposalId) -> Result<Withdrawal, CouncilError> {
        let _span = spans::unstake_span(id, staker).entered();
        self.transact(|c| {
            let withdrawal = c.governance.unstake(staker, id)?;
            let event = CouncilEvent::StakeWithdrawn {
                id,
                staker: staker.clone(),
                principal: withdrawal.principal,
                reward: withdrawal.reward,
            };
            Ok((withdrawal, vec![event]))
        })
    }

    pub fn burn_rewards(&mut self, caller: &Address, id: ProposalId) -> Result<u128, CouncilError> {
        let _span = spans::settle_span("burn", id).entered();
        let caps = self.capabilities_of(caller);
        self.transact(|c| {
            let amount = c.governance.burn_rewards(caps, id)?;
            Ok((amount, vec![CouncilEvent::RewardsBurned { id, amount }]))
        })
    }

    // ── Execution proposals ─────────────────────────────────────────────

    pub fn propose_execution(
        &mut self,
        proposer: &Address,
        action: ExecutionAction,
    ) -> Result<ExecutionId, CouncilError> {
        let caps = self.capabilities_of(proposer);
        self.transact(|c| {
            let id = c
                .consensus
                .propose_execution(caps, proposer, action.clone())?;
            let event = CouncilEvent::ExecutionProposed {
                id,
                proposer: proposer.clone(),
                action,
            };
            Ok((id, vec![event]))
        })
    }

    /// Vote on an execution proposal. The vote that reaches the
    /// supermajority also runs the inactivity sweep and dispatches the
    /// action; if the dispatch fails the vote is rolled back with it.
    pub fn vote_execution(
        &mut self,
        member: &Address,
        id: ExecutionId,
        now: BlockHeight,
    ) -> Result<ExecutionVote, CouncilError> {
        let _span = spans::execution_span(id, member).entered();
        self.transact(|c| {
            let vote = c.consensus.vote_execution(member, id)?;
            let mut events = Vec::new();
            match &vote {
                ExecutionVote::Pending { .. } => {
                    events.push(CouncilEvent::ExecutionVoted {
                        id,
                        member: member.clone(),
                        executed: false,
                    });
                }
                ExecutionVote::Executed { action, evicted } => {
                    events.push(CouncilEvent::ExecutionVoted {
                        id,
                        member: member.clone(),
                        executed: true,
                    });
                    events.extend(
                        evicted
                            .iter()
                            .map(|m| CouncilEvent::MemberEvicted { member: m.clone() }),
                    );
                    events.extend(c.dispatch_execution(action, now)?);
                }
            }
            Ok((vote, events))
        })
    }

    fn liquidity_manager(&self) -> Result<Arc<dyn LiquidityManager>, CouncilError> {
        self.liquidity
            .clone()
            .ok_or(CouncilError::CollaboratorNotWired("liquidity manager"))
    }

    fn dispatch_execution(
        &mut self,
        action: &ExecutionAction,
        now: BlockHeight,
    ) -> Result<Vec<CouncilEvent>, CouncilError> {
        let caller = self.access.consensus.clone();
        let applied = match action {
            ExecutionAction::Pause => self.asset.pause(),
            ExecutionAction::Unpause => self.asset.unpause(),
            ExecutionAction::RemoveFromWhitelist { game } => {
                self.asset.remove_from_game_whitelist(game)
            }
            ExecutionAction::InitialLiquidity => {
                self.liquidity_manager()?.initial_liquidity(&caller)
            }
            ExecutionAction::AddLiquidity { amount } => {
                self.liquidity_manager()?.add_liquidity(&caller, *amount)
            }
            ExecutionAction::ExecuteProposal(id) => {
                let report = self
                    .governance
                    .execute(consensus_authority(), &mut self.consensus, *id)?;
                return Ok(vec![CouncilEvent::ProposalExecuted {
                    id: *id,
                    kind: report.kind,
                }]);
            }
            ExecutionAction::FinalizeProposal(id) => {
                self.governance.finalize(consensus_authority(), *id, now)?;
                return Ok(vec![CouncilEvent::ProposalFinalized { id: *id }]);
            }
            ExecutionAction::BurnRewards(id) => {
                let amount = self.governance.burn_rewards(consensus_authority(), *id)?;
                return Ok(vec![CouncilEvent::RewardsBurned { id: *id, amount }]);
            }
        };
        let name = dispatch_name(action);
        if !applied {
            return Err(CouncilError::CollaboratorCallFailed(name));
        }
        info!(action = name, "execution action applied");
        Ok(Vec::new())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn consensus(&self) -> &ConsensusAuthority {
        &self.consensus
    }

    pub fn governance(&self) -> &GovernanceEngine {
        &self.governance
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize the consensus and governance state.
    pub fn save_state(&self) -> Result<Vec<u8>, CouncilError> {
        let snapshot = CouncilSnapshot {
            consensus: self.consensus.clone(),
            governance: self.governance.state().clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| CouncilError::Snapshot(e.to_string()))
    }

    /// Restore state written by [`save_state`](Self::save_state). Wiring and
    /// subscribers are left untouched.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), CouncilError> {
        let snapshot: CouncilSnapshot =
            bincode::deserialize(bytes).map_err(|e| CouncilError::Snapshot(e.to_string()))?;
        self.consensus = snapshot.consensus;
        self.governance.replace_state(snapshot.governance);
        info!(
            members = self.consensus.member_count(),
            proposals = self.governance.proposal_count(),
            "council state loaded"
        );
        Ok(())
    }
}

fn dispatch_name(action: &ExecutionAction) -> &'static str {
    match action {
        ExecutionAction::Pause => "pause",
        ExecutionAction::Unpause => "unpause",
        ExecutionAction::RemoveFromWhitelist { .. } => "whitelist removal",
        ExecutionAction::InitialLiquidity => "initial liquidity",
        ExecutionAction::AddLiquidity { .. } => "add liquidity",
        ExecutionAction::ExecuteProposal(_) => "execute proposal",
        ExecutionAction::FinalizeProposal(_) => "finalize proposal",
        ExecutionAction::BurnRewards(_) => "burn rewards",
    }
}
