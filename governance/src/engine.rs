//! The governance engine: proposal creation, staked voting, execution,
//! finalization, unstaking and residual burns.
//!
//! The engine owns custody of every stake under its own `identity` and acts
//! as the governance authority towards the consensus body. Entry points that
//! touch collaborators hold the [`ReentrancyGuard`] for their whole duration.
//! When a collaborator reports failure the engine reverts its own state and
//! reverses any token movement it already made before returning the error;
//! side effects already applied to the [`ConsensusAuthority`] are reverted by
//! the caller's checkpoint.

use crate::error::GovernanceError;
use crate::guard::ReentrancyGuard;
use crate::proposal::{Ballot, GovernanceProposal};
use crate::stake::{Settlement, StakeLedger, Withdrawal};
use agora_consensus::{ConsensusAuthority, ReviewUpdate};
use agora_ledger::{AssetLedger, RewardLedger, UpgradeTarget};
use agora_types::{
    bps_of, percent_of, Address, BlockHeight, Capabilities, MembershipChange, ProposalAction,
    ProposalId, ProposalKind, Role, SettingKey,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Share of supply that must vote before the generic path may execute.
pub const EXECUTION_QUORUM_PCT: u128 = 50;

/// Share of supply that must vote before an emergency reset fires.
pub const EMERGENCY_QUORUM_PCT: u128 = 40;

/// Share of the votes cast that must support an emergency reset.
pub const EMERGENCY_SUPPORT_PCT: u128 = 80;

/// Serializable part of the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceState {
    proposals: BTreeMap<ProposalId, GovernanceProposal>,
    /// Ids are never reused, even when a creation is rolled back.
    proposal_count: u64,
    stakes: StakeLedger,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalCreated {
    pub id: ProposalId,
    pub cost: u128,
    pub auto_approved: bool,
    pub purged_entries: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteReceipt {
    pub votes_for: u128,
    pub votes_against: u128,
    /// Present when this vote triggered an emergency reset.
    pub emergency: Option<ExecutionReport>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReport {
    pub id: ProposalId,
    pub kind: ProposalKind,
    pub settlement: Settlement,
    /// Consensus members removed by the action.
    pub removed_members: Vec<Address>,
}

#[derive(Clone)]
pub struct GovernanceEngine {
    identity: Address,
    state: GovernanceState,
    asset: Arc<dyn AssetLedger>,
    rewards: Option<Arc<dyn RewardLedger>>,
    upgrade: Option<Arc<dyn UpgradeTarget>>,
    guard: ReentrancyGuard,
}

impl GovernanceEngine {
    pub fn new(identity: Address, asset: Arc<dyn AssetLedger>) -> Self {
        Self {
            identity,
            state: GovernanceState::default(),
            asset,
            rewards: None,
            upgrade: None,
            guard: ReentrancyGuard::new(),
        }
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    /// Handle to the entry flag, shared with the engine.
    pub fn reentrancy_guard(&self) -> ReentrancyGuard {
        self.guard.clone()
    }

    // ── Wiring ──────────────────────────────────────────────────────────

    pub fn set_reward_ledger(
        &mut self,
        caller: Capabilities,
        rewards: Arc<dyn RewardLedger>,
    ) -> Result<(), GovernanceError> {
        GovernanceError::require(caller, Role::Admin)?;
        info!(reward_pool = %rewards.address(), "reward ledger wired");
        self.rewards = Some(rewards);
        Ok(())
    }

    pub fn set_upgrade_target(
        &mut self,
        caller: Capabilities,
        target: Arc<dyn UpgradeTarget>,
    ) -> Result<(), GovernanceError> {
        GovernanceError::require(caller, Role::Admin)?;
        info!("upgrade target wired");
        self.upgrade = Some(target);
        Ok(())
    }

    fn reward_ledger(&self) -> Result<Arc<dyn RewardLedger>, GovernanceError> {
        self.rewards
            .clone()
            .ok_or(GovernanceError::CollaboratorNotWired("reward ledger"))
    }

    fn own_caps(&self) -> Capabilities {
        Role::GovernanceAuthority.into()
    }

    // ── Thresholds ──────────────────────────────────────────────────────

    /// Tokens a proposer pays into the reward pool.
    pub fn proposal_cost(&self) -> Result<u128, GovernanceError> {
        let bps = self.asset.get_setting_value(SettingKey::ProposalCost);
        bps_of(self.asset.total_supply(), bps).ok_or(GovernanceError::Overflow)
    }

    /// Largest stake a single vote may carry.
    pub fn voting_power_cap(&self) -> Result<u128, GovernanceError> {
        let bps = self.asset.get_setting_value(SettingKey::VotingPowerCap);
        bps_of(self.asset.total_supply(), bps).ok_or(GovernanceError::Overflow)
    }

    fn voting_period(&self) -> u64 {
        let blocks = self.asset.get_setting_value(SettingKey::VotingPeriod);
        u64::try_from(blocks).unwrap_or(u64::MAX)
    }

    // ── Create ──────────────────────────────────────────────────────────

    /// Open a proposal, register it for consensus review and charge the
    /// proposal cost into the reward pool.
    pub fn create(
        &mut self,
        consensus: &mut ConsensusAuthority,
        proposer: &Address,
        action: ProposalAction,
        now: BlockHeight,
    ) -> Result<ProposalCreated, GovernanceError> {
        let _entry = self.guard.enter("create")?;
        let rewards = self.reward_ledger()?;

        if let ProposalAction::SettingUpdate { key, value } = &action {
            if !key.accepts(*value) {
                return Err(GovernanceError::SettingOutOfRange {
                    key: *key,
                    value: *value,
                });
            }
        }

        let cost = self.proposal_cost()?;
        let balance = self.asset.balance_of(proposer);
        if balance < cost {
            return Err(GovernanceError::InsufficientTokensForStake {
                have: balance,
                need: cost,
            });
        }

        let id = self
            .state
            .proposal_count
            .checked_add(1)
            .ok_or(GovernanceError::Overflow)?;
        self.state.proposal_count = id;
        let kind = action.kind();
        self.state.proposals.insert(
            id,
            GovernanceProposal::new(id, proposer.clone(), action.clone(), now),
        );

        let created = match consensus.review_create(self.own_caps(), id, action) {
            Ok(created) => created,
            Err(e) => {
                self.state.proposals.remove(&id);
                return Err(e.into());
            }
        };
        if created.auto_approved {
            if let Some(p) = self.state.proposals.get_mut(&id) {
                p.reviewed = true;
                p.approved = true;
                p.auto_approved = true;
            }
        }

        // The cost passes through custody so a refused deposit can be refunded.
        if cost > 0 {
            if !self
                .asset
                .transfer_from(&self.identity, proposer, &self.identity, cost)
            {
                self.state.proposals.remove(&id);
                return Err(GovernanceError::TransferFailed("proposal cost transfer"));
            }
            if !rewards.deposit_rewards(&self.identity, id, cost) {
                self.state.proposals.remove(&id);
                if !self.asset.transfer(&self.identity, proposer, cost) {
                    error!(
                        proposal = id,
                        proposer = %proposer,
                        cost,
                        "proposal cost refund failed, cost left in custody"
                    );
                }
                return Err(GovernanceError::CollaboratorCallFailed("reward deposit"));
            }
        }

        info!(
            proposal = id,
            %kind,
            proposer = %proposer,
            cost,
            auto_approved = created.auto_approved,
            "governance proposal created"
        );
        Ok(ProposalCreated {
            id,
            cost,
            auto_approved: created.auto_approved,
            purged_entries: created.purged_entries,
        })
    }

    /// Mirror the consensus verdict on a proposal.
    pub fn update_review_status(
        &mut self,
        caller: Capabilities,
        update: ReviewUpdate,
    ) -> Result<(), GovernanceError> {
        GovernanceError::require(caller, Role::ConsensusAuthority)?;
        let proposal = self
            .state
            .proposals
            .get_mut(&update.proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(update.proposal_id))?;
        proposal.reviewed = update.reviewed;
        proposal.approved = update.approved;
        debug!(
            proposal = update.proposal_id,
            reviewed = update.reviewed,
            approved = update.approved,
            "review status mirrored"
        );
        Ok(())
    }

    // ── Vote ────────────────────────────────────────────────────────────

    /// Cast a staked vote. The stake moves into custody; an emergency reset
    /// that crosses its thresholds executes inside this call.
    pub fn vote(
        &mut self,
        consensus: &mut ConsensusAuthority,
        voter: &Address,
        id: ProposalId,
        support: bool,
        stake: u128,
    ) -> Result<VoteReceipt, GovernanceError> {
        let _entry = self.guard.enter("vote")?;
        let cap = self.voting_power_cap()?;

        let proposal = self
            .state
            .proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if proposal.has_voted(voter) {
            return Err(GovernanceError::AlreadyVoted {
                voter: voter.clone(),
                proposal: id,
            });
        }
        if stake == 0 {
            return Err(GovernanceError::ZeroStake);
        }
        if stake > cap {
            return Err(GovernanceError::VotingPowerCapExceeded { stake, cap });
        }
        let balance = self.asset.balance_of(voter);
        if balance < stake {
            return Err(GovernanceError::InsufficientBalance {
                have: balance,
                need: stake,
            });
        }
        if !proposal.reviewed {
            return Err(GovernanceError::NotReviewed(id));
        }
        if !proposal.approved {
            return Err(GovernanceError::NotApproved(id));
        }

        let (votes_for, votes_against) = if support {
            (
                proposal
                    .votes_for
                    .checked_add(stake)
                    .ok_or(GovernanceError::Overflow)?,
                proposal.votes_against,
            )
        } else {
            (
                proposal.votes_for,
                proposal
                    .votes_against
                    .checked_add(stake)
                    .ok_or(GovernanceError::Overflow)?,
            )
        };

        self.state.stakes.stake(id, voter, stake)?;
        if let Some(p) = self.state.proposals.get_mut(&id) {
            p.votes_for = votes_for;
            p.votes_against = votes_against;
            p.ballots.insert(voter.clone(), Ballot { support, stake });
        }

        if !self
            .asset
            .transfer_from(&self.identity, voter, &self.identity, stake)
        {
            self.unwind_vote(id, voter, support, stake);
            return Err(GovernanceError::TransferFailed("stake transfer"));
        }

        debug!(proposal = id, voter = %voter, support, stake, "vote cast");

        let mut emergency = None;
        if self.emergency_thresholds_met(id, votes_for, votes_against)? {
            match self.execute_emergency(consensus, id) {
                Ok(report) => emergency = Some(report),
                Err(e) => {
                    self.unwind_vote(id, voter, support, stake);
                    if !self.asset.transfer(&self.identity, voter, stake) {
                        error!(
                            proposal = id,
                            voter = %voter,
                            stake,
                            "stake refund failed, stake left in custody"
                        );
                    }
                    return Err(e);
                }
            }
        }

        Ok(VoteReceipt {
            votes_for,
            votes_against,
            emergency,
        })
    }

    /// Remove a ballot whose stake never reached custody.
    fn unwind_vote(&mut self, id: ProposalId, voter: &Address, support: bool, stake: u128) {
        self.state.stakes.reverse_stake(id, voter, stake);
        if let Some(p) = self.state.proposals.get_mut(&id) {
            p.ballots.remove(voter);
            if support {
                p.votes_for = p.votes_for.saturating_sub(stake);
            } else {
                p.votes_against = p.votes_against.saturating_sub(stake);
            }
        }
    }

    fn emergency_thresholds_met(
        &self,
        id: ProposalId,
        votes_for: u128,
        votes_against: u128,
    ) -> Result<bool, GovernanceError> {
        let is_emergency = self
            .state
            .proposals
            .get(&id)
            .map(|p| p.kind() == ProposalKind::EmergencyReset)
            .unwrap_or(false);
        if !is_emergency {
            return Ok(false);
        }
        let total = votes_for
            .checked_add(votes_against)
            .ok_or(GovernanceError::Overflow)?;
        let supply = self.asset.total_supply();
        let participation = at_least_percent(total, supply, EMERGENCY_QUORUM_PCT)?;
        let support = at_least_percent(votes_for, total, EMERGENCY_SUPPORT_PCT)?;
        Ok(participation && support)
    }

    fn execute_emergency(
        &mut self,
        consensus: &mut ConsensusAuthority,
        id: ProposalId,
    ) -> Result<ExecutionReport, GovernanceError> {
        // Fail before touching the consensus body if settlement cannot run.
        self.reward_ledger()?;
        let removed_members = consensus.revoke_all(self.own_caps())?;
        let report = self.conclude(id, true, removed_members)?;
        warn!(
            proposal = id,
            removed = report.removed_members.len(),
            "emergency reset executed"
        );
        Ok(report)
    }

    // ── Execute / finalize ──────────────────────────────────────────────

    /// Execute a proposal that met quorum and majority.
    pub fn execute(
        &mut self,
        caller: Capabilities,
        consensus: &mut ConsensusAuthority,
        id: ProposalId,
    ) -> Result<ExecutionReport, GovernanceError> {
        GovernanceError::require(caller, Role::ConsensusAuthority)?;
        let _entry = self.guard.enter("execute")?;

        let proposal = self
            .state
            .proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if proposal.kind() == ProposalKind::EmergencyReset {
            return Err(GovernanceError::EmergencyResetIsAutomatic(id));
        }
        if !proposal.reviewed {
            return Err(GovernanceError::NotReviewed(id));
        }
        if !proposal.approved {
            return Err(GovernanceError::NotApproved(id));
        }

        let total = proposal.total_votes().ok_or(GovernanceError::Overflow)?;
        let supply = self.asset.total_supply();
        if !at_least_percent(total, supply, EXECUTION_QUORUM_PCT)? {
            let needed = percent_of(supply, EXECUTION_QUORUM_PCT).ok_or(GovernanceError::Overflow)?;
            return Err(GovernanceError::QuorumNotMet {
                votes: total,
                needed,
            });
        }
        if proposal.votes_for <= proposal.votes_against {
            return Err(GovernanceError::MajorityNotReached {
                votes_for: proposal.votes_for,
                votes_against: proposal.votes_against,
            });
        }

        let action = proposal.action.clone();
        let removed_members = self.dispatch(consensus, &action)?;
        let report = self.conclude(id, true, removed_members)?;
        info!(proposal = id, kind = %report.kind, "governance proposal executed");
        Ok(report)
    }

    /// Close a proposal whose voting period has elapsed, without effect.
    pub fn finalize(
        &mut self,
        caller: Capabilities,
        id: ProposalId,
        now: BlockHeight,
    ) -> Result<ExecutionReport, GovernanceError> {
        GovernanceError::require(caller, Role::ConsensusAuthority)?;
        let _entry = self.guard.enter("finalize")?;

        let period = self.voting_period();
        let proposal = self
            .state
            .proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if !proposal.created_at.has_elapsed(period, now) {
            return Err(GovernanceError::VotingPeriodActive {
                ends_at: proposal.created_at.advanced_by(period),
            });
        }

        let report = self.conclude(id, false, Vec::new())?;
        info!(proposal = id, "governance proposal finalized");
        Ok(report)
    }

    fn dispatch(
        &self,
        consensus: &mut ConsensusAuthority,
        action: &ProposalAction,
    ) -> Result<Vec<Address>, GovernanceError> {
        match action {
            ProposalAction::WhitelistChange { game } => {
                if !self.asset.add_to_game_whitelist(game) {
                    return Err(GovernanceError::CollaboratorCallFailed("game whitelist"));
                }
                Ok(Vec::new())
            }
            ProposalAction::MembershipChange(MembershipChange::Grant(member)) => {
                consensus.grant(self.own_caps(), member.clone())?;
                Ok(Vec::new())
            }
            ProposalAction::MembershipChange(MembershipChange::Revoke(member)) => {
                consensus.revoke(self.own_caps(), member)?;
                Ok(vec![member.clone()])
            }
            ProposalAction::SettingUpdate { key, value } => {
                if !self.asset.update_setting(*key, *value) {
                    return Err(GovernanceError::CollaboratorCallFailed("setting update"));
                }
                Ok(Vec::new())
            }
            ProposalAction::ContractUpgrade {
                implementation,
                data,
            } => {
                let target = self
                    .upgrade
                    .as_ref()
                    .ok_or(GovernanceError::CollaboratorNotWired("upgrade target"))?;
                if !target.upgrade_to_and_call(&self.identity, implementation, data) {
                    return Err(GovernanceError::CollaboratorCallFailed("contract upgrade"));
                }
                Ok(Vec::new())
            }
            ProposalAction::EmergencyReset => Ok(consensus.revoke_all(self.own_caps())?),
        }
    }

    /// Mark the proposal executed and snapshot its stakes and rewards.
    fn conclude(
        &mut self,
        id: ProposalId,
        result: bool,
        removed_members: Vec<Address>,
    ) -> Result<ExecutionReport, GovernanceError> {
        let rewards = self.reward_ledger()?.rewards_for_proposal(id);
        let settlement = self.state.stakes.settle(id, rewards)?;
        let proposal = self
            .state
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        proposal.executed = true;
        proposal.result = result;
        Ok(ExecutionReport {
            id,
            kind: proposal.kind(),
            settlement,
            removed_members,
        })
    }

    // ── Unstake / burn ──────────────────────────────────────────────────

    /// Return `staker`'s principal and pro-rata reward for a concluded
    /// proposal.
    pub fn unstake(
        &mut self,
        staker: &Address,
        id: ProposalId,
    ) -> Result<Withdrawal, GovernanceError> {
        let _entry = self.guard.enter("unstake")?;
        let proposal = self
            .state
            .proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if !proposal.executed {
            return Err(GovernanceError::NotExecuted(id));
        }
        let rewards = self.reward_ledger()?;

        let withdrawal = self.state.stakes.withdraw(id, staker)?;
        if !self
            .asset
            .transfer(&self.identity, staker, withdrawal.principal)
        {
            self.state.stakes.restore(id, staker, withdrawal);
            return Err(GovernanceError::TransferFailed("stake return"));
        }
        if withdrawal.reward > 0
            && !rewards.transfer_rewards(&self.identity, staker, id, withdrawal.reward)
        {
            // The principal is already out; pull it back before reinstating the stake.
            if self
                .asset
                .transfer_from(&self.identity, staker, &self.identity, withdrawal.principal)
            {
                self.state.stakes.restore(id, staker, withdrawal);
                return Err(GovernanceError::CollaboratorCallFailed("reward payout"));
            }
            self.state.stakes.forfeit_reward(id, withdrawal.reward);
            error!(
                proposal = id,
                staker = %staker,
                principal = withdrawal.principal,
                forfeited = withdrawal.reward,
                "reward payout failed after principal was returned"
            );
            return Ok(Withdrawal {
                principal: withdrawal.principal,
                reward: 0,
            });
        }

        info!(
            proposal = id,
            staker = %staker,
            principal = withdrawal.principal,
            reward = withdrawal.reward,
            "stake withdrawn"
        );
        Ok(withdrawal)
    }

    /// Burn the rewards left over after every stake is withdrawn.
    pub fn burn_rewards(
        &mut self,
        caller: Capabilities,
        id: ProposalId,
    ) -> Result<u128, GovernanceError> {
        GovernanceError::require(caller, Role::ConsensusAuthority)?;
        let _entry = self.guard.enter("burn_rewards")?;
        if !self.state.proposals.contains_key(&id) {
            return Err(GovernanceError::ProposalNotFound(id));
        }
        let rewards = self.reward_ledger()?;

        let residual = self.state.stakes.burnable(id)?;
        self.state.stakes.mark_burned(id, residual);
        if !rewards.burn_residual_tokens(&self.identity, id, residual) {
            self.state.stakes.unmark_burned(id, residual);
            return Err(GovernanceError::CollaboratorCallFailed("residual burn"));
        }
        info!(proposal = id, burned = residual, "residual rewards burned");
        Ok(residual)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn proposal(&self, id: ProposalId) -> Option<&GovernanceProposal> {
        self.state.proposals.get(&id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &GovernanceProposal> {
        self.state.proposals.values()
    }

    pub fn proposal_count(&self) -> u64 {
        self.state.proposal_count
    }

    pub fn stake_of(&self, id: ProposalId, staker: &Address) -> u128 {
        self.state.stakes.stake_of(id, staker)
    }

    pub fn total_staked(&self, id: ProposalId) -> u128 {
        self.state.stakes.total_staked(id)
    }

    pub fn settlement(&self, id: ProposalId) -> Option<Settlement> {
        self.state.stakes.settlement(id)
    }

    pub fn state(&self) -> &GovernanceState {
        &self.state
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.state).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Swap in a previously captured state, e.g. to undo a failed operation.
    pub fn replace_state(&mut self, state: GovernanceState) {
        self.state = state;
    }

    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), GovernanceError> {
        self.state =
            bincode::deserialize(bytes).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Ok(())
    }
}

/// `part >= whole * pct / 100`, compared without rounding.
fn at_least_percent(part: u128, whole: u128, pct: u128) -> Result<bool, GovernanceError> {
    let lhs = part.checked_mul(100).ok_or(GovernanceError::Overflow)?;
    let rhs = whole.checked_mul(pct).ok_or(GovernanceError::Overflow)?;
    Ok(lhs >= rhs)
}
