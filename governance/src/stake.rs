//! Stake custody accounting and reward settlement.
//!
//! Stakes accumulate per (proposal, staker) while a proposal is open. When it
//! is executed or finalized the ledger takes a one-shot [`Settlement`]
//! snapshot of the total staked and the rewards deposited for it. Each
//! staker then withdraws `stake * rewards / staked` (floored); whatever the
//! flooring leaves behind is the residual that may be burned once every
//! stake is out.

use crate::error::GovernanceError;
use agora_types::{mul_div, Address, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot taken when a proposal's stakes become withdrawable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub staked_at_execution: u128,
    pub rewards_at_execution: u128,
    pub distributed: u128,
    pub burned: u128,
}

impl Settlement {
    /// Rewards neither paid to stakers nor burned.
    pub fn residual(&self) -> u128 {
        self.rewards_at_execution
            .saturating_sub(self.distributed)
            .saturating_sub(self.burned)
    }
}

/// What a single unstake releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    pub principal: u128,
    pub reward: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLedger {
    stakes: BTreeMap<(ProposalId, Address), u128>,
    totals: BTreeMap<ProposalId, u128>,
    settlements: BTreeMap<ProposalId, Settlement>,
}

impl StakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `staker`'s custody balance on `proposal`.
    pub fn stake(
        &mut self,
        proposal: ProposalId,
        staker: &Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        if amount == 0 {
            return Err(GovernanceError::ZeroStake);
        }
        if self.settlements.contains_key(&proposal) {
            return Err(GovernanceError::AlreadySettled(proposal));
        }
        let key = (proposal, staker.clone());
        let current = self.stakes.get(&key).copied().unwrap_or(0);
        let total = self.total_staked(proposal);
        let new_stake = current
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        let new_total = total.checked_add(amount).ok_or(GovernanceError::Overflow)?;
        self.stakes.insert(key, new_stake);
        self.totals.insert(proposal, new_total);
        Ok(())
    }

    /// Undo a [`stake`](Self::stake) whose token transfer failed.
    pub fn reverse_stake(&mut self, proposal: ProposalId, staker: &Address, amount: u128) {
        let key = (proposal, staker.clone());
        if let Some(current) = self.stakes.get_mut(&key) {
            *current = current.saturating_sub(amount);
            if *current == 0 {
                self.stakes.remove(&key);
            }
        }
        if let Some(total) = self.totals.get_mut(&proposal) {
            *total = total.saturating_sub(amount);
            if *total == 0 {
                self.totals.remove(&proposal);
            }
        }
    }

    pub fn stake_of(&self, proposal: ProposalId, staker: &Address) -> u128 {
        self.stakes
            .get(&(proposal, staker.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Stake currently in custody for `proposal`.
    pub fn total_staked(&self, proposal: ProposalId) -> u128 {
        self.totals.get(&proposal).copied().unwrap_or(0)
    }

    /// Freeze the total staked and the rewards deposited for `proposal`.
    pub fn settle(
        &mut self,
        proposal: ProposalId,
        rewards: u128,
    ) -> Result<Settlement, GovernanceError> {
        if self.settlements.contains_key(&proposal) {
            return Err(GovernanceError::AlreadySettled(proposal));
        }
        let settlement = Settlement {
            staked_at_execution: self.total_staked(proposal),
            rewards_at_execution: rewards,
            distributed: 0,
            burned: 0,
        };
        self.settlements.insert(proposal, settlement);
        Ok(settlement)
    }

    pub fn settlement(&self, proposal: ProposalId) -> Option<Settlement> {
        self.settlements.get(&proposal).copied()
    }

    /// Release `staker`'s principal and pro-rata reward.
    pub fn withdraw(
        &mut self,
        proposal: ProposalId,
        staker: &Address,
    ) -> Result<Withdrawal, GovernanceError> {
        let settlement = self
            .settlements
            .get(&proposal)
            .copied()
            .ok_or(GovernanceError::NotExecuted(proposal))?;
        let key = (proposal, staker.clone());
        let principal = match self.stakes.get(&key) {
            Some(&amount) if amount > 0 => amount,
            _ => {
                return Err(GovernanceError::NoStake {
                    staker: staker.clone(),
                    proposal,
                })
            }
        };

        let share = mul_div(
            principal,
            settlement.rewards_at_execution,
            settlement.staked_at_execution,
        )
        .ok_or(GovernanceError::Overflow)?;
        let reward = share.min(settlement.residual());
        let distributed = settlement
            .distributed
            .checked_add(reward)
            .ok_or(GovernanceError::Overflow)?;

        self.stakes.remove(&key);
        if let Some(total) = self.totals.get_mut(&proposal) {
            *total = total.saturating_sub(principal);
        }
        if let Some(s) = self.settlements.get_mut(&proposal) {
            s.distributed = distributed;
        }
        Ok(Withdrawal { principal, reward })
    }

    /// Undo a [`withdraw`](Self::withdraw) whose payout failed.
    pub fn restore(&mut self, proposal: ProposalId, staker: &Address, withdrawal: Withdrawal) {
        self.stakes
            .insert((proposal, staker.clone()), withdrawal.principal);
        let total = self.totals.entry(proposal).or_insert(0);
        *total = total.saturating_add(withdrawal.principal);
        if let Some(s) = self.settlements.get_mut(&proposal) {
            s.distributed = s.distributed.saturating_sub(withdrawal.reward);
        }
    }

    /// Return an unpaid reward to the residual of `proposal`.
    pub fn forfeit_reward(&mut self, proposal: ProposalId, reward: u128) {
        if let Some(s) = self.settlements.get_mut(&proposal) {
            s.distributed = s.distributed.saturating_sub(reward);
        }
    }

    /// Residual rewards of `proposal`, available only once every stake is out.
    pub fn burnable(&self, proposal: ProposalId) -> Result<u128, GovernanceError> {
        let settlement = self
            .settlements
            .get(&proposal)
            .ok_or(GovernanceError::NotExecuted(proposal))?;
        let remaining = self.total_staked(proposal);
        if remaining > 0 {
            return Err(GovernanceError::StakesOutstanding {
                proposal,
                remaining,
            });
        }
        match settlement.residual() {
            0 => Err(GovernanceError::NoResidualRewards(proposal)),
            residual => Ok(residual),
        }
    }

    pub fn mark_burned(&mut self, proposal: ProposalId, amount: u128) {
        if let Some(s) = self.settlements.get_mut(&proposal) {
            s.burned = s.burned.saturating_add(amount);
        }
    }

    pub fn unmark_burned(&mut self, proposal: ProposalId, amount: u128) {
        if let Some(s) = self.settlements.get_mut(&proposal) {
            s.burned = s.burned.saturating_sub(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("agr_{s}"))
    }

    #[test]
    fn stakes_accumulate_per_staker() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 100).unwrap();
        ledger.stake(1, &addr("a"), 50).unwrap();
        ledger.stake(1, &addr("b"), 25).unwrap();
        ledger.stake(2, &addr("a"), 7).unwrap();
        assert_eq!(ledger.stake_of(1, &addr("a")), 150);
        assert_eq!(ledger.total_staked(1), 175);
        assert_eq!(ledger.total_staked(2), 7);
    }

    #[test]
    fn zero_stake_rejected() {
        let mut ledger = StakeLedger::new();
        assert!(matches!(
            ledger.stake(1, &addr("a"), 0),
            Err(GovernanceError::ZeroStake)
        ));
    }

    #[test]
    fn withdraw_before_settlement_rejected() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 100).unwrap();
        assert!(matches!(
            ledger.withdraw(1, &addr("a")),
            Err(GovernanceError::NotExecuted(1))
        ));
    }

    #[test]
    fn pro_rata_reward() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 100).unwrap();
        ledger.stake(1, &addr("b"), 900).unwrap();
        ledger.settle(1, 50).unwrap();

        let w = ledger.withdraw(1, &addr("a")).unwrap();
        assert_eq!(w, Withdrawal { principal: 100, reward: 5 });
        let w = ledger.withdraw(1, &addr("b")).unwrap();
        assert_eq!(w, Withdrawal { principal: 900, reward: 45 });

        assert_eq!(ledger.total_staked(1), 0);
        assert_eq!(ledger.settlement(1).unwrap().distributed, 50);
        assert!(matches!(
            ledger.burnable(1),
            Err(GovernanceError::NoResidualRewards(1))
        ));
    }

    #[test]
    fn second_withdraw_has_no_stake() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 10).unwrap();
        ledger.settle(1, 0).unwrap();
        ledger.withdraw(1, &addr("a")).unwrap();
        assert!(matches!(
            ledger.withdraw(1, &addr("a")),
            Err(GovernanceError::NoStake { .. })
        ));
    }

    #[test]
    fn settle_is_one_shot() {
        let mut ledger = StakeLedger::new();
        ledger.settle(1, 10).unwrap();
        assert!(matches!(
            ledger.settle(1, 20),
            Err(GovernanceError::AlreadySettled(1))
        ));
        assert!(matches!(
            ledger.stake(1, &addr("a"), 5),
            Err(GovernanceError::AlreadySettled(1))
        ));
    }

    #[test]
    fn residual_burnable_after_last_unstake() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 333).unwrap();
        ledger.stake(1, &addr("b"), 667).unwrap();
        ledger.settle(1, 50).unwrap();

        assert_eq!(ledger.withdraw(1, &addr("a")).unwrap().reward, 16);
        assert!(matches!(
            ledger.burnable(1),
            Err(GovernanceError::StakesOutstanding { remaining: 667, .. })
        ));
        assert_eq!(ledger.withdraw(1, &addr("b")).unwrap().reward, 33);
        assert_eq!(ledger.burnable(1).unwrap(), 1);

        ledger.mark_burned(1, 1);
        assert!(matches!(
            ledger.burnable(1),
            Err(GovernanceError::NoResidualRewards(1))
        ));
    }

    #[test]
    fn forfeited_reward_becomes_residual() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 100).unwrap();
        ledger.stake(1, &addr("b"), 900).unwrap();
        ledger.settle(1, 50).unwrap();

        let w = ledger.withdraw(1, &addr("a")).unwrap();
        ledger.forfeit_reward(1, w.reward);
        assert_eq!(ledger.withdraw(1, &addr("b")).unwrap().reward, 45);
        assert_eq!(ledger.burnable(1).unwrap(), 5);
    }

    #[test]
    fn reverse_stake_restores_empty_ledger() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 40).unwrap();
        ledger.reverse_stake(1, &addr("a"), 40);
        assert_eq!(ledger, StakeLedger::new());
    }

    #[test]
    fn restore_reverts_withdraw() {
        let mut ledger = StakeLedger::new();
        ledger.stake(1, &addr("a"), 100).unwrap();
        ledger.stake(1, &addr("b"), 100).unwrap();
        ledger.settle(1, 10).unwrap();
        let before = ledger.clone();

        let w = ledger.withdraw(1, &addr("a")).unwrap();
        ledger.restore(1, &addr("a"), w);
        assert_eq!(ledger, before);
    }
}
