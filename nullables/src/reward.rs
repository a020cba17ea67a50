//! Nullable reward pool: holds its tokens on a [`NullAssetLedger`] and
//! tracks deposits per proposal.

use crate::asset::NullAssetLedger;
use agora_ledger::{AssetLedger, RewardLedger};
use agora_types::{Address, ProposalId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub struct NullRewardLedger {
    asset: Arc<NullAssetLedger>,
    address: Address,
    governance: Address,
    deposits: Mutex<HashMap<ProposalId, u128>>,
    fail_calls: AtomicBool,
}

impl NullRewardLedger {
    /// A pool at `address` that accepts calls only from `governance`.
    pub fn new(asset: Arc<NullAssetLedger>, address: Address, governance: Address) -> Self {
        Self {
            asset,
            address,
            governance,
            deposits: Mutex::new(HashMap::new()),
            fail_calls: AtomicBool::new(false),
        }
    }

    pub fn fail_calls(&self, fail: bool) {
        self.fail_calls.store(fail, Ordering::SeqCst);
    }

    fn accepts(&self, caller: &Address) -> bool {
        *caller == self.governance && !self.fail_calls.load(Ordering::SeqCst)
    }

    fn withdraw(&self, proposal_id: ProposalId, amount: u128) -> bool {
        let mut deposits = self.deposits.lock().unwrap();
        let held = deposits.get(&proposal_id).copied().unwrap_or(0);
        if held < amount {
            return false;
        }
        deposits.insert(proposal_id, held - amount);
        true
    }
}

impl RewardLedger for NullRewardLedger {
    fn address(&self) -> Address {
        self.address.clone()
    }

    fn deposit_rewards(&self, caller: &Address, proposal_id: ProposalId, amount: u128) -> bool {
        if !self.accepts(caller) || !self.asset.transfer(caller, &self.address, amount) {
            return false;
        }
        *self
            .deposits
            .lock()
            .unwrap()
            .entry(proposal_id)
            .or_insert(0) += amount;
        true
    }

    fn transfer_rewards(
        &self,
        caller: &Address,
        to: &Address,
        proposal_id: ProposalId,
        amount: u128,
    ) -> bool {
        if !self.accepts(caller) || !self.withdraw(proposal_id, amount) {
            return false;
        }
        if !self.asset.transfer(&self.address, to, amount) {
            *self
                .deposits
                .lock()
                .unwrap()
                .entry(proposal_id)
                .or_insert(0) += amount;
            return false;
        }
        true
    }

    fn rewards_for_proposal(&self, proposal_id: ProposalId) -> u128 {
        self.deposits
            .lock()
            .unwrap()
            .get(&proposal_id)
            .copied()
            .unwrap_or(0)
    }

    fn burn_residual_tokens(&self, caller: &Address, proposal_id: ProposalId, amount: u128) -> bool {
        if !self.accepts(caller) || !self.withdraw(proposal_id, amount) {
            return false;
        }
        self.asset.burn_tokens(&self.address, amount)
    }
}
