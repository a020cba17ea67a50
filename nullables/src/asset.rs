//! Nullable asset ledger: balances, allowances, settings and the game
//! whitelist held in memory.

use agora_ledger::AssetLedger;
use agora_types::{Address, SettingKey};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type TransferHook = Arc<dyn Fn() + Send + Sync>;

/// Setting values a fresh ledger starts with.
pub fn default_settings() -> HashMap<SettingKey, u128> {
    HashMap::from([
        (SettingKey::LiquidityFee, 100),
        (SettingKey::BurnFee, 50),
        (SettingKey::SwapLimit, 1_000_000),
        (SettingKey::RewardThreshold, 1_000_000),
        (SettingKey::LiquidityThreshold, 1_000_000),
        (SettingKey::TransferLimit, 100),
        (SettingKey::VotingPowerCap, 4_000),
        (SettingKey::ProposalCost, 10),
        (SettingKey::CommunityTax, 100),
        (SettingKey::DeveloperTax, 100),
        (SettingKey::CooldownMinBlock, 10),
        (SettingKey::VotingPeriod, 100),
    ])
}

/// An in-memory token ledger for testing.
pub struct NullAssetLedger {
    balances: Mutex<HashMap<Address, u128>>,
    allowances: Mutex<HashMap<(Address, Address), u128>>,
    settings: Mutex<HashMap<SettingKey, u128>>,
    whitelist: Mutex<HashSet<Address>>,
    supply: Mutex<u128>,
    paused: AtomicBool,
    fail_transfers: AtomicBool,
    transfer_hook: Mutex<Option<TransferHook>>,
}

impl NullAssetLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            settings: Mutex::new(default_settings()),
            whitelist: Mutex::new(HashSet::new()),
            supply: Mutex::new(0),
            paused: AtomicBool::new(false),
            fail_transfers: AtomicBool::new(false),
            transfer_hook: Mutex::new(None),
        }
    }

    /// A ledger whose total supply is exactly the given balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let ledger = Self::new();
        for (who, amount) in balances {
            ledger.mint(&who, amount);
        }
        ledger
    }

    pub fn mint(&self, who: &Address, amount: u128) {
        *self
            .balances
            .lock()
            .unwrap()
            .entry(who.clone())
            .or_insert(0) += amount;
        *self.supply.lock().unwrap() += amount;
    }

    /// Overwrite a setting without range checks.
    pub fn set_setting(&self, key: SettingKey, value: u128) {
        self.settings.lock().unwrap().insert(key, value);
    }

    /// Make every transfer report failure until switched back.
    pub fn fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }

    /// Run `hook` at the start of every transfer, before balances move.
    pub fn on_transfer(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.transfer_hook.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .lock()
            .unwrap()
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn run_hook(&self) {
        let hook = self.transfer_hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn move_balance(&self, from: &Address, to: &Address, amount: u128) -> bool {
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        balances.insert(from.clone(), available - amount);
        *balances.entry(to.clone()).or_insert(0) += amount;
        true
    }
}

impl Default for NullAssetLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLedger for NullAssetLedger {
    fn total_supply(&self) -> u128 {
        *self.supply.lock().unwrap()
    }

    fn balance_of(&self, who: &Address) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(who)
            .copied()
            .unwrap_or(0)
    }

    fn decimals(&self) -> u8 {
        18
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> bool {
        self.run_hook();
        if self.fail_transfers.load(Ordering::SeqCst) {
            return false;
        }
        self.move_balance(from, to, amount)
    }

    fn transfer_from(&self, spender: &Address, from: &Address, to: &Address, amount: u128) -> bool {
        self.run_hook();
        if self.fail_transfers.load(Ordering::SeqCst) {
            return false;
        }
        let key = (from.clone(), spender.clone());
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return false;
        }
        if !self.move_balance(from, to, amount) {
            return false;
        }
        // An allowance of u128::MAX never decreases.
        if allowed != u128::MAX {
            self.allowances
                .lock()
                .unwrap()
                .insert(key, allowed - amount);
        }
        true
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: u128) -> bool {
        self.allowances
            .lock()
            .unwrap()
            .insert((owner.clone(), spender.clone()), amount);
        true
    }

    fn get_setting_value(&self, key: SettingKey) -> u128 {
        self.settings
            .lock()
            .unwrap()
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    fn update_setting(&self, key: SettingKey, value: u128) -> bool {
        if !key.accepts(value) {
            return false;
        }
        self.set_setting(key, value);
        true
    }

    fn add_to_game_whitelist(&self, game: &Address) -> bool {
        self.whitelist.lock().unwrap().insert(game.clone());
        true
    }

    fn remove_from_game_whitelist(&self, game: &Address) -> bool {
        self.whitelist.lock().unwrap().remove(game)
    }

    fn is_game_active(&self, game: &Address) -> bool {
        self.whitelist.lock().unwrap().contains(game)
    }

    fn pause(&self) -> bool {
        !self.paused.swap(true, Ordering::SeqCst)
    }

    fn unpause(&self) -> bool {
        self.paused.swap(false, Ordering::SeqCst)
    }

    fn burn_tokens(&self, from: &Address, amount: u128) -> bool {
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        balances.insert(from.clone(), available - amount);
        *self.supply.lock().unwrap() -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("agr_{s}"))
    }

    #[test]
    fn supply_tracks_mint_and_burn() {
        let ledger = NullAssetLedger::with_balances([(addr("a"), 700), (addr("b"), 300)]);
        assert_eq!(ledger.total_supply(), 1_000);
        assert!(ledger.burn_tokens(&addr("a"), 200));
        assert!(!ledger.burn_tokens(&addr("b"), 301));
        assert_eq!(ledger.total_supply(), 800);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let ledger = NullAssetLedger::with_balances([(addr("a"), 100)]);
        assert!(!ledger.transfer_from(&addr("s"), &addr("a"), &addr("b"), 10));
        ledger.approve(&addr("a"), &addr("s"), 30);
        assert!(ledger.transfer_from(&addr("s"), &addr("a"), &addr("b"), 10));
        assert_eq!(ledger.allowance(&addr("a"), &addr("s")), 20);
        assert_eq!(ledger.balance_of(&addr("b")), 10);
    }

    #[test]
    fn failing_transfers_move_nothing() {
        let ledger = NullAssetLedger::with_balances([(addr("a"), 100)]);
        ledger.fail_transfers(true);
        assert!(!ledger.transfer(&addr("a"), &addr("b"), 10));
        assert_eq!(ledger.balance_of(&addr("a")), 100);
    }

    #[test]
    fn update_setting_checks_range() {
        let ledger = NullAssetLedger::new();
        assert!(!ledger.update_setting(SettingKey::BurnFee, 5));
        assert!(ledger.update_setting(SettingKey::BurnFee, 25));
        assert_eq!(ledger.get_setting_value(SettingKey::BurnFee), 25);
    }

    #[test]
    fn pause_toggles_once() {
        let ledger = NullAssetLedger::new();
        assert!(ledger.pause());
        assert!(!ledger.pause());
        assert!(ledger.is_paused());
        assert!(ledger.unpause());
        assert!(!ledger.unpause());
    }
}
