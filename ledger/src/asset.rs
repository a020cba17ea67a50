//! Fungible asset ledger interface.

use agora_types::{Address, SettingKey};

/// Balances, transfers, supply and the per-setting parameter store.
pub trait AssetLedger: Send + Sync {
    /// Total token supply in raw units.
    fn total_supply(&self) -> u128;

    /// Balance of `who` in raw units.
    fn balance_of(&self, who: &Address) -> u128;

    /// Decimal places of the raw unit.
    fn decimals(&self) -> u8;

    /// Move `amount` from `from` to `to`. `from` is the acting account.
    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> bool;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(&self, spender: &Address, from: &Address, to: &Address, amount: u128) -> bool;

    /// Allow `spender` to move up to `amount` of `owner`'s tokens.
    fn approve(&self, owner: &Address, spender: &Address, amount: u128) -> bool;

    /// Current value of a governable setting.
    fn get_setting_value(&self, key: SettingKey) -> u128;

    /// Overwrite a governable setting.
    fn update_setting(&self, key: SettingKey, value: u128) -> bool;

    fn add_to_game_whitelist(&self, game: &Address) -> bool;

    fn remove_from_game_whitelist(&self, game: &Address) -> bool;

    fn is_game_active(&self, game: &Address) -> bool;

    fn pause(&self) -> bool;

    fn unpause(&self) -> bool;

    /// Destroy `amount` of `from`'s tokens, reducing supply.
    fn burn_tokens(&self, from: &Address, amount: u128) -> bool;
}
