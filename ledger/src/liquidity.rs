//! AMM liquidity manager interface.

use agora_types::Address;

/// Liquidity provisioning side effects driven by consensus execution proposals.
pub trait LiquidityManager: Send + Sync {
    /// Seed the initial pool. Gated to the consensus authority.
    fn initial_liquidity(&self, caller: &Address) -> bool;

    /// Add `amount` of liquidity. Gated to the consensus authority.
    fn add_liquidity(&self, caller: &Address, amount: u128) -> bool;

    /// Whether the initial pool has been seeded.
    fn initial_liquidity_status(&self) -> bool;

    /// Address of the AMM router in use.
    fn router_address(&self) -> Address;
}
