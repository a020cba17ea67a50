//! Upgradeable target interface.

use agora_types::Address;

/// A component whose implementation can be swapped by a ContractUpgrade proposal.
pub trait UpgradeTarget: Send + Sync {
    /// Switch to `implementation` and run `data` against it.
    fn upgrade_to_and_call(&self, caller: &Address, implementation: &Address, data: &[u8]) -> bool;
}
