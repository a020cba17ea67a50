//! Reward pool interface.

use agora_types::{Address, ProposalId};

/// Per-proposal reward accounting.
///
/// Every call is gated to the governance authority: implementations must
/// refuse (return `false`) when `caller` is anyone else.
pub trait RewardLedger: Send + Sync {
    /// Account that holds pooled rewards on the asset ledger.
    fn address(&self) -> Address;

    /// Move `amount` from `caller`'s account into the pool and credit it to
    /// `proposal_id`. On `false` neither has happened.
    fn deposit_rewards(&self, caller: &Address, proposal_id: ProposalId, amount: u128) -> bool;

    /// Pay `amount` of `proposal_id`'s rewards to `to`.
    fn transfer_rewards(
        &self,
        caller: &Address,
        to: &Address,
        proposal_id: ProposalId,
        amount: u128,
    ) -> bool;

    /// Rewards currently credited to `proposal_id`.
    fn rewards_for_proposal(&self, proposal_id: ProposalId) -> u128;

    /// Burn the undistributed residual of `proposal_id`.
    fn burn_residual_tokens(&self, caller: &Address, proposal_id: ProposalId, amount: u128) -> bool;
}
