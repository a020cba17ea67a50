//! Execution proposals: side effects the consensus body votes through on its own.

use agora_types::{Address, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an execution proposal. Separate id space from governance proposals.
pub type ExecutionId = u64;

/// The call an execution proposal performs once it passes.
///
/// Ledger and liquidity actions go to the external collaborators; the last
/// three exercise the consensus authority's capability on the governance store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionAction {
    Pause,
    Unpause,
    RemoveFromWhitelist { game: Address },
    InitialLiquidity,
    AddLiquidity { amount: u128 },
    ExecuteProposal(ProposalId),
    FinalizeProposal(ProposalId),
    BurnRewards(ProposalId),
}

/// An execution proposal and its votes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionProposal {
    pub id: ExecutionId,
    pub proposer: Address,
    pub action: ExecutionAction,
    pub votes: usize,
    pub voted_by: BTreeSet<Address>,
    /// Terminal, one-shot.
    pub executed: bool,
}

impl ExecutionProposal {
    pub fn new(id: ExecutionId, proposer: Address, action: ExecutionAction) -> Self {
        Self {
            id,
            proposer,
            action,
            votes: 0,
            voted_by: BTreeSet::new(),
            executed: false,
        }
    }
}

/// Result of a single execution vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionVote {
    /// Threshold not reached yet.
    Pending { votes: usize, needed: usize },
    /// Threshold crossed: the proposal is marked executed and `action` must be
    /// dispatched by the caller. `evicted` lists members removed by the
    /// inactivity sweep that ran first.
    Executed {
        action: ExecutionAction,
        evicted: Vec<Address>,
    },
}
