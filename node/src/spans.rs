//! Pre-built [`tracing::Span`] constructors for council operations.
//!
//! Consistent span names and fields make it easy to follow one proposal
//! across the consensus and governance logs.

use agora_types::{Address, ProposalId};
use tracing::{info_span, Span};

/// Span covering the creation of a governance proposal.
pub fn create_span(proposer: &Address) -> Span {
    info_span!("proposal_create", proposer = %proposer)
}

/// Span covering a consensus review or approval vote.
pub fn review_span(stage: &'static str, proposal: ProposalId, member: &Address) -> Span {
    info_span!("consensus_review", stage, proposal, member = %member)
}

/// Span covering a staked electorate vote.
pub fn vote_span(proposal: ProposalId, voter: &Address) -> Span {
    info_span!("governance_vote", proposal, voter = %voter)
}

/// Span covering execution, finalization or a residual burn.
pub fn settle_span(stage: &'static str, proposal: ProposalId) -> Span {
    info_span!("governance_settle", stage, proposal)
}

/// Span covering the stake withdrawal of a single staker.
pub fn unstake_span(proposal: ProposalId, staker: &Address) -> Span {
    info_span!("unstake", proposal, staker = %staker)
}

/// Span covering an execution proposal vote and its dispatch.
pub fn execution_span(execution: u64, member: &Address) -> Span {
    info_span!("execution_vote", execution, member = %member)
}
