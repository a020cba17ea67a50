//! Events published after a council operation commits.

use agora_consensus::{ExecutionAction, ExecutionId};
use agora_types::{Address, ProposalId, ProposalKind};

/// Council-level events that observers can subscribe to via the [`EventBus`].
///
/// Operations that fail emit nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CouncilEvent {
    ProposalCreated {
        id: ProposalId,
        kind: ProposalKind,
        proposer: Address,
        cost: u128,
        auto_approved: bool,
    },
    ProposalReviewed {
        id: ProposalId,
        member: Address,
        reviewed: bool,
    },
    ProposalApproved {
        id: ProposalId,
        member: Address,
        support: bool,
        approved: bool,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: bool,
        stake: u128,
    },
    ProposalExecuted {
        id: ProposalId,
        kind: ProposalKind,
    },
    ProposalFinalized {
        id: ProposalId,
    },
    /// An emergency reset fired inside a vote.
    EmergencyExecuted {
        id: ProposalId,
        removed_members: Vec<Address>,
    },
    StakeWithdrawn {
        id: ProposalId,
        staker: Address,
        principal: u128,
        reward: u128,
    },
    RewardsBurned {
        id: ProposalId,
        amount: u128,
    },
    ExecutionProposed {
        id: ExecutionId,
        proposer: Address,
        action: ExecutionAction,
    },
    ExecutionVoted {
        id: ExecutionId,
        member: Address,
        executed: bool,
    },
    /// A consensus member lost their seat in the inactivity sweep.
    MemberEvicted {
        member: Address,
    },
    HistoryPurged {
        removed: usize,
    },
}

/// Synchronous fan-out event bus for council events.
///
/// Listeners are invoked inline on the emitting thread.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&CouncilEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&CouncilEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &CouncilEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&CouncilEvent::ProposalFinalized { id: 1 });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&CouncilEvent::HistoryPurged { removed: 3 });
    }
}
