//! Per-member voting history with bounded retention.
//!
//! Every review, approval and execution vote appends the proposal id to the
//! voter's history. Review ids and execution ids share this record. The
//! periodic purge trims each history to its most recent entries; entries are
//! kept in a `VecDeque` so trimming the oldest is O(1) per entry.

use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Ordered proposal ids voted by each member, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteHistory {
    entries: BTreeMap<Address, VecDeque<u64>>,
}

impl VoteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `proposal_id` to `member`'s history.
    pub fn record(&mut self, member: &Address, proposal_id: u64) {
        self.entries
            .entry(member.clone())
            .or_default()
            .push_back(proposal_id);
    }

    /// The member's history, oldest first.
    pub fn history(&self, member: &Address) -> Vec<u64> {
        self.entries
            .get(member)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, member: &Address) -> usize {
        self.entries.get(member).map_or(0, VecDeque::len)
    }

    /// The `n`th most recent entry (`n = 1` is the latest).
    pub fn recent(&self, member: &Address, n: usize) -> Option<u64> {
        let history = self.entries.get(member)?;
        if n == 0 || n > history.len() {
            return None;
        }
        history.get(history.len() - n).copied()
    }

    /// Trim every member's history to its `keep` most recent entries.
    ///
    /// Idempotent: histories already within bound are left untouched.
    /// Returns the number of entries removed.
    pub fn purge(&mut self, keep: usize) -> usize {
        let mut removed = 0;
        for history in self.entries.values_mut() {
            while history.len() > keep {
                history.pop_front();
                removed += 1;
            }
        }
        removed
    }
}
