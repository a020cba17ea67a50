//! Block height used as the protocol's ordering counter.
//!
//! Heights only ever increase. The voting-period gate on proposal
//! finalization is the single place where elapsed height matters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically increasing block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    /// Whether `period` blocks have passed since this height, relative to `now`.
    pub fn has_elapsed(&self, period: u64, now: BlockHeight) -> bool {
        now.0 >= self.0.saturating_add(period)
    }

    /// The height `blocks` after this one (saturating).
    pub fn advanced_by(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
