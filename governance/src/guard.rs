//! Non-reentrancy flag shared by every governance entry point.
//!
//! Each state-mutating operation holds an [`EntryGuard`] for its whole
//! duration, including the collaborator calls it makes. A collaborator that
//! calls back into the engine while the guard is held gets
//! [`GovernanceError::ReentrantCall`].

use crate::error::GovernanceError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to the engine's entry flag. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct ReentrancyGuard {
    entered: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for the duration of `operation`.
    pub fn enter(&self, operation: &'static str) -> Result<EntryGuard, GovernanceError> {
        self.entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GovernanceError::ReentrantCall(operation))?;
        Ok(EntryGuard {
            entered: Arc::clone(&self.entered),
        })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Clears the entry flag when dropped.
#[must_use = "the guard is released as soon as it is dropped"]
#[derive(Debug)]
pub struct EntryGuard {
    entered: Arc<AtomicBool>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}
