//! Maintenance configuration for the consensus body.

use serde::{Deserialize, Serialize};

/// Knobs for history retention and the inactivity sweep.
///
/// Loaded as the `[consensus]` table of the node configuration; every field
/// has a default so an empty table is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Entries kept per member when the vote history is purged.
    #[serde(default = "default_history_keep_count")]
    pub history_keep_count: usize,

    /// A purge runs every time this many review proposals have been created.
    /// Zero disables purging.
    #[serde(default = "default_purge_step")]
    pub purge_step: u64,

    /// Consecutive execution proposals a non-founder member must have voted on
    /// to survive the inactivity sweep. The sweep is skipped until this many
    /// execution proposals exist.
    #[serde(default = "default_inactivity_window")]
    pub inactivity_window: usize,
}

fn default_history_keep_count() -> usize {
    10
}

fn default_purge_step() -> u64 {
    50
}

fn default_inactivity_window() -> usize {
    5
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            history_keep_count: default_history_keep_count(),
            purge_step: default_purge_step(),
            inactivity_window: default_inactivity_window(),
        }
    }
}
