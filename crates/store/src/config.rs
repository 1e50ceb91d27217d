//! Store configuration.

use serde::{Deserialize, Serialize};

/// Tuning for the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Hard cap on live session records
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_sessions() -> usize {
    100_000
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}
