//! Store configuration.

use roadmap_progress::DEFAULT_RECENT_LIMIT;

/// Storage key the roadmap snapshot lives under unless configured otherwise.
pub const ROADMAP_STORAGE_KEY: &str = "bioinformatics-roadmap";

/// Configuration for the roadmap store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot the snapshot is read from and written to
    pub storage_key: String,
    /// Entries kept in the statistics' recently completed list
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: ROADMAP_STORAGE_KEY.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}
