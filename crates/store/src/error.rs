//! Store errors.

use roadmap_core::{Notification, ValidationError};
use roadmap_storage::StorageError;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Import payload rejected; the current roadmap is untouched. The
    /// reason is the error's source
    #[error("Import failed")]
    Import(#[from] ValidationError),

    /// A milestone index outside the current sequence
    #[error("Milestone index {index} out of range for {len} milestones")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of milestones at call time
        len: usize,
    },

    /// Snapshot could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Message for the user.
    pub fn notification(&self) -> Notification {
        match self {
            StoreError::Import(e) => Notification::destructive("Import Failed", e.to_string()),
            other => Notification::destructive("Error", other.to_string()),
        }
    }
}

/// Why the saved roadmap was not used at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Storage could not be read
    #[error("Could not read saved roadmap: {0}")]
    Read(#[from] StorageError),

    /// Storage held something that is not a valid roadmap
    #[error("Saved roadmap is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

impl LoadError {
    /// Message for the user.
    pub fn notification(&self) -> Notification {
        Notification::destructive(
            "Error Loading Data",
            "Could not load saved data. Using default roadmap.",
        )
    }
}
