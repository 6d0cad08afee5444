//! Storage trait abstraction.

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be used as a slot name
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Key/value slot storage for serialized snapshots.
///
/// This trait allows different storage backends to be plugged in.
pub trait Storage: Send {
    /// Read the blob stored under `key`, `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob stored under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}
