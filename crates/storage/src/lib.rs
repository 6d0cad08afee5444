//! Durable storage for roadmap snapshots.
//!
//! Storage is a flat key/value slot store: every save rewrites the whole
//! blob under its key. A JSON-file implementation and an in-memory one are
//! provided.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
