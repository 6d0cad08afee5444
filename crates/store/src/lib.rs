//! The roadmap store.
//!
//! Owns the current roadmap snapshot, applies every mutation copy-on-write,
//! and writes the new snapshot to storage before returning.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod store;

pub use config::{StoreConfig, ROADMAP_STORAGE_KEY};
pub use error::{LoadError, Result, StoreError};
pub use store::{Outcome, RoadmapStore};
