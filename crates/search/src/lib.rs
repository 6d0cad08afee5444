//! Search and filtering over a roadmap snapshot.
//!
//! Matching is case-insensitive substring containment; nothing is ranked.

#![warn(missing_docs)]

pub mod engine;
pub mod filter;
pub mod order;

pub use engine::SearchEngine;
pub use filter::{tag_catalogue, ResourceFilter, ViewMode};
pub use order::MilestoneOrder;
