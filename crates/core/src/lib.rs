//! Roadmap core data models.
//!
//! This crate defines the roadmap document (milestones and their learning
//! resources), the change events produced by mutating it, and the validator
//! that turns untrusted JSON into a roadmap.

#![warn(missing_docs)]

// Identities
mod id;

// Document model
mod resource;
mod milestone;
mod roadmap;
mod bundled;
mod lenient;
mod unchecked;

// Changes and validation
mod event;
mod validation;

// Re-exports
pub use id::{MilestoneId, ResourceId};

pub use resource::{
    Difficulty, ParseEnumError, Resource, ResourceDraft, ResourcePatch, ResourceType,
};
pub use milestone::{Milestone, MilestonePatch};
pub use roadmap::Roadmap;
pub use unchecked::Unchecked;

pub use event::{Change, Notification, Tone};
pub use validation::{RoadmapValidator, ValidationError};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Timestamp for a mutation of something last touched at `previous`.
///
/// Never returns a value at or before `previous`, even when the wall clock
/// has not advanced (or went backwards) since then.
pub fn next_timestamp(previous: Option<Time>) -> Time {
    let now = chrono::Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}
