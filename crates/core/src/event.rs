//! Change events - what a roadmap mutation did.
//!
//! Mutations report a [`Change`] instead of notifying anyone themselves; the
//! caller decides whether to surface [`Change::notification`] to the user.

use serde::{Deserialize, Serialize};
use crate::id::{MilestoneId, ResourceId};

/// Outcome of a single roadmap mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// The target did not exist or the operation had nothing to do
    Unchanged,

    /// A milestone was appended
    MilestoneAdded {
        /// New milestone
        id: MilestoneId,
        /// Its title
        title: String,
    },

    /// A milestone's fields were merged
    MilestoneUpdated {
        /// Updated milestone
        id: MilestoneId,
        /// Title after the update
        title: String,
    },

    /// A milestone and all of its resources were removed
    MilestoneDeleted {
        /// Removed milestone
        id: MilestoneId,
        /// Its title
        title: String,
    },

    /// A milestone changed position
    MilestoneMoved {
        /// Moved milestone
        id: MilestoneId,
        /// Previous position
        from: usize,
        /// New position
        to: usize,
    },

    /// A milestone was expanded or collapsed
    MilestoneToggled {
        /// Toggled milestone
        id: MilestoneId,
        /// Expansion state after the toggle
        expanded: bool,
    },

    /// A resource was appended to a milestone
    ResourceAdded {
        /// Owning milestone
        milestone_id: MilestoneId,
        /// New resource
        resource_id: ResourceId,
        /// Its title
        title: String,
    },

    /// A resource's fields (or tags) changed
    ResourceUpdated {
        /// Owning milestone
        milestone_id: MilestoneId,
        /// Updated resource
        resource_id: ResourceId,
        /// Title after the update
        title: String,
    },

    /// A resource was removed
    ResourceDeleted {
        /// Owning milestone
        milestone_id: MilestoneId,
        /// Removed resource
        resource_id: ResourceId,
        /// Its title
        title: String,
    },

    /// A resource's completion flag flipped
    CompletionToggled {
        /// Owning milestone
        milestone_id: MilestoneId,
        /// Owning milestone's title
        milestone_title: String,
        /// Toggled resource
        resource_id: ResourceId,
        /// Its title
        resource_title: String,
        /// Flag after the toggle
        completed: bool,
    },

    /// A resource's favorite flag flipped
    FavoriteToggled {
        /// Owning milestone
        milestone_id: MilestoneId,
        /// Toggled resource
        resource_id: ResourceId,
        /// Its title
        resource_title: String,
        /// Flag after the toggle
        favorite: bool,
    },

    /// Every resource of a milestone was set to one completion state
    MilestoneCompletionSet {
        /// Affected milestone
        milestone_id: MilestoneId,
        /// Its title
        milestone_title: String,
        /// State every resource now has
        completed: bool,
        /// Number of resources set
        resources: usize,
    },

    /// The whole roadmap was replaced by an import
    Imported {
        /// Title of the imported roadmap
        title: String,
        /// Number of imported milestones
        milestones: usize,
    },
}

impl Change {
    /// Whether nothing happened.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Change::Unchanged)
    }

    /// The message a user should see for this change, if any.
    ///
    /// Flag toggles only notify when a flag is switched on.
    pub fn notification(&self) -> Option<Notification> {
        let n = match self {
            Change::MilestoneAdded { title, .. } => Notification::new(
                "Milestone Added",
                format!("\"{}\" has been added to your roadmap.", title),
            ),
            Change::MilestoneDeleted { .. } => Notification::new(
                "Milestone Deleted",
                "The milestone has been removed from your roadmap.",
            ),
            Change::ResourceAdded { title, .. } => {
                Notification::new("Resource Added", format!("\"{}\" has been added.", title))
            }
            Change::ResourceDeleted { .. } => {
                Notification::new("Resource Deleted", "The resource has been removed.")
            }
            Change::CompletionToggled {
                milestone_title,
                resource_title,
                completed: true,
                ..
            } => Notification::new(
                "Resource Completed",
                format!(
                    "\"{}\" from {} marked as complete!",
                    resource_title, milestone_title
                ),
            ),
            Change::FavoriteToggled {
                resource_title,
                favorite: true,
                ..
            } => Notification::new(
                "Added to Favorites",
                format!("\"{}\" added to your favorites.", resource_title),
            ),
            Change::MilestoneCompletionSet {
                milestone_title,
                completed,
                ..
            } => {
                let (title, verb) = if *completed {
                    ("All Resources Completed", "marked as complete")
                } else {
                    ("Resources Reset", "marked as incomplete")
                };
                Notification::new(
                    title,
                    format!("All resources in \"{}\" {}.", milestone_title, verb),
                )
            }
            Change::Imported { title, milestones } => Notification::new(
                "Data Imported",
                format!(
                    "Imported roadmap \"{}\" with {} milestones.",
                    title, milestones
                ),
            ),
            _ => return None,
        };
        Some(n)
    }
}

/// A user-facing message describing a change or a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline
    pub title: String,

    /// Longer explanation
    pub description: String,

    /// How the message should be presented
    pub tone: Tone,
}

impl Notification {
    /// Create a regular notification.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: Tone::Default,
        }
    }

    /// Create a notification about a failure.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone: Tone::Destructive,
            ..Self::new(title, description)
        }
    }
}

/// Presentation hint for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Informational
    Default,
    /// Something went wrong
    Destructive,
}
