//! Milestone model - an ordered phase of the roadmap.

use serde::{Deserialize, Serialize};
use crate::id::{MilestoneId, ResourceId};
use crate::lenient;
use crate::resource::Resource;

/// A milestone groups the resources of one phase of learning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique identifier
    pub id: MilestoneId,

    /// Milestone title
    pub title: String,

    /// Description
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,

    /// Resources in display order
    pub resources: Vec<Resource>,

    /// Whether the milestone is shown expanded
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_expanded: bool,
}

impl Milestone {
    /// Create an empty, expanded milestone with a fresh id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: MilestoneId::new(),
            title: title.into(),
            description: description.into(),
            resources: Vec::new(),
            is_expanded: true,
        }
    }

    /// Find a resource by id.
    pub fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.id == id)
    }

    /// Position of a resource in display order.
    pub fn resource_index(&self, id: &ResourceId) -> Option<usize> {
        self.resources.iter().position(|r| &r.id == id)
    }

    /// Number of completed resources.
    pub fn completed_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_completed()).count()
    }

    /// Number of favorite resources.
    pub fn favorite_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_favorite()).count()
    }
}

/// Partial update of a milestone. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestonePatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New expansion state
    pub is_expanded: Option<bool>,
}

impl MilestonePatch {
    /// Patch that only renames.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Merge the patch into `milestone`.
    pub fn apply(&self, milestone: &mut Milestone) {
        if let Some(title) = &self.title {
            milestone.title = title.clone();
        }
        if let Some(description) = &self.description {
            milestone.description = description.clone();
        }
        if let Some(expanded) = self.is_expanded {
            milestone.is_expanded = expanded;
        }
    }
}
