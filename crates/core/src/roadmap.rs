//! Roadmap model - the whole document, unit of persistence and exchange.

use serde::{Deserialize, Serialize};
use crate::id::MilestoneId;
use crate::milestone::Milestone;
use crate::resource::Resource;

/// A roadmap: a titled, ordered sequence of milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Roadmap title
    pub title: String,

    /// Description
    pub description: String,

    /// Milestones in order
    pub milestones: Vec<Milestone>,
}

impl Roadmap {
    /// Create an empty roadmap.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            milestones: Vec::new(),
        }
    }

    /// Find a milestone by id.
    pub fn milestone(&self, id: &MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|m| &m.id == id)
    }

    /// Position of a milestone.
    pub fn milestone_index(&self, id: &MilestoneId) -> Option<usize> {
        self.milestones.iter().position(|m| &m.id == id)
    }

    /// Every resource together with its owning milestone, in display order.
    pub fn resources(&self) -> impl Iterator<Item = (&Milestone, &Resource)> {
        self.milestones
            .iter()
            .flat_map(|m| m.resources.iter().map(move |r| (m, r)))
    }

    /// Total number of resources across all milestones.
    pub fn resource_count(&self) -> usize {
        self.milestones.iter().map(|m| m.resources.len()).sum()
    }
}
