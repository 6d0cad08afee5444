//! Display orderings for a milestone list.

use serde::{Deserialize, Serialize};
use roadmap_core::Milestone;
use roadmap_progress::MilestoneProgress;

/// How to order milestones for display. Only `Index` reflects the stored
/// order; the others are views and never reorder the roadmap itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneOrder {
    /// Roadmap order
    #[default]
    Index,
    /// Highest completed share first
    Progress,
    /// Most favorites first
    Favorites,
}

impl MilestoneOrder {
    /// Borrowed milestones in this order. Ties keep roadmap order.
    pub fn arrange<'a>(self, milestones: &'a [Milestone]) -> Vec<&'a Milestone> {
        let mut arranged: Vec<&Milestone> = milestones.iter().collect();
        match self {
            MilestoneOrder::Index => {}
            MilestoneOrder::Progress => arranged.sort_by(|a, b| {
                let pa = MilestoneProgress::of(a).ratio();
                let pb = MilestoneProgress::of(b).ratio();
                pb.total_cmp(&pa)
            }),
            MilestoneOrder::Favorites => {
                arranged.sort_by_key(|m| std::cmp::Reverse(m.favorite_count()))
            }
        }
        arranged
    }
}
