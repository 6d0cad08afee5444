//! Per-milestone progress.

use serde::Serialize;
use roadmap_core::Milestone;

/// Rounded share of `completed` in `total`, 0 when there is nothing to count.
pub fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

/// Progress of a single milestone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneProgress {
    /// Resources in the milestone
    pub total: usize,

    /// Completed resources
    pub completed: usize,

    /// Favorite resources
    pub favorites: usize,

    /// Completed share, rounded
    pub percentage: u32,
}

impl MilestoneProgress {
    /// Measure a milestone.
    pub fn of(milestone: &Milestone) -> Self {
        let total = milestone.resources.len();
        let completed = milestone.completed_count();
        Self {
            total,
            completed,
            favorites: milestone.favorite_count(),
            percentage: percentage(completed, total),
        }
    }

    /// Unrounded completed share in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Whether every resource is completed (false for an empty milestone).
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
