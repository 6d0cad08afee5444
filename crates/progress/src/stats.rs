//! Roadmap statistics.
//!
//! Everything here is recomputed from scratch on each call; a pass over the
//! roadmap is linear in the number of resources.

use std::collections::BTreeMap;
use serde::Serialize;
use roadmap_core::{Difficulty, MilestoneId, Resource, ResourceType, Roadmap};
use crate::tracker::percentage;

/// How many completions [`RoadmapStats::recently_completed`] keeps by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Resource types broken down in [`RoadmapStats::type_stats`].
///
/// Resources of any other type still count towards the totals but get no
/// entry of their own.
pub const TRACKED_TYPES: [ResourceType; 5] = [
    ResourceType::Article,
    ResourceType::Video,
    ResourceType::Tutorial,
    ResourceType::Dataset,
    ResourceType::Quiz,
];

/// Total and completed counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Resources in the category
    pub total: usize,

    /// Completed resources in the category
    pub completed: usize,
}

impl Tally {
    fn count(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }
}

/// Per-difficulty tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyStats {
    /// Beginner resources
    pub beginner: Tally,
    /// Intermediate resources
    pub intermediate: Tally,
    /// Advanced resources
    pub advanced: Tally,
}

impl DifficultyStats {
    /// Tally for one level.
    pub fn get(&self, difficulty: Difficulty) -> Tally {
        match difficulty {
            Difficulty::Beginner => self.beginner,
            Difficulty::Intermediate => self.intermediate,
            Difficulty::Advanced => self.advanced,
        }
    }

    fn get_mut(&mut self, difficulty: Difficulty) -> &mut Tally {
        match difficulty {
            Difficulty::Beginner => &mut self.beginner,
            Difficulty::Intermediate => &mut self.intermediate,
            Difficulty::Advanced => &mut self.advanced,
        }
    }

    /// Resources counted across all levels.
    pub fn total(&self) -> usize {
        self.beginner.total + self.intermediate.total + self.advanced.total
    }
}

/// A completed resource together with the milestone it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCompletion {
    /// Owning milestone
    pub milestone_id: MilestoneId,

    /// Owning milestone's title
    #[serde(rename = "milestoneName")]
    pub milestone_title: String,

    /// The resource itself
    #[serde(flatten)]
    pub resource: Resource,
}

/// Aggregate statistics over a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStats {
    /// All resources
    pub total_resources: usize,

    /// Completed resources
    pub completed_resources: usize,

    /// Favorite resources
    pub favorite_resources: usize,

    /// Completed share, rounded, 0 for an empty roadmap
    pub progress_percentage: u32,

    /// Breakdown by difficulty
    pub difficulty_stats: DifficultyStats,

    /// Breakdown by the [`TRACKED_TYPES`]
    pub type_stats: BTreeMap<ResourceType, Tally>,

    /// Most recently updated completed resources, newest first
    pub recently_completed: Vec<RecentCompletion>,
}

/// Computes [`RoadmapStats`].
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    recent_limit: usize,
}

impl StatisticsEngine {
    /// Engine with the default recent-completion limit.
    pub fn new() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Keep `limit` entries in `recently_completed`.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Compute statistics for `roadmap`.
    pub fn compute(&self, roadmap: &Roadmap) -> RoadmapStats {
        let mut total = 0;
        let mut completed = 0;
        let mut favorites = 0;
        let mut difficulty_stats = DifficultyStats::default();
        let mut type_stats: BTreeMap<ResourceType, Tally> =
            TRACKED_TYPES.iter().map(|t| (*t, Tally::default())).collect();
        let mut done = Vec::new();

        for (milestone, resource) in roadmap.resources() {
            total += 1;
            let is_completed = resource.is_completed();
            if is_completed {
                completed += 1;
                done.push((milestone, resource));
            }
            if resource.is_favorite() {
                favorites += 1;
            }

            if let Some(difficulty) = resource.difficulty() {
                difficulty_stats.get_mut(difficulty).count(is_completed);
            }
            if let Some(tally) = resource.kind().and_then(|k| type_stats.get_mut(&k)) {
                tally.count(is_completed);
            }
        }

        // Stable sort: equal timestamps keep document order.
        done.sort_by(|(_, a), (_, b)| {
            b.last_updated()
                .unwrap_or_default()
                .cmp(&a.last_updated().unwrap_or_default())
        });
        let recently_completed = done
            .into_iter()
            .take(self.recent_limit)
            .map(|(m, r)| RecentCompletion {
                milestone_id: m.id.clone(),
                milestone_title: m.title.clone(),
                resource: r.clone(),
            })
            .collect();

        RoadmapStats {
            total_resources: total,
            completed_resources: completed,
            favorite_resources: favorites,
            progress_percentage: percentage(completed, total),
            difficulty_stats,
            type_stats,
            recently_completed,
        }
    }
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
