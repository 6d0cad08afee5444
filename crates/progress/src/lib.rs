//! Progress Tracking
//!
//! Roadmap-wide statistics and per-milestone progress, derived on demand
//! from a borrowed snapshot.

#![warn(missing_docs)]

pub mod stats;
pub mod tracker;

pub use stats::{
    DifficultyStats, RecentCompletion, RoadmapStats, StatisticsEngine, Tally,
    DEFAULT_RECENT_LIMIT, TRACKED_TYPES,
};
pub use tracker::{MilestoneProgress, percentage};
