//! Text search over milestones and their resources.

use roadmap_core::{Milestone, Resource, Roadmap};

/// Case-insensitive substring search.
pub struct SearchEngine;

impl SearchEngine {
    /// Milestones matching `query`, whole and in roadmap order.
    ///
    /// A milestone matches when its title or description contains the query,
    /// or when any of its resources does (title, description or a tag). A
    /// blank query returns every milestone.
    pub fn search(roadmap: &Roadmap, query: &str) -> Vec<Milestone> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return roadmap.milestones.clone();
        }

        roadmap
            .milestones
            .iter()
            .filter(|m| Self::milestone_matches(m, &needle))
            .cloned()
            .collect()
    }

    /// Whether a milestone matches an already lowercased, trimmed needle.
    pub fn milestone_matches(milestone: &Milestone, needle: &str) -> bool {
        contains(&milestone.title, needle)
            || contains(&milestone.description, needle)
            || milestone
                .resources
                .iter()
                .any(|r| Self::resource_matches(r, needle))
    }

    /// Whether a resource matches an already lowercased, trimmed needle.
    pub fn resource_matches(resource: &Resource, needle: &str) -> bool {
        contains(&resource.title, needle)
            || contains(&resource.description, needle)
            || resource.tags.iter().any(|t| contains(t, needle))
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
