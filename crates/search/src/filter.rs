//! Resource filtering for a resource list view.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use roadmap_core::{Difficulty, Resource, ResourceType};
use crate::engine::SearchEngine;

/// Which resources a list shows regardless of the other criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Everything
    #[default]
    All,
    /// Only completed resources
    Completed,
    /// Only favorites
    Favorites,
}

/// Criteria for narrowing down a resource list. All criteria must hold; an
/// empty set places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceFilter {
    /// Substring matched against title, description and tags
    pub text: String,

    /// Allowed types
    pub types: BTreeSet<ResourceType>,

    /// Allowed difficulties
    pub difficulties: BTreeSet<Difficulty>,

    /// The resource must carry at least one of these tags
    pub tags: BTreeSet<String>,

    /// Completion/favorite view
    pub view: ViewMode,
}

impl ResourceFilter {
    /// Filter that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a text match.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Allow a type.
    pub fn with_type(mut self, kind: ResourceType) -> Self {
        self.types.insert(kind);
        self
    }

    /// Allow a difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulties.insert(difficulty);
        self
    }

    /// Accept resources carrying `tag`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the view mode.
    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    /// Whether `resource` passes every criterion.
    pub fn matches(&self, resource: &Resource) -> bool {
        let needle = self.text.trim().to_lowercase();
        let text_ok = needle.is_empty() || SearchEngine::resource_matches(resource, &needle);

        let type_ok = self.types.is_empty()
            || resource.kind().is_some_and(|k| self.types.contains(&k));
        let difficulty_ok = self.difficulties.is_empty()
            || resource.difficulty().is_some_and(|d| self.difficulties.contains(&d));
        let tags_ok = self.tags.is_empty() || resource.tags.iter().any(|t| self.tags.contains(t));
        let view_ok = match self.view {
            ViewMode::All => true,
            ViewMode::Completed => resource.is_completed(),
            ViewMode::Favorites => resource.is_favorite(),
        };

        text_ok && type_ok && difficulty_ok && tags_ok && view_ok
    }

    /// The resources passing the filter, in their original order.
    pub fn apply<'a>(&self, resources: &'a [Resource]) -> Vec<&'a Resource> {
        resources.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Every distinct tag among `resources`, sorted.
pub fn tag_catalogue<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Vec<String> {
    resources
        .into_iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_core::ResourceDraft;

    fn resources() -> Vec<Resource> {
        let mut biopython = ResourceDraft::new("Biopython", "https://biopython.test")
            .with_kind(ResourceType::Documentation)
            .with_difficulty(Difficulty::Intermediate)
            .with_tags(["python", "sequence analysis"])
            .into_resource();
        biopython.set_completed(true);

        let mut rosalind = ResourceDraft::new("Rosalind", "https://rosalind.test")
            .with_kind(ResourceType::Quiz)
            .with_difficulty(Difficulty::Beginner)
            .with_tags(["python", "algorithms"])
            .into_resource();
        rosalind.set_favorite(true);

        let untyped = ResourceDraft::new("Notes", "https://notes.test")
            .with_tags(["misc"])
            .into_resource();

        vec![biopython, rosalind, untyped]
    }

    fn titles(found: Vec<&Resource>) -> Vec<&str> {
        found.into_iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let all = resources();
        assert_eq!(ResourceFilter::new().apply(&all).len(), 3);
    }

    #[test]
    fn test_criteria_are_combined() {
        let all = resources();
        let filter = ResourceFilter::new()
            .with_tag("python")
            .with_difficulty(Difficulty::Beginner);
        assert_eq!(titles(filter.apply(&all)), vec!["Rosalind"]);

        let filter = ResourceFilter::new().with_text("SEQUENCE").with_view(ViewMode::Completed);
        assert_eq!(titles(filter.apply(&all)), vec!["Biopython"]);
    }

    #[test]
    fn test_type_filter_excludes_untyped() {
        let all = resources();
        let filter = ResourceFilter::new()
            .with_type(ResourceType::Quiz)
            .with_type(ResourceType::Documentation);
        assert_eq!(titles(filter.apply(&all)), vec!["Biopython", "Rosalind"]);
    }

    #[test]
    fn test_view_modes() {
        let all = resources();
        let favorites = ResourceFilter::new().with_view(ViewMode::Favorites);
        assert_eq!(titles(favorites.apply(&all)), vec!["Rosalind"]);
    }

    #[test]
    fn test_filter_from_json() {
        let filter: ResourceFilter =
            serde_json::from_str(r#"{"types":["quiz"],"view":"favorites"}"#).unwrap();
        assert_eq!(filter.view, ViewMode::Favorites);
        assert!(filter.text.is_empty());
    }

    #[test]
    fn test_tag_catalogue_sorted_unique() {
        let all = resources();
        assert_eq!(
            tag_catalogue(&all),
            vec!["algorithms", "misc", "python", "sequence analysis"]
        );
    }
}
