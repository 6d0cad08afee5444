//! Resource model - a single learning item inside a milestone.

use serde::{Deserialize, Serialize};
use crate::id::ResourceId;
use crate::lenient;
use crate::unchecked::{self, Unchecked};
use crate::{next_timestamp, Time};

/// A learning resource (book, course, video, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique identifier
    pub id: ResourceId,

    /// Resource title
    pub title: String,

    /// Description
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,

    /// Link to the resource
    pub url: String,

    /// Kind of resource; a value outside [`ResourceType`] is kept as read
    #[serde(
        rename = "type",
        default,
        deserialize_with = "unchecked::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Unchecked<ResourceType>>,

    /// Difficulty level; a value outside [`Difficulty`] is kept as read
    #[serde(
        default,
        deserialize_with = "unchecked::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Unchecked<Difficulty>>,

    /// Free-text labels, in display order
    pub tags: Vec<String>,

    /// Whether the resource has been worked through
    #[serde(default)]
    pub completed: Unchecked<bool>,

    /// Whether the resource is marked as a favorite
    #[serde(default)]
    pub favorite: Unchecked<bool>,

    /// Last time any field was changed
    #[serde(
        default,
        deserialize_with = "unchecked::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<Unchecked<Time>>,
}

impl Resource {
    /// Kind, when it is one of [`ResourceType`].
    pub fn kind(&self) -> Option<ResourceType> {
        self.kind.as_ref().and_then(Unchecked::get)
    }

    /// Difficulty, when it is one of [`Difficulty`].
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty.as_ref().and_then(Unchecked::get)
    }

    /// Whether the resource is completed. Only a literal `true` counts.
    pub fn is_completed(&self) -> bool {
        self.completed.get() == Some(true)
    }

    /// Whether the resource is a favorite. Only a literal `true` counts.
    pub fn is_favorite(&self) -> bool {
        self.favorite.get() == Some(true)
    }

    /// Last modification time, when it is a valid timestamp.
    pub fn last_updated(&self) -> Option<Time> {
        self.last_updated.as_ref().and_then(Unchecked::get)
    }

    /// Set the completion flag.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed.into();
    }

    /// Set the favorite flag.
    pub fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite.into();
    }

    /// Refresh `last_updated` after a mutation.
    pub fn touch(&mut self) {
        self.last_updated = Some(next_timestamp(self.last_updated()).into());
    }

    /// Add a tag. Surrounding whitespace is trimmed; empty and already
    /// present tags are ignored. Returns whether the tag list changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove every tag equal to `tag`. Returns whether the tag list changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}

/// Resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Book
    Book,
    /// Online course
    Course,
    /// Reference documentation
    Documentation,
    /// Data portal or database
    Database,
    /// Hands-on project
    Project,
    /// Article or paper
    Article,
    /// Video or lecture recording
    Video,
    /// Step-by-step tutorial
    Tutorial,
    /// Dataset to practise on
    Dataset,
    /// Quiz or exercise set
    Quiz,
}

impl ResourceType {
    /// Every kind, in declaration order.
    pub const ALL: [ResourceType; 10] = [
        ResourceType::Book,
        ResourceType::Course,
        ResourceType::Documentation,
        ResourceType::Database,
        ResourceType::Project,
        ResourceType::Article,
        ResourceType::Video,
        ResourceType::Tutorial,
        ResourceType::Dataset,
        ResourceType::Quiz,
    ];

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Book => "book",
            ResourceType::Course => "course",
            ResourceType::Documentation => "documentation",
            ResourceType::Database => "database",
            ResourceType::Project => "project",
            ResourceType::Article => "article",
            ResourceType::Video => "video",
            ResourceType::Tutorial => "tutorial",
            ResourceType::Dataset => "dataset",
            ResourceType::Quiz => "quiz",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| ParseEnumError::new("resource type", s))
    }
}

/// Difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// No prior knowledge needed
    Beginner,
    /// Builds on the basics
    Intermediate,
    /// Expects solid background
    Advanced,
}

impl Difficulty {
    /// Every level, easiest first.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| ParseEnumError::new("difficulty", s))
    }
}

/// A string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: '{value}'")]
pub struct ParseEnumError {
    what: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

/// Fields supplied when adding a resource. Id, flags and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDraft {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Link
    pub url: String,
    /// Kind
    pub kind: Option<ResourceType>,
    /// Difficulty
    pub difficulty: Option<Difficulty>,
    /// Tags
    pub tags: Vec<String>,
}

impl ResourceDraft {
    /// Start a draft with the two fields every resource needs.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: ResourceType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Turn the draft into a fresh, incomplete, non-favorite resource.
    pub fn into_resource(self) -> Resource {
        Resource {
            id: ResourceId::new(),
            title: self.title,
            description: self.description,
            url: self.url,
            kind: self.kind.map(Unchecked::Known),
            difficulty: self.difficulty.map(Unchecked::Known),
            tags: self.tags,
            completed: false.into(),
            favorite: false.into(),
            last_updated: Some(next_timestamp(None).into()),
        }
    }
}

/// Partial update of a resource. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New link
    pub url: Option<String>,
    /// New kind
    pub kind: Option<ResourceType>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
    /// New completion flag
    pub completed: Option<bool>,
    /// New favorite flag
    pub favorite: Option<bool>,
}

impl ResourcePatch {
    /// Merge the patch into `resource`. Does not touch `last_updated`.
    pub fn apply(&self, resource: &mut Resource) {
        if let Some(title) = &self.title {
            resource.title = title.clone();
        }
        if let Some(description) = &self.description {
            resource.description = description.clone();
        }
        if let Some(url) = &self.url {
            resource.url = url.clone();
        }
        if let Some(kind) = self.kind {
            resource.kind = Some(kind.into());
        }
        if let Some(difficulty) = self.difficulty {
            resource.difficulty = Some(difficulty.into());
        }
        if let Some(tags) = &self.tags {
            resource.tags = tags.clone();
        }
        if let Some(completed) = self.completed {
            resource.set_completed(completed);
        }
        if let Some(favorite) = self.favorite {
            resource.set_favorite(favorite);
        }
    }
}
