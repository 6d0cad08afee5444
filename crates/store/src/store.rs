//! The roadmap store - single owner of the current snapshot.

use std::sync::Arc;
use roadmap_core::{
    Change, Milestone, MilestoneId, MilestonePatch, Notification, Resource, ResourceDraft,
    ResourceId, ResourcePatch, Roadmap, RoadmapValidator,
};
use roadmap_progress::{MilestoneProgress, RoadmapStats, StatisticsEngine};
use roadmap_search::SearchEngine;
use roadmap_storage::{Storage, StorageError};
use tracing::{debug, info, warn};
use crate::config::StoreConfig;
use crate::error::{LoadError, Result, StoreError};

/// What a mutation did, and whether it reached storage.
#[derive(Debug)]
#[must_use]
pub struct Outcome {
    /// The applied change
    pub change: Change,

    /// Set when the new snapshot could not be written; the in-memory
    /// change stands regardless
    pub persist_error: Option<StorageError>,
}

impl Outcome {
    fn unchanged() -> Self {
        Self {
            change: Change::Unchanged,
            persist_error: None,
        }
    }

    /// Message describing the change, if it deserves one.
    pub fn notification(&self) -> Option<Notification> {
        self.change.notification()
    }

    /// Message warning that the change was not saved.
    pub fn warning(&self) -> Option<Notification> {
        self.persist_error.as_ref().map(|e| {
            Notification::destructive(
                "Changes Not Saved",
                format!("Your change is kept for this session but could not be saved: {}", e),
            )
        })
    }
}

/// Roadmap store.
///
/// Every mutation clones the current snapshot, edits the clone and installs
/// it in one step, so a [`RoadmapStore::snapshot`] taken earlier never
/// changes. Taking `&mut self` makes the store its own single writer; share
/// it across threads behind a mutex.
pub struct RoadmapStore<S: Storage> {
    storage: S,
    config: StoreConfig,
    current: Arc<Roadmap>,
    stats: StatisticsEngine,
    load_error: Option<LoadError>,
}

impl<S: Storage> RoadmapStore<S> {
    /// Open the store with the default configuration.
    pub fn open(storage: S) -> Self {
        Self::open_with_config(storage, StoreConfig::default())
    }

    /// Open the store, loading the saved roadmap from storage.
    ///
    /// Falls back to the bundled roadmap when nothing is saved or the saved
    /// copy is unusable; the latter is kept in [`RoadmapStore::load_error`].
    pub fn open_with_config(storage: S, config: StoreConfig) -> Self {
        let (roadmap, load_error) = match Self::load(&storage, &config.storage_key) {
            Ok(Some(roadmap)) => {
                info!("Loaded roadmap \"{}\" from storage", roadmap.title);
                (roadmap, None)
            }
            Ok(None) => {
                info!("No saved roadmap, using bundled default");
                (Roadmap::bundled(), None)
            }
            Err(e) => {
                warn!("Error loading roadmap from storage: {}", e);
                (Roadmap::bundled(), Some(e))
            }
        };

        Self {
            storage,
            stats: StatisticsEngine::new().with_recent_limit(config.recent_limit),
            config,
            current: Arc::new(roadmap),
            load_error,
        }
    }

    fn load(storage: &S, key: &str) -> std::result::Result<Option<Roadmap>, LoadError> {
        let Some(raw) = storage.read(key)? else {
            return Ok(None);
        };
        Ok(Some(RoadmapValidator::validate(&raw)?))
    }

    // === Read access ===

    /// The current roadmap.
    pub fn roadmap(&self) -> &Roadmap {
        &self.current
    }

    /// A shared handle to the current snapshot; later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<Roadmap> {
        Arc::clone(&self.current)
    }

    /// Why the saved roadmap was not used at startup, if it was not.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    /// The configuration in use.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Aggregate statistics for the current roadmap.
    pub fn statistics(&self) -> RoadmapStats {
        self.stats.compute(&self.current)
    }

    /// Milestones matching `query`.
    pub fn search(&self, query: &str) -> Vec<Milestone> {
        SearchEngine::search(&self.current, query)
    }

    /// Progress of one milestone.
    pub fn milestone_progress(&self, id: &MilestoneId) -> Option<MilestoneProgress> {
        self.current.milestone(id).map(MilestoneProgress::of)
    }

    // === Milestones ===

    /// Append a new, empty, expanded milestone.
    pub fn add_milestone(&mut self, title: impl Into<String>, description: impl Into<String>) -> Outcome {
        let milestone = Milestone::new(title, description);
        let change = Change::MilestoneAdded {
            id: milestone.id.clone(),
            title: milestone.title.clone(),
        };

        let mut next = self.draft();
        next.milestones.push(milestone);
        self.install(next, change)
    }

    /// Merge `patch` into a milestone.
    pub fn update_milestone(&mut self, id: &MilestoneId, patch: &MilestonePatch) -> Outcome {
        let edited = self.edit_milestone(id, |m| {
            patch.apply(m);
            Change::MilestoneUpdated {
                id: m.id.clone(),
                title: m.title.clone(),
            }
        });
        self.install_edit(edited)
    }

    /// Remove a milestone together with its resources.
    pub fn delete_milestone(&mut self, id: &MilestoneId) -> Outcome {
        let Some(index) = self.current.milestone_index(id) else {
            return Outcome::unchanged();
        };

        let mut next = self.draft();
        let removed = next.milestones.remove(index);
        let change = Change::MilestoneDeleted {
            id: removed.id,
            title: removed.title,
        };
        self.install(next, change)
    }

    /// Move the milestone at `from` so that it ends up at `to`.
    ///
    /// Both indices refer to the sequence as it is at call time.
    pub fn move_milestone(&mut self, from: usize, to: usize) -> Result<Outcome> {
        let len = self.current.milestones.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(Outcome::unchanged());
        }

        let mut next = self.draft();
        let moved = next.milestones.remove(from);
        let change = Change::MilestoneMoved {
            id: moved.id.clone(),
            from,
            to,
        };
        next.milestones.insert(to, moved);
        Ok(self.install(next, change))
    }

    /// Expand a collapsed milestone or collapse an expanded one.
    pub fn toggle_milestone_expansion(&mut self, id: &MilestoneId) -> Outcome {
        let edited = self.edit_milestone(id, |m| {
            m.is_expanded = !m.is_expanded;
            Change::MilestoneToggled {
                id: m.id.clone(),
                expanded: m.is_expanded,
            }
        });
        self.install_edit(edited)
    }

    /// Set every resource of a milestone to `complete`.
    pub fn mark_all_resources_complete(&mut self, id: &MilestoneId, complete: bool) -> Outcome {
        let edited = self.edit_milestone(id, |m| {
            for resource in &mut m.resources {
                resource.set_completed(complete);
                resource.touch();
            }
            Change::MilestoneCompletionSet {
                milestone_id: m.id.clone(),
                milestone_title: m.title.clone(),
                completed: complete,
                resources: m.resources.len(),
            }
        });
        self.install_edit(edited)
    }

    // === Resources ===

    /// Append a resource built from `draft` to a milestone.
    pub fn add_resource(&mut self, milestone_id: &MilestoneId, draft: ResourceDraft) -> Outcome {
        let edited = self.edit_milestone(milestone_id, |m| {
            let resource = draft.into_resource();
            let change = Change::ResourceAdded {
                milestone_id: m.id.clone(),
                resource_id: resource.id.clone(),
                title: resource.title.clone(),
            };
            m.resources.push(resource);
            change
        });
        self.install_edit(edited)
    }

    /// Merge `patch` into a resource.
    pub fn update_resource(
        &mut self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
        patch: &ResourcePatch,
    ) -> Outcome {
        let edited = self.edit_resource(milestone_id, resource_id, |_, r| {
            patch.apply(r);
            r.touch();
            Some(resource_updated(milestone_id, r))
        });
        self.install_edit(edited)
    }

    /// Remove a resource from its milestone.
    pub fn delete_resource(&mut self, milestone_id: &MilestoneId, resource_id: &ResourceId) -> Outcome {
        let Some((index, res_index)) = self.locate(milestone_id, resource_id) else {
            return Outcome::unchanged();
        };

        let mut next = self.draft();
        let removed = next.milestones[index].resources.remove(res_index);
        let change = Change::ResourceDeleted {
            milestone_id: milestone_id.clone(),
            resource_id: removed.id,
            title: removed.title,
        };
        self.install(next, change)
    }

    /// Flip a resource's completion flag.
    pub fn toggle_resource_completion(
        &mut self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
    ) -> Outcome {
        let edited = self.edit_resource(milestone_id, resource_id, |milestone_title, r| {
            let completed = !r.is_completed();
            r.set_completed(completed);
            r.touch();
            Some(Change::CompletionToggled {
                milestone_id: milestone_id.clone(),
                milestone_title: milestone_title.to_string(),
                resource_id: r.id.clone(),
                resource_title: r.title.clone(),
                completed,
            })
        });
        self.install_edit(edited)
    }

    /// Flip a resource's favorite flag.
    pub fn toggle_resource_favorite(
        &mut self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
    ) -> Outcome {
        let edited = self.edit_resource(milestone_id, resource_id, |_, r| {
            let favorite = !r.is_favorite();
            r.set_favorite(favorite);
            r.touch();
            Some(Change::FavoriteToggled {
                milestone_id: milestone_id.clone(),
                resource_id: r.id.clone(),
                resource_title: r.title.clone(),
                favorite,
            })
        });
        self.install_edit(edited)
    }

    /// Add a tag to a resource. Blank and duplicate tags leave it unchanged.
    pub fn add_resource_tag(
        &mut self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
        tag: &str,
    ) -> Outcome {
        let edited = self.edit_resource(milestone_id, resource_id, |_, r| {
            if !r.add_tag(tag) {
                return None;
            }
            r.touch();
            Some(resource_updated(milestone_id, r))
        });
        self.install_edit(edited)
    }

    /// Remove a tag from a resource.
    pub fn remove_resource_tag(
        &mut self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
        tag: &str,
    ) -> Outcome {
        let edited = self.edit_resource(milestone_id, resource_id, |_, r| {
            if !r.remove_tag(tag) {
                return None;
            }
            r.touch();
            Some(resource_updated(milestone_id, r))
        });
        self.install_edit(edited)
    }

    // === Import / export ===

    /// The current roadmap as pretty-printed JSON.
    pub fn export_data(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.current)?)
    }

    /// Replace the roadmap with the one encoded in `raw`.
    ///
    /// On a validation failure the current roadmap and storage are left as
    /// they were and the reason is returned.
    pub fn import_data(&mut self, raw: &str) -> Result<Outcome> {
        let roadmap = RoadmapValidator::validate(raw).map_err(|e| {
            warn!("Error importing roadmap data: {}", e);
            StoreError::Import(e)
        })?;

        let change = Change::Imported {
            title: roadmap.title.clone(),
            milestones: roadmap.milestones.len(),
        };
        Ok(self.install(roadmap, change))
    }

    // === Copy-on-write plumbing ===

    fn draft(&self) -> Roadmap {
        (*self.current).clone()
    }

    /// Edit a copy of one milestone; `None` when the milestone is missing.
    fn edit_milestone<T>(
        &self,
        id: &MilestoneId,
        edit: impl FnOnce(&mut Milestone) -> T,
    ) -> Option<(Roadmap, T)> {
        let index = self.current.milestone_index(id)?;
        let mut next = self.draft();
        let value = edit(&mut next.milestones[index]);
        Some((next, value))
    }

    /// Edit a copy of one resource. The closure also sees the owning
    /// milestone's title and may return `None` to abandon the edit.
    fn edit_resource(
        &self,
        milestone_id: &MilestoneId,
        resource_id: &ResourceId,
        edit: impl FnOnce(&str, &mut Resource) -> Option<Change>,
    ) -> Option<(Roadmap, Change)> {
        let (index, res_index) = self.locate(milestone_id, resource_id)?;

        let mut next = self.draft();
        let milestone = &mut next.milestones[index];
        let change = edit(&milestone.title, &mut milestone.resources[res_index])?;
        Some((next, change))
    }

    fn locate(&self, milestone_id: &MilestoneId, resource_id: &ResourceId) -> Option<(usize, usize)> {
        let index = self.current.milestone_index(milestone_id)?;
        let res_index = self.current.milestones[index].resource_index(resource_id)?;
        Some((index, res_index))
    }

    fn install_edit(&mut self, edited: Option<(Roadmap, Change)>) -> Outcome {
        match edited {
            Some((next, change)) => self.install(next, change),
            None => Outcome::unchanged(),
        }
    }

    /// Make `next` current and write it out.
    fn install(&mut self, next: Roadmap, change: Change) -> Outcome {
        self.current = Arc::new(next);
        debug!(?change, "Roadmap updated");

        let persist_error = self.persist().err();
        Outcome {
            change,
            persist_error,
        }
    }

    fn persist(&mut self) -> std::result::Result<(), StorageError> {
        let json = serde_json::to_string(&*self.current)
            .map_err(|e| StorageError::Other(e.to_string()))?;
        self.storage
            .write(&self.config.storage_key, &json)
            .map_err(|e| {
                warn!("Error saving roadmap: {}", e);
                e
            })
    }
}

fn resource_updated(milestone_id: &MilestoneId, resource: &Resource) -> Change {
    Change::ResourceUpdated {
        milestone_id: milestone_id.clone(),
        resource_id: resource.id.clone(),
        title: resource.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_core::{Difficulty, ResourceType, ValidationError};
    use roadmap_storage::{JsonStorage, MemoryStorage};
    use crate::config::ROADMAP_STORAGE_KEY;

    /// Storage whose writes always fail.
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _key: &str) -> roadmap_storage::Result<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> roadmap_storage::Result<()> {
            Err(StorageError::Other("quota exceeded".to_string()))
        }

        fn remove(&mut self, _key: &str) -> roadmap_storage::Result<()> {
            Ok(())
        }
    }

    const EMPTY: &str = r#"{"title":"T","description":"D","milestones":[]}"#;

    fn empty_store() -> RoadmapStore<MemoryStorage> {
        RoadmapStore::open(MemoryStorage::with_slot(ROADMAP_STORAGE_KEY, EMPTY))
    }

    fn article(title: &str) -> ResourceDraft {
        ResourceDraft::new(title, "https://x.test")
            .with_kind(ResourceType::Article)
            .with_difficulty(Difficulty::Beginner)
            .with_tags(["x"])
    }

    fn added_milestone(outcome: &Outcome) -> MilestoneId {
        match &outcome.change {
            Change::MilestoneAdded { id, .. } => id.clone(),
            other => panic!("expected MilestoneAdded, got {:?}", other),
        }
    }

    fn added_resource(outcome: &Outcome) -> ResourceId {
        match &outcome.change {
            Change::ResourceAdded { resource_id, .. } => resource_id.clone(),
            other => panic!("expected ResourceAdded, got {:?}", other),
        }
    }

    fn saved(store: &RoadmapStore<MemoryStorage>) -> Roadmap {
        let raw = store.storage().get(ROADMAP_STORAGE_KEY).unwrap();
        serde_json::from_str(raw).unwrap()
    }

    /// Store with one milestone "M1" holding resources named by `titles`.
    fn populated(titles: &[&str]) -> (RoadmapStore<MemoryStorage>, MilestoneId, Vec<ResourceId>) {
        let mut store = empty_store();
        let m1 = added_milestone(&store.add_milestone("M1", ""));
        let ids = titles
            .iter()
            .map(|t| added_resource(&store.add_resource(&m1, article(t))))
            .collect();
        (store, m1, ids)
    }

    #[test]
    fn test_open_empty_storage_uses_bundled_roadmap() {
        let store = RoadmapStore::open(MemoryStorage::new());
        assert_eq!(store.roadmap(), &Roadmap::bundled());
        assert!(store.load_error().is_none());
    }

    #[test]
    fn test_open_corrupt_storage_falls_back() {
        let store = RoadmapStore::open(MemoryStorage::with_slot(ROADMAP_STORAGE_KEY, "{oops"));
        assert_eq!(store.roadmap(), &Roadmap::bundled());
        let err = store.load_error().unwrap();
        assert!(matches!(err, LoadError::Invalid(ValidationError::Malformed(_))));
        assert_eq!(err.notification().title, "Error Loading Data");

        let store = RoadmapStore::open(MemoryStorage::with_slot(ROADMAP_STORAGE_KEY, r#"{"title":"T"}"#));
        assert!(matches!(store.load_error(), Some(LoadError::Invalid(ValidationError::Schema(_)))));
    }

    #[test]
    fn test_open_loads_saved_roadmap() {
        let store = empty_store();
        assert_eq!(store.roadmap(), &Roadmap::new("T", "D"));
        assert!(store.load_error().is_none());
    }

    #[test]
    fn test_empty_roadmap_statistics() {
        let store = empty_store();
        let stats = store.statistics();
        assert_eq!(stats.progress_percentage, 0);
        assert_eq!(stats.total_resources, 0);
    }

    #[test]
    fn test_add_milestone() {
        let mut store = empty_store();
        let outcome = store.add_milestone("M1", "");
        assert!(outcome.persist_error.is_none());
        assert_eq!(outcome.notification().unwrap().title, "Milestone Added");
        let id = added_milestone(&outcome);

        let roadmap = store.roadmap();
        assert_eq!(roadmap.milestones.len(), 1);
        let m = &roadmap.milestones[0];
        assert_eq!(m.id, id);
        assert_eq!(m.title, "M1");
        assert!(m.resources.is_empty());
        assert!(m.is_expanded);

        let other = added_milestone(&store.add_milestone("M2", ""));
        assert_ne!(id, other);
        assert_eq!(&saved(&store), store.roadmap());
    }

    #[test]
    fn test_add_resource_then_complete() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let r = &store.roadmap().milestones[0].resources[0];
        assert!(!r.is_completed() && !r.is_favorite());
        assert!(r.last_updated().is_some());

        let outcome = store.toggle_resource_completion(&m1, &ids[0]);
        let notification = outcome.notification().unwrap();
        assert_eq!(notification.title, "Resource Completed");
        assert_eq!(notification.description, "\"R1\" from M1 marked as complete!");

        let stats = store.statistics();
        assert_eq!(stats.completed_resources, 1);
        assert_eq!(stats.progress_percentage, 100);
        assert_eq!(stats.recently_completed[0].resource.id, ids[0]);
    }

    #[test]
    fn test_toggle_twice_restores_flag_and_advances_timestamp() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let t0 = store.roadmap().milestones[0].resources[0].last_updated().unwrap();

        let first = store.toggle_resource_completion(&m1, &ids[0]);
        let t1 = store.roadmap().milestones[0].resources[0].last_updated().unwrap();
        let second = store.toggle_resource_completion(&m1, &ids[0]);
        let r = &store.roadmap().milestones[0].resources[0];

        assert!(!r.is_completed());
        assert!(t1 > t0);
        assert!(r.last_updated().unwrap() > t1);
        assert!(first.notification().is_some());
        assert!(second.notification().is_none());
    }

    #[test]
    fn test_toggle_favorite() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let on = store.toggle_resource_favorite(&m1, &ids[0]);
        assert_eq!(on.notification().unwrap().title, "Added to Favorites");
        assert_eq!(store.statistics().favorite_resources, 1);

        let off = store.toggle_resource_favorite(&m1, &ids[0]);
        assert!(off.notification().is_none());
        assert!(!store.roadmap().milestones[0].resources[0].is_favorite());
    }

    #[test]
    fn test_move_then_move_back_restores_order() {
        let mut store = empty_store();
        for title in ["A", "B", "C", "D"] {
            let _ = store.add_milestone(title, "");
        }
        let original = store.roadmap().milestones.clone();

        for i in 0..4 {
            for j in 0..4 {
                store.move_milestone(i, j).unwrap();
                store.move_milestone(j, i).unwrap();
                assert_eq!(store.roadmap().milestones, original, "move({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_move_milestone() {
        let mut store = empty_store();
        for title in ["A", "B", "C"] {
            let _ = store.add_milestone(title, "");
        }
        let outcome = store.move_milestone(0, 2).unwrap();
        assert!(matches!(outcome.change, Change::MilestoneMoved { from: 0, to: 2, .. }));
        let titles: Vec<_> = store.roadmap().milestones.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
        assert_eq!(&saved(&store), store.roadmap());

        assert!(store.move_milestone(1, 1).unwrap().change.is_unchanged());
    }

    #[test]
    fn test_move_out_of_range_is_an_error() {
        let mut store = empty_store();
        let _ = store.add_milestone("A", "");
        let before = store.snapshot();

        let err = store.move_milestone(0, 1).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 1, len: 1 }));
        assert!(store.move_milestone(3, 0).is_err());
        assert_eq!(store.roadmap(), &*before);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let before = store.snapshot();
        let saved_before = store.storage().get(ROADMAP_STORAGE_KEY).unwrap().to_string();
        let missing_m = MilestoneId::from("nonexistent-id");
        let missing_r = ResourceId::from("nonexistent-id");

        let outcomes = vec![
            store.update_milestone(&missing_m, &MilestonePatch::title("X")),
            store.delete_milestone(&missing_m),
            store.toggle_milestone_expansion(&missing_m),
            store.mark_all_resources_complete(&missing_m, true),
            store.add_resource(&missing_m, article("R2")),
            store.update_resource(&m1, &missing_r, &ResourcePatch::default()),
            store.update_resource(&missing_m, &ids[0], &ResourcePatch::default()),
            store.delete_resource(&m1, &missing_r),
            store.toggle_resource_completion(&m1, &missing_r),
            store.toggle_resource_favorite(&missing_m, &ids[0]),
            store.add_resource_tag(&m1, &missing_r, "tag"),
        ];

        for outcome in outcomes {
            assert!(outcome.change.is_unchanged());
            assert!(outcome.notification().is_none());
        }
        assert_eq!(store.roadmap(), &*before);
        assert_eq!(store.storage().get(ROADMAP_STORAGE_KEY).unwrap(), saved_before);
    }

    #[test]
    fn test_update_milestone_and_toggle_expansion() {
        let (mut store, m1, _) = populated(&[]);
        let patch = MilestonePatch {
            description: Some("Sequencing basics".to_string()),
            ..Default::default()
        };
        let outcome = store.update_milestone(&m1, &patch);
        assert!(matches!(outcome.change, Change::MilestoneUpdated { .. }));
        assert!(outcome.notification().is_none());

        let _ = store.toggle_milestone_expansion(&m1);
        let m = store.roadmap().milestone(&m1).unwrap();
        assert_eq!(m.title, "M1");
        assert_eq!(m.description, "Sequencing basics");
        assert!(!m.is_expanded);
        assert_eq!(&saved(&store), store.roadmap());
    }

    #[test]
    fn test_update_resource_refreshes_timestamp() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let before = store.roadmap().milestones[0].resources[0].clone();

        let patch = ResourcePatch {
            title: Some("R1 (2nd edition)".to_string()),
            difficulty: Some(Difficulty::Advanced),
            ..Default::default()
        };
        let _ = store.update_resource(&m1, &ids[0], &patch);

        let after = &store.roadmap().milestones[0].resources[0];
        assert_eq!(after.title, "R1 (2nd edition)");
        assert_eq!(after.difficulty(), Some(Difficulty::Advanced));
        assert_eq!(after.url, before.url);
        assert_eq!(after.id, before.id);
        assert!(after.last_updated() > before.last_updated());
    }

    #[test]
    fn test_delete_resource_and_milestone() {
        let (mut store, m1, ids) = populated(&["R1", "R2"]);

        let outcome = store.delete_resource(&m1, &ids[0]);
        assert_eq!(outcome.notification().unwrap().title, "Resource Deleted");
        let remaining: Vec<_> = store.roadmap().milestones[0].resources.iter().map(|r| r.id.clone()).collect();
        assert_eq!(remaining, vec![ids[1].clone()]);

        let outcome = store.delete_milestone(&m1);
        assert!(matches!(&outcome.change, Change::MilestoneDeleted { title, .. } if title == "M1"));
        assert!(store.roadmap().milestones.is_empty());
        assert!(saved(&store).milestones.is_empty());
    }

    #[test]
    fn test_mark_all_complete_notifies_regardless_of_state() {
        let (mut store, m1, ids) = populated(&["R1", "R2", "R3"]);
        let _ = store.toggle_resource_completion(&m1, &ids[1]);

        let outcome = store.mark_all_resources_complete(&m1, true);
        assert_eq!(outcome.notification().unwrap().title, "All Resources Completed");
        assert!(store.roadmap().milestones[0].resources.iter().all(|r| r.is_completed()));
        assert!(store.milestone_progress(&m1).unwrap().is_complete());

        let again = store.mark_all_resources_complete(&m1, true);
        assert!(again.notification().is_some());

        let reset = store.mark_all_resources_complete(&m1, false);
        assert_eq!(reset.notification().unwrap().title, "Resources Reset");
        assert_eq!(store.statistics().completed_resources, 0);
    }

    #[test]
    fn test_resource_tags() {
        let (mut store, m1, ids) = populated(&["R1"]);

        assert!(store.add_resource_tag(&m1, &ids[0], " genomics ").persist_error.is_none());
        assert!(store.add_resource_tag(&m1, &ids[0], "genomics").change.is_unchanged());
        assert!(store.add_resource_tag(&m1, &ids[0], "").change.is_unchanged());
        assert_eq!(store.roadmap().milestones[0].resources[0].tags, vec!["x", "genomics"]);

        assert!(!store.remove_resource_tag(&m1, &ids[0], "x").change.is_unchanged());
        assert!(store.remove_resource_tag(&m1, &ids[0], "x").change.is_unchanged());
        assert_eq!(saved(&store).milestones[0].resources[0].tags, vec!["genomics"]);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = RoadmapStore::open(MemoryStorage::new());
        let m1 = store.roadmap().milestones[0].id.clone();
        let r1 = store.roadmap().milestones[0].resources[0].id.clone();
        let _ = store.toggle_resource_completion(&m1, &r1);
        let _ = store.add_milestone("Extra", "");
        let original = store.snapshot();

        let exported = store.export_data().unwrap();
        assert!(exported.contains("\n  \"title\""));

        let mut other = empty_store();
        let outcome = other.import_data(&exported).unwrap();
        assert_eq!(other.roadmap(), &*original);
        assert_eq!(&saved(&other), &*original);
        assert_eq!(outcome.notification().unwrap().title, "Data Imported");
        assert!(matches!(
            outcome.change,
            Change::Imported { milestones: 6, .. }
        ));
    }

    #[test]
    fn test_import_export_keeps_unrecognized_values() {
        let document = serde_json::json!({
            "title": "T",
            "description": "D",
            "milestones": [{
                "id": "m1",
                "title": "Audio",
                "description": "",
                "isExpanded": true,
                "resources": [{
                    "id": "r1",
                    "title": "R",
                    "description": "d",
                    "url": "u",
                    "type": "podcast",
                    "difficulty": "expert",
                    "tags": [],
                    "completed": "yes",
                    "favorite": 1,
                    "lastUpdated": "last tuesday"
                }, {
                    "id": "r2",
                    "title": "S",
                    "description": "",
                    "url": "v",
                    "type": "video",
                    "difficulty": null,
                    "tags": ["x"],
                    "completed": true,
                    "favorite": false,
                    "lastUpdated": "2024-05-01T12:00:00.123Z"
                }]
            }]
        });

        let mut store = empty_store();
        let _ = store.import_data(&document.to_string()).unwrap();
        let exported: serde_json::Value = serde_json::from_str(&store.export_data().unwrap()).unwrap();
        assert_eq!(exported, document);
        assert_eq!(exported["milestones"][0]["resources"][0]["type"], "podcast");

        let stats = store.statistics();
        assert_eq!(stats.completed_resources, 1);
        assert_eq!(stats.type_stats[&ResourceType::Video].completed, 1);

        let m1 = MilestoneId::from("m1");
        let r1 = ResourceId::from("r1");
        let outcome = store.toggle_resource_completion(&m1, &r1);
        assert!(matches!(outcome.change, Change::CompletionToggled { completed: true, .. }));
        let resource = &store.roadmap().milestones[0].resources[0];
        assert!(resource.is_completed());
        assert!(resource.last_updated().is_some());
        assert_eq!(resource.kind, Some(roadmap_core::Unchecked::Raw("podcast".into())));
    }

    #[test]
    fn test_import_failure_leaves_state_untouched() {
        let (mut store, _, _) = populated(&["R1"]);
        let before = store.snapshot();
        let saved_before = store.storage().get(ROADMAP_STORAGE_KEY).unwrap().to_string();

        let err = store.import_data(r#"{"title":"T"}"#).unwrap_err();
        match &err {
            StoreError::Import(ValidationError::Schema(reason)) => {
                assert!(reason.contains("'description'"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.notification().title, "Import Failed");

        assert!(matches!(
            store.import_data("not json"),
            Err(StoreError::Import(ValidationError::Malformed(_)))
        ));
        assert_eq!(store.roadmap(), &*before);
        assert_eq!(store.storage().get(ROADMAP_STORAGE_KEY).unwrap(), saved_before);
    }

    #[test]
    fn test_search_returns_whole_milestone() {
        let mut store = empty_store();
        let genomics = added_milestone(&store.add_milestone("Sequencing", ""));
        let _ = store.add_resource(&genomics, ResourceDraft::new("GATK", "https://g.test").with_tags(["genomics"]));
        let _ = store.add_resource(&genomics, ResourceDraft::new("FastQC", "https://f.test"));
        let _ = store.add_milestone("Statistics", "");

        let found = store.search("genomics");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, genomics);
        assert_eq!(found[0].resources.len(), 2);
        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn test_snapshots_are_not_affected_by_later_mutations() {
        let (mut store, m1, ids) = populated(&["R1"]);
        let before = store.snapshot();
        let copy = (*before).clone();

        let _ = store.toggle_resource_completion(&m1, &ids[0]);
        let _ = store.add_milestone("M2", "");
        let _ = store.delete_resource(&m1, &ids[0]);

        assert_eq!(*before, copy);
        assert_ne!(store.roadmap(), &*before);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let mut store = RoadmapStore::open(FailingStorage);
        let count = store.roadmap().milestones.len();

        let outcome = store.add_milestone("Unsaved", "");
        assert!(outcome.persist_error.is_some());
        assert_eq!(outcome.warning().unwrap().title, "Changes Not Saved");
        assert_eq!(outcome.notification().unwrap().title, "Milestone Added");
        assert_eq!(store.roadmap().milestones.len(), count + 1);
    }

    #[test]
    fn test_state_survives_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            storage_key: "my-roadmap".to_string(),
            ..Default::default()
        };

        let expected = {
            let mut store =
                RoadmapStore::open_with_config(JsonStorage::new(dir.path()).unwrap(), config.clone());
            let m = added_milestone(&store.add_milestone("Persisted", "on disk"));
            let _ = store.add_resource(&m, article("R1"));
            store.snapshot()
        };
        assert!(dir.path().join("my-roadmap.json").exists());

        let reopened = RoadmapStore::open_with_config(JsonStorage::new(dir.path()).unwrap(), config);
        assert!(reopened.load_error().is_none());
        assert_eq!(reopened.roadmap(), &*expected);
    }

    #[test]
    fn test_recent_limit_from_config() {
        let config = StoreConfig {
            recent_limit: 1,
            ..Default::default()
        };
        let mut store = RoadmapStore::open_with_config(
            MemoryStorage::with_slot(ROADMAP_STORAGE_KEY, EMPTY),
            config,
        );
        let m = added_milestone(&store.add_milestone("M", ""));
        let _ = store.add_resource(&m, article("A"));
        let _ = store.add_resource(&m, article("B"));
        let _ = store.mark_all_resources_complete(&m, true);

        let stats = store.statistics();
        assert_eq!(stats.completed_resources, 2);
        assert_eq!(stats.recently_completed.len(), 1);
    }
}
