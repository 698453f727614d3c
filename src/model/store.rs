//! The project collection and every operation that mutates it.

use thiserror::Error;
use tracing::{info, warn};

use super::filter::{filter_projects, ProjectFilter};
use super::phase::Phase;
use super::project::{Project, ProjectDraft, ProjectId};
use super::sample::sample_projects;
use super::stats::{self, Stats, Workload};
use super::validate::{validate_project, validate_update, Validation};
use crate::io::csv_import::ImportError;
use crate::io::storage::{KeyValueStore, Persistence, PersistenceError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}", .0.errors.join("; "))]
    Invalid(Validation),
    #[error("project {0} not found")]
    NotFound(ProjectId),
    #[error("project {id} has no child task #{index}")]
    ChildTaskOutOfRange { id: ProjectId, index: usize },
    #[error("an import is in progress; wait for it to finish")]
    ImportInProgress,
    #[error("this import was already completed or cancelled")]
    StaleTicket,
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Result of a mutation that was applied in memory. `warning` is set when
/// saving it failed; the in-memory change stands either way.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub warning: Option<PersistenceError>,
}

/// Proof that the holder started the current import.
#[derive(Debug, PartialEq, Eq)]
pub struct ImportTicket(u64);

/// Owns the project collection, its filtered view, and the persistence gateway.
pub struct ProjectStore<S> {
    all: Vec<Project>,
    filtered: Vec<Project>,
    filter: ProjectFilter,
    /// Smallest id never handed out this session.
    next_id: ProjectId,
    pending_import: Option<u64>,
    import_counter: u64,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> ProjectStore<S> {
    /// Restore the saved collection. Unreadable data is reported and the store starts empty.
    pub fn open(persistence: Persistence<S>) -> (Self, Option<PersistenceError>) {
        let (all, warning) = match persistence.load() {
            Ok(Some(projects)) => (projects, None),
            Ok(None) => {
                info!("no saved projects; starting empty");
                (Vec::new(), None)
            }
            Err(e) => {
                warn!(error = %e, "could not load saved projects; starting empty");
                (Vec::new(), Some(e))
            }
        };
        let next_id = max_id(&all) + 1;
        let mut store = Self {
            all,
            filtered: Vec::new(),
            filter: ProjectFilter::default(),
            next_id,
            pending_import: None,
            import_counter: 0,
            persistence,
        };
        store.refresh();
        (store, warning)
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn all(&self) -> &[Project] {
        &self.all
    }

    pub fn filtered(&self) -> &[Project] {
        &self.filtered
    }

    pub fn filter(&self) -> &ProjectFilter {
        &self.filter
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.all.iter().find(|p| p.id == id)
    }

    pub fn is_importing(&self) -> bool {
        self.pending_import.is_some()
    }

    #[cfg(test)]
    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn stats(&self) -> Stats {
        stats::stats(&self.all)
    }

    pub fn team_members(&self) -> Vec<String> {
        stats::team_members(&self.all)
    }

    pub fn member_workload(&self, member: &str) -> Workload {
        stats::member_workload(&self.all, member)
    }

    // ── Filtering ───────────────────────────────────────────────

    pub fn set_filter(&mut self, filter: ProjectFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn reset_filter(&mut self) {
        self.set_filter(ProjectFilter::default());
    }

    // ── CRUD ────────────────────────────────────────────────────

    pub fn create(&mut self, draft: ProjectDraft) -> Result<Committed<ProjectId>, StoreError> {
        self.ensure_idle()?;
        let validation = validate_project(&draft);
        if !validation.is_valid() {
            return Err(StoreError::Invalid(validation));
        }
        let id = self.next_id.max(max_id(&self.all) + 1);
        let mut project = draft
            .into_project(id)
            .ok_or(StoreError::Invalid(validation))?;
        project.recompute_progress();
        info!(id, name = %project.name, "project created");
        self.next_id = id + 1;
        self.all.push(project);
        Ok(self.commit(id))
    }

    pub fn update(&mut self, id: ProjectId, draft: ProjectDraft) -> Result<Committed<()>, StoreError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;
        let validation = validate_update(&self.all[index], &draft);
        if !validation.is_valid() {
            return Err(StoreError::Invalid(validation));
        }
        let mut project = draft
            .into_project(id)
            .ok_or(StoreError::Invalid(validation))?;
        // Imported progress stands until the task list or its completion changes.
        if project.child_tasks != self.all[index].child_tasks {
            project.recompute_progress();
        }
        info!(id, "project updated");
        self.all[index] = project;
        Ok(self.commit(()))
    }

    pub fn delete(&mut self, id: ProjectId) -> Result<Committed<Project>, StoreError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;
        let removed = self.all.remove(index);
        info!(id, name = %removed.name, "project deleted");
        Ok(self.commit(removed))
    }

    /// Flip one child task and re-derive progress. Returns the new progress.
    pub fn toggle_child_task(
        &mut self,
        id: ProjectId,
        task_index: usize,
    ) -> Result<Committed<u8>, StoreError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;
        let project = &mut self.all[index];
        let task = project
            .child_tasks
            .get_mut(task_index)
            .ok_or(StoreError::ChildTaskOutOfRange {
                id,
                index: task_index,
            })?;
        task.completed = !task.completed;
        project.recompute_progress();
        let progress = project.progress;
        Ok(self.commit(progress))
    }

    /// Move to the next lifecycle stage. A no-op on the last stage and side states.
    pub fn advance_phase(&mut self, id: ProjectId) -> Result<Committed<Phase>, StoreError> {
        self.step_phase(id, Phase::next)
    }

    /// Move to the previous lifecycle stage. A no-op on the first stage and side states.
    pub fn retreat_phase(&mut self, id: ProjectId) -> Result<Committed<Phase>, StoreError> {
        self.step_phase(id, Phase::previous)
    }

    fn step_phase(
        &mut self,
        id: ProjectId,
        step: fn(Phase) -> Phase,
    ) -> Result<Committed<Phase>, StoreError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;
        let project = &mut self.all[index];
        let phase = step(project.phase);
        if phase == project.phase {
            return Ok(Committed {
                value: phase,
                warning: None,
            });
        }
        project.phase = phase;
        info!(id, %phase, "phase changed");
        Ok(self.commit(phase))
    }

    // ── Bulk replacement ───────────────────────────────────────

    pub fn load_sample_data(&mut self) -> Result<Committed<usize>, StoreError> {
        self.ensure_idle()?;
        Ok(self.replace_all(sample_projects()))
    }

    /// Drop every project and forget the saved copy.
    pub fn clear(&mut self) -> Result<Committed<()>, StoreError> {
        self.ensure_idle()?;
        self.all.clear();
        self.refresh();
        let warning = self.persistence.clear().err();
        if let Some(e) = &warning {
            warn!(error = %e, "could not clear saved projects");
        }
        info!("all projects cleared");
        Ok(Committed { value: (), warning })
    }

    /// Enter the import-in-progress state. Mutations are rejected until the
    /// returned ticket is completed or cancelled.
    pub fn begin_import(&mut self) -> Result<ImportTicket, StoreError> {
        self.ensure_idle()?;
        self.import_counter += 1;
        self.pending_import = Some(self.import_counter);
        info!("import started");
        Ok(ImportTicket(self.import_counter))
    }

    /// Apply an import result. On success the collection is replaced and ids
    /// are reassigned in row order; on failure nothing changes.
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        result: Result<Vec<Project>, ImportError>,
    ) -> Result<Committed<usize>, StoreError> {
        self.take_ticket(ticket)?;
        let projects = match result {
            Ok(projects) if projects.is_empty() => return Err(ImportError::Empty.into()),
            Ok(projects) => projects,
            Err(e) => {
                warn!(error = %e, "import failed; keeping existing projects");
                return Err(e.into());
            }
        };
        Ok(self.replace_all(projects))
    }

    pub fn cancel_import(&mut self, ticket: ImportTicket) -> Result<(), StoreError> {
        self.take_ticket(ticket)?;
        info!("import cancelled");
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn take_ticket(&mut self, ticket: ImportTicket) -> Result<(), StoreError> {
        if self.pending_import != Some(ticket.0) {
            return Err(StoreError::StaleTicket);
        }
        self.pending_import = None;
        Ok(())
    }

    fn replace_all(&mut self, mut projects: Vec<Project>) -> Committed<usize> {
        for (i, project) in projects.iter_mut().enumerate() {
            project.id = i as ProjectId + 1;
        }
        let count = projects.len();
        self.all = projects;
        self.next_id = self.next_id.max(count as ProjectId + 1);
        info!(count, "project collection replaced");
        self.commit(count)
    }

    fn ensure_idle(&self) -> Result<(), StoreError> {
        if self.is_importing() {
            Err(StoreError::ImportInProgress)
        } else {
            Ok(())
        }
    }

    fn index_of(&self, id: ProjectId) -> Result<usize, StoreError> {
        self.all
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn refresh(&mut self) {
        self.filtered = filter_projects(&self.all, &self.filter);
    }

    /// Recompute the filtered view and save. Save failures become a warning.
    fn commit<T>(&mut self, value: T) -> Committed<T> {
        self.refresh();
        let warning = self.persistence.save(&self.all).err();
        if let Some(e) = &warning {
            warn!(error = %e, "could not save projects");
        }
        Committed { value, warning }
    }
}

fn max_id(projects: &[Project]) -> ProjectId {
    projects.iter().map(|p| p.id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{MemoryStore, STORAGE_KEY};
    use crate::model::filter::{AssigneeFilter, StatusFilter};
    use crate::model::project::{calculate_progress, ChildTask};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.into(),
            phase: "planning".into(),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 2, 1),
            progress: 10,
            ..Default::default()
        }
    }

    fn empty_store() -> ProjectStore<MemoryStore> {
        let (store, warning) = ProjectStore::open(Persistence::new(MemoryStore::default()));
        assert!(warning.is_none());
        store
    }

    /// Accepts reads but refuses every write.
    #[derive(Default)]
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            })
        }
        fn remove(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn ids_start_at_one_and_are_never_reused() {
        let mut store = empty_store();
        let a = store.create(draft("A")).unwrap().value;
        let b = store.create(draft("B")).unwrap().value;
        assert_eq!((a, b), (1, 2));

        let _ = store.delete(b).unwrap();
        let c = store.create(draft("C")).unwrap().value;
        assert_eq!(c, 3);
    }

    #[test]
    fn invalid_draft_is_rejected_without_mutation() {
        let mut store = empty_store();
        let err = store.create(draft("")).unwrap_err();
        match err {
            StoreError::Invalid(v) => assert_eq!(v.errors, vec!["Project name is required"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.all().is_empty());
        assert!(!store.persistence().has_data());
    }

    #[test]
    fn mutations_are_persisted() {
        let mut store = empty_store();
        let id = store.create(draft("Saved")).unwrap().value;
        let saved = store.persistence().load().unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, id);
        assert!(store.persistence().store().entries.contains_key(STORAGE_KEY));
    }

    #[test]
    fn reopening_restores_collection_and_id_counter() {
        let mut store = empty_store();
        let _ = store.create(draft("One")).unwrap();
        let _ = store.create(draft("Two")).unwrap();
        let json = store.persistence().store().entries[STORAGE_KEY].clone();

        let mut memory = MemoryStore::default();
        memory.entries.insert(STORAGE_KEY.into(), json);
        let (mut reopened, _) = ProjectStore::open(Persistence::new(memory));
        assert_eq!(reopened.all().len(), 2);
        assert_eq!(reopened.create(draft("Three")).unwrap().value, 3);
    }

    #[test]
    fn corrupt_storage_starts_empty_with_warning() {
        let mut memory = MemoryStore::default();
        memory.entries.insert(STORAGE_KEY.into(), "[{".into());
        let (store, warning) = ProjectStore::open(Persistence::new(memory));
        assert!(store.all().is_empty());
        assert!(matches!(warning, Some(PersistenceError::Json(_))));
    }

    #[test]
    fn delete_removes_from_all_and_filtered() {
        let mut store = empty_store();
        let keep = store.create(draft("Keep")).unwrap().value;
        let gone = store.create(draft("Gone")).unwrap().value;
        store.set_filter(ProjectFilter {
            search: "o".into(),
            ..Default::default()
        });
        assert_eq!(store.filtered().len(), 1);

        let removed = store.delete(gone).unwrap().value;
        assert_eq!(removed.name, "Gone");
        assert!(store.get(gone).is_none());
        assert!(store.all().iter().all(|p| p.id != gone));
        assert!(store.filtered().iter().all(|p| p.id != gone));
        assert!(store.get(keep).is_some());
        assert!(matches!(store.delete(gone), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn filtered_view_follows_active_filter_through_mutations() {
        let mut store = empty_store();
        store.set_filter(ProjectFilter {
            status: StatusFilter::Phase(Phase::InProgress),
            assignee: AssigneeFilter::All,
            search: String::new(),
        });
        let id = store.create(draft("Later")).unwrap().value;
        assert!(store.filtered().is_empty());

        let _ = store.advance_phase(id).unwrap();
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filtered()[0], *store.get(id).unwrap());

        store.reset_filter();
        assert_eq!(store.filtered(), store.all());
    }

    #[test]
    fn toggling_child_tasks_derives_progress() {
        let mut store = empty_store();
        let mut d = draft("Tasks");
        d.child_tasks = vec![ChildTask::new("a"), ChildTask::new("b"), ChildTask::new("c")];
        let id = store.create(d).unwrap().value;
        assert_eq!(store.get(id).unwrap().progress, 0);

        for (index, expected_done) in [(0, 1), (2, 2), (0, 1), (1, 2), (0, 3)] {
            let progress = store.toggle_child_task(id, index).unwrap().value;
            let project = store.get(id).unwrap();
            assert_eq!(project.completed_child_tasks(), expected_done);
            assert_eq!(progress, calculate_progress(expected_done, 3));
            assert_eq!(project.progress, progress);
        }
        assert_eq!(store.get(id).unwrap().progress, 100);
        assert!(matches!(
            store.toggle_child_task(id, 9),
            Err(StoreError::ChildTaskOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn update_keeps_id_and_guards_derived_progress() {
        let mut store = empty_store();
        let id = store.create(draft("Manual")).unwrap().value;

        let mut edit = store.get(id).unwrap().to_draft();
        edit.name = "Renamed".into();
        edit.progress = 70;
        let _ = store.update(id, edit).unwrap();
        let project = store.get(id).unwrap();
        assert_eq!((project.id, project.name.as_str(), project.progress), (id, "Renamed", 70));

        let mut with_tasks = project.to_draft();
        with_tasks.child_tasks = vec![ChildTask::new("x")];
        let _ = store.update(id, with_tasks).unwrap();
        assert_eq!(store.get(id).unwrap().progress, 0);

        let mut manual = store.get(id).unwrap().to_draft();
        manual.progress = 90;
        assert!(matches!(store.update(id, manual), Err(StoreError::Invalid(_))));
        assert_eq!(store.get(id).unwrap().progress, 0);
    }

    #[test]
    fn phase_stepping_is_a_no_op_on_side_states() {
        let mut store = empty_store();
        let mut d = draft("Paused");
        d.phase = "on-hold".into();
        let id = store.create(d).unwrap().value;
        assert_eq!(store.advance_phase(id).unwrap().value, Phase::OnHold);
        assert_eq!(store.retreat_phase(id).unwrap().value, Phase::OnHold);
    }

    #[test]
    fn import_replaces_collection_and_reassigns_ids() {
        let mut store = empty_store();
        let _ = store.create(draft("Old")).unwrap();
        let mut imported = sample_projects();
        imported.truncate(2);
        imported[0].id = 40;
        imported[1].id = 41;

        let ticket = store.begin_import().unwrap();
        let count = store.complete_import(ticket, Ok(imported)).unwrap().value;
        assert_eq!(count, 2);
        let ids: Vec<_> = store.all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!store.is_importing());
    }

    #[test]
    fn failed_or_empty_import_leaves_collection_untouched() {
        let mut store = empty_store();
        let _ = store.create(draft("Survivor")).unwrap();
        let before = store.all().to_vec();

        let ticket = store.begin_import().unwrap();
        assert!(matches!(
            store.complete_import(ticket, Err(ImportError::Empty)),
            Err(StoreError::Import(ImportError::Empty))
        ));
        let ticket = store.begin_import().unwrap();
        assert!(store.complete_import(ticket, Ok(Vec::new())).is_err());

        assert_eq!(store.all(), before.as_slice());
        assert!(!store.is_importing());
    }

    #[test]
    fn mutations_are_rejected_while_import_is_pending() {
        let mut store = empty_store();
        let id = store.create(draft("Busy")).unwrap().value;
        let ticket = store.begin_import().unwrap();

        assert!(matches!(store.begin_import(), Err(StoreError::ImportInProgress)));
        assert!(matches!(store.create(draft("X")), Err(StoreError::ImportInProgress)));
        assert!(matches!(store.delete(id), Err(StoreError::ImportInProgress)));
        assert!(matches!(store.load_sample_data(), Err(StoreError::ImportInProgress)));
        // Filtering is still allowed.
        store.set_filter(ProjectFilter {
            search: "busy".into(),
            ..Default::default()
        });
        assert_eq!(store.filtered().len(), 1);

        store.cancel_import(ticket).unwrap();
        assert!(store.delete(id).is_ok());
    }

    #[test]
    fn stale_tickets_are_refused() {
        let mut store = empty_store();
        let first = store.begin_import().unwrap();
        store.cancel_import(first).unwrap();
        let _second = store.begin_import().unwrap();
        assert!(matches!(
            store.complete_import(ImportTicket(1), Ok(sample_projects())),
            Err(StoreError::StaleTicket)
        ));
        assert!(store.is_importing());
    }

    #[test]
    fn save_failure_is_a_warning_not_a_rollback() {
        let (mut store, _) = ProjectStore::open(Persistence::new(ReadOnlyStore));
        let committed = store.create(draft("Unsaved")).unwrap();
        assert!(committed.warning.is_some());
        assert_eq!(store.all().len(), 1);
        assert!(store.get(committed.value).is_some());
    }

    #[test]
    fn sample_data_and_clear() {
        let mut store = empty_store();
        assert_eq!(store.load_sample_data().unwrap().value, 5);
        assert_eq!(store.stats().total, 5);
        assert_eq!(store.member_workload("Jane Smith").total, 1);
        assert!(store.team_members().contains(&"Iris Martinez".to_string()));

        let _ = store.clear().unwrap();
        assert!(store.all().is_empty());
        assert!(store.filtered().is_empty());
        assert!(!store.persistence().has_data());
    }
}
