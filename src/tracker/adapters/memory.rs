//! In-memory store and event sink for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tracker::domain::{DomainEvent, Project, ProjectId, Task, TaskId};
use crate::tracker::ports::{
    ChangeSet, EventSink, EventSinkError, ProjectFilter, ProjectRepository, RepositoryError,
    RepositoryResult, TaskFilter, TaskRepository, UnitOfWork,
};

/// Thread-safe in-memory tracker store.
///
/// Writes go through [`UnitOfWork::commit`] with optimistic version checks:
/// a staged entity whose loaded version no longer matches the stored one
/// fails the whole commit with [`RepositoryError::Conflict`] and nothing is
/// applied.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<TaskId, Task>,
    projects: HashMap<ProjectId, Project>,
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn check_task_version(state: &StoreState, staged: &Task) -> RepositoryResult<()> {
    let stored_version = state.tasks.get(&staged.id()).map_or(0, Task::version);
    if stored_version == staged.version() {
        Ok(())
    } else {
        Err(RepositoryError::Conflict(format!(
            "task {} is at version {stored_version}, staged at {}",
            staged.id(),
            staged.version()
        )))
    }
}

fn check_project_version(state: &StoreState, staged: &Project) -> RepositoryResult<()> {
    let stored_version = state.projects.get(&staged.id()).map_or(0, Project::version);
    if stored_version == staged.version() {
        Ok(())
    } else {
        Err(RepositoryError::Conflict(format!(
            "project {} is at version {stored_version}, staged at {}",
            staged.id(),
            staged.version()
        )))
    }
}

fn matches_task_filter(task: &Task, filter: TaskFilter) -> bool {
    if let Some(completed) = filter.completed
        && task.is_completed() != completed
    {
        return false;
    }
    if let Some(instant) = filter.due_before {
        let due = task
            .deadline()
            .is_some_and(|deadline| deadline.is_overdue(instant));
        if !due {
            return false;
        }
    }
    if let Some(project_id) = filter.project_id
        && task.project_id() != Some(project_id)
    {
        return false;
    }
    true
}

#[async_trait]
impl TaskRepository for InMemoryTrackerStore {
    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> RepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_task_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTrackerStore {
    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|project| {
                filter
                    .completed
                    .is_none_or(|completed| project.is_completed() == completed)
            })
            .cloned()
            .collect();
        projects.sort_by_key(|project| (project.created_at(), project.id()));
        Ok(projects)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryTrackerStore {
    async fn commit(&self, changes: ChangeSet) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        // Validate every staged entity before touching anything so a
        // conflict leaves the store exactly as it was.
        for task in changes.tasks() {
            check_task_version(&state, task)?;
        }
        for project in changes.projects() {
            check_project_version(&state, project)?;
        }

        for task in changes.tasks() {
            let mut stored = task.clone();
            stored.bump_version();
            state.tasks.insert(stored.id(), stored);
        }
        for project in changes.projects() {
            let mut stored = project.clone();
            stored.bump_version();
            state.projects.insert(stored.id(), stored);
        }
        // Deletions are applied best-effort so a retried command that
        // already took effect remains a no-op.
        for id in changes.deleted_tasks() {
            state.tasks.remove(id);
        }
        for id in changes.deleted_projects() {
            state.projects.remove(id);
        }
        Ok(())
    }
}

/// Event sink that records published events in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<RwLock<Vec<DomainEvent>>>,
}

impl RecordingEventSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the published events in publication order.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when the internal lock is poisoned.
    pub fn events(&self) -> Result<Vec<DomainEvent>, EventSinkError> {
        let events = self
            .events
            .read()
            .map_err(|err| EventSinkError::new(std::io::Error::other(err.to_string())))?;
        Ok(events.clone())
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventSinkError> {
        let mut events = self
            .events
            .write()
            .map_err(|err| EventSinkError::new(std::io::Error::other(err.to_string())))?;
        events.push(event.clone());
        Ok(())
    }
}
