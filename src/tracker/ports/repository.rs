//! Repository and unit-of-work ports for task and project persistence.

use crate::tracker::domain::{Project, ProjectId, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Filter predicate for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks with this completion state.
    pub completed: Option<bool>,
    /// Restrict to tasks whose deadline falls strictly before this instant.
    /// Combined with `completed: Some(false)` this selects overdue tasks;
    /// the caller supplies the instant so repositories stay clock-free.
    pub due_before: Option<DateTime<Utc>>,
    /// Restrict to members of this project.
    pub project_id: Option<ProjectId>,
}

/// Filter predicate for project listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Restrict to projects with this completion state.
    pub completed: Option<bool>,
}

/// Task read contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by identifier. Returns `None` when absent.
    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter.
    async fn list_tasks(&self, filter: TaskFilter) -> RepositoryResult<Vec<Task>>;
}

/// Project read contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by identifier. Returns `None` when absent.
    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;

    /// Lists projects matching the filter.
    async fn list_projects(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>>;
}

/// Entities and deletions staged by one command execution.
///
/// A change set is the whole write surface of a command, cascades included.
/// It is handed to [`UnitOfWork::commit`] as one atomic unit: either every
/// staged upsert and deletion is applied, or none are.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    deleted_tasks: Vec<TaskId>,
    deleted_projects: Vec<ProjectId>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a task upsert.
    pub fn stage_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Stages a project upsert.
    pub fn stage_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Stages a task deletion.
    pub fn stage_task_deletion(&mut self, id: TaskId) {
        self.deleted_tasks.push(id);
    }

    /// Stages a project deletion.
    pub fn stage_project_deletion(&mut self, id: ProjectId) {
        self.deleted_projects.push(id);
    }

    /// Returns the staged task upserts.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the staged project upserts.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Returns the staged task deletions.
    #[must_use]
    pub fn deleted_tasks(&self) -> &[TaskId] {
        &self.deleted_tasks
    }

    /// Returns the staged project deletions.
    #[must_use]
    pub fn deleted_projects(&self) -> &[ProjectId] {
        &self.deleted_projects
    }

    /// Returns true when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.projects.is_empty()
            && self.deleted_tasks.is_empty()
            && self.deleted_projects.is_empty()
    }
}

/// Transactional write contract.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Applies the change set atomically.
    ///
    /// Staged entities carry the version they were loaded with; a mismatch
    /// against the stored version on any of them fails the whole commit.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when a concurrent command
    /// modified a staged entity, leaving the store untouched, or
    /// [`RepositoryError::Persistence`] on storage failure.
    async fn commit(&self, changes: ChangeSet) -> RepositoryResult<()>;
}

/// Combined persistence surface required by the command services.
pub trait TrackerStore: TaskRepository + ProjectRepository + UnitOfWork {}

impl<T> TrackerStore for T where T: TaskRepository + ProjectRepository + UnitOfWork {}

/// Errors returned by repository and unit-of-work implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A concurrent command modified one of the staged entities.
    #[error("concurrent modification detected: {0}")]
    Conflict(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
