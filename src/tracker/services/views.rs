//! Outbound read models.
//!
//! Views are plain data projections of entity state. Entities themselves
//! are never handed to callers, so domain state cannot be mutated outside
//! the state machines.

use crate::tracker::domain::{Deadline, Project, ProjectId, Task, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One window of a listing, carrying the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Records within the requested window.
    pub items: Vec<T>,
    /// Total records matching the filter, across all pages.
    pub total: usize,
    /// Number of records skipped before this page.
    pub offset: usize,
    /// Maximum number of records per page.
    pub limit: usize,
}

impl<T> Page<T> {
    /// Page size used when a query does not name one.
    pub const DEFAULT_LIMIT: usize = 20;

    /// Cuts one window out of the full result set.
    #[must_use]
    pub fn windowed(all: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = all.len();
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self {
            items,
            total,
            offset,
            limit,
        }
    }

    /// Returns true when matching records remain beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }
}

/// Read model of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description, if any.
    pub description: Option<String>,
    /// Task deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Whether the task is completed.
    pub completed: bool,
    /// Linked project, if any.
    pub project_id: Option<ProjectId>,
    /// Whether the task is open with a deadline in the past.
    pub overdue: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    /// Projects a task entity at the supplied instant.
    #[must_use]
    pub fn project_at(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            deadline: task.deadline().map(Deadline::into_inner),
            completed: task.is_completed(),
            project_id: task.project_id(),
            overdue: task.is_overdue(now),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Read model of a project, including derived progress counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    /// Project identifier.
    pub id: ProjectId,
    /// Project title.
    pub title: String,
    /// Project description, if any.
    pub description: Option<String>,
    /// Project deadline.
    pub deadline: DateTime<Utc>,
    /// Whether the project is completed.
    pub completed: bool,
    /// Total member task count.
    pub total_tasks: usize,
    /// Completed member task count.
    pub completed_tasks: usize,
    /// Whether the project is open with a deadline in the past.
    pub overdue: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProjectView {
    /// Projects a project entity at the supplied instant.
    #[must_use]
    pub fn project_at(project: &Project, now: DateTime<Utc>) -> Self {
        Self {
            id: project.id(),
            title: project.title().as_str().to_owned(),
            description: project.description().map(str::to_owned),
            deadline: project.deadline().into_inner(),
            completed: project.is_completed(),
            total_tasks: project.total_tasks(),
            completed_tasks: project.completed_tasks(),
            overdue: !project.is_completed() && project.deadline().is_overdue(now),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}
