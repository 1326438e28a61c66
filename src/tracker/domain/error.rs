//! Error types for domain validation and state transitions.

use super::{ProjectId, TaskId};
use thiserror::Error;

/// Errors raised while constructing domain values or applying entity state
/// transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The raw identifier is not a well-formed UUID.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// The raw deadline could not be parsed as an RFC 3339 timestamp.
    #[error("invalid deadline '{0}', expected an RFC 3339 timestamp")]
    InvalidDeadline(String),

    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The title exceeds the maximum length.
    #[error("title is {length} characters long, maximum is {max}")]
    TitleTooLong {
        /// Character count of the rejected title.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// The task is already completed and cannot be completed again.
    #[error("task {0} is already completed")]
    TaskAlreadyCompleted(TaskId),

    /// The task is open and cannot be reopened.
    #[error("task {0} is not completed")]
    TaskNotCompleted(TaskId),

    /// The task deadline would exceed its project's deadline.
    #[error("task deadline {task_deadline} exceeds project deadline {project_deadline}")]
    DeadlineExceedsProject {
        /// The offending task deadline.
        task_deadline: String,
        /// The project deadline it would exceed.
        project_deadline: String,
    },

    /// The project deadline would fall before a member task's deadline.
    #[error("project deadline {project_deadline} is before task deadline {task_deadline}")]
    ProjectDeadlineBelowTaskDeadline {
        /// The rejected project deadline.
        project_deadline: String,
        /// The member task deadline that blocks it.
        task_deadline: String,
    },

    /// Completion was attempted while open member tasks remain.
    #[error("project {project_id} has {open_tasks} incomplete task(s)")]
    ProjectHasIncompleteTasks {
        /// The project that cannot be completed.
        project_id: ProjectId,
        /// Number of member tasks still open.
        open_tasks: usize,
    },

    /// The task is already linked to a different project.
    #[error("task {task_id} is already linked to project {project_id}")]
    TaskAlreadyLinked {
        /// The task that holds the existing link.
        task_id: TaskId,
        /// The project it is currently linked to.
        project_id: ProjectId,
    },

    /// Deletion was attempted on a project that still has member tasks.
    #[error("project {project_id} still has {task_count} linked task(s)")]
    ProjectNotEmpty {
        /// The project that cannot be deleted.
        project_id: ProjectId,
        /// Number of tasks still linked.
        task_count: usize,
    },
}
