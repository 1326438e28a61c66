//! Inbound command and query payloads.
//!
//! Commands carry validated primitives only (strings and identifier
//! strings); the services parse them into value objects and reject
//! malformed input before touching any entity.

/// Creates a new task, optionally linked to a project at birth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskCommand {
    /// Task title.
    pub title: String,
    /// Optional task description.
    pub description: Option<String>,
    /// Optional RFC 3339 deadline.
    pub deadline: Option<String>,
    /// Optional project to link the task to.
    pub project_id: Option<String>,
}

/// Updates task fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskCommand {
    /// Target task identifier.
    pub task_id: String,
    /// Replacement title, if any.
    pub title: Option<String>,
    /// Replacement description, if any.
    pub description: Option<String>,
    /// Replacement RFC 3339 deadline, if any.
    pub deadline: Option<String>,
}

/// Marks a task as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskCommand {
    /// Target task identifier.
    pub task_id: String,
}

/// Reopens a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReopenTaskCommand {
    /// Target task identifier.
    pub task_id: String,
}

/// Deletes a task, unlinking it from its project first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTaskCommand {
    /// Target task identifier.
    pub task_id: String,
}

/// Lists tasks matching optional filters, one page at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTasksQuery {
    /// Restrict to tasks with this completion state.
    pub completed: Option<bool>,
    /// When true, restrict to open tasks whose deadline has passed.
    pub overdue: Option<bool>,
    /// Restrict to members of this project.
    pub project_id: Option<String>,
    /// Number of matching records to skip.
    pub offset: usize,
    /// Page size; `None` uses [`Page::DEFAULT_LIMIT`](super::Page::DEFAULT_LIMIT).
    pub limit: Option<usize>,
}

/// Creates a new project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProjectCommand {
    /// Project title.
    pub title: String,
    /// Optional project description.
    pub description: Option<String>,
    /// RFC 3339 project deadline.
    pub deadline: String,
}

/// Updates project fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectCommand {
    /// Target project identifier.
    pub project_id: String,
    /// Replacement title, if any.
    pub title: Option<String>,
    /// Replacement description, if any.
    pub description: Option<String>,
    /// Replacement RFC 3339 deadline, if any.
    pub deadline: Option<String>,
}

/// Marks a project as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteProjectCommand {
    /// Target project identifier.
    pub project_id: String,
}

/// Reopens a completed project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReopenProjectCommand {
    /// Target project identifier.
    pub project_id: String,
}

/// Deletes a project according to the configured deletion policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProjectCommand {
    /// Target project identifier.
    pub project_id: String,
}

/// Links an existing task to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTaskCommand {
    /// Target project identifier.
    pub project_id: String,
    /// Task to link.
    pub task_id: String,
}

/// Unlinks a task from a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlinkTaskCommand {
    /// Target project identifier.
    pub project_id: String,
    /// Task to unlink.
    pub task_id: String,
}

/// Lists projects matching optional filters, one page at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProjectsQuery {
    /// Restrict to projects with this completion state.
    pub completed: Option<bool>,
    /// Number of matching records to skip.
    pub offset: usize,
    /// Page size; `None` uses [`Page::DEFAULT_LIMIT`](super::Page::DEFAULT_LIMIT).
    pub limit: Option<usize>,
}
