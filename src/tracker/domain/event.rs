//! Domain events emitted by task and project state transitions.
//!
//! Events are plain return values: entities buffer them, the service layer
//! drains them to drive cascades and, after a successful commit, hands them
//! to the event-sink port in emission order. Nothing inside the domain
//! dispatches them.

use super::{Deadline, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of a past state change on a task or project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A task was created.
    TaskCreated {
        /// The new task.
        task_id: TaskId,
        /// Project the task was created into, if any.
        project_id: Option<ProjectId>,
        /// When the creation happened.
        occurred_at: DateTime<Utc>,
    },

    /// A task transitioned from open to completed.
    TaskCompleted {
        /// The completed task.
        task_id: TaskId,
        /// Project the task belongs to, if any.
        project_id: Option<ProjectId>,
        /// When the completion happened.
        occurred_at: DateTime<Utc>,
    },

    /// A task transitioned from completed back to open.
    TaskReopened {
        /// The reopened task.
        task_id: TaskId,
        /// Project the task belongs to, if any.
        project_id: Option<ProjectId>,
        /// When the reopening happened.
        occurred_at: DateTime<Utc>,
    },

    /// A task was linked to a project.
    TaskLinked {
        /// The linked task.
        task_id: TaskId,
        /// The project it was linked to.
        project_id: ProjectId,
        /// When the link was established.
        occurred_at: DateTime<Utc>,
    },

    /// A task was unlinked from its project.
    TaskUnlinked {
        /// The unlinked task.
        task_id: TaskId,
        /// The project it was unlinked from.
        project_id: ProjectId,
        /// When the link was removed.
        occurred_at: DateTime<Utc>,
    },

    /// A task's deadline was changed.
    TaskDeadlineChanged {
        /// The rescheduled task.
        task_id: TaskId,
        /// The previous deadline, if one was set.
        old_deadline: Option<Deadline>,
        /// The new deadline.
        new_deadline: Deadline,
        /// When the change happened.
        occurred_at: DateTime<Utc>,
    },

    /// A project was created.
    ProjectCreated {
        /// The new project.
        project_id: ProjectId,
        /// The project deadline at creation time.
        deadline: Deadline,
        /// When the creation happened.
        occurred_at: DateTime<Utc>,
    },

    /// A project's deadline was changed.
    ProjectDeadlineChanged {
        /// The rescheduled project.
        project_id: ProjectId,
        /// The previous deadline.
        old_deadline: Deadline,
        /// The new deadline.
        new_deadline: Deadline,
        /// When the change happened.
        occurred_at: DateTime<Utc>,
    },

    /// A project transitioned from open to completed.
    ProjectCompleted {
        /// The completed project.
        project_id: ProjectId,
        /// When the completion happened.
        occurred_at: DateTime<Utc>,
    },

    /// A project transitioned from completed back to open.
    ProjectReopened {
        /// The reopened project.
        project_id: ProjectId,
        /// The task whose state change triggered the reopening, if the
        /// reopening was a cascade rather than an explicit command.
        triggering_task_id: Option<TaskId>,
        /// When the reopening happened.
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Returns the event kind as a stable snake_case name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task_created",
            Self::TaskCompleted { .. } => "task_completed",
            Self::TaskReopened { .. } => "task_reopened",
            Self::TaskLinked { .. } => "task_linked",
            Self::TaskUnlinked { .. } => "task_unlinked",
            Self::TaskDeadlineChanged { .. } => "task_deadline_changed",
            Self::ProjectCreated { .. } => "project_created",
            Self::ProjectDeadlineChanged { .. } => "project_deadline_changed",
            Self::ProjectCompleted { .. } => "project_completed",
            Self::ProjectReopened { .. } => "project_reopened",
        }
    }

    /// Returns when the recorded change happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::TaskCreated { occurred_at, .. }
            | Self::TaskCompleted { occurred_at, .. }
            | Self::TaskReopened { occurred_at, .. }
            | Self::TaskLinked { occurred_at, .. }
            | Self::TaskUnlinked { occurred_at, .. }
            | Self::TaskDeadlineChanged { occurred_at, .. }
            | Self::ProjectCreated { occurred_at, .. }
            | Self::ProjectDeadlineChanged { occurred_at, .. }
            | Self::ProjectCompleted { occurred_at, .. }
            | Self::ProjectReopened { occurred_at, .. } => *occurred_at,
        }
    }
}
