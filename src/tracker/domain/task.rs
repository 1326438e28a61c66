//! Task aggregate root and its completion state machine.

use super::{CompletionStatus, Deadline, DomainError, DomainEvent, ProjectId, TaskId, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// A task owns its own completion and deadline state. It never reaches into
/// the [`Project`](super::Project) it references; it holds only the project
/// identifier, and cross-entity effects flow through the events it emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: Title,
    description: Option<String>,
    deadline: Option<Deadline>,
    status: CompletionStatus,
    project_id: Option<ProjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted deadline, if any.
    pub deadline: Option<Deadline>,
    /// Persisted completion status.
    pub status: CompletionStatus,
    /// Persisted project link, if any.
    pub project_id: Option<ProjectId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
}

impl Task {
    /// Creates a new open task and records a `TaskCreated` event.
    #[must_use]
    pub fn new(
        title: Title,
        description: Option<String>,
        deadline: Option<Deadline>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let id = TaskId::new();
        let mut task = Self {
            id,
            title,
            description,
            deadline,
            status: CompletionStatus::Open,
            project_id: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
            events: Vec::new(),
        };
        task.events.push(DomainEvent::TaskCreated {
            task_id: id,
            project_id: None,
            occurred_at: timestamp,
        });
        task
    }

    /// Reconstructs a task from persisted storage without emitting events.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            deadline: data.deadline,
            status: data.status,
            project_id: data.project_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
            events: Vec::new(),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the task deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Returns the completion status.
    #[must_use]
    pub const fn status(&self) -> CompletionStatus {
        self.status
    }

    /// Returns true when the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns the linked project identifier, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency version this task was loaded with.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Returns true when the task is open and its deadline has passed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed()
            && self
                .deadline
                .is_some_and(|deadline| deadline.is_overdue(now))
    }

    /// Marks the task as completed and records a `TaskCompleted` event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TaskAlreadyCompleted`] when the task is not
    /// open.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::TaskAlreadyCompleted(self.id));
        }
        self.status = CompletionStatus::Completed;
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::TaskCompleted {
            task_id: self.id,
            project_id: self.project_id,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Reopens a completed task and records a `TaskReopened` event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TaskNotCompleted`] when the task is still
    /// open.
    pub fn reopen(&mut self, clock: &impl Clock) -> Result<(), DomainError> {
        if !self.is_completed() {
            return Err(DomainError::TaskNotCompleted(self.id));
        }
        self.status = CompletionStatus::Open;
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::TaskReopened {
            task_id: self.id,
            project_id: self.project_id,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Replaces the task title.
    pub fn rename(&mut self, title: Title, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the task description.
    pub fn redescribe(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Changes the task deadline, validating it against the owning
    /// project's deadline when one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DeadlineExceedsProject`] when the new deadline
    /// falls after `project_deadline`.
    pub fn reschedule(
        &mut self,
        new_deadline: Deadline,
        project_deadline: Option<Deadline>,
        clock: &impl Clock,
    ) -> Result<(), DomainError> {
        if let Some(limit) = project_deadline
            && new_deadline.is_after(limit)
        {
            return Err(DomainError::DeadlineExceedsProject {
                task_deadline: new_deadline.to_string(),
                project_deadline: limit.to_string(),
            });
        }
        let old_deadline = self.deadline;
        self.deadline = Some(new_deadline);
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::TaskDeadlineChanged {
            task_id: self.id,
            old_deadline,
            new_deadline,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Links the task to a project, validating the deadline invariant.
    ///
    /// Linking to the project the task already belongs to is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TaskAlreadyLinked`] when the task is linked to
    /// a different project, or [`DomainError::DeadlineExceedsProject`] when
    /// the task deadline falls after `project_deadline`.
    pub fn link_to_project(
        &mut self,
        project_id: ProjectId,
        project_deadline: Deadline,
        clock: &impl Clock,
    ) -> Result<(), DomainError> {
        match self.project_id {
            Some(existing) if existing == project_id => return Ok(()),
            Some(existing) => {
                return Err(DomainError::TaskAlreadyLinked {
                    task_id: self.id,
                    project_id: existing,
                });
            }
            None => {}
        }
        if let Some(deadline) = self.deadline
            && deadline.is_after(project_deadline)
        {
            return Err(DomainError::DeadlineExceedsProject {
                task_deadline: deadline.to_string(),
                project_deadline: project_deadline.to_string(),
            });
        }
        self.project_id = Some(project_id);
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::TaskLinked {
            task_id: self.id,
            project_id,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Removes the project link. Idempotent: unlinking an unlinked task
    /// changes nothing and emits nothing.
    pub fn unlink_from_project(&mut self, clock: &impl Clock) {
        let Some(project_id) = self.project_id.take() else {
            return;
        };
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::TaskUnlinked {
            task_id: self.id,
            project_id,
            occurred_at: timestamp,
        });
    }

    /// Drains and returns the buffered domain events.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn touch(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        self.updated_at = clock.utc();
        self.updated_at
    }
}
