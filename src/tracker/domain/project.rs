//! Project aggregate root: membership relation and completion rules.

use super::{CompletionStatus, Deadline, DomainError, DomainEvent, ProjectId, TaskId, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Project aggregate root.
///
/// The project owns the membership relation (which task identifiers belong
/// to it) and its own completion state, but never the task entities
/// themselves. Completion bookkeeping for members is mirrored here through
/// [`Project::mark_task_completed`] and [`Project::mark_task_reopened`],
/// driven by the service layer interpreting task events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: Title,
    description: Option<String>,
    deadline: Deadline,
    status: CompletionStatus,
    task_ids: BTreeSet<TaskId>,
    completed_task_ids: BTreeSet<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted deadline.
    pub deadline: Deadline,
    /// Persisted completion status.
    pub status: CompletionStatus,
    /// Persisted member task identifiers.
    pub task_ids: BTreeSet<TaskId>,
    /// Persisted completed member task identifiers.
    pub completed_task_ids: BTreeSet<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
}

impl Project {
    /// Creates a new open project and records a `ProjectCreated` event.
    #[must_use]
    pub fn new(
        title: Title,
        description: Option<String>,
        deadline: Deadline,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let id = ProjectId::new();
        let mut project = Self {
            id,
            title,
            description,
            deadline,
            status: CompletionStatus::Open,
            task_ids: BTreeSet::new(),
            completed_task_ids: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
            events: Vec::new(),
        };
        project.events.push(DomainEvent::ProjectCreated {
            project_id: id,
            deadline,
            occurred_at: timestamp,
        });
        project
    }

    /// Reconstructs a project from persisted storage without emitting
    /// events.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            deadline: data.deadline,
            status: data.status,
            task_ids: data.task_ids,
            completed_task_ids: data.completed_task_ids,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
            events: Vec::new(),
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the project deadline.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Returns the completion status.
    #[must_use]
    pub const fn status(&self) -> CompletionStatus {
        self.status
    }

    /// Returns true when the project is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns the member task identifiers.
    #[must_use]
    pub const fn task_ids(&self) -> &BTreeSet<TaskId> {
        &self.task_ids
    }

    /// Returns true when the task is a member of this project.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task_ids.contains(&task_id)
    }

    /// Returns the total member task count.
    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns the completed member task count.
    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.completed_task_ids.len()
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

    /// Returns the optimistic-concurrency version this project was loaded
    /// with.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Adds a task to the membership set. Idempotent.
    ///
    /// Adding an incomplete task to a completed project reopens the
    /// project: completed state cannot coexist with outstanding work.
    pub fn add_task(&mut self, task_id: TaskId, task_completed: bool, clock: &impl Clock) {
        let inserted = self.task_ids.insert(task_id);
        if task_completed {
            self.completed_task_ids.insert(task_id);
        }
        if !inserted {
            return;
        }
        self.touch(clock);
        if self.is_completed() && !task_completed {
            self.reopen_internal(Some(task_id), clock);
        }
    }

    /// Removes a task from the membership set. Idempotent.
    pub fn remove_task(&mut self, task_id: TaskId, clock: &impl Clock) {
        let removed = self.task_ids.remove(&task_id);
        self.completed_task_ids.remove(&task_id);
        if removed {
            self.touch(clock);
        }
    }

    /// Records that a member task is now completed.
    pub fn mark_task_completed(&mut self, task_id: TaskId, clock: &impl Clock) {
        if self.task_ids.contains(&task_id) && self.completed_task_ids.insert(task_id) {
            self.touch(clock);
        }
    }

    /// Records that a member task is open again.
    pub fn mark_task_reopened(&mut self, task_id: TaskId, clock: &impl Clock) {
        if self.completed_task_ids.remove(&task_id) {
            self.touch(clock);
        }
    }

    /// Returns true when every member task is completed, or when the
    /// project has no members and `allow_empty` is set.
    #[must_use]
    pub fn can_be_completed(&self, allow_empty: bool) -> bool {
        if self.task_ids.is_empty() {
            return allow_empty;
        }
        self.completed_task_ids.len() == self.task_ids.len()
    }

    /// Marks the project as completed and records a `ProjectCompleted`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ProjectHasIncompleteTasks`] when open member
    /// tasks remain, or when the project is empty and `allow_empty` is not
    /// set.
    pub fn complete(&mut self, allow_empty: bool, clock: &impl Clock) -> Result<(), DomainError> {
        if !self.can_be_completed(allow_empty) {
            return Err(DomainError::ProjectHasIncompleteTasks {
                project_id: self.id,
                open_tasks: self.task_ids.len() - self.completed_task_ids.len(),
            });
        }
        if self.is_completed() {
            return Ok(());
        }
        self.status = CompletionStatus::Completed;
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::ProjectCompleted {
            project_id: self.id,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Reopens the project. Always permitted; reopening an already open
    /// project changes nothing and emits nothing.
    pub fn reopen(&mut self, clock: &impl Clock) {
        if self.is_completed() {
            self.reopen_internal(None, clock);
        }
    }

    /// Reopens the project because one of its member tasks was reopened.
    /// No-op when the project is already open or the task is not a member.
    pub fn reopen_due_to_task(&mut self, task_id: TaskId, clock: &impl Clock) {
        if self.is_completed() && self.task_ids.contains(&task_id) {
            self.reopen_internal(Some(task_id), clock);
        }
    }

    /// Changes the project deadline, validating it against the latest
    /// member task deadline.
    ///
    /// The check and the mutation are atomic: on rejection the deadline is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ProjectDeadlineBelowTaskDeadline`] when
    /// `latest_task_deadline` falls after the new deadline.
    pub fn reschedule(
        &mut self,
        new_deadline: Deadline,
        latest_task_deadline: Option<Deadline>,
        clock: &impl Clock,
    ) -> Result<(), DomainError> {
        if let Some(latest) = latest_task_deadline
            && latest.is_after(new_deadline)
        {
            return Err(DomainError::ProjectDeadlineBelowTaskDeadline {
                project_deadline: new_deadline.to_string(),
                task_deadline: latest.to_string(),
            });
        }
        let old_deadline = self.deadline;
        self.deadline = new_deadline;
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::ProjectDeadlineChanged {
            project_id: self.id,
            old_deadline,
            new_deadline,
            occurred_at: timestamp,
        });
        Ok(())
    }

    /// Replaces the project title.
    pub fn rename(&mut self, title: Title, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the project description.
    pub fn redescribe(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Drains and returns the buffered domain events.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn reopen_internal(&mut self, triggering_task_id: Option<TaskId>, clock: &impl Clock) {
        self.status = CompletionStatus::Open;
        let timestamp = self.touch(clock);
        self.events.push(DomainEvent::ProjectReopened {
            project_id: self.id,
            triggering_task_id,
            occurred_at: timestamp,
        });
    }

    fn touch(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        self.updated_at = clock.utc();
        self.updated_at
    }
}
