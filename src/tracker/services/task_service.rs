//! Task command orchestration and task-to-project cascades.

use std::sync::Arc;

use crate::tracker::domain::{Deadline, Project, ProjectId, Task, TaskId, Title};
use crate::tracker::ports::{ChangeSet, EventSink, TaskFilter, TrackerStore};
use mockable::Clock;

use super::commands::{
    CompleteTaskCommand, CreateTaskCommand, DeleteTaskCommand, ListTasksQuery, ReopenTaskCommand,
    UpdateTaskCommand,
};
use super::dispatch::publish_all;
use super::error::{CommandError, CommandResult};
use super::policy::TrackerPolicy;
use super::views::{Page, TaskView};

/// Orchestrates task commands.
///
/// Task mutations are applied first; the emitted events are then translated
/// into explicit project mutations (completion bookkeeping, auto-complete,
/// unconditional reopen) inside the same change set, so no partial cascade
/// is ever observable.
#[derive(Clone)]
pub struct TaskCommandService<S, E, C>
where
    S: TrackerStore,
    E: EventSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    events: Arc<E>,
    clock: Arc<C>,
    policy: TrackerPolicy,
}

impl<S, E, C> TaskCommandService<S, E, C>
where
    S: TrackerStore,
    E: EventSink,
    C: Clock + Send + Sync,
{
    /// Creates a new task command service.
    #[must_use]
    pub const fn new(store: Arc<S>, events: Arc<E>, clock: Arc<C>, policy: TrackerPolicy) -> Self {
        Self {
            store,
            events,
            clock,
            policy,
        }
    }

    /// Creates a task, linking it to a project when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Domain`] on malformed input or when the task
    /// deadline exceeds the project deadline,
    /// [`CommandError::ProjectNotFound`] when the referenced project does
    /// not resolve, and [`CommandError::Repository`] on persistence
    /// failure.
    pub async fn create_task(&self, command: CreateTaskCommand) -> CommandResult<TaskView> {
        let title = Title::new(command.title)?;
        let deadline = command
            .deadline
            .as_deref()
            .map(Deadline::parse)
            .transpose()?;
        let project = match command.project_id.as_deref() {
            Some(raw) => Some(self.load_project(raw).await?),
            None => None,
        };

        let mut task = Task::new(title, command.description, deadline, &*self.clock);
        let mut changes = ChangeSet::new();
        let mut emitted = Vec::new();

        if let Some(mut project) = project {
            task.link_to_project(project.id(), project.deadline(), &*self.clock)?;
            project.add_task(task.id(), task.is_completed(), &*self.clock);
            emitted.extend(task.take_events());
            emitted.extend(project.take_events());
            changes.stage_project(project);
        } else {
            emitted.extend(task.take_events());
        }

        let view = TaskView::project_at(&task, self.clock.utc());
        changes.stage_task(task);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Updates task title, description, and deadline.
    ///
    /// The deadline change is validated against the currently persisted
    /// project deadline before any field is touched.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TaskNotFound`] when the task does not
    /// resolve, [`CommandError::Domain`] on malformed input or a deadline
    /// constraint violation, and [`CommandError::Repository`] on
    /// persistence failure.
    pub async fn update_task(&self, command: UpdateTaskCommand) -> CommandResult<TaskView> {
        let mut task = self.load_task(&command.task_id).await?;

        if let Some(raw) = command.deadline.as_deref() {
            let new_deadline = Deadline::parse(raw)?;
            let project_deadline = match task.project_id() {
                Some(project_id) => self
                    .store
                    .find_project(project_id)
                    .await?
                    .map(|project| project.deadline()),
                None => None,
            };
            task.reschedule(new_deadline, project_deadline, &*self.clock)?;
        }
        if let Some(raw_title) = command.title {
            task.rename(Title::new(raw_title)?, &*self.clock);
        }
        if let Some(description) = command.description {
            task.redescribe(Some(description), &*self.clock);
        }

        let emitted = task.take_events();
        let view = TaskView::project_at(&task, self.clock.utc());
        let mut changes = ChangeSet::new();
        changes.stage_task(task);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Completes a task. When the task is the last open member of a
    /// project and auto-completion is enabled, the project is completed in
    /// the same commit.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TaskNotFound`] when the task does not
    /// resolve, [`CommandError::Domain`] when the task is already
    /// completed, and [`CommandError::Repository`] on persistence failure.
    pub async fn complete_task(&self, command: CompleteTaskCommand) -> CommandResult<TaskView> {
        let mut task = self.load_task(&command.task_id).await?;
        task.complete(&*self.clock)?;

        let mut emitted = task.take_events();
        let mut changes = ChangeSet::new();

        if let Some(mut project) = self.linked_project(&task).await? {
            project.mark_task_completed(task.id(), &*self.clock);
            if self.policy.auto_complete_projects
                && !project.is_completed()
                && project.can_be_completed(self.policy.complete_empty_projects)
            {
                project.complete(self.policy.complete_empty_projects, &*self.clock)?;
            }
            emitted.extend(project.take_events());
            changes.stage_project(project);
        }

        let view = TaskView::project_at(&task, self.clock.utc());
        changes.stage_task(task);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Reopens a completed task. A completed owning project is reopened
    /// unconditionally in the same commit.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TaskNotFound`] when the task does not
    /// resolve, [`CommandError::Domain`] when the task is not completed,
    /// and [`CommandError::Repository`] on persistence failure.
    pub async fn reopen_task(&self, command: ReopenTaskCommand) -> CommandResult<TaskView> {
        let mut task = self.load_task(&command.task_id).await?;
        task.reopen(&*self.clock)?;

        let mut emitted = task.take_events();
        let mut changes = ChangeSet::new();

        if let Some(mut project) = self.linked_project(&task).await? {
            project.mark_task_reopened(task.id(), &*self.clock);
            project.reopen_due_to_task(task.id(), &*self.clock);
            emitted.extend(project.take_events());
            changes.stage_project(project);
        }

        let view = TaskView::project_at(&task, self.clock.utc());
        changes.stage_task(task);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Deletes a task, unlinking it from its project first. Removing the
    /// last open member may auto-complete the project under the configured
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TaskNotFound`] when the task does not
    /// resolve and [`CommandError::Repository`] on persistence failure.
    pub async fn delete_task(&self, command: DeleteTaskCommand) -> CommandResult<()> {
        let mut task = self.load_task(&command.task_id).await?;
        let mut changes = ChangeSet::new();
        let mut emitted = Vec::new();

        if let Some(mut project) = self.linked_project(&task).await? {
            project.remove_task(task.id(), &*self.clock);
            task.unlink_from_project(&*self.clock);
            self.maybe_auto_complete(&mut project)?;
            emitted.extend(task.take_events());
            emitted.extend(project.take_events());
            changes.stage_project(project);
        }

        changes.stage_task_deletion(task.id());
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(())
    }

    /// Fetches a task projection.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TaskNotFound`] when the task does not
    /// resolve and [`CommandError::Repository`] on persistence failure.
    pub async fn get_task(&self, task_id: &str) -> CommandResult<TaskView> {
        let task = self.load_task(task_id).await?;
        Ok(TaskView::project_at(&task, self.clock.utc()))
    }

    /// Lists one page of task projections matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Domain`] on a malformed project identifier
    /// and [`CommandError::Repository`] on persistence failure.
    pub async fn list_tasks(&self, query: ListTasksQuery) -> CommandResult<Page<TaskView>> {
        let now = self.clock.utc();
        let mut filter = TaskFilter {
            completed: query.completed,
            due_before: None,
            project_id: query
                .project_id
                .as_deref()
                .map(ProjectId::parse)
                .transpose()?,
        };
        if query.overdue == Some(true) {
            filter.due_before = Some(now);
            filter.completed = Some(filter.completed.unwrap_or(false));
        }
        let tasks = self.store.list_tasks(filter).await?;
        let views: Vec<TaskView> = tasks
            .iter()
            .map(|task| TaskView::project_at(task, now))
            .collect();
        Ok(Page::windowed(
            views,
            query.offset,
            query.limit.unwrap_or(Page::<TaskView>::DEFAULT_LIMIT),
        ))
    }

    fn maybe_auto_complete(&self, project: &mut Project) -> CommandResult<()> {
        // Empty projects are left open here even when empty completion is
        // allowed: losing your last task should not silently finish a
        // project that never had completed work.
        if self.policy.auto_complete_projects
            && !project.is_completed()
            && project.total_tasks() > 0
            && project.can_be_completed(self.policy.complete_empty_projects)
        {
            project.complete(self.policy.complete_empty_projects, &*self.clock)?;
        }
        Ok(())
    }

    async fn load_task(&self, raw: &str) -> CommandResult<Task> {
        let id = TaskId::parse(raw)?;
        self.store
            .find_task(id)
            .await?
            .ok_or(CommandError::TaskNotFound(id))
    }

    async fn load_project(&self, raw: &str) -> CommandResult<Project> {
        let id = ProjectId::parse(raw)?;
        self.store
            .find_project(id)
            .await?
            .ok_or(CommandError::ProjectNotFound(id))
    }

    async fn linked_project(&self, task: &Task) -> CommandResult<Option<Project>> {
        match task.project_id() {
            Some(project_id) => Ok(self.store.find_project(project_id).await?),
            None => Ok(None),
        }
    }
}
