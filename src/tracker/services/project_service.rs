//! Project command orchestration, membership management, and deletion
//! policy.

use std::sync::Arc;

use crate::tracker::domain::{Deadline, DomainError, Project, ProjectId, Task, TaskId, Title};
use crate::tracker::ports::{ChangeSet, EventSink, ProjectFilter, TaskFilter, TrackerStore};
use mockable::Clock;

use super::commands::{
    CompleteProjectCommand, CreateProjectCommand, DeleteProjectCommand, LinkTaskCommand,
    ListProjectsQuery, ReopenProjectCommand, UnlinkTaskCommand, UpdateProjectCommand,
};
use super::dispatch::publish_all;
use super::error::{CommandError, CommandResult};
use super::policy::{ProjectDeletePolicy, TrackerPolicy};
use super::views::{Page, ProjectView};

/// Orchestrates project commands.
#[derive(Clone)]
pub struct ProjectCommandService<S, E, C>
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

impl<S, E, C> ProjectCommandService<S, E, C>
where
    S: TrackerStore,
    E: EventSink,
    C: Clock + Send + Sync,
{
    /// Creates a new project command service.
    #[must_use]
    pub const fn new(store: Arc<S>, events: Arc<E>, clock: Arc<C>, policy: TrackerPolicy) -> Self {
        Self {
            store,
            events,
            clock,
            policy,
        }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Domain`] on malformed input and
    /// [`CommandError::Repository`] on persistence failure.
    pub async fn create_project(
        &self,
        command: CreateProjectCommand,
    ) -> CommandResult<ProjectView> {
        let title = Title::new(command.title)?;
        let deadline = Deadline::parse(&command.deadline)?;
        let mut project = Project::new(title, command.description, deadline, &*self.clock);

        let emitted = project.take_events();
        let view = ProjectView::project_at(&project, self.clock.utc());
        let mut changes = ChangeSet::new();
        changes.stage_project(project);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Updates project title, description, and deadline.
    ///
    /// A deadline change is validated against the latest persisted member
    /// task deadline before any field is touched: moving the project
    /// deadline before a member's deadline is rejected wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] when the project does not
    /// resolve, [`CommandError::Domain`] on malformed input or a deadline
    /// constraint violation, and [`CommandError::Repository`] on
    /// persistence failure.
    pub async fn update_project(
        &self,
        command: UpdateProjectCommand,
    ) -> CommandResult<ProjectView> {
        let mut project = self.load_project(&command.project_id).await?;

        if let Some(raw) = command.deadline.as_deref() {
            let new_deadline = Deadline::parse(raw)?;
            let latest_task_deadline = self
                .member_tasks(project.id())
                .await?
                .iter()
                .filter_map(Task::deadline)
                .max();
            project.reschedule(new_deadline, latest_task_deadline, &*self.clock)?;
        }
        if let Some(raw_title) = command.title {
            project.rename(Title::new(raw_title)?, &*self.clock);
        }
        if let Some(description) = command.description {
            project.redescribe(Some(description), &*self.clock);
        }

        let emitted = project.take_events();
        let view = ProjectView::project_at(&project, self.clock.utc());
        let mut changes = ChangeSet::new();
        changes.stage_project(project);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    /// Completes a project. Permitted only when every member task is
    /// completed, or when the project is empty and the policy allows it.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] when the project does not
    /// resolve, [`CommandError::Domain`] when open member tasks remain, and
    /// [`CommandError::Repository`] on persistence failure.
    pub async fn complete_project(
        &self,
        command: CompleteProjectCommand,
    ) -> CommandResult<ProjectView> {
        let mut project = self.load_project(&command.project_id).await?;
        project.complete(self.policy.complete_empty_projects, &*self.clock)?;
        self.commit_project(project).await
    }

    /// Reopens a project. Always permitted; reopening an open project is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] when the project does not
    /// resolve and [`CommandError::Repository`] on persistence failure.
    pub async fn reopen_project(
        &self,
        command: ReopenProjectCommand,
    ) -> CommandResult<ProjectView> {
        let mut project = self.load_project(&command.project_id).await?;
        project.reopen(&*self.clock);
        self.commit_project(project).await
    }

    /// Deletes a project according to the configured deletion policy.
    ///
    /// With [`ProjectDeletePolicy::UnlinkTasks`], member tasks survive and
    /// are unlinked inside the same commit. With
    /// [`ProjectDeletePolicy::RequireEmpty`], deletion is rejected while
    /// any task remains linked.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] when the project does not
    /// resolve, [`CommandError::Domain`] when the policy rejects deletion,
    /// and [`CommandError::Repository`] on persistence failure.
    pub async fn delete_project(&self, command: DeleteProjectCommand) -> CommandResult<()> {
        let project = self.load_project(&command.project_id).await?;
        let mut changes = ChangeSet::new();
        let mut emitted = Vec::new();

        let members = self.member_tasks(project.id()).await?;
        if !members.is_empty() {
            if self.policy.on_project_delete == ProjectDeletePolicy::RequireEmpty {
                return Err(CommandError::Domain(DomainError::ProjectNotEmpty {
                    project_id: project.id(),
                    task_count: members.len(),
                }));
            }
            for mut task in members {
                task.unlink_from_project(&*self.clock);
                emitted.extend(task.take_events());
                changes.stage_task(task);
            }
        }

        changes.stage_project_deletion(project.id());
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(())
    }

    /// Links an existing task to a project.
    ///
    /// The task mutation is applied first and validates both the
    /// already-linked guard and the deadline invariant against the
    /// persisted project deadline; the membership update follows in the
    /// same commit. Linking a completed task into a completed project does
    /// not reopen it; linking an open one does.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] /
    /// [`CommandError::TaskNotFound`] when a reference does not resolve,
    /// [`CommandError::Domain`] when the task is linked elsewhere or its
    /// deadline exceeds the project's, and [`CommandError::Repository`] on
    /// persistence failure.
    pub async fn link_task(&self, command: LinkTaskCommand) -> CommandResult<()> {
        let mut project = self.load_project(&command.project_id).await?;
        let mut task = self.load_task(&command.task_id).await?;

        task.link_to_project(project.id(), project.deadline(), &*self.clock)?;
        project.add_task(task.id(), task.is_completed(), &*self.clock);

        let mut emitted = task.take_events();
        emitted.extend(project.take_events());
        let mut changes = ChangeSet::new();
        changes.stage_task(task);
        changes.stage_project(project);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(())
    }

    /// Unlinks a task from a project. Idempotent on both sides; removing
    /// the last open member may auto-complete the project under the
    /// configured policy.
    ///
    /// A task that is unlinked, or linked to a different project, is left
    /// untouched: the link and the owning project's membership set only
    /// ever change together.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] /
    /// [`CommandError::TaskNotFound`] when a reference does not resolve and
    /// [`CommandError::Repository`] on persistence failure.
    pub async fn unlink_task(&self, command: UnlinkTaskCommand) -> CommandResult<()> {
        let mut project = self.load_project(&command.project_id).await?;
        let mut task = self.load_task(&command.task_id).await?;

        if task.project_id() == Some(project.id()) {
            project.remove_task(task.id(), &*self.clock);
            task.unlink_from_project(&*self.clock);
            if self.policy.auto_complete_projects
                && !project.is_completed()
                && project.total_tasks() > 0
                && project.can_be_completed(self.policy.complete_empty_projects)
            {
                project.complete(self.policy.complete_empty_projects, &*self.clock)?;
            }
        }

        let mut emitted = task.take_events();
        emitted.extend(project.take_events());
        let mut changes = ChangeSet::new();
        changes.stage_task(task);
        changes.stage_project(project);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(())
    }

    /// Fetches a project projection with derived progress counts.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ProjectNotFound`] when the project does not
    /// resolve and [`CommandError::Repository`] on persistence failure.
    pub async fn get_project(&self, project_id: &str) -> CommandResult<ProjectView> {
        let project = self.load_project(project_id).await?;
        Ok(ProjectView::project_at(&project, self.clock.utc()))
    }

    /// Lists one page of project projections matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Repository`] on persistence failure.
    pub async fn list_projects(
        &self,
        query: ListProjectsQuery,
    ) -> CommandResult<Page<ProjectView>> {
        let now = self.clock.utc();
        let projects = self
            .store
            .list_projects(ProjectFilter {
                completed: query.completed,
            })
            .await?;
        let views: Vec<ProjectView> = projects
            .iter()
            .map(|project| ProjectView::project_at(project, now))
            .collect();
        Ok(Page::windowed(
            views,
            query.offset,
            query.limit.unwrap_or(Page::<ProjectView>::DEFAULT_LIMIT),
        ))
    }

    async fn commit_project(&self, mut project: Project) -> CommandResult<ProjectView> {
        let emitted = project.take_events();
        let view = ProjectView::project_at(&project, self.clock.utc());
        let mut changes = ChangeSet::new();
        changes.stage_project(project);
        self.store.commit(changes).await?;
        publish_all(&*self.events, &emitted).await;
        Ok(view)
    }

    async fn member_tasks(&self, project_id: ProjectId) -> CommandResult<Vec<Task>> {
        let tasks = self
            .store
            .list_tasks(TaskFilter {
                project_id: Some(project_id),
                ..TaskFilter::default()
            })
            .await?;
        Ok(tasks)
    }

    async fn load_project(&self, raw: &str) -> CommandResult<Project> {
        let id = ProjectId::parse(raw)?;
        self.store
            .find_project(id)
            .await?
            .ok_or(CommandError::ProjectNotFound(id))
    }

    async fn load_task(&self, raw: &str) -> CommandResult<Task> {
        let id = TaskId::parse(raw)?;
        self.store
            .find_task(id)
            .await?
            .ok_or(CommandError::TaskNotFound(id))
    }
}
