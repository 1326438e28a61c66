//! Orchestration services for the tracking context.
//!
//! One operation per inbound command: parse primitives into value objects,
//! load entities through the repository ports, apply the task mutation
//! first and any project cascade second, commit every touched entity as one
//! change set, then hand the drained events to the event sink.

mod commands;
mod dispatch;
mod error;
mod policy;
mod project_service;
mod task_service;
mod views;

pub use commands::{
    CompleteProjectCommand, CompleteTaskCommand, CreateProjectCommand, CreateTaskCommand,
    DeleteProjectCommand, DeleteTaskCommand, LinkTaskCommand, ListProjectsQuery, ListTasksQuery,
    ReopenProjectCommand, ReopenTaskCommand, UnlinkTaskCommand, UpdateProjectCommand,
    UpdateTaskCommand,
};
pub use error::{CommandError, CommandResult};
pub use policy::{ProjectDeletePolicy, TrackerPolicy};
pub use project_service::ProjectCommandService;
pub use task_service::TaskCommandService;
pub use views::{Page, ProjectView, TaskView};
