//! Domain model for task and project tracking.
//!
//! Value objects validate themselves at construction, entities enforce
//! their own state machines and buffer domain events for the service layer
//! to drain, and all infrastructure concerns stay outside the domain
//! boundary.

mod deadline;
mod error;
mod event;
mod ids;
mod project;
mod task;
mod title;

pub use deadline::Deadline;
pub use error::DomainError;
pub use event::DomainEvent;
pub use ids::{ProjectId, TaskId};
pub use project::{PersistedProjectData, Project};
pub use task::{PersistedTaskData, Task};
pub use title::Title;

use serde::{Deserialize, Serialize};

/// Completion state shared by tasks and projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Work remains outstanding.
    Open,
    /// Work has been completed.
    Completed,
}

impl CompletionStatus {
    /// Returns true when the state is [`CompletionStatus::Completed`].
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}
