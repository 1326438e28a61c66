//! Service-level error taxonomy.

use crate::tracker::domain::{DomainError, ProjectId, TaskId};
use crate::tracker::ports::RepositoryError;
use thiserror::Error;

/// Result type for command service operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised by the command services.
///
/// Domain and repository errors propagate unmodified so adapters can map
/// them to transport-specific signals. Every error is local to a single
/// command: nothing is partially applied.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Value-object validation or an entity state transition failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persistence failed, including concurrent-modification conflicts.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
