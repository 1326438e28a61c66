//! Port contracts for the tracking context.
//!
//! Repositories expose reads, the unit of work applies writes atomically,
//! and the event sink receives committed domain events. Adapters implement
//! these traits; the domain and services never depend on a concrete storage
//! or transport technology.

mod event_sink;
mod repository;

pub use event_sink::{EventSink, EventSinkError};
pub use repository::{
    ChangeSet, ProjectFilter, ProjectRepository, RepositoryError, RepositoryResult, TaskFilter,
    TaskRepository, TrackerStore, UnitOfWork,
};
