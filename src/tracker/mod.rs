//! Task and project tracking bounded context.
//!
//! Tasks own their completion and deadline state; projects own the
//! membership relation and their own completion state. The two never call
//! each other directly: entity methods emit domain events that the service
//! layer interprets into explicit calls on the other entity, inside one
//! transactional change set. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
