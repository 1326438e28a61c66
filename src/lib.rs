//! Gantt: deadline-aware task and project tracking core.
//!
//! This crate implements the domain model and rule-enforcement engine for
//! tasks grouped into deadline-bound projects. Completion state machines,
//! cross-entity deadline constraints, and the cascades between tasks and
//! their projects live here; transports, schemas, and relational storage
//! are adapters behind narrow ports.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and event fan-out
//! - **Adapters**: Concrete implementations of ports (in-memory store,
//!   logging event sink)
//! - **Services**: Command orchestration applying cascades inside one
//!   atomic unit of work

pub mod tracker;
