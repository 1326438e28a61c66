//! Adapter implementations of the tracking ports.

mod log;
mod memory;

pub use log::LogEventSink;
pub use memory::{InMemoryTrackerStore, RecordingEventSink};
