//! Event sink that emits committed events to the structured log.

use async_trait::async_trait;
use tracing::info;

use crate::tracker::domain::DomainEvent;
use crate::tracker::ports::{EventSink, EventSinkError};

/// Event sink logging each committed event as structured fields.
///
/// Suitable as a default sink when no external fan-out is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    /// Creates a logging event sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LogEventSink {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventSinkError> {
        let payload = serde_json::to_string(event).map_err(EventSinkError::new)?;
        info!(
            kind = event.kind(),
            occurred_at = %event.occurred_at(),
            payload,
            "domain event"
        );
        Ok(())
    }
}
