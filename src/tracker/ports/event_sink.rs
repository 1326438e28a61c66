//! Event sink port for post-commit event fan-out.

use crate::tracker::domain::DomainEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Outbound contract for committed domain events.
///
/// Services call [`EventSink::publish`] exactly once per emitted event,
/// after the commit, in emission order. Delivery failure never rolls back
/// the committed state; retries are the adapter's concern.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one committed event.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when delivery fails.
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventSinkError>;
}

/// Errors returned by event sink implementations.
#[derive(Debug, Clone, Error)]
#[error("event delivery failed: {0}")]
pub struct EventSinkError(Arc<dyn std::error::Error + Send + Sync>);

impl EventSinkError {
    /// Wraps a delivery error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
