//! Post-commit event dispatch shared by the command services.

use crate::tracker::domain::DomainEvent;
use crate::tracker::ports::EventSink;
use tracing::warn;

/// Publishes committed events in emission order.
///
/// Delivery is fire-and-forget from the command's perspective: a failing
/// sink is logged and never affects the already-committed result.
pub(super) async fn publish_all<E: EventSink>(sink: &E, events: &[DomainEvent]) {
    for event in events {
        if let Err(err) = sink.publish(event).await {
            warn!(kind = event.kind(), error = %err, "event dispatch failed");
        }
    }
}
