//! EventSubscriber port - Interface for subscribing to domain events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Handlers should be idempotent; a failing handler does not affect the
/// others subscribed to the same event.
///
/// ```ignore
/// #[async_trait]
/// impl EventHandler for TracingAuditSink {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         tracing::info!(target: "audit", event_type = %event.event_type);
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "TracingAuditSink"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}
