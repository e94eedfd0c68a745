//! EventPublisher port - Interface for publishing domain events.
//!
//! Handlers publish after their writes succeed. The engine never depends on
//! who consumes the events (the audit sink, tests, ...).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations may deliver synchronously (in-memory bus) or hand the
/// envelope to a background task (channel publisher). Callers treat a
/// publish error as non-fatal and log it.
///
/// ```ignore
/// let envelope = event.to_envelope()?.with_user_id(user_id.as_str());
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}
}
