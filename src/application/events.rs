//! Post-commit audit publication.

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Publishes `event` with the command's correlation context.
///
/// Called after the state change is stored. Failures are logged and
/// swallowed: the audit trail never fails an operation.
pub(crate) async fn publish_after_commit<E>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) where
    E: SerializableDomainEvent,
{
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.as_str())
            .with_source(metadata.source()),
        Err(e) => {
            tracing::warn!(event_type = event.event_type(), error = %e, "Could not encode audit event");
            return;
        }
    };

    let event_id = envelope.event_id.clone();
    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = event.event_type(),
            event_id = %event_id,
            error = %e,
            "Audit event was not published"
        );
    }
}
