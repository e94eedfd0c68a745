//! Asynchronous audit delivery.
//!
//! Handlers publish into a bounded channel and return immediately. An
//! `AuditDispatcher` task drains the channel and fans each envelope out to
//! its sinks. The engine never waits on, or fails because of, the audit
//! trail.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `capacity` | 1024 | Envelopes buffered before publishing fails |
//!
//! ## Graceful Shutdown
//!
//! On the shutdown signal the dispatcher drains whatever is already queued
//! and then stops.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher};

/// Configuration for the audit channel.
#[derive(Debug, Clone)]
pub struct AuditDispatcherConfig {
    /// Channel capacity.
    pub capacity: usize,
}

impl Default for AuditDispatcherConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl AuditDispatcherConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}

/// Publisher half: enqueues envelopes without waiting for delivery.
#[derive(Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<EventEnvelope>,
}

impl ChannelEventPublisher {
    /// Creates the publisher and the dispatcher that drains it.
    pub fn channel(
        config: AuditDispatcherConfig,
        sinks: Vec<Arc<dyn EventHandler>>,
    ) -> (Self, AuditDispatcher) {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        (Self { sender }, AuditDispatcher { receiver, sinks })
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.sender.try_send(event).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "audit queue is full",
                mpsc::error::TrySendError::Closed(_) => "audit dispatcher has stopped",
            };
            DomainError::new(ErrorCode::InternalError, reason)
        })
    }
}

/// Consumer half: delivers queued envelopes to every sink.
pub struct AuditDispatcher {
    receiver: mpsc::Receiver<EventEnvelope>,
    sinks: Vec<Arc<dyn EventHandler>>,
}

impl AuditDispatcher {
    /// Run until shutdown is signalled or every publisher is dropped.
    ///
    /// Returns the number of envelopes delivered.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut delivered = 0;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.receiver.close();
                        while let Some(event) = self.receiver.recv().await {
                            self.dispatch(event).await;
                            delivered += 1;
                        }
                        tracing::debug!(delivered, "Audit dispatcher stopped");
                        return delivered;
                    }
                }
                next = self.receiver.recv() => {
                    match next {
                        Some(event) => {
                            self.dispatch(event).await;
                            delivered += 1;
                        }
                        None => return delivered,
                    }
                }
            }
        }
    }

    async fn dispatch(&self, event: EventEnvelope) {
        for sink in &self.sinks {
            if let Err(e) = sink.handle(event.clone()).await {
                tracing::warn!(
                    sink = sink.name(),
                    event_id = %event.event_id,
                    event_type = %event.event_type,
                    error = %e,
                    "Audit sink rejected event"
                );
            }
        }
    }
}

/// Audit sink that writes every event to the `audit` tracing target.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditSink;

#[async_trait]
impl EventHandler for TracingAuditSink {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            target: "audit",
            event_id = %event.event_id,
            event_type = %event.event_type,
            user_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            source = event.metadata.source.as_deref().unwrap_or("-"),
            occurred_at = %event.occurred_at.to_rfc3339(),
            payload = %event.payload,
            "learning cycle event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TracingAuditSink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventHandler for RecordingSink {
        async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
            self.seen.lock().unwrap().push(event.event_type);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "RecordingSink"
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventHandler for FailingSink {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "disk full"))
        }

        fn name(&self) -> &'static str {
            "FailingSink"
        }
    }

    fn envelope(event_type: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, "learner", "LearningCycle", json!({}))
    }

    #[tokio::test]
    async fn dispatcher_delivers_queued_events_on_shutdown() {
        let sink = RecordingSink::new();
        let sinks: Vec<Arc<dyn EventHandler>> = vec![sink.clone()];
        let (publisher, dispatcher) =
            ChannelEventPublisher::channel(AuditDispatcherConfig::default(), sinks);
        let (tx, rx) = watch::channel(false);

        publisher.publish(envelope("cycle.started.v1")).await.unwrap();
        publisher.publish(envelope("cycle.word_assigned.v1")).await.unwrap();
        tx.send(true).unwrap();

        let delivered = dispatcher.run(rx).await;

        assert_eq!(delivered, 2);
        assert_eq!(sink.seen(), vec!["cycle.started.v1", "cycle.word_assigned.v1"]);
    }

    #[tokio::test]
    async fn dispatcher_stops_when_publishers_are_dropped() {
        let sink = RecordingSink::new();
        let sinks: Vec<Arc<dyn EventHandler>> = vec![sink.clone()];
        let (publisher, dispatcher) =
            ChannelEventPublisher::channel(AuditDispatcherConfig::default(), sinks);
        let (_tx, rx) = watch::channel(false);

        publisher.publish(envelope("cycle.renewed.v1")).await.unwrap();
        drop(publisher);

        assert_eq!(dispatcher.run(rx).await, 1);
    }

    #[tokio::test]
    async fn full_queue_rejects_without_blocking() {
        let (publisher, _dispatcher) = ChannelEventPublisher::channel(
            AuditDispatcherConfig::default().with_capacity(1),
            Vec::new(),
        );

        publisher.publish(envelope("a.v1")).await.unwrap();
        let err = publisher.publish(envelope("b.v1")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_other_sinks() {
        let sink = RecordingSink::new();
        let (publisher, dispatcher) = ChannelEventPublisher::channel(
            AuditDispatcherConfig::default(),
            vec![Arc::new(FailingSink) as Arc<dyn EventHandler>, sink.clone()],
        );
        let (tx, rx) = watch::channel(false);

        publisher.publish(envelope("cycle.started.v1")).await.unwrap();
        tx.send(true).unwrap();
        dispatcher.run(rx).await;

        assert_eq!(sink.seen().len(), 1);
    }

    #[tokio::test]
    async fn tracing_sink_accepts_every_event() {
        let sink = TracingAuditSink;
        assert!(sink.handle(envelope("cycle.started.v1")).await.is_ok());
    }
}
