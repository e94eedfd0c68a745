//! RemoveWordHandler - Delete an entry from the learner's cycle.
//!
//! Removal works on expired cycles too and leaves learned records alone.

use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::WordUnassigned;
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, EventId, WordId};
use crate::ports::{Clock, CycleStore, EventPublisher};

/// Command to remove a word.
#[derive(Debug, Clone, Copy)]
pub struct RemoveWordCommand {
    pub word_id: WordId,
}

/// Handler for [`RemoveWordCommand`].
pub struct RemoveWordHandler {
    cycle_store: Arc<dyn CycleStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
}

impl RemoveWordHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            cycle_store,
            event_publisher,
            clock,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveWordCommand,
        metadata: CommandMetadata,
    ) -> Result<(), EngineError> {
        let user_id = &metadata.user_id;
        let word_id = cmd.word_id;
        let _guard = self.locks.acquire(user_id).await;

        let entry = self
            .cycle_store
            .find_entry(user_id, word_id)
            .await?
            .ok_or_else(|| entry_not_found(word_id))?;

        if !self.cycle_store.delete_entry(user_id, word_id).await? {
            return Err(entry_not_found(word_id).into());
        }

        tracing::info!(user_id = %user_id, word_id = %word_id, "Word removed from cycle");

        let event = WordUnassigned {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            word_id,
            previous_status: entry.status(),
            occurred_at: self.clock.now(),
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(())
    }
}

pub(super) fn entry_not_found(word_id: WordId) -> DomainError {
    DomainError::new(
        ErrorCode::EntryNotFound,
        format!("Word {} is not in the cycle", word_id),
    )
    .with_detail("word_id", word_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, word_id, Fixture};
    use crate::domain::cycle::EntryStatus;
    use chrono::Duration;

    fn handler(fx: &Fixture) -> RemoveWordHandler {
        RemoveWordHandler::new(fx.store.clone(), fx.bus.clone(), fx.clock.clone(), fx.locks.clone())
    }

    #[tokio::test]
    async fn removes_existing_entry() {
        let fx = Fixture::new();
        fx.seed_cycle(600).await;
        fx.seed_entry(2, EntryStatus::Pending).await;

        handler(&fx)
            .handle(RemoveWordCommand { word_id: word_id(2) }, metadata())
            .await
            .unwrap();

        assert_eq!(fx.entry_status(2).await, None);
        let events = fx.bus.events_of_type("cycle.word_unassigned.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["previous_status"], "pending");
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let fx = Fixture::new();
        fx.seed_cycle(600).await;

        let err = handler(&fx)
            .handle(RemoveWordCommand { word_id: word_id(2) }, metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::EntryNotFound);
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn removal_is_allowed_after_expiry() {
        let fx = Fixture::new();
        fx.seed_cycle(60).await;
        fx.seed_entry(2, EntryStatus::Learned).await;
        fx.clock.advance(Duration::days(2));

        handler(&fx)
            .handle(RemoveWordCommand { word_id: word_id(2) }, metadata())
            .await
            .unwrap();

        assert_eq!(fx.entry_status(2).await, None);
    }
}
