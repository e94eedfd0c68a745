//! AddWordHandler - Assign a catalog word to the learner's cycle.
//!
//! Checks run in a fixed order under the learner's lock: cycle exists,
//! cycle not expired, word in catalog, word not already assigned, word not
//! already mastered.

use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::{CycleVocabularyEntry, WordAssigned};
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, EventId, WordId};
use crate::domain::vocabulary::WordMetadata;
use crate::ports::{Clock, CycleStore, EventPublisher, LearnedRecordStore, VocabularyCatalog};

/// Command to add a word.
#[derive(Debug, Clone, Copy)]
pub struct AddWordCommand {
    pub word_id: WordId,
}

/// The new pending entry with its catalog data.
#[derive(Debug, Clone)]
pub struct AddWordResult {
    pub entry: CycleVocabularyEntry,
    pub word: WordMetadata,
}

/// Handler for [`AddWordCommand`].
pub struct AddWordHandler {
    cycle_store: Arc<dyn CycleStore>,
    catalog: Arc<dyn VocabularyCatalog>,
    learned_store: Arc<dyn LearnedRecordStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
}

impl AddWordHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        catalog: Arc<dyn VocabularyCatalog>,
        learned_store: Arc<dyn LearnedRecordStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            cycle_store,
            catalog,
            learned_store,
            event_publisher,
            clock,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddWordCommand,
        metadata: CommandMetadata,
    ) -> Result<AddWordResult, EngineError> {
        let user_id = &metadata.user_id;
        let word_id = cmd.word_id;
        let _guard = self.locks.acquire(user_id).await;

        let cycle = self
            .cycle_store
            .find_cycle(user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let now = self.clock.now();
        cycle.ensure_accepting_words(now)?;

        let word = self.catalog.lookup(word_id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::WordNotFound, format!("Word {} is not in the catalog", word_id))
                .with_detail("word_id", word_id.to_string())
        })?;

        if self.cycle_store.find_entry(user_id, word_id).await?.is_some() {
            return Err(DomainError::new(
                ErrorCode::WordAlreadyInCycle,
                format!("Word {} is already in the cycle", word_id),
            )
            .with_detail("word_id", word_id.to_string())
            .into());
        }

        if self.learned_store.exists(user_id, word_id).await? {
            return Err(DomainError::new(
                ErrorCode::WordAlreadyLearned,
                format!("Word {} has already been learned", word_id),
            )
            .with_detail("word_id", word_id.to_string())
            .into());
        }

        let entry = CycleVocabularyEntry::pending(user_id.clone(), word_id, now);
        self.cycle_store.insert_entry(&entry).await?;

        tracing::info!(
            user_id = %user_id,
            cycle_id = %cycle.id(),
            word_id = %word_id,
            "Word added to cycle"
        );

        let event = WordAssigned {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            cycle_id: cycle.id(),
            word_id,
            occurred_at: now,
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(AddWordResult { entry, word })
    }
}
