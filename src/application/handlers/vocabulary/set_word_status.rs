//! SetWordStatusHandler - Direct status update for one cycle entry.
//!
//! Setting `learned` records the word as mastered and then either keeps the
//! entry as `learned` or removes it, per [`CyclePolicy`]. Setting `pending`
//! on a learned entry resets it for more practice; the learned record stays.

use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::handlers::learned::{plan_learned, LearnedEffect};
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::{CyclePolicy, CycleVocabularyEntry, EntryStatus, WordStatusChanged};
use crate::domain::foundation::{CommandMetadata, EventId, WordId};
use crate::ports::{Clock, CycleStore, EventPublisher};

use super::remove_word::entry_not_found;

/// Command to set an entry's status.
#[derive(Debug, Clone, Copy)]
pub struct SetWordStatusCommand {
    pub word_id: WordId,
    pub status: EntryStatus,
}

/// The entry after the update, or notice that it left the cycle.
#[derive(Debug, Clone)]
pub enum SetWordStatusResult {
    Updated(CycleVocabularyEntry),
    Removed { word_id: WordId },
}

/// Handler for [`SetWordStatusCommand`].
pub struct SetWordStatusHandler {
    cycle_store: Arc<dyn CycleStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    policy: CyclePolicy,
}

impl SetWordStatusHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<UserLocks>,
        policy: CyclePolicy,
    ) -> Self {
        Self {
            cycle_store,
            event_publisher,
            clock,
            locks,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetWordStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<SetWordStatusResult, EngineError> {
        let user_id = &metadata.user_id;
        let word_id = cmd.word_id;
        let _guard = self.locks.acquire(user_id).await;

        let mut entry = self
            .cycle_store
            .find_entry(user_id, word_id)
            .await?
            .ok_or_else(|| entry_not_found(word_id))?;

        let from = entry.status();
        let now = self.clock.now();

        let result = match cmd.status {
            EntryStatus::Learned => {
                let (change, effect) =
                    plan_learned(entry, self.policy.learned_disposition(), now)?;
                self.cycle_store.apply_learned(user_id, &[change]).await?;
                match effect {
                    LearnedEffect::Marked(entry) | LearnedEffect::Refreshed(entry) => {
                        SetWordStatusResult::Updated(entry)
                    }
                    LearnedEffect::Removed => SetWordStatusResult::Removed { word_id },
                }
            }
            EntryStatus::Pending if from == EntryStatus::Pending => {
                tracing::debug!(user_id = %user_id, word_id = %word_id, "Entry already pending");
                return Ok(SetWordStatusResult::Updated(entry));
            }
            EntryStatus::Pending => {
                entry.transition(EntryStatus::Pending, now)?;
                self.cycle_store.update_entry(&entry).await?;
                SetWordStatusResult::Updated(entry)
            }
        };

        let entry_removed = matches!(result, SetWordStatusResult::Removed { .. });

        tracing::info!(
            user_id = %user_id,
            word_id = %word_id,
            from = %from,
            to = %cmd.status,
            entry_removed,
            "Word status updated"
        );

        let event = WordStatusChanged {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            word_id,
            from,
            to: cmd.status,
            entry_removed,
            occurred_at: now,
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(result)
    }
}
