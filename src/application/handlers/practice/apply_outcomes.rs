//! ApplyOutcomesHandler - Apply a batch of practice answers and score it.
//!
//! Correct answers on cycle entries record the word as learned; incorrect
//! ones change nothing; answers for words outside the cycle, or with ids
//! that are not valid word ids, are skipped. The whole batch runs under the
//! learner's lock and its learned writes commit together.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::handlers::learned::{plan_learned, LearnedEffect};
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::{CyclePolicy, PracticeSubmitted};
use crate::domain::foundation::{CommandMetadata, EventId, WordId};
use crate::domain::practice::{OutcomeResolution, PracticeOutcome, PracticeSummary};
use crate::ports::{Clock, CycleStore, EventPublisher};

/// Command carrying one practice batch.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcomesCommand {
    pub outcomes: Vec<PracticeOutcome>,
    /// Submitted answers whose word id could not be a catalog id.
    pub invalid_word_ids: u64,
}

impl ApplyOutcomesCommand {
    pub fn new(outcomes: Vec<PracticeOutcome>) -> Self {
        Self {
            outcomes,
            invalid_word_ids: 0,
        }
    }

    /// Builds the command from raw `(word_id, is_correct)` pairs, counting
    /// ids that fail validation instead of rejecting the batch.
    pub fn from_raw(results: impl IntoIterator<Item = (i64, bool)>) -> Self {
        let mut cmd = Self::default();
        for (raw, is_correct) in results {
            match WordId::new(raw) {
                Ok(word_id) => cmd.outcomes.push(PracticeOutcome::new(word_id, is_correct)),
                Err(_) => cmd.invalid_word_ids += 1,
            }
        }
        cmd
    }
}

/// Handler for [`ApplyOutcomesCommand`].
pub struct ApplyOutcomesHandler {
    cycle_store: Arc<dyn CycleStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    policy: CyclePolicy,
}

impl ApplyOutcomesHandler {
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
        cmd: ApplyOutcomesCommand,
        metadata: CommandMetadata,
    ) -> Result<PracticeSummary, EngineError> {
        let user_id = &metadata.user_id;
        let _guard = self.locks.acquire(user_id).await;

        let cycle = self
            .cycle_store
            .find_cycle(user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let mut entries: HashMap<_, _> = self
            .cycle_store
            .list_entries(user_id)
            .await?
            .into_iter()
            .map(|e| (e.word_id(), e))
            .collect();

        let now = self.clock.now();
        let disposition = self.policy.learned_disposition();
        let mut resolutions = Vec::with_capacity(cmd.outcomes.len());
        let mut changes = Vec::new();

        for outcome in &cmd.outcomes {
            let resolution =
                OutcomeResolution::resolve(outcome, entries.contains_key(&outcome.word_id));

            if resolution == OutcomeResolution::Learned {
                if let Some(entry) = entries.remove(&outcome.word_id) {
                    let (change, effect) = plan_learned(entry, disposition, now)?;
                    changes.push(change);
                    if let LearnedEffect::Marked(entry) | LearnedEffect::Refreshed(entry) = effect {
                        entries.insert(entry.word_id(), entry);
                    }
                }
            }
            resolutions.push(resolution);
        }
        resolutions.extend((0..cmd.invalid_word_ids).map(|_| OutcomeResolution::Skipped));

        self.cycle_store.apply_learned(user_id, &changes).await?;

        let summary = PracticeSummary::tally(resolutions);

        tracing::info!(
            user_id = %user_id,
            cycle_id = %cycle.id(),
            total = summary.total_words,
            learned = summary.learned_words,
            skipped = summary.skipped_words,
            score = summary.score.value(),
            "Practice results applied"
        );

        let event = PracticeSubmitted {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            cycle_id: cycle.id(),
            total_words: summary.total_words,
            learned_words: summary.learned_words,
            pending_words: summary.pending_words,
            skipped_words: summary.skipped_words,
            score: summary.score,
            occurred_at: now,
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(summary)
    }
}
