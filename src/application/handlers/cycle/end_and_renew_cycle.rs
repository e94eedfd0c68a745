//! EndAndRenewCycleHandler - Replace the current cycle with a new identity.
//!
//! The old cycle is retired and a successor with a fresh id and window is
//! stored in one store call. Entries stay with the learner unless the
//! policy says renewal discards them; the pending count is reported either
//! way so clients can show what carried over.

use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::{CyclePolicy, CycleRenewed, CycleSpan, LearningCycle};
use crate::domain::foundation::{CommandMetadata, CycleId, EventId};
use crate::ports::{Clock, CycleStore, EventPublisher};

/// Command to end the current cycle and start the next.
#[derive(Debug, Clone)]
pub struct EndAndRenewCycleCommand {
    pub span: CycleSpan,
}

/// Result of a renewal.
#[derive(Debug, Clone)]
pub struct EndAndRenewCycleResult {
    pub cycle: LearningCycle,
    pub previous_cycle_id: CycleId,
    /// Pending entries that live on under the new cycle.
    pub carried_pending_count: u64,
    pub entries_discarded: bool,
}

/// Handler for end-and-renew.
pub struct EndAndRenewCycleHandler {
    cycle_store: Arc<dyn CycleStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    policy: CyclePolicy,
    default_duration_days: u32,
}

impl EndAndRenewCycleHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<UserLocks>,
        policy: CyclePolicy,
        default_duration_days: u32,
    ) -> Self {
        Self {
            cycle_store,
            event_publisher,
            clock,
            locks,
            policy,
            default_duration_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: EndAndRenewCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<EndAndRenewCycleResult, EngineError> {
        let user_id = &metadata.user_id;
        let _guard = self.locks.acquire(user_id).await;

        let current = self
            .cycle_store
            .find_cycle(user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let now = self.clock.now();
        let ends_at = cmd.span.resolve(now, self.default_duration_days)?;
        let next = current.renew(now, ends_at)?;

        let counts = self.cycle_store.count_entries(user_id).await?;
        let discard = !self.policy.carry_pending_on_renew;

        self.cycle_store
            .renew_cycle(&current.id(), &next, discard)
            .await?;

        let carried_pending_count = if discard { 0 } else { counts.pending };

        tracing::info!(
            user_id = %user_id,
            previous_cycle_id = %current.id(),
            cycle_id = %next.id(),
            carried_pending = carried_pending_count,
            entries_discarded = discard,
            "Learning cycle renewed"
        );

        let event = CycleRenewed {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            previous_cycle_id: current.id(),
            cycle_id: next.id(),
            ends_at,
            carried_pending: carried_pending_count,
            entries_discarded: discard,
            occurred_at: now,
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(EndAndRenewCycleResult {
            cycle: next,
            previous_cycle_id: current.id(),
            carried_pending_count,
            entries_discarded: discard,
        })
    }
}
