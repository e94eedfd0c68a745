//! CreateCycleHandler - Create the learner's cycle, or replace its window.
//!
//! An existing cycle keeps its identity and its entries; only the start and
//! end are overwritten.

use std::sync::Arc;

use crate::application::events::publish_after_commit;
use crate::application::{EngineError, UserLocks};
use crate::domain::cycle::{CycleSpan, CycleStarted, LearningCycle};
use crate::domain::foundation::{CommandMetadata, EventId};
use crate::ports::{Clock, CycleStore, EventPublisher};

/// Command to create or replace the learner's cycle.
#[derive(Debug, Clone)]
pub struct CreateCycleCommand {
    pub span: CycleSpan,
}

/// Result of creating or replacing a cycle.
#[derive(Debug, Clone)]
pub struct CreateCycleResult {
    pub cycle: LearningCycle,
    /// True when an existing cycle was overwritten in place.
    pub replaced: bool,
}

/// Handler for create-or-replace.
pub struct CreateCycleHandler {
    cycle_store: Arc<dyn CycleStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    default_duration_days: u32,
}

impl CreateCycleHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<UserLocks>,
        default_duration_days: u32,
    ) -> Self {
        Self {
            cycle_store,
            event_publisher,
            clock,
            locks,
            default_duration_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCycleResult, EngineError> {
        let user_id = &metadata.user_id;
        let _guard = self.locks.acquire(user_id).await;

        let now = self.clock.now();
        let ends_at = cmd.span.resolve(now, self.default_duration_days)?;

        let (cycle, replaced) = match self.cycle_store.find_cycle(user_id).await? {
            Some(mut existing) => {
                existing.replace_window(now, ends_at)?;
                (existing, true)
            }
            None => (LearningCycle::open(user_id.clone(), now, ends_at)?, false),
        };

        self.cycle_store.save_cycle(&cycle).await?;

        tracing::info!(
            user_id = %user_id,
            cycle_id = %cycle.id(),
            ends_at = %ends_at.to_rfc3339(),
            replaced,
            "Learning cycle started"
        );

        let event = CycleStarted {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            cycle_id: cycle.id(),
            started_at: now,
            ends_at,
            replaced,
            occurred_at: now,
        };
        publish_after_commit(self.event_publisher.as_ref(), &event, &metadata).await;

        Ok(CreateCycleResult { cycle, replaced })
    }
}
