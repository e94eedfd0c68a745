//! GetTimeRemainingHandler - Status, remaining time and progress of the cycle.

use std::sync::Arc;

use crate::application::EngineError;
use crate::domain::cycle::TimeRemaining;
use crate::domain::foundation::UserId;
use crate::ports::{Clock, CycleStore};

/// Query for the time-remaining view.
#[derive(Debug, Clone)]
pub struct GetTimeRemainingQuery {
    pub user_id: UserId,
}

/// Handler for [`GetTimeRemainingQuery`].
pub struct GetTimeRemainingHandler {
    cycle_store: Arc<dyn CycleStore>,
    clock: Arc<dyn Clock>,
}

impl GetTimeRemainingHandler {
    pub fn new(cycle_store: Arc<dyn CycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { cycle_store, clock }
    }

    pub async fn handle(&self, query: GetTimeRemainingQuery) -> Result<TimeRemaining, EngineError> {
        let cycle = self
            .cycle_store
            .find_cycle(&query.user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let remaining = cycle.time_remaining(self.clock.now());

        tracing::debug!(
            user_id = %query.user_id,
            status = ?remaining.status,
            progress = remaining.progress.value(),
            "Computed time remaining"
        );
        Ok(remaining)
    }
}
