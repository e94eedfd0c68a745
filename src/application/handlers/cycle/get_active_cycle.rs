//! GetActiveCycleHandler - Query handler for the learner's cycle.
//!
//! Expiration is not applied here: an expired cycle is still returned.

use std::sync::Arc;

use crate::application::EngineError;
use crate::domain::cycle::LearningCycle;
use crate::domain::foundation::UserId;
use crate::ports::CycleStore;

/// Query for the learner's cycle.
#[derive(Debug, Clone)]
pub struct GetActiveCycleQuery {
    pub user_id: UserId,
}

/// Handler for [`GetActiveCycleQuery`].
pub struct GetActiveCycleHandler {
    cycle_store: Arc<dyn CycleStore>,
}

impl GetActiveCycleHandler {
    pub fn new(cycle_store: Arc<dyn CycleStore>) -> Self {
        Self { cycle_store }
    }

    pub async fn handle(&self, query: GetActiveCycleQuery) -> Result<LearningCycle, EngineError> {
        let cycle = self
            .cycle_store
            .find_cycle(&query.user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        tracing::debug!(user_id = %query.user_id, cycle_id = %cycle.id(), "Loaded cycle");
        Ok(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture};
    use crate::domain::foundation::ErrorCode;
    use chrono::Duration;

    #[tokio::test]
    async fn returns_stored_cycle() {
        let fx = Fixture::new();
        let seeded = fx.seed_cycle(600).await;

        let cycle = GetActiveCycleHandler::new(fx.store.clone())
            .handle(GetActiveCycleQuery { user_id: user() })
            .await
            .unwrap();

        assert_eq!(cycle, seeded);
    }

    #[tokio::test]
    async fn no_cycle_is_not_found() {
        let fx = Fixture::new();

        let err = GetActiveCycleHandler::new(fx.store.clone())
            .handle(GetActiveCycleQuery { user_id: user() })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
        assert_eq!(err.code(), ErrorCode::CycleNotFound);
    }

    #[tokio::test]
    async fn expired_cycle_is_still_returned() {
        let fx = Fixture::new();
        let seeded = fx.seed_cycle(60).await;
        fx.clock.advance(Duration::hours(1));

        let cycle = GetActiveCycleHandler::new(fx.store.clone())
            .handle(GetActiveCycleQuery { user_id: user() })
            .await
            .unwrap();

        assert_eq!(cycle.id(), seeded.id());
    }
}
