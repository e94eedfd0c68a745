//! GetCycleStatisticsHandler - Progress counters for the learner's dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::EngineError;
use crate::domain::cycle::TimeRemaining;
use crate::domain::foundation::UserId;
use crate::ports::{Clock, CycleStore, LearnedRecordStore, VocabularyCatalog};

/// Query for cycle statistics.
#[derive(Debug, Clone)]
pub struct GetCycleStatisticsQuery {
    pub user_id: UserId,
}

/// Entry counts for the current cycle plus catalog-wide learning progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStatistics {
    pub total_entries: u64,
    pub pending_entries: u64,
    pub learned_entries: u64,
    /// Words the learner has mastered, in any cycle.
    pub learned_total: u64,
    pub catalog_total: u64,
    /// Catalog words not yet mastered.
    pub remaining_total: u64,
    /// Catalog words per level (a1-c2).
    pub level_distribution: BTreeMap<String, u64>,
    /// Catalog words per topic.
    pub topic_distribution: BTreeMap<String, u64>,
    pub time_remaining: TimeRemaining,
}

/// Handler for [`GetCycleStatisticsQuery`].
pub struct GetCycleStatisticsHandler {
    cycle_store: Arc<dyn CycleStore>,
    learned_store: Arc<dyn LearnedRecordStore>,
    catalog: Arc<dyn VocabularyCatalog>,
    clock: Arc<dyn Clock>,
}

impl GetCycleStatisticsHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        learned_store: Arc<dyn LearnedRecordStore>,
        catalog: Arc<dyn VocabularyCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cycle_store,
            learned_store,
            catalog,
            clock,
        }
    }

    pub async fn handle(
        &self,
        query: GetCycleStatisticsQuery,
    ) -> Result<CycleStatistics, EngineError> {
        let user_id = &query.user_id;
        let cycle = self
            .cycle_store
            .find_cycle(user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let counts = self.cycle_store.count_entries(user_id).await?;
        let learned_total = self.learned_store.count(user_id).await?;
        let catalog_total = self.catalog.count().await?;
        let distribution = self.catalog.distribution().await?;

        let stats = CycleStatistics {
            total_entries: counts.total(),
            pending_entries: counts.pending,
            learned_entries: counts.learned,
            learned_total,
            catalog_total,
            remaining_total: catalog_total.saturating_sub(learned_total),
            level_distribution: distribution.by_level,
            topic_distribution: distribution.by_topic,
            time_remaining: cycle.time_remaining(self.clock.now()),
        };

        tracing::debug!(
            user_id = %user_id,
            total_entries = stats.total_entries,
            learned_total,
            "Computed cycle statistics"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture};
    use crate::domain::cycle::{CycleStatus, EntryStatus};

    fn handler(fx: &Fixture) -> GetCycleStatisticsHandler {
        GetCycleStatisticsHandler::new(
            fx.store.clone(),
            fx.learned.clone(),
            fx.catalog.clone(),
            fx.clock.clone(),
        )
    }

    #[tokio::test]
    async fn counts_entries_and_learned_records() {
        let fx = Fixture::new();
        fx.seed_cycle(600).await;
        fx.seed_entry(1, EntryStatus::Pending).await;
        fx.seed_entry(2, EntryStatus::Pending).await;
        fx.seed_entry(3, EntryStatus::Learned).await;
        fx.seed_learned(3).await;
        fx.seed_learned(9).await;

        let stats = handler(&fx)
            .handle(GetCycleStatisticsQuery { user_id: user() })
            .await
            .unwrap();

        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.pending_entries, 2);
        assert_eq!(stats.learned_entries, 1);
        assert_eq!(stats.learned_total, 2);
        assert_eq!(stats.catalog_total, 10);
        assert_eq!(stats.remaining_total, 8);
        assert_eq!(stats.level_distribution.get("a1"), Some(&5));
        assert_eq!(stats.level_distribution.get("b2"), Some(&5));
        assert_eq!(stats.level_distribution.get("c1"), None);
        assert_eq!(stats.topic_distribution.get("food"), Some(&5));
        assert_eq!(stats.topic_distribution.get("travel"), Some(&5));
        assert_eq!(stats.time_remaining.status, CycleStatus::Active);
    }

    #[tokio::test]
    async fn no_cycle_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(GetCycleStatisticsQuery { user_id: user() })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
