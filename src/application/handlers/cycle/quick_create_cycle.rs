//! QuickCreateCycleHandler - Create-or-replace from a bounded duration.
//!
//! Quick-create accepts days plus an hours/minutes/seconds clock reading
//! (hours 0-23, minutes and seconds 0-59) and then behaves exactly like
//! [`CreateCycleHandler`].

use crate::application::EngineError;
use crate::domain::cycle::{CycleDuration, CycleSpan};
use crate::domain::foundation::CommandMetadata;

use super::{CreateCycleCommand, CreateCycleHandler, CreateCycleResult};

/// Command for quick-create.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickCreateCycleCommand {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Handler for quick-create.
pub struct QuickCreateCycleHandler {
    inner: CreateCycleHandler,
}

impl QuickCreateCycleHandler {
    pub fn new(inner: CreateCycleHandler) -> Self {
        Self { inner }
    }

    pub async fn handle(
        &self,
        cmd: QuickCreateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCycleResult, EngineError> {
        let duration = CycleDuration::quick(cmd.days, cmd.hours, cmd.minutes, cmd.seconds)?;

        tracing::debug!(
            user_id = %metadata.user_id,
            total_seconds = duration.total_seconds(),
            "Quick-create duration accepted"
        );

        self.inner
            .handle(
                CreateCycleCommand {
                    span: CycleSpan::Duration(duration),
                },
                metadata,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, start_time, user, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::CycleStore;

    fn handler(fx: &Fixture) -> QuickCreateCycleHandler {
        QuickCreateCycleHandler::new(CreateCycleHandler::new(
            fx.store.clone(),
            fx.bus.clone(),
            fx.clock.clone(),
            fx.locks.clone(),
            fx.settings.default_duration_days,
        ))
    }

    #[tokio::test]
    async fn combines_every_component() {
        let fx = Fixture::new();
        let cmd = QuickCreateCycleCommand {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
        };

        let result = handler(&fx).handle(cmd, metadata()).await.unwrap();

        let expected = 86_400 + 2 * 3_600 + 3 * 60 + 4;
        assert_eq!(
            result.cycle.ends_at().as_unix_secs() - start_time().as_unix_secs(),
            expected
        );
    }

    #[tokio::test]
    async fn rejects_twenty_four_hours() {
        let fx = Fixture::new();
        let cmd = QuickCreateCycleCommand {
            hours: 24,
            ..Default::default()
        };

        let err = handler(&fx).handle(cmd, metadata()).await.unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(err.code(), ErrorCode::OutOfRange);
        assert!(fx.store.find_cycle(&user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_zero_total() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(QuickCreateCycleCommand::default(), metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_negative_minutes() {
        let fx = Fixture::new();
        let cmd = QuickCreateCycleCommand {
            days: 1,
            minutes: -1,
            ..Default::default()
        };

        assert!(handler(&fx).handle(cmd, metadata()).await.is_err());
    }
}
