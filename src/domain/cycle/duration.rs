//! Cycle length inputs and their resolution into an end timestamp.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Upper bound for any cycle length: one hundred years.
const MAX_TOTAL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// A cycle length decomposed into days, hours, minutes and seconds.
///
/// Components are non-negative. The general constructor accepts any
/// magnitude (e.g. `hours = 36`); [`CycleDuration::quick`] enforces the
/// clock-face bounds used by quick-create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDuration {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl CycleDuration {
    /// Creates a duration, rejecting negative components.
    pub fn new(days: i64, hours: i64, minutes: i64, seconds: i64) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("days", days),
            ("hours", hours),
            ("minutes", minutes),
            ("seconds", seconds),
        ] {
            if value < 0 {
                return Err(ValidationError::out_of_range(field, 0, i64::MAX, value));
            }
        }

        let duration = Self {
            days,
            hours,
            minutes,
            seconds,
        };
        let total = duration.checked_total_seconds().ok_or_else(|| {
            ValidationError::out_of_range("duration", 0, MAX_TOTAL_SECONDS, i64::MAX)
        })?;
        if total > MAX_TOTAL_SECONDS {
            return Err(ValidationError::out_of_range(
                "duration",
                0,
                MAX_TOTAL_SECONDS,
                total,
            ));
        }
        Ok(duration)
    }

    /// Creates a quick-create duration: hours 0-23, minutes and seconds
    /// 0-59, and a strictly positive total.
    pub fn quick(days: i64, hours: i64, minutes: i64, seconds: i64) -> Result<Self, ValidationError> {
        if !(0..=23).contains(&hours) {
            return Err(ValidationError::out_of_range("hours", 0, 23, hours));
        }
        if !(0..=59).contains(&minutes) {
            return Err(ValidationError::out_of_range("minutes", 0, 59, minutes));
        }
        if !(0..=59).contains(&seconds) {
            return Err(ValidationError::out_of_range("seconds", 0, 59, seconds));
        }

        let duration = Self::new(days, hours, minutes, seconds)?;
        if duration.total_seconds() == 0 {
            return Err(ValidationError::invalid_format(
                "duration",
                "quick-create requires a positive duration",
            ));
        }
        Ok(duration)
    }

    /// Whole-day duration.
    pub fn from_days(days: u32) -> Self {
        Self {
            days: i64::from(days),
            ..Self::default()
        }
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> i64 {
        self.checked_total_seconds().unwrap_or(i64::MAX)
    }

    fn checked_total_seconds(&self) -> Option<i64> {
        self.days
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(self.hours.checked_mul(SECONDS_PER_HOUR)?)?
            .checked_add(self.minutes.checked_mul(SECONDS_PER_MINUTE)?)?
            .checked_add(self.seconds)
    }

    /// Converts to a chrono duration.
    pub fn to_chrono(&self) -> Duration {
        Duration::seconds(self.total_seconds().min(MAX_TOTAL_SECONDS))
    }
}

/// How the caller describes the window of a new cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSpan {
    /// `end = start + duration`.
    Duration(CycleDuration),
    /// An explicit end timestamp.
    EndsAt(Timestamp),
    /// The configured default length in days.
    Default,
}

impl CycleSpan {
    /// Resolves the end timestamp for a cycle starting at `start`.
    ///
    /// Fails when the resulting end is not strictly after `start`.
    pub fn resolve(&self, start: Timestamp, default_days: u32) -> Result<Timestamp, ValidationError> {
        let end = match self {
            CycleSpan::Duration(duration) => start.checked_add(duration.to_chrono()),
            CycleSpan::EndsAt(end) => Some(*end),
            CycleSpan::Default => {
                start.checked_add(CycleDuration::from_days(default_days).to_chrono())
            }
        }
        .ok_or_else(|| {
            ValidationError::invalid_format("end_datetime", "end timestamp is not representable")
        })?;

        if !end.is_after(&start) {
            return Err(ValidationError::invalid_format(
                "end_datetime",
                "cycle end must be after its start",
            ));
        }
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn start() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    #[test]
    fn one_day_duration_ends_a_day_later() {
        let span = CycleSpan::Duration(CycleDuration::new(1, 0, 0, 0).unwrap());
        let end = span.resolve(start(), 7).unwrap();
        assert_eq!(end.duration_since(&start()), Duration::days(1));
    }

    #[test]
    fn default_span_uses_configured_days() {
        let end = CycleSpan::Default.resolve(start(), 7).unwrap();
        assert_eq!(end.duration_since(&start()), Duration::days(7));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let span = CycleSpan::Duration(CycleDuration::default());
        assert!(span.resolve(start(), 7).is_err());
    }

    #[test]
    fn explicit_end_in_the_past_is_rejected() {
        let span = CycleSpan::EndsAt(start().plus_secs(-60));
        assert!(span.resolve(start(), 7).is_err());

        let span = CycleSpan::EndsAt(start());
        assert!(span.resolve(start(), 7).is_err());
    }

    #[test]
    fn negative_components_are_rejected() {
        let err = CycleDuration::new(0, -1, 0, 0).unwrap_err();
        assert_eq!(err.field(), "hours");
    }

    #[test]
    fn general_duration_allows_large_components() {
        let duration = CycleDuration::new(0, 36, 90, 0).unwrap();
        assert_eq!(duration.total_seconds(), 36 * 3600 + 90 * 60);
    }

    #[test]
    fn quick_rejects_twenty_four_hours() {
        let err = CycleDuration::quick(0, 24, 0, 0).unwrap_err();
        assert_eq!(err.field(), "hours");
    }

    #[test]
    fn quick_rejects_sixty_minutes_or_seconds() {
        assert_eq!(CycleDuration::quick(0, 0, 60, 0).unwrap_err().field(), "minutes");
        assert_eq!(CycleDuration::quick(0, 0, 0, 60).unwrap_err().field(), "seconds");
    }

    #[test]
    fn quick_days_are_bounded_only_by_the_total_cap() {
        let duration = CycleDuration::quick(400, 0, 0, 0).unwrap();
        assert_eq!(duration.days(), 400);
        assert_eq!(CycleDuration::quick(40_000, 0, 0, 0).unwrap_err().field(), "duration");
        assert_eq!(CycleDuration::quick(-1, 1, 0, 0).unwrap_err().field(), "days");
    }

    #[test]
    fn quick_rejects_empty_duration() {
        assert!(CycleDuration::quick(0, 0, 0, 0).is_err());
    }

    #[test]
    fn quick_accepts_upper_bounds() {
        let duration = CycleDuration::quick(2, 23, 59, 59).unwrap();
        assert_eq!(duration.total_seconds(), 2 * 86_400 + 23 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn overflowing_duration_is_rejected() {
        assert!(CycleDuration::new(i64::MAX, 0, 0, 0).is_err());
        assert!(CycleDuration::new(40_000, 0, 0, 0).is_err());
    }

    proptest! {
        #[test]
        fn resolved_end_is_start_plus_duration(
            days in 0i64..400,
            hours in 0i64..24,
            minutes in 0i64..60,
            seconds in 0i64..60,
        ) {
            let duration = CycleDuration::new(days, hours, minutes, seconds).unwrap();
            let result = CycleSpan::Duration(duration).resolve(start(), 7);

            if duration.total_seconds() == 0 {
                prop_assert!(result.is_err());
            } else {
                let end = result.unwrap();
                prop_assert!(end.is_after(&start()));
                prop_assert_eq!(end.duration_since(&start()).num_seconds(), duration.total_seconds());
            }
        }
    }
}
