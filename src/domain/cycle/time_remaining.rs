//! Read-time view of how much of a cycle is left.
//!
//! Expiration is never stored; it is derived from `now` every time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, Timestamp};

/// Whether a cycle is still accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Active,
    Expired,
}

/// Remaining duration split into calendar-style components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingBreakdown {
    pub total_seconds: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl RemainingBreakdown {
    fn from_seconds(total_seconds: i64) -> Self {
        let total_seconds = total_seconds.max(0);
        Self {
            total_seconds,
            days: total_seconds / 86_400,
            hours: (total_seconds % 86_400) / 3_600,
            minutes: (total_seconds % 3_600) / 60,
            seconds: total_seconds % 60,
        }
    }
}

/// Status, remaining breakdown and progress of a cycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub status: CycleStatus,
    pub ends_at: Timestamp,
    pub remaining: RemainingBreakdown,
    pub progress: Percentage,
}

impl TimeRemaining {
    /// Computes the view for the window `[start, end)` at `now`.
    pub fn at(start: Timestamp, end: Timestamp, now: Timestamp) -> Self {
        if !now.is_before(&end) {
            return Self {
                status: CycleStatus::Expired,
                ends_at: end,
                remaining: RemainingBreakdown::default(),
                progress: Percentage::HUNDRED,
            };
        }

        let total = end.duration_since(&start).num_seconds();
        let elapsed = now.duration_since(&start).num_seconds();
        let remaining = end.duration_since(&now).num_seconds();

        Self {
            status: CycleStatus::Active,
            ends_at: end,
            remaining: RemainingBreakdown::from_seconds(remaining),
            progress: Percentage::floored_ratio(elapsed, total),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.status == CycleStatus::Expired
    }
}
