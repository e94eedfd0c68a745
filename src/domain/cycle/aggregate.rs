//! LearningCycle aggregate - the learner's single time-boxed cycle.
//!
//! A learner owns at most one cycle. Create-or-replace rewrites its window
//! in place and keeps the identity; end-and-renew swaps in a new identity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CycleId, DomainError, ErrorCode, Timestamp, UserId};

use super::TimeRemaining;

/// The LearningCycle aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningCycle {
    id: CycleId,
    user_id: UserId,
    started_at: Timestamp,
    ends_at: Timestamp,
}

impl LearningCycle {
    /// Opens a new cycle for `user_id` over `[started_at, ends_at)`.
    pub fn open(
        user_id: UserId,
        started_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Self, DomainError> {
        Self::ensure_window(started_at, ends_at)?;
        Ok(Self {
            id: CycleId::new(),
            user_id,
            started_at,
            ends_at,
        })
    }

    /// Reconstitutes a cycle from persisted data.
    pub fn reconstitute(
        id: CycleId,
        user_id: UserId,
        started_at: Timestamp,
        ends_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            started_at,
            ends_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> CycleId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    /// A cycle is expired once `now >= ends_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        !now.is_before(&self.ends_at)
    }

    pub fn time_remaining(&self, now: Timestamp) -> TimeRemaining {
        TimeRemaining::at(self.started_at, self.ends_at, now)
    }

    // ───────────────────────────────────────────────────────────────
    // Behavior
    // ───────────────────────────────────────────────────────────────

    /// Overwrites the window in place; the cycle id and entries survive.
    pub fn replace_window(
        &mut self,
        started_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<(), DomainError> {
        Self::ensure_window(started_at, ends_at)?;
        self.started_at = started_at;
        self.ends_at = ends_at;
        Ok(())
    }

    /// Produces the successor cycle with a fresh identity.
    pub fn renew(&self, started_at: Timestamp, ends_at: Timestamp) -> Result<Self, DomainError> {
        Self::open(self.user_id.clone(), started_at, ends_at)
    }

    /// Fails with `CycleExpired` when the cycle no longer accepts assignments.
    pub fn ensure_accepting_words(&self, now: Timestamp) -> Result<(), DomainError> {
        if self.is_expired(now) {
            return Err(DomainError::new(
                ErrorCode::CycleExpired,
                format!("Cycle ended at {}", self.ends_at.to_rfc3339()),
            )
            .with_detail("cycle_id", self.id.to_string()));
        }
        Ok(())
    }

    fn ensure_window(started_at: Timestamp, ends_at: Timestamp) -> Result<(), DomainError> {
        if !ends_at.is_after(&started_at) {
            return Err(DomainError::validation(
                "end_datetime",
                "Cycle end must be after its start",
            ));
        }
        Ok(())
    }
}
