//! Clock port.
//!
//! Expiration and progress are computed against `Clock::now`, so tests can
//! pin time instead of sleeping.

use crate::domain::foundation::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
