//! Cycle module - The learner's time-boxed cycle and its word entries.
//!
//! A cycle is a `[start, end)` window. Entries are keyed by (user, word)
//! and move between `pending` and `learned`.

mod aggregate;
mod duration;
mod entry;
mod events;
mod policy;
mod time_remaining;

pub use aggregate::LearningCycle;
pub use duration::{CycleDuration, CycleSpan};
pub use entry::{CycleVocabularyEntry, EntryStatus};
pub use events::{
    CycleRenewed, CycleStarted, PracticeSubmitted, WordAssigned, WordStatusChanged,
    WordUnassigned,
};
pub use policy::{CyclePolicy, LearnedDisposition};
pub use time_remaining::{CycleStatus, RemainingBreakdown, TimeRemaining};
