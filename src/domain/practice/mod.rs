//! Practice module - Quiz generation and practice result scoring.

mod outcome;
mod question;
mod quiz;

pub use outcome::{OutcomeResolution, PracticeOutcome, PracticeSummary};
pub use question::{PracticeQuestion, CHOICE_COUNT, DISTRACTOR_COUNT};
pub use quiz::{QuizBuilder, QuizItem};
