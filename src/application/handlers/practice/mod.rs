//! Practice handlers: quiz generation and result submission.

mod apply_outcomes;
mod build_quiz;

pub use apply_outcomes::{ApplyOutcomesCommand, ApplyOutcomesHandler};
pub use build_quiz::{BuildQuizHandler, BuildQuizQuery};
