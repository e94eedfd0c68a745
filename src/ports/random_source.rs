//! Random source port for quiz generation.

use rand::rngs::StdRng;

/// Hands out a generator per quiz.
///
/// Production uses OS entropy; tests use a seeded source so question and
/// choice order are reproducible.
pub trait RandomSource: Send + Sync {
    fn rng(&self) -> StdRng;
}
