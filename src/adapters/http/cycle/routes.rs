//! Route configuration for learning cycle endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    add_word, create_cycle, get_current_cycle, get_cycle_statistics, get_practice_set,
    get_time_remaining, health, list_learned_words, list_words, quick_create_cycle, remove_word, renew_cycle,
    set_word_status, submit_practice_results, CycleAppState,
};

/// Creates the cycle router with all endpoints.
///
/// Routes:
/// - `POST /api/cycles` - Create the cycle, or replace its window
/// - `POST /api/cycles/quick` - Quick-create from days/hours/minutes/seconds
/// - `GET /api/cycles/current` - Current cycle
/// - `GET /api/cycles/current/time-remaining` - Status, remaining time, progress
/// - `GET /api/cycles/current/statistics` - Entry and catalog counts
/// - `POST /api/cycles/current/renew` - End the cycle and start the next
/// - `POST /api/cycles/vocabulary` - Assign a word
/// - `GET /api/cycles/vocabulary` - List assigned words
/// - `PUT /api/cycles/vocabulary/:word_id` - Set an entry's status
/// - `DELETE /api/cycles/vocabulary/:word_id` - Remove a word
/// - `GET /api/cycles/practice-set` - Generate a quiz
/// - `POST /api/cycles/practice-results` - Submit answers
/// - `GET /api/learned-words` - Learned words, newest first
/// - `GET /health` - Liveness
pub fn cycle_router() -> Router<CycleAppState> {
    Router::new()
        .route("/api/cycles", post(create_cycle))
        .route("/api/cycles/quick", post(quick_create_cycle))
        .route("/api/cycles/current", get(get_current_cycle))
        .route("/api/cycles/current/time-remaining", get(get_time_remaining))
        .route("/api/cycles/current/statistics", get(get_cycle_statistics))
        .route("/api/cycles/current/renew", post(renew_cycle))
        .route("/api/cycles/vocabulary", post(add_word).get(list_words))
        .route(
            "/api/cycles/vocabulary/:word_id",
            put(set_word_status).delete(remove_word),
        )
        .route("/api/cycles/practice-set", get(get_practice_set))
        .route("/api/cycles/practice-results", post(submit_practice_results))
        .route("/api/learned-words", get(list_learned_words))
        .route("/health", get(health))
}
