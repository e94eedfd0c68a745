//! HTTP adapter for the learning cycle engine.
//!
//! Exposes cycle, vocabulary and practice operations via REST endpoints.
//! Every `/api` route requires the `X-User-Id` header.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::CycleAppState;
pub use routes::cycle_router;
