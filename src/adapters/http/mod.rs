//! HTTP adapters - REST API implementations.

pub mod cycle;

pub use cycle::{cycle_router, CycleAppState};
