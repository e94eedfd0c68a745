//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations over the ports. Every handler reports
//! failures as [`EngineError`].

pub mod handlers;

mod error;
mod events;
mod locks;
mod settings;

pub use error::EngineError;
pub use locks::UserLocks;
pub use settings::EngineSettings;
