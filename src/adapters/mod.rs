//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `events` - In-memory bus and the asynchronous audit channel
//! - `memory` - In-memory stores used without a database and in tests
//! - `postgres` - PostgreSQL stores (sqlx)
//! - `http` - Axum REST API
//! - clock and random sources

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

mod clock;
mod random;

pub use clock::{FixedClock, SystemClock};
pub use events::InMemoryEventBus;
pub use random::{OsRandomSource, SeededRandomSource};
