//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the learning-cycle engine and the outside world. Adapters implement them.
//!
//! ## Storage Ports
//!
//! - `CycleStore` - Cycles and their vocabulary entries
//! - `LearnedRecordStore` - Per-learner learned records
//! - `VocabularyCatalog` - Read-only word metadata
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Environment Ports
//!
//! - `Clock` - Current time
//! - `RandomSource` - Generators for quiz shuffling

mod clock;
mod cycle_store;
mod event_publisher;
mod event_subscriber;
mod learned_record_store;
mod random_source;
mod vocabulary_catalog;

pub use clock::Clock;
pub use cycle_store::{CycleStore, EntryChange, EntryCounts, LearnedChange};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use learned_record_store::LearnedRecordStore;
pub use random_source::RandomSource;
pub use vocabulary_catalog::{CatalogDistribution, VocabularyCatalog};
