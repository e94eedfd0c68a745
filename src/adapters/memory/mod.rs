//! In-memory storage adapters.
//!
//! Back the engine when no database is configured, and the handler tests.

mod cycle_store;
mod learned_record_store;
mod vocabulary_catalog;

pub use cycle_store::InMemoryCycleStore;
pub use learned_record_store::InMemoryLearnedRecordStore;
pub use vocabulary_catalog::InMemoryVocabularyCatalog;
