//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `cycle` - Learning cycle aggregate, entries and their state machine
//! - `vocabulary` - Catalog word metadata and learned records
//! - `practice` - Quiz generation and practice scoring

pub mod cycle;
pub mod foundation;
pub mod practice;
pub mod vocabulary;
