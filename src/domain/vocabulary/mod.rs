//! Vocabulary module - Catalog word metadata and learned records.

mod learned;
mod word;

pub use learned::LearnedRecord;
pub use word::{PartOfSpeech, VocabLevel, WordMetadata};
