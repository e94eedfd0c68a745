//! Vocabulary handlers: assignment, removal, listing, status updates, and
//! the learner's learned words.

mod add_word;
mod list_cycle_words;
mod list_learned_words;
mod remove_word;
mod set_word_status;

pub use add_word::{AddWordCommand, AddWordHandler, AddWordResult};
pub use list_cycle_words::{
    CycleWordView, CycleWordsPage, ListCycleWordsHandler, ListCycleWordsQuery, SortField,
    SortOrder, WordFilters, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use list_learned_words::{
    LearnedWordView, LearnedWordsPage, ListLearnedWordsHandler, ListLearnedWordsQuery,
};
pub use remove_word::{RemoveWordCommand, RemoveWordHandler};
pub use set_word_status::{SetWordStatusCommand, SetWordStatusHandler, SetWordStatusResult};
