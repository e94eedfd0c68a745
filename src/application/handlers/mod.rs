//! Application handlers.
//!
//! One command or query handler per engine operation. Commands take
//! `CommandMetadata` and serialize on the learner's lock; queries read
//! the latest committed state.

pub mod cycle;
pub mod practice;
pub mod vocabulary;

mod learned;

#[cfg(test)]
pub(crate) mod test_support;

pub use cycle::{
    CreateCycleCommand, CreateCycleHandler, CreateCycleResult, CycleStatistics,
    EndAndRenewCycleCommand, EndAndRenewCycleHandler, EndAndRenewCycleResult,
    GetActiveCycleHandler, GetActiveCycleQuery, GetCycleStatisticsHandler,
    GetCycleStatisticsQuery, GetTimeRemainingHandler, GetTimeRemainingQuery,
    QuickCreateCycleCommand, QuickCreateCycleHandler,
};
pub use practice::{ApplyOutcomesCommand, ApplyOutcomesHandler, BuildQuizHandler, BuildQuizQuery};
pub use vocabulary::{
    AddWordCommand, AddWordHandler, AddWordResult, CycleWordView, CycleWordsPage,
    LearnedWordView, LearnedWordsPage, ListCycleWordsHandler, ListCycleWordsQuery,
    ListLearnedWordsHandler, ListLearnedWordsQuery, RemoveWordCommand, RemoveWordHandler,
    SetWordStatusCommand, SetWordStatusHandler, SetWordStatusResult, SortField, SortOrder,
    WordFilters,
};
