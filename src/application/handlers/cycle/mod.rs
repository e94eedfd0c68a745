//! Cycle lifecycle handlers.

mod create_cycle;
mod end_and_renew_cycle;
mod get_active_cycle;
mod get_cycle_statistics;
mod get_time_remaining;
mod quick_create_cycle;

pub use create_cycle::{CreateCycleCommand, CreateCycleHandler, CreateCycleResult};
pub use end_and_renew_cycle::{
    EndAndRenewCycleCommand, EndAndRenewCycleHandler, EndAndRenewCycleResult,
};
pub use get_active_cycle::{GetActiveCycleHandler, GetActiveCycleQuery};
pub use get_cycle_statistics::{CycleStatistics, GetCycleStatisticsHandler, GetCycleStatisticsQuery};
pub use get_time_remaining::{GetTimeRemainingHandler, GetTimeRemainingQuery};
pub use quick_create_cycle::{QuickCreateCycleCommand, QuickCreateCycleHandler};
