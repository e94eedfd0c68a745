//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus with event capture
//! - `ChannelEventPublisher` / `AuditDispatcher` - Fire-and-forget audit
//!   delivery drained by a background task
//! - `TracingAuditSink` - Audit sink writing to the `audit` tracing target

mod audit;
mod in_memory;

pub use audit::{AuditDispatcher, AuditDispatcherConfig, ChannelEventPublisher, TracingAuditSink};
pub use in_memory::InMemoryEventBus;
