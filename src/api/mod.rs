// src/api/mod.rs

/// Async trigger/poll job interface for report runs.
pub mod async_api;
/// Blocking wrapper for callers without a runtime.
pub mod sync_api;

pub use async_api::{ReportService, ReportStatus};
pub use sync_api::UptimeReporter;
