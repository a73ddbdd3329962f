// src/time/mod.rs

/// Reporting windows (last hour, day, week) and their bounds.
pub mod window;
/// Store timezone resolution and local-to-UTC conversion.
pub mod zone;

pub use window::ReportWindow;
pub use zone::{local_to_utc, parse_timezone, TimezoneResolver};
