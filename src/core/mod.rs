// src/core/mod.rs

/// Business-hours calendars and their UTC open intervals.
pub mod calendar;
/// Input records: observations, timezone assignments, business-hours rows.
pub mod observation;
/// Intersection of status timelines with open hours.
pub mod overlap;
/// Per-store window reports and output rounding.
pub mod report;
/// Gap-free status timelines built from sparse readings.
pub mod timeline;

pub use calendar::{CalendarBook, OpenInterval, StoreCalendar};
pub use observation::{parse_local_time, BusinessHoursEntry, Observation, TimezoneAssignment};
pub use overlap::{OverlapAggregator, StatusTotals};
pub use report::{compute_windows, report_for_store, ReportRow, WindowReport};
pub use timeline::{build_timeline, StatusInterval};

use chrono_tz::Tz;

use crate::types::{StoreStatus, WeekStart};

/// Fallbacks the engine applies when a store's data is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineDefaults {
    /// Timezone of stores without a valid assignment
    pub timezone: Tz,
    /// Status of stores that were never observed
    pub status: StoreStatus,
    /// How business-hours weekdays are numbered
    pub week_start: WeekStart,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Chicago,
            status: StoreStatus::Active,
            week_start: WeekStart::Sunday,
        }
    }
}
