// src/core/report.rs

//! Per-store window reports.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::calendar::StoreCalendar;
use crate::core::observation::Observation;
use crate::core::overlap::{OverlapAggregator, StatusTotals};
use crate::core::timeline::build_timeline;
use crate::time::window::ReportWindow;
use crate::types::StoreStatus;

/// Uptime and downtime of one store over the three trailing windows.
///
/// Hour-window values are whole minutes; day and week values are hours
/// rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Store the row describes
    pub store_id: String,
    /// Minutes open and active in the last hour
    pub uptime_last_hour: i64,
    /// Hours open and active in the last day
    pub uptime_last_day: f64,
    /// Hours open and active in the last week
    pub uptime_last_week: f64,
    /// Minutes open and inactive in the last hour
    pub downtime_last_hour: i64,
    /// Hours open and inactive in the last day
    pub downtime_last_day: f64,
    /// Hours open and inactive in the last week
    pub downtime_last_week: f64,
}

/// Unrounded totals of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowReport {
    /// Which window
    pub window: ReportWindow,
    /// Window start
    pub start_utc: DateTime<Utc>,
    /// Window end (`now`)
    pub end_utc: DateTime<Utc>,
    /// Open time per status
    pub totals: StatusTotals,
}

/// Computes the exact totals of every [`ReportWindow`] for one store.
///
/// `observations` should cover the widest window plus the latest reading
/// before it; narrower windows reuse the same readings.
pub fn compute_windows(
    store_id: &str,
    observations: &[Observation],
    calendar: &StoreCalendar,
    now_utc: DateTime<Utc>,
    default_status: StoreStatus,
) -> [WindowReport; 3] {
    let mut aggregator = OverlapAggregator::new(calendar);
    ReportWindow::ALL.map(|window| {
        let (start_utc, end_utc) = window.bounds(now_utc);
        let timeline = build_timeline(store_id, observations, start_utc, end_utc, default_status);
        WindowReport {
            window,
            start_utc,
            end_utc,
            totals: aggregator.accumulate(&timeline),
        }
    })
}

/// Builds the output row of one store.
pub fn report_for_store(
    store_id: &str,
    observations: &[Observation],
    calendar: &StoreCalendar,
    now_utc: DateTime<Utc>,
    default_status: StoreStatus,
) -> ReportRow {
    let [hour, day, week] = compute_windows(store_id, observations, calendar, now_utc, default_status);
    ReportRow {
        store_id: store_id.to_string(),
        uptime_last_hour: to_whole_minutes(hour.totals.active),
        uptime_last_day: to_hours_2dp(day.totals.active),
        uptime_last_week: to_hours_2dp(week.totals.active),
        downtime_last_hour: to_whole_minutes(hour.totals.inactive),
        downtime_last_day: to_hours_2dp(day.totals.inactive),
        downtime_last_week: to_hours_2dp(week.totals.inactive),
    }
}

/// Whole minutes, halves rounded away from zero.
pub fn to_whole_minutes(duration: Duration) -> i64 {
    (duration.num_milliseconds() as f64 / 60_000.0).round() as i64
}

/// Hours rounded to two decimal places.
pub fn to_hours_2dp(duration: Duration) -> f64 {
    let hours = duration.num_milliseconds() as f64 / 3_600_000.0;
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{daily_hours, hm};
    use crate::types::WeekStart;
    use chrono::TimeZone;

    #[test]
    fn test_rounding() {
        assert_eq!(to_whole_minutes(Duration::seconds(90)), 2);
        assert_eq!(to_whole_minutes(Duration::seconds(89)), 1);
        assert_eq!(to_whole_minutes(Duration::zero()), 0);
        assert_eq!(to_hours_2dp(Duration::minutes(20)), 0.33);
        assert_eq!(to_hours_2dp(Duration::minutes(45)), 0.75);
        assert_eq!(to_hours_2dp(Duration::hours(6)), 6.0);
    }

    #[test]
    fn test_day_window_scenario_in_fixed_offset_zone() {
        // Etc/GMT+5 is UTC-5 all year. Local midnight of Jan 16 is 05:00Z.
        let calendar = StoreCalendar::from_entries(
            "s1",
            chrono_tz::Etc::GMTPlus5,
            WeekStart::Sunday,
            &daily_hours("s1", hm(9, 0), hm(17, 0)),
        );
        let now = Utc.with_ymd_and_hms(2024, 1, 16, 5, 0, 0).unwrap();
        let data = vec![
            Observation::new("s1", Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(), StoreStatus::Active),
            Observation::new("s1", Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap(), StoreStatus::Inactive),
        ];

        let [_, day, _] = compute_windows("s1", &data, &calendar, now, StoreStatus::Active);
        assert_eq!(day.totals.active, Duration::hours(6));
        assert_eq!(day.totals.inactive, Duration::hours(2));

        let row = report_for_store("s1", &data, &calendar, now, StoreStatus::Active);
        assert_eq!(row.uptime_last_day, 6.0);
        assert_eq!(row.downtime_last_day, 2.0);
        // Store is closed during the last hour
        assert_eq!(row.uptime_last_hour, 0);
        assert_eq!(row.downtime_last_hour, 0);
    }

    #[test]
    fn test_never_observed_store_is_up_whenever_open() {
        let calendar = StoreCalendar::from_entries(
            "s1",
            chrono_tz::UTC,
            WeekStart::Sunday,
            &daily_hours("s1", hm(9, 0), hm(17, 0)),
        );
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let row = report_for_store("s1", &[], &calendar, now, StoreStatus::Active);
        assert_eq!(row.uptime_last_hour, 60);
        assert_eq!(row.uptime_last_day, 8.0);
        assert_eq!(row.uptime_last_week, 56.0);
        assert_eq!(row.downtime_last_week, 0.0);
    }

    #[test]
    fn test_single_inactive_reading_makes_window_inactive() {
        let calendar = StoreCalendar::always_open("s1", chrono_tz::UTC);
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let data = vec![Observation::new(
            "s1",
            Utc.with_ymd_and_hms(2024, 1, 15, 11, 30, 0).unwrap(),
            StoreStatus::Inactive,
        )];
        let row = report_for_store("s1", &data, &calendar, now, StoreStatus::Active);
        assert_eq!(row.downtime_last_hour, 60);
        assert_eq!(row.uptime_last_hour, 0);
        assert_eq!(row.downtime_last_week, 168.0);
    }

    #[test]
    fn test_windows_are_monotonic_for_constant_status() {
        let calendar = StoreCalendar::always_open("s1", chrono_tz::America::Chicago);
        let now = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        let windows = compute_windows("s1", &[], &calendar, now, StoreStatus::Active);
        assert!(windows[0].totals.active <= windows[1].totals.active);
        assert!(windows[1].totals.active <= windows[2].totals.active);
        // 24/7 spans DST: open time still equals wall-clock length
        assert_eq!(windows[2].totals.active, Duration::days(7));
    }
}
