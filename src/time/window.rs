// src/time/window.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// The trailing reporting windows, each ending at the dataset's latest
/// observation timestamp.
pub enum ReportWindow {
    /// `[now - 1h, now]`
    LastHour,
    /// `[now - 1d, now]`
    LastDay,
    /// `[now - 7d, now]`
    LastWeek,
}

impl ReportWindow {
    /// All windows, narrowest first.
    pub const ALL: [ReportWindow; 3] = [ReportWindow::LastHour, ReportWindow::LastDay, ReportWindow::LastWeek];

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        match self {
            ReportWindow::LastHour => Duration::hours(1),
            ReportWindow::LastDay => Duration::days(1),
            ReportWindow::LastWeek => Duration::days(7),
        }
    }

    /// `(start, end)` of the window ending at `now_utc`.
    pub fn bounds(&self, now_utc: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now_utc - self.duration(), now_utc)
    }

    /// The widest window, which bounds every fetch.
    pub fn widest() -> ReportWindow {
        ReportWindow::LastWeek
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_bounds() {
        let now = Utc.with_ymd_and_hms(2023, 1, 25, 18, 13, 22).unwrap();
        let (start, end) = ReportWindow::LastDay.bounds(now);
        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 1, 24, 18, 13, 22).unwrap());
        assert_eq!(ReportWindow::LastWeek.bounds(now).0, Utc.with_ymd_and_hms(2023, 1, 18, 18, 13, 22).unwrap());
    }

    #[test]
    fn test_windows_nest() {
        for pair in ReportWindow::ALL.windows(2) {
            assert!(pair[0].duration() < pair[1].duration());
        }
        assert_eq!(ReportWindow::widest(), ReportWindow::ALL[2]);
    }

    #[test]
    fn test_names() {
        assert_eq!(ReportWindow::LastHour.to_string(), "last_hour");
        assert_eq!(ReportWindow::from_str("last_week").unwrap(), ReportWindow::LastWeek);
    }
}
