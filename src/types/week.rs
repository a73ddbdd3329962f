use chrono::Weekday;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which weekday the business-hours data numbers as `0`.
///
/// The source datasets count from Sunday; Monday-based exports exist too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// 0 = Sunday, 6 = Saturday
    Sunday,
    /// 0 = Monday, 6 = Sunday
    Monday,
}

impl WeekStart {
    /// Numeric day of `weekday` under this numbering (0..=6).
    pub fn day_number(&self, weekday: Weekday) -> u8 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as u8,
            WeekStart::Monday => weekday.num_days_from_monday() as u8,
        }
    }
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Sunday
    }
}
