// src/core/observation.rs
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::StoreStatus;

/// A single sampled reading of a store's status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    /// Store the reading belongs to
    pub store_id: String,
    /// When the reading was taken
    pub timestamp_utc: DateTime<Utc>,
    /// active / inactive
    pub status: StoreStatus,
}

impl Observation {
    /// Creates a new `Observation`.
    pub fn new(store_id: impl Into<String>, timestamp_utc: DateTime<Utc>, status: StoreStatus) -> Self {
        Self {
            store_id: store_id.into(),
            timestamp_utc,
            status,
        }
    }
}

/// A store's IANA timezone, as stored. The name is validated only when it is
/// resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimezoneAssignment {
    /// Store the assignment belongs to
    pub store_id: String,
    /// e.g. `America/Denver`
    pub timezone_name: String,
}

impl TimezoneAssignment {
    /// Creates a new `TimezoneAssignment`.
    pub fn new(store_id: impl Into<String>, timezone_name: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            timezone_name: timezone_name.into(),
        }
    }
}

/// One local open window on one weekday.
///
/// Several entries may exist for the same store and weekday (split shifts).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessHoursEntry {
    /// Store the entry belongs to
    pub store_id: String,
    /// 0..=6, numbered per the configured week start
    pub weekday: u8,
    /// Local opening time
    pub local_open: NaiveTime,
    /// Local closing time, same calendar day
    pub local_close: NaiveTime,
}

impl BusinessHoursEntry {
    /// Creates a new `BusinessHoursEntry`.
    pub fn new(store_id: impl Into<String>, weekday: u8, local_open: NaiveTime, local_close: NaiveTime) -> Self {
        Self {
            store_id: store_id.into(),
            weekday,
            local_open,
            local_close,
        }
    }

    /// Whether the entry describes a usable window: a weekday in range and a
    /// close strictly after the open. Overnight windows are not representable.
    pub fn is_valid(&self) -> bool {
        self.weekday <= 6 && self.local_close > self.local_open
    }
}

/// Parses a local time of day in `HH:MM:SS`, `HH:MM:SS.ffffff` or `HH:MM` form.
pub fn parse_local_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
