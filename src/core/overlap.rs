// src/core/overlap.rs

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::core::calendar::{OpenInterval, StoreCalendar};
use crate::core::timeline::StatusInterval;
use crate::types::StoreStatus;

/// Open-hours time spent in each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTotals {
    /// Time open while active
    pub active: Duration,
    /// Time open while inactive
    pub inactive: Duration,
}

impl Default for StatusTotals {
    fn default() -> Self {
        Self {
            active: Duration::zero(),
            inactive: Duration::zero(),
        }
    }
}

impl StatusTotals {
    /// Adds `amount` to the bucket of `status`.
    pub fn add(&mut self, status: StoreStatus, amount: Duration) {
        match status {
            StoreStatus::Active => self.active = self.active + amount,
            StoreStatus::Inactive => self.inactive = self.inactive + amount,
        }
    }

    /// The bucket of `status`.
    pub fn get(&self, status: StoreStatus) -> Duration {
        match status {
            StoreStatus::Active => self.active,
            StoreStatus::Inactive => self.inactive,
        }
    }

    /// Both buckets together.
    pub fn total(&self) -> Duration {
        self.active + self.inactive
    }
}

/// Intersects status intervals with a store's open hours.
///
/// Open intervals are computed once per local date and kept for the life of
/// the aggregator, so one aggregator can serve every window of a store.
#[derive(Debug)]
pub struct OverlapAggregator<'a> {
    calendar: &'a StoreCalendar,
    cache: BTreeMap<NaiveDate, Vec<OpenInterval>>,
}

impl<'a> OverlapAggregator<'a> {
    /// Creates an aggregator over `calendar`.
    pub fn new(calendar: &'a StoreCalendar) -> Self {
        Self {
            calendar,
            cache: BTreeMap::new(),
        }
    }

    /// Sums the open-hours overlap of `intervals` per status.
    pub fn accumulate(&mut self, intervals: &[StatusInterval]) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for interval in intervals {
            if interval.end_utc <= interval.start_utc {
                continue;
            }
            let overlap = self.open_overlap(interval);
            totals.add(interval.status, overlap);
        }
        totals
    }

    fn open_overlap(&mut self, interval: &StatusInterval) -> Duration {
        let calendar = self.calendar;
        let mut sum = Duration::zero();
        for date in calendar.local_dates(interval.start_utc, interval.end_utc) {
            let open = self
                .cache
                .entry(date)
                .or_insert_with(|| calendar.open_intervals_utc(date));
            for window in open.iter() {
                sum = sum + window.overlap(interval.start_utc, interval.end_utc);
            }
        }
        sum
    }

    /// Number of local dates with cached open intervals.
    pub fn cached_dates(&self) -> usize {
        self.cache.len()
    }
}
