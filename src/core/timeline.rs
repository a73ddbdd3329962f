// src/core/timeline.rs

//! Turns sparse status readings into a gap-free timeline.
//!
//! A window's timeline starts at the window start and ends at the window end.
//! Missing boundary readings are synthesized ("padding"): the start takes the
//! status carried in from before the window, and the end repeats the last
//! status seen.

use chrono::{DateTime, Utc};

use crate::core::observation::Observation;
use crate::types::StoreStatus;

/// A contiguous span of one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInterval {
    /// Store the span belongs to
    pub store_id: String,
    /// Inclusive start
    pub start_utc: DateTime<Utc>,
    /// Exclusive end, except for the last span of a window
    pub end_utc: DateTime<Utc>,
    /// Status held during the span
    pub status: StoreStatus,
}

/// Builds the status timeline of `store_id` over `[window_start, window_end]`.
///
/// `observations` may contain other stores and readings outside the window;
/// readings before the window are only used to find the carry-in status.
/// Returns an empty vector for a degenerate window (`window_start >= window_end`).
pub fn build_timeline(
    store_id: &str,
    observations: &[Observation],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    default_status: StoreStatus,
) -> Vec<StatusInterval> {
    if window_start >= window_end {
        return Vec::new();
    }

    let own = observations.iter().filter(|o| o.store_id == store_id);

    let mut in_window: Vec<&Observation> = Vec::new();
    let mut carry_in: Option<&Observation> = None;
    for obs in own {
        if obs.timestamp_utc < window_start {
            // `>=` keeps the later input row on equal timestamps
            if carry_in.map_or(true, |c| obs.timestamp_utc >= c.timestamp_utc) {
                carry_in = Some(obs);
            }
        } else if obs.timestamp_utc <= window_end {
            in_window.push(obs);
        }
    }

    // Stable: equal timestamps stay in input order
    in_window.sort_by_key(|o| o.timestamp_utc);

    let mut points: Vec<(DateTime<Utc>, StoreStatus)> = Vec::with_capacity(in_window.len() + 2);
    for obs in in_window {
        match points.last_mut() {
            Some(last) if last.0 == obs.timestamp_utc => last.1 = obs.status,
            _ => points.push((obs.timestamp_utc, obs.status)),
        }
    }

    let carried = carry_in.map(|c| c.status);

    let Some(&(first_ts, first_status)) = points.first() else {
        let status = carried.unwrap_or(default_status);
        return vec![interval(store_id, window_start, window_end, status)];
    };

    if first_ts > window_start {
        points.insert(0, (window_start, carried.unwrap_or(first_status)));
    }

    let mut timeline = Vec::with_capacity(points.len());
    for (i, &(start, status)) in points.iter().enumerate() {
        let end = points.get(i + 1).map_or(window_end, |next| next.0);
        if end > start {
            timeline.push(interval(store_id, start, end, status));
        }
    }

    timeline
}

fn interval(store_id: &str, start: DateTime<Utc>, end: DateTime<Utc>, status: StoreStatus) -> StatusInterval {
    StatusInterval {
        store_id: store_id.to_string(),
        start_utc: start,
        end_utc: end,
        status,
    }
}
