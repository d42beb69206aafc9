//! Time-Gap Trip Segmentation
//!
//! Mobile devices report geolocation fixes whenever they feel like it;
//! analytics wants discrete trips. Segmentation runs in two passes:
//!
//! 1. **Split**: sort fixes by time (stable, ties keep input order)
//!    and cut wherever the gap between consecutive fixes exceeds the
//!    threshold.
//! 2. **Merge**: raw trips shorter than the threshold are not worth
//!    showing on their own - a parked device drifting in and out of
//!    GPS lock produces streams of them. Short trips accumulate in a
//!    buffer; whenever a trip meets the threshold, the pending buffer
//!    is flushed as one merged trip first, then the qualifying trip is
//!    emitted. Leftover buffer flushes at the end.
//!
//! Merged trips recompute their bounds from their points and re-sort
//! them, since merging can interleave timestamps.
//!
//! [`segment_trips`] composes both passes; the passes are also public
//! on their own, since the split output is useful for diagnostics and
//! the merge applies to any trip list.

use alloc::vec::Vec;

use crate::measurement::{LocationFix, Trip};
use crate::time::MS_PER_SECOND;

/// Split fixes into raw trips wherever the time gap exceeds the
/// threshold (seconds)
///
/// Fixes may arrive in any order; they are stable-sorted by time
/// first. A threshold of zero puts every fix in its own trip.
///
/// Panics if `time_threshold_s` is negative (caller contract).
pub fn split_into_trips(fixes: &[LocationFix], time_threshold_s: f64) -> Vec<Trip> {
    assert!(time_threshold_s >= 0.0, "trip time threshold must be non-negative");

    if fixes.is_empty() {
        return Vec::new();
    }

    let mut sorted = fixes.to_vec();
    sorted.sort_by_key(|f| f.timestamp);

    let mut trips = Vec::new();
    let mut current = Vec::new();
    current.push(sorted[0]);

    for pair in sorted.windows(2) {
        let gap_s = (pair[1].timestamp - pair[0].timestamp) as f64 / MS_PER_SECOND as f64;
        if gap_s > time_threshold_s {
            trips.push(Trip::from_points(core::mem::take(&mut current)));
        }
        current.push(pair[1]);
    }
    trips.push(Trip::from_points(current));

    trips
}

/// Fold trips shorter than the threshold (seconds) into merged trips
///
/// Consecutive short trips accumulate; a qualifying trip first flushes
/// the accumulated buffer as one merged trip, then passes through
/// itself. Whatever is left in the buffer flushes at the end. Output
/// stays in time order.
pub fn merge_short_trips(trips: Vec<Trip>, time_threshold_s: f64) -> Vec<Trip> {
    let mut merged = Vec::with_capacity(trips.len());
    let mut pending: Vec<LocationFix> = Vec::new();

    for trip in trips {
        if trip.duration_s() < time_threshold_s {
            pending.extend_from_slice(&trip.points);
        } else {
            if !pending.is_empty() {
                merged.push(Trip::from_points(core::mem::take(&mut pending)));
            }
            merged.push(trip);
        }
    }

    if !pending.is_empty() {
        merged.push(Trip::from_points(pending));
    }

    merged
}

/// Partition fixes into trips: split on time gaps, then merge the
/// too-short ones
///
/// Zero or one input fix yields zero or one trip, skipping the merge
/// pass entirely.
pub fn segment_trips(fixes: &[LocationFix], time_threshold_s: f64) -> Vec<Trip> {
    let raw = split_into_trips(fixes, time_threshold_s);
    if fixes.len() <= 1 {
        return raw;
    }

    merge_short_trips(raw, time_threshold_s)
}
