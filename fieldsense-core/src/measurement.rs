//! Core Data Model for Measurements, Series, and Trips
//!
//! ## Ownership
//!
//! Every type here is plain owned data. A [`DecodedSubmission`] is
//! owned by the request that produced it, a [`Trip`] owns its points
//! by value - nothing aliases back into decoder input or shares
//! mutable state across calls.
//!
//! ## Invariants
//!
//! - [`MeasurementRecord::value`] is always finite; the decoders
//!   reject NaN/infinity before a record is constructed.
//! - [`DecodedSubmission::records`] is sorted ascending by timestamp
//!   (stable, so equal timestamps keep submission order).
//! - [`Trip::points`] is non-empty and time-ordered, with `start` and
//!   `end` derived from the first and last point.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::ids::{DeviceId, SensorId};
use crate::time::{Timestamp, MS_PER_SECOND};

/// One decoded sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Sensor channel this reading belongs to
    pub sensor_id: SensorId,
    /// Reading value; always finite
    pub value: f64,
    /// When the reading was taken (ms since Unix epoch)
    pub timestamp: Timestamp,
}

/// Decoder output: the records of one submission plus its origin
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSubmission {
    /// Originating device, for whole-device submissions
    pub device: Option<DeviceId>,
    /// Target sensor, for single-sensor submissions
    pub sensor: Option<SensorId>,
    /// Decoded records, sorted ascending by timestamp
    pub records: Vec<MeasurementRecord>,
}

impl DecodedSubmission {
    /// Number of decoded records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the submission decoded to zero records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One point of a stored sensor series, as read back for analytics
///
/// `value` is `None` for null readings in storage; those pass through
/// the outlier transform untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// When the reading was taken
    pub timestamp: Timestamp,
    /// Stored value, or `None` for a null reading
    pub value: Option<f64>,
    /// Set by the outlier transform
    #[serde(default)]
    pub outlier: bool,
}

impl SeriesPoint {
    /// Non-null point without an outlier flag
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self {
            timestamp,
            value: Some(value),
            outlier: false,
        }
    }

    /// Null point (reading missing in storage)
    pub fn null(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            value: None,
            outlier: false,
        }
    }
}

/// One geolocation fix from a mobile device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Longitude or projected x coordinate
    pub x: f64,
    /// Latitude or projected y coordinate
    pub y: f64,
    /// When the fix was taken
    pub timestamp: Timestamp,
}

/// A contiguous run of fixes separated from its neighbors by idle time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Time-ordered fixes, non-empty
    pub points: Vec<LocationFix>,
    /// Timestamp of the first point
    pub start: Timestamp,
    /// Timestamp of the last point
    pub end: Timestamp,
}

impl Trip {
    /// Build a trip from its points, sorting them by time
    ///
    /// Panics if `points` is empty; the segmenter never closes an
    /// empty trip.
    pub(crate) fn from_points(mut points: Vec<LocationFix>) -> Self {
        debug_assert!(!points.is_empty(), "trip must have at least one point");
        points.sort_by_key(|p| p.timestamp);
        let start = points[0].timestamp;
        let end = points[points.len() - 1].timestamp;
        Self { points, start, end }
    }

    /// Trip duration in seconds
    pub fn duration_s(&self) -> f64 {
        (self.end - self.start) as f64 / MS_PER_SECOND as f64
    }
}
