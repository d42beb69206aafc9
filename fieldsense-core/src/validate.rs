//! Submission Validation Gate
//!
//! A decoded submission passes through one pure gate before anything
//! is written: record count, sensor membership against the device's
//! registered sensors, and timestamp plausibility, checked in that
//! order.
//!
//! ## Policy
//!
//! Whether an offending record fails the whole batch or is silently
//! dropped is the caller's choice via [`ValidationPolicy`]:
//!
//! - `Strict` (the default): the first unknown sensor or implausible
//!   timestamp rejects the entire batch. Appropriate for the device
//!   ingestion path, where a bad record usually means a misconfigured
//!   or misbehaving device.
//! - `Lenient`: offending records are pruned and the rest proceed. A
//!   prune that leaves nothing reports `EmptySubmission` rather than
//!   succeeding with zero writes.
//!
//! The gate has no side effects and consults nothing but its
//! arguments; fetching the device's sensor set is the host's job.

use crate::errors::{ValidationError, ValidationResult};
use crate::ids::SensorId;
use crate::measurement::{DecodedSubmission, MeasurementRecord};
use crate::time::Timestamp;

/// How to treat individually offending records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// First offending record rejects the whole batch
    #[default]
    Strict,
    /// Offending records are dropped, the rest proceed
    Lenient,
}

/// Plausibility bounds for record timestamps, relative to receipt time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampBounds {
    /// How far in the future a timestamp may lie (ms)
    pub max_future_ms: i64,
    /// How far in the past, if bounded at all (ms)
    pub max_age_ms: Option<i64>,
}

impl Default for TimestampBounds {
    /// Five minutes of clock skew tolerance, unbounded past
    fn default() -> Self {
        Self {
            max_future_ms: 5 * 60 * 1000,
            max_age_ms: None,
        }
    }
}

impl TimestampBounds {
    /// Tight bounds for well-synchronized devices: thirty seconds of
    /// skew, one year of history
    pub fn strict() -> Self {
        Self {
            max_future_ms: 30 * 1000,
            max_age_ms: Some(365 * 24 * 60 * 60 * 1000),
        }
    }

    /// No bounds at all (backfill imports)
    pub fn unbounded() -> Self {
        Self {
            max_future_ms: i64::MAX,
            max_age_ms: None,
        }
    }

    fn check(&self, timestamp: Timestamp, received_at: Timestamp) -> ValidationResult<()> {
        if timestamp.saturating_sub(received_at) > self.max_future_ms {
            return Err(ValidationError::ImplausibleTimestamp { timestamp });
        }
        if let Some(max_age) = self.max_age_ms {
            if received_at.saturating_sub(timestamp) > max_age {
                return Err(ValidationError::ImplausibleTimestamp { timestamp });
            }
        }
        Ok(())
    }
}

/// Everything the gate needs besides the submission itself
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionRules {
    /// Batch-reject or per-record-drop
    pub policy: ValidationPolicy,
    /// Timestamp plausibility bounds
    pub bounds: TimestampBounds,
    /// Optional cap on records per submission
    pub max_records: Option<usize>,
}

/// Gate a decoded submission against the device's registered sensors
///
/// Returns the submission unchanged under `Strict`, possibly pruned
/// under `Lenient`. Checks run in order: non-empty, record cap, sensor
/// membership, timestamp bounds.
pub fn validate(
    mut submission: DecodedSubmission,
    known_sensors: &[SensorId],
    rules: &SubmissionRules,
    received_at: Timestamp,
) -> ValidationResult<DecodedSubmission> {
    if submission.is_empty() {
        return Err(ValidationError::EmptySubmission);
    }

    if let Some(max) = rules.max_records {
        if submission.len() > max {
            return Err(ValidationError::OversizedSubmission {
                count: submission.len(),
                max,
            });
        }
    }

    match rules.policy {
        ValidationPolicy::Strict => {
            for record in &submission.records {
                check_record(record, known_sensors, &rules.bounds, received_at)?;
            }
        }
        ValidationPolicy::Lenient => {
            submission
                .records
                .retain(|r| check_record(r, known_sensors, &rules.bounds, received_at).is_ok());
            if submission.is_empty() {
                return Err(ValidationError::EmptySubmission);
            }
        }
    }

    Ok(submission)
}

fn check_record(
    record: &MeasurementRecord,
    known_sensors: &[SensorId],
    bounds: &TimestampBounds,
    received_at: Timestamp,
) -> ValidationResult<()> {
    if !known_sensors.contains(&record.sensor_id) {
        return Err(ValidationError::UnknownSensor { sensor: record.sensor_id });
    }
    bounds.check(record.timestamp, received_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    const KNOWN: &str = "5d1b3cd8a6f2f1001a2b3c4d";
    const ROGUE: &str = "ffffffffffffffffffffffff";

    fn known() -> SensorId {
        KNOWN.parse().unwrap()
    }

    fn record(sensor: SensorId, timestamp: Timestamp) -> MeasurementRecord {
        MeasurementRecord { sensor_id: sensor, value: 1.0, timestamp }
    }

    fn submission(records: Vec<MeasurementRecord>) -> DecodedSubmission {
        DecodedSubmission { device: None, sensor: None, records }
    }

    #[test]
    fn empty_submission_rejected() {
        let err = validate(submission(vec![]), &[known()], &SubmissionRules::default(), 0)
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptySubmission);
    }

    #[test]
    fn strict_rejects_batch_on_unknown_sensor() {
        let rogue: SensorId = ROGUE.parse().unwrap();
        let sub = submission(vec![record(known(), 1000), record(rogue, 1000)]);

        let err = validate(sub, &[known()], &SubmissionRules::default(), 2000).unwrap_err();
        assert_eq!(err, ValidationError::UnknownSensor { sensor: rogue });
    }

    #[test]
    fn lenient_drops_unknown_sensor_record() {
        let rogue: SensorId = ROGUE.parse().unwrap();
        let sub = submission(vec![record(known(), 1000), record(rogue, 1000)]);
        let rules = SubmissionRules {
            policy: ValidationPolicy::Lenient,
            ..SubmissionRules::default()
        };

        let out = validate(sub, &[known()], &rules, 2000).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].sensor_id, known());
    }

    #[test]
    fn lenient_prune_to_empty_is_empty_submission() {
        let rogue: SensorId = ROGUE.parse().unwrap();
        let sub = submission(vec![record(rogue, 1000)]);
        let rules = SubmissionRules {
            policy: ValidationPolicy::Lenient,
            ..SubmissionRules::default()
        };

        let err = validate(sub, &[known()], &rules, 2000).unwrap_err();
        assert_eq!(err, ValidationError::EmptySubmission);
    }

    #[test]
    fn future_timestamp_beyond_tolerance_rejected() {
        let received = 1_000_000;
        let too_far = received + 5 * 60 * 1000 + 1;
        let sub = submission(vec![record(known(), too_far)]);

        let err = validate(sub, &[known()], &SubmissionRules::default(), received).unwrap_err();
        assert_eq!(err, ValidationError::ImplausibleTimestamp { timestamp: too_far });
    }

    #[test]
    fn future_timestamp_within_tolerance_accepted() {
        let received = 1_000_000;
        let sub = submission(vec![record(known(), received + 60 * 1000)]);
        assert!(validate(sub, &[known()], &SubmissionRules::default(), received).is_ok());
    }

    #[test]
    fn old_timestamp_rejected_with_retention_horizon() {
        let received: i64 = 400 * 24 * 60 * 60 * 1000;
        let sub = submission(vec![record(known(), 0)]);
        let rules = SubmissionRules {
            bounds: TimestampBounds::strict(),
            ..SubmissionRules::default()
        };

        let err = validate(sub, &[known()], &rules, received).unwrap_err();
        assert_eq!(err, ValidationError::ImplausibleTimestamp { timestamp: 0 });
    }

    #[test]
    fn old_timestamp_accepted_without_horizon() {
        let received: i64 = 400 * 24 * 60 * 60 * 1000;
        let sub = submission(vec![record(known(), 0)]);
        assert!(validate(sub, &[known()], &SubmissionRules::default(), received).is_ok());
    }

    #[test]
    fn record_cap_enforced() {
        let records: Vec<_> = (0..3).map(|i| record(known(), i)).collect();
        let rules = SubmissionRules {
            max_records: Some(2),
            ..SubmissionRules::default()
        };

        let err = validate(submission(records), &[known()], &rules, 1000).unwrap_err();
        assert_eq!(err, ValidationError::OversizedSubmission { count: 3, max: 2 });
    }
}
