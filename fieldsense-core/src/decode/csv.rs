//! CSV submission form
//!
//! Headerless lines of `sensorId,value` or `sensorId,value,rfc3339`.
//! Fields are comma-split with no quoting or escaping - the domain
//! values are hex ids, numbers, and timestamps, none of which contain
//! commas. Blank lines and trailing `\r` are tolerated (devices with
//! CRLF line endings are common). Errors carry the 1-based line number.

use alloc::vec::Vec;

use crate::errors::{DecodeError, DecodeResult};
use crate::ids::SensorId;
use crate::measurement::MeasurementRecord;
use crate::time::parse_rfc3339;

use super::DecodeContext;

pub(crate) fn decode_csv(body: &[u8], ctx: &DecodeContext) -> DecodeResult<Vec<MeasurementRecord>> {
    let text = core::str::from_utf8(body).map_err(|_| DecodeError::MalformedBody {
        line: 0,
        detail: "body is not UTF-8",
    })?;

    let mut records = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = (index + 1) as u32;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = trimmed.split(',');

        // First field is always the sensor id; split() yields at least
        // one field for a non-empty line.
        let sensor_field = fields.next().unwrap_or("");
        let sensor_id = SensorId::parse_hex(sensor_field.trim())
            .map_err(|_| DecodeError::InvalidSensorId { line })?;

        let value_field = fields.next().ok_or(DecodeError::MalformedBody {
            line,
            detail: "missing value field",
        })?;
        let value: f64 = value_field.trim().parse().map_err(|_| DecodeError::MalformedBody {
            line,
            detail: "non-numeric value field",
        })?;
        if !value.is_finite() {
            return Err(DecodeError::MalformedBody {
                line,
                detail: "value is not a finite number",
            });
        }

        let timestamp = match fields.next() {
            Some(ts_field) => parse_rfc3339(ts_field.trim()).ok_or(DecodeError::MalformedBody {
                line,
                detail: "timestamp field is not RFC 3339",
            })?,
            None => ctx.received_at,
        };

        if fields.next().is_some() {
            return Err(DecodeError::MalformedBody {
                line,
                detail: "too many fields",
            });
        }

        records.push(MeasurementRecord { sensor_id, value, timestamp });
    }

    Ok(records)
}
