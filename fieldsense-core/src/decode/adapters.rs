//! Legacy integration format adapters
//!
//! Two external air-quality networks push measurements in their own
//! JSON shapes. Both are adapters over the JSON machinery: reshape the
//! foreign payload, resolve phenomenon names to the device's sensor
//! ids through a caller-supplied lookup, and produce the same records
//! every other decoder produces.
//!
//! A payload reports every channel the external station has; phenomena
//! the lookup cannot map belong to sensors the device does not carry
//! and are skipped. Records for *mapped* sensors still go through the
//! submission validator like any other submission.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{DecodeError, DecodeResult};
use crate::ids::SensorId;
use crate::measurement::MeasurementRecord;
use crate::time::Timestamp;

use super::json::numeric_value;

/// luftdaten-style payload:
/// `{"sensordatavalues": [{"value_type": "P1", "value": "12.5"}, ...]}`
#[derive(Deserialize)]
struct LuftdatenBody {
    sensordatavalues: Vec<LuftdatenValue>,
}

#[derive(Deserialize)]
struct LuftdatenValue {
    value_type: String,
    value: Value,
}

/// Decode a luftdaten payload
///
/// `lookup` maps `value_type` names (`"P1"`, `"P2"`, `"temperature"`,
/// ...) to the device's sensor ids. All records share receipt time;
/// the payload carries no usable per-value timestamps.
pub fn decode_luftdaten<F>(
    body: &[u8],
    received_at: Timestamp,
    lookup: F,
) -> DecodeResult<Vec<MeasurementRecord>>
where
    F: Fn(&str) -> Option<SensorId>,
{
    let parsed: LuftdatenBody =
        serde_json::from_slice(body).map_err(|_| DecodeError::MalformedBody {
            line: 0,
            detail: "body is not a luftdaten payload",
        })?;

    let mut records = Vec::with_capacity(parsed.sensordatavalues.len());

    for entry in &parsed.sensordatavalues {
        let Some(sensor_id) = lookup(&entry.value_type) else {
            continue;
        };
        let value = numeric_value(&entry.value).ok_or(DecodeError::MalformedBody {
            line: 0,
            detail: "luftdaten value is not a finite number",
        })?;

        records.push(MeasurementRecord { sensor_id, value, timestamp: received_at });
    }

    Ok(records)
}

/// hackAIR-style payload:
/// `{"reading": {"PM2.5_AirPollutantValue": "14", "PM10_AirPollutantValue": "25"}}`
#[derive(Deserialize)]
struct HackairBody {
    reading: serde_json::Map<String, Value>,
}

/// Decode a hackAIR payload
///
/// `lookup` maps the reading keys (`"PM2.5_AirPollutantValue"`, ...)
/// to the device's sensor ids.
pub fn decode_hackair<F>(
    body: &[u8],
    received_at: Timestamp,
    lookup: F,
) -> DecodeResult<Vec<MeasurementRecord>>
where
    F: Fn(&str) -> Option<SensorId>,
{
    let parsed: HackairBody =
        serde_json::from_slice(body).map_err(|_| DecodeError::MalformedBody {
            line: 0,
            detail: "body is not a hackAIR payload",
        })?;

    let mut records = Vec::with_capacity(parsed.reading.len());

    for (phenomenon, raw) in &parsed.reading {
        let Some(sensor_id) = lookup(phenomenon) else {
            continue;
        };
        let value = numeric_value(raw).ok_or(DecodeError::MalformedBody {
            line: 0,
            detail: "hackAIR value is not a finite number",
        })?;

        records.push(MeasurementRecord { sensor_id, value, timestamp: received_at });
    }

    Ok(records)
}
