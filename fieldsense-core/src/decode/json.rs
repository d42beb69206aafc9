//! JSON submission forms
//!
//! Three shapes share this decoder:
//!
//! - object form: `{"<sensorId>": 21.4, ...}` - one shared timestamp
//!   (receipt time)
//! - array form: `[{"sensor": id, "value": v, "createdAt"?: rfc3339}]`
//! - single-sensor form: a bare value, `{"value": v, "createdAt"?: ..}`,
//!   or the array form with the sensor id omitted (the route context
//!   supplies it)
//!
//! Values may be JSON numbers or numeric strings; several upstream
//! integrations quote their floats. Non-numeric or non-finite values
//! are malformed.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{DecodeError, DecodeResult};
use crate::ids::SensorId;
use crate::measurement::MeasurementRecord;
use crate::time::{parse_rfc3339, Timestamp};

use super::DecodeContext;

/// One entry of the array form
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default, alias = "sensorId")]
    sensor: Option<String>,
    value: Value,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
}

pub(crate) fn decode_json(body: &[u8], ctx: &DecodeContext) -> DecodeResult<Vec<MeasurementRecord>> {
    let root: Value = serde_json::from_slice(body).map_err(|_| DecodeError::MalformedBody {
        line: 0,
        detail: "body is not valid JSON",
    })?;

    match root {
        Value::Array(entries) => decode_entries(entries, ctx),
        Value::Object(map) => {
            // With a fixed sensor, an object is one reading; otherwise
            // it is the sensor-to-value map form.
            if ctx.single_sensor.is_some() && map.contains_key("value") {
                let entry: RawEntry =
                    serde_json::from_value(Value::Object(map)).map_err(|_| {
                        DecodeError::MalformedBody {
                            line: 0,
                            detail: "malformed single-sensor reading",
                        }
                    })?;
                Ok(Vec::from([entry_to_record(entry, ctx)?]))
            } else {
                decode_object_map(map, ctx)
            }
        }
        // Bare value for single-sensor endpoints
        Value::Number(_) | Value::String(_) if ctx.single_sensor.is_some() => {
            let sensor_id = ctx.single_sensor.ok_or(DecodeError::MalformedBody {
                line: 0,
                detail: "bare value without sensor context",
            })?;
            let value = numeric_value(&root).ok_or(DecodeError::MalformedBody {
                line: 0,
                detail: "value is not a finite number",
            })?;
            Ok(Vec::from([MeasurementRecord {
                sensor_id,
                value,
                timestamp: ctx.received_at,
            }]))
        }
        _ => Err(DecodeError::MalformedBody {
            line: 0,
            detail: "unexpected JSON shape",
        }),
    }
}

fn decode_object_map(
    map: serde_json::Map<String, Value>,
    ctx: &DecodeContext,
) -> DecodeResult<Vec<MeasurementRecord>> {
    let mut records = Vec::with_capacity(map.len());

    for (key, raw) in map {
        let sensor_id =
            SensorId::parse_hex(&key).map_err(|_| DecodeError::InvalidSensorId { line: 0 })?;
        let value = numeric_value(&raw).ok_or(DecodeError::MalformedBody {
            line: 0,
            detail: "value is not a finite number",
        })?;

        records.push(MeasurementRecord {
            sensor_id,
            value,
            timestamp: ctx.received_at,
        });
    }

    Ok(records)
}

fn decode_entries(entries: Vec<Value>, ctx: &DecodeContext) -> DecodeResult<Vec<MeasurementRecord>> {
    let mut records = Vec::with_capacity(entries.len());

    for raw in entries {
        let entry: RawEntry =
            serde_json::from_value(raw).map_err(|_| DecodeError::MalformedBody {
                line: 0,
                detail: "malformed measurement entry",
            })?;
        records.push(entry_to_record(entry, ctx)?);
    }

    Ok(records)
}

fn entry_to_record(entry: RawEntry, ctx: &DecodeContext) -> DecodeResult<MeasurementRecord> {
    let sensor_id = match entry.sensor {
        Some(ref s) => {
            SensorId::parse_hex(s).map_err(|_| DecodeError::InvalidSensorId { line: 0 })?
        }
        None => ctx.single_sensor.ok_or(DecodeError::MalformedBody {
            line: 0,
            detail: "entry missing sensor id",
        })?,
    };

    let value = numeric_value(&entry.value).ok_or(DecodeError::MalformedBody {
        line: 0,
        detail: "value is not a finite number",
    })?;

    let timestamp = match entry.created_at {
        Some(ref s) => entry_timestamp(s)?,
        None => ctx.received_at,
    };

    Ok(MeasurementRecord { sensor_id, value, timestamp })
}

fn entry_timestamp(s: &str) -> DecodeResult<Timestamp> {
    parse_rfc3339(s).ok_or(DecodeError::MalformedBody {
        line: 0,
        detail: "createdAt is not an RFC 3339 timestamp",
    })
}

/// Extract a finite f64 from a JSON number or numeric string
pub(crate) fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode, DecodeContext, WireFormat};

    const SENSOR_A: &str = "5d1b3cd8a6f2f1001a2b3c4d";
    const SENSOR_B: &str = "5d1b3cd8a6f2f1001a2b3c4e";

    fn ctx() -> DecodeContext {
        DecodeContext::new(50_000)
    }

    #[test]
    fn object_form_shares_receipt_time() {
        let body = br#"{"5d1b3cd8a6f2f1001a2b3c4d": 21.4, "5d1b3cd8a6f2f1001a2b3c4e": "7.25"}"#;
        let out = decode(body, WireFormat::Json, &ctx()).unwrap();

        assert_eq!(out.len(), 2);
        assert!(out.records.iter().all(|r| r.timestamp == 50_000));
        let a = out
            .records
            .iter()
            .find(|r| r.sensor_id == SENSOR_A.parse().unwrap())
            .unwrap();
        assert_eq!(a.value, 21.4);
        let b = out
            .records
            .iter()
            .find(|r| r.sensor_id == SENSOR_B.parse().unwrap())
            .unwrap();
        assert_eq!(b.value, 7.25);
    }

    #[test]
    fn array_form_per_entry_timestamps() {
        let body = br#"[
            {"sensor": "5d1b3cd8a6f2f1001a2b3c4d", "value": 1.0},
            {"sensorId": "5d1b3cd8a6f2f1001a2b3c4e", "value": 2.0, "createdAt": "1970-01-01T00:00:42Z"}
        ]"#;
        let out = decode(body, WireFormat::Json, &ctx()).unwrap();

        assert_eq!(out.records[0].timestamp, 42_000);
        assert_eq!(out.records[1].timestamp, 50_000);
    }

    #[test]
    fn single_sensor_bare_value() {
        let sensor = SENSOR_A.parse().unwrap();
        let out = decode(b"3.5", WireFormat::Json, &ctx().for_sensor(sensor)).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].sensor_id, sensor);
        assert_eq!(out.records[0].value, 3.5);
        assert_eq!(out.records[0].timestamp, 50_000);
    }

    #[test]
    fn single_sensor_object_with_created_at() {
        let sensor = SENSOR_A.parse().unwrap();
        let body = br#"{"value": 9.75, "createdAt": "1970-01-01T00:01:00Z"}"#;
        let out = decode(body, WireFormat::Json, &ctx().for_sensor(sensor)).unwrap();

        assert_eq!(out.records[0].value, 9.75);
        assert_eq!(out.records[0].timestamp, 60_000);
    }

    #[test]
    fn single_sensor_array_inherits_route_sensor() {
        let sensor = SENSOR_A.parse().unwrap();
        let body = br#"[{"value": 1.0}, {"value": 2.0}]"#;
        let out = decode(body, WireFormat::Json, &ctx().for_sensor(sensor)).unwrap();

        assert_eq!(out.len(), 2);
        assert!(out.records.iter().all(|r| r.sensor_id == sensor));
    }

    #[test]
    fn entry_without_sensor_needs_context() {
        let body = br#"[{"value": 1.0}]"#;
        let err = decode(body, WireFormat::Json, &ctx()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBody { line: 0, detail: "entry missing sensor id" }
        );
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = decode(b"{not json", WireFormat::Json, &ctx()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedBody { line: 0, .. }));
    }

    #[test]
    fn bad_sensor_key_rejected() {
        let body = br#"{"zz1b3cd8a6f2f1001a2b3cXX": 1.0}"#;
        let err = decode(body, WireFormat::Json, &ctx()).unwrap_err();
        assert_eq!(err, DecodeError::InvalidSensorId { line: 0 });
    }

    #[test]
    fn non_numeric_value_rejected() {
        let body = br#"{"5d1b3cd8a6f2f1001a2b3c4d": "warm"}"#;
        let err = decode(body, WireFormat::Json, &ctx()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedBody { .. }));
    }

    #[test]
    fn bad_created_at_rejected() {
        let body = br#"[{"sensor": "5d1b3cd8a6f2f1001a2b3c4d", "value": 1.0, "createdAt": "yesterday"}]"#;
        let err = decode(body, WireFormat::Json, &ctx()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBody {
                line: 0,
                detail: "createdAt is not an RFC 3339 timestamp"
            }
        );
    }
}
