//! Wire-Format Decoding for Device Submissions
//!
//! ## Overview
//!
//! Field devices submit measurements over three wire encodings, all
//! normalized here into one [`DecodedSubmission`]:
//!
//! - **JSON** - an object mapping sensor ids to values (one shared
//!   timestamp), an array of per-record entries (optional `createdAt`),
//!   or a bare value for single-sensor endpoints.
//! - **CSV** - headerless `sensorId,value[,rfc3339]` lines.
//! - **Binary** - flat concatenation of fixed-size "compact sensor
//!   block" records, 16 bytes without or 20 bytes with a per-record
//!   timestamp.
//!
//! The encoding is a tagged [`WireFormat`] chosen by the caller from
//! the declared content type; each variant dispatches to one pure
//! decode function. Legacy integration payloads (luftdaten, hackAIR)
//! are JSON adapters layered on top, selected by [`QueryFlags`] - they
//! reshape foreign JSON, they are not wire formats of their own.
//!
//! ## Normalization
//!
//! Whatever the input shape, the output records are sorted ascending
//! by timestamp (stable sort, so equal timestamps keep submission
//! order) and every value is finite - NaN and infinity never leave the
//! decoder.

pub mod adapters;
mod binary;
mod csv;
mod json;

pub use adapters::{decode_hackair, decode_luftdaten};
pub use binary::{encode_binary, BINARY_RECORD_LEN, BINARY_RECORD_LEN_TS};

use alloc::vec::Vec;

use crate::errors::{DecodeError, DecodeResult};
use crate::ids::{DeviceId, SensorId};
use crate::measurement::{DecodedSubmission, MeasurementRecord};
use crate::time::Timestamp;

/// Supported wire encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// JSON object, array, or bare-value form
    Json,
    /// Headerless `sensorId,value[,timestamp]` lines
    Csv,
    /// Compact sensor block records
    Binary {
        /// Whether each record carries its own epoch-seconds timestamp
        /// (20-byte layout) or inherits receipt time (16-byte layout)
        per_record_time: bool,
    },
}

impl WireFormat {
    /// Map a declared content type onto a wire format
    ///
    /// `None` or an unknown type is `UnsupportedMediaType`; parameters
    /// after `;` are ignored.
    pub fn from_media_type(media_type: Option<&str>) -> DecodeResult<Self> {
        let media_type = media_type.ok_or(DecodeError::UnsupportedMediaType)?;
        let essence = media_type.split(';').next().unwrap_or("").trim();

        match essence {
            "application/json" => Ok(WireFormat::Json),
            "text/csv" => Ok(WireFormat::Csv),
            "application/x-sensor-block" => Ok(WireFormat::Binary { per_record_time: false }),
            "application/x-sensor-block-ts" => Ok(WireFormat::Binary { per_record_time: true }),
            _ => Err(DecodeError::UnsupportedMediaType),
        }
    }
}

/// Legacy integration format selectors, from request query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFlags {
    /// Body is a luftdaten-style payload
    pub luftdaten: bool,
    /// Body is a hackAIR-style payload
    pub hackair: bool,
}

/// Per-request decoding context
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    /// When the submission was received; default timestamp for records
    /// that do not carry their own
    pub received_at: Timestamp,
    /// Originating device, for whole-device submissions
    pub device: Option<DeviceId>,
    /// Fixed target sensor, for single-sensor endpoints
    pub single_sensor: Option<SensorId>,
}

impl DecodeContext {
    /// Context for a whole-device submission received at `received_at`
    pub fn new(received_at: Timestamp) -> Self {
        Self {
            received_at,
            device: None,
            single_sensor: None,
        }
    }

    /// Attach the originating device id
    pub fn for_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    /// Fix the target sensor for a single-sensor endpoint
    pub fn for_sensor(mut self, sensor: SensorId) -> Self {
        self.single_sensor = Some(sensor);
        self
    }
}

/// Decode one submission body into measurement records
pub fn decode(
    body: &[u8],
    format: WireFormat,
    ctx: &DecodeContext,
) -> DecodeResult<DecodedSubmission> {
    let records = match format {
        WireFormat::Json => json::decode_json(body, ctx)?,
        WireFormat::Csv => csv::decode_csv(body, ctx)?,
        WireFormat::Binary { per_record_time } => {
            binary::decode_binary(body, per_record_time, ctx)?
        }
    };

    Ok(finish(records, ctx))
}

/// Decode a submission, honoring legacy integration flags
///
/// When a flag selects a legacy adapter, `lookup` resolves the
/// payload's phenomenon names (e.g. `"P1"`, `"PM2.5_AirPollutantValue"`)
/// to the device's sensor ids; unmapped phenomena are skipped. Both
/// adapters are JSON-only, so a non-JSON format with a flag set is
/// `UnsupportedMediaType`.
pub fn decode_with_flags<F>(
    body: &[u8],
    format: WireFormat,
    ctx: &DecodeContext,
    flags: QueryFlags,
    lookup: F,
) -> DecodeResult<DecodedSubmission>
where
    F: Fn(&str) -> Option<SensorId>,
{
    if !flags.luftdaten && !flags.hackair {
        return decode(body, format, ctx);
    }

    if format != WireFormat::Json {
        return Err(DecodeError::UnsupportedMediaType);
    }

    let records = if flags.luftdaten {
        adapters::decode_luftdaten(body, ctx.received_at, &lookup)?
    } else {
        adapters::decode_hackair(body, ctx.received_at, &lookup)?
    };

    Ok(finish(records, ctx))
}

/// Sort records and attach the submission origin
fn finish(mut records: Vec<MeasurementRecord>, ctx: &DecodeContext) -> DecodedSubmission {
    records.sort_by_key(|r| r.timestamp);

    DecodedSubmission {
        device: ctx.device,
        sensor: ctx.single_sensor,
        records,
    }
}
