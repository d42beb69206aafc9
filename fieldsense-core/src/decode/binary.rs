//! Compact sensor block - the binary submission form
//!
//! Low-bandwidth devices submit a flat concatenation of fixed-size
//! records, with no header, length prefix, or framing:
//!
//! ```text
//! 16-byte record (receipt time applies):
//! ┌──────────────┬───────────┐
//! │ sensor id    │ value     │
//! │ 12 raw bytes │ f32 LE    │
//! └──────────────┴───────────┘
//!
//! 20-byte record (per-record time):
//! ┌──────────────┬───────────┬──────────────┐
//! │ sensor id    │ value     │ timestamp    │
//! │ 12 raw bytes │ f32 LE    │ u32 LE, secs │
//! └──────────────┴───────────┴──────────────┘
//! ```
//!
//! The id bytes are the hex-decoded form of the 24-character sensor id;
//! whether the id actually belongs to the device is the validator's
//! call, jointly with the registry. A body whose length is not an exact
//! multiple of the record size is malformed, as is a non-finite value.

use alloc::vec::Vec;

use crate::errors::{DecodeError, DecodeResult};
use crate::ids::SensorId;
use crate::measurement::MeasurementRecord;
use crate::time::MS_PER_SECOND;

use super::DecodeContext;

/// Record size without a per-record timestamp
pub const BINARY_RECORD_LEN: usize = 16;

/// Record size with a per-record timestamp
pub const BINARY_RECORD_LEN_TS: usize = 20;

pub(crate) fn decode_binary(
    body: &[u8],
    per_record_time: bool,
    ctx: &DecodeContext,
) -> DecodeResult<Vec<MeasurementRecord>> {
    let record_len = if per_record_time { BINARY_RECORD_LEN_TS } else { BINARY_RECORD_LEN };

    let remainder = body.len() % record_len;
    if remainder != 0 {
        // Offset of the truncated trailing record
        return Err(DecodeError::MalformedBinaryRecord {
            offset: body.len() - remainder,
        });
    }

    let mut records = Vec::with_capacity(body.len() / record_len);

    for (index, chunk) in body.chunks_exact(record_len).enumerate() {
        let offset = index * record_len;

        let mut id_bytes = [0u8; 12];
        id_bytes.copy_from_slice(&chunk[..12]);
        let sensor_id = SensorId::from_bytes(id_bytes);

        let value =
            f32::from_le_bytes([chunk[12], chunk[13], chunk[14], chunk[15]]) as f64;
        if !value.is_finite() {
            return Err(DecodeError::MalformedBinaryRecord { offset });
        }

        let timestamp = if per_record_time {
            let secs = u32::from_le_bytes([chunk[16], chunk[17], chunk[18], chunk[19]]);
            secs as i64 * MS_PER_SECOND
        } else {
            ctx.received_at
        };

        records.push(MeasurementRecord { sensor_id, value, timestamp });
    }

    Ok(records)
}

/// Encode records into the compact sensor block layout
///
/// The inverse of the binary decoder, used for test fixtures and by
/// device-side tooling. Values are narrowed to f32; timestamps are
/// truncated to whole epoch seconds when `per_record_time` is set and
/// dropped otherwise.
pub fn encode_binary(records: &[MeasurementRecord], per_record_time: bool) -> Vec<u8> {
    let record_len = if per_record_time { BINARY_RECORD_LEN_TS } else { BINARY_RECORD_LEN };
    let mut out = Vec::with_capacity(records.len() * record_len);

    for record in records {
        out.extend_from_slice(record.sensor_id.as_bytes());
        out.extend_from_slice(&(record.value as f32).to_le_bytes());
        if per_record_time {
            let secs = (record.timestamp / MS_PER_SECOND) as u32;
            out.extend_from_slice(&secs.to_le_bytes());
        }
    }

    out
}
