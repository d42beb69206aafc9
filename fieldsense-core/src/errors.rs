//! Error Types for Decoding and Submission Validation
//!
//! ## Design Philosophy
//!
//! Errors here follow three rules:
//!
//! 1. **Small and Copy**: every variant carries inline data only
//!    (`&'static str` details, numeric positions, 12-byte ids), so the
//!    enums stay `Copy` and cheap to return from hot decode loops.
//!
//! 2. **Diagnosable**: decode failures carry the CSV line number or
//!    binary byte offset that triggered them. A device vendor debugging
//!    a firmware encoder gets a position, not just "malformed".
//!
//! 3. **Never swallowed**: decode and validation errors decide whether
//!    a write happens, so they always propagate to the caller as typed
//!    results. Logging them is the host's business.
//!
//! Caller contract violations (zero-sized outlier window, negative trip
//! threshold) are *not* represented here - those are programming errors
//! and the transforms `assert!` on them instead.

use thiserror_no_std::Error;

use crate::ids::SensorId;
use crate::time::Timestamp;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for submission validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failure to turn a raw submission body into measurement records
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Declared content type is missing or not one we speak
    #[error("unsupported or missing media type")]
    UnsupportedMediaType,

    /// Body does not parse as the declared format
    ///
    /// `line` is 1-based for CSV; 0 means the failure applies to the
    /// body as a whole (JSON, UTF-8).
    #[error("malformed body at line {line}: {detail}")]
    MalformedBody {
        /// 1-based CSV line, or 0 for whole-body failures
        line: u32,
        /// What was wrong with it
        detail: &'static str,
    },

    /// Binary body has a truncated or invalid fixed-size record
    #[error("malformed binary record at byte offset {offset}")]
    MalformedBinaryRecord {
        /// Byte offset of the offending record
        offset: usize,
    },

    /// A sensor id field is not a 24-digit hex identifier
    #[error("invalid sensor id at line {line}")]
    InvalidSensorId {
        /// 1-based CSV line, or 0 for JSON keys
        line: u32,
    },
}

/// Failure to accept a decoded submission for a device
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Submission decoded to zero records
    #[error("submission contains no records")]
    EmptySubmission,

    /// Submission exceeds the configured record cap
    #[error("submission has {count} records, limit is {max}")]
    OversizedSubmission {
        /// Records in the submission
        count: usize,
        /// Configured cap
        max: usize,
    },

    /// Record references a sensor the device does not carry
    #[error("unknown sensor {sensor}")]
    UnknownSensor {
        /// The unregistered sensor id
        sensor: SensorId,
    },

    /// Record timestamp is outside the plausibility bounds
    #[error("implausible timestamp {timestamp}")]
    ImplausibleTimestamp {
        /// The rejected timestamp (ms since Unix epoch)
        timestamp: Timestamp,
    },
}

/// Failure to parse a 24-hex-digit identifier
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdParseError {
    /// Identifier is not exactly 24 characters
    #[error("id must be 24 hex digits, got {length} characters")]
    InvalidLength {
        /// Actual character count
        length: usize,
    },

    /// Identifier contains a non-hex character
    #[error("non-hex character at position {position}")]
    InvalidCharacter {
        /// Zero-based character position
        position: usize,
    },
}
