//! Measurement ingestion and analysis core for Fieldsense
//!
//! Turns raw device submissions (JSON, CSV, or compact binary blocks)
//! into a uniform stream of measurement records, gates them against the
//! device's registered sensors, and provides the two series transforms
//! used by analytics views: rolling median/MAD outlier detection and
//! time-gap trip segmentation.
//!
//! Everything in this crate is a pure, synchronous function over its
//! arguments. I/O, persistence, and authentication live in the host
//! (see the `fieldsense-ingest` crate).
//!
//! ```no_run
//! use fieldsense_core::{decode, WireFormat, DecodeContext};
//!
//! let ctx = DecodeContext::new(1_700_000_000_000);
//! let body = br#"{"5d1b3cd8a6f2f1001a2b3c4d": 21.4}"#;
//!
//! match decode(body, WireFormat::Json, &ctx) {
//!     Ok(submission) => {} // hand off to validation
//!     Err(e) => {}         // typed decode failure
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod decode;
pub mod errors;
pub mod ids;
pub mod measurement;
pub mod outlier;
pub mod time;
pub mod trips;
pub mod validate;

// Public API
pub use decode::{decode, decode_with_flags, DecodeContext, QueryFlags, WireFormat};
pub use errors::{DecodeError, DecodeResult, IdParseError, ValidationError, ValidationResult};
pub use ids::{DeviceId, SensorId};
pub use measurement::{DecodedSubmission, LocationFix, MeasurementRecord, SeriesPoint, Trip};
pub use outlier::detect_outliers;
pub use time::{TimeSource, Timestamp};
pub use trips::segment_trips;
pub use validate::{validate, SubmissionRules, TimestampBounds, ValidationPolicy};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
