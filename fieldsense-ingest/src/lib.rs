//! Host-Side Ingestion Coordination
//!
//! ## Overview
//!
//! `fieldsense-core` is deliberately pure: it decodes bytes and judges
//! records, but it never touches a database, a clock, or a request.
//! This crate is the seam between that core and a host application:
//!
//! - [`SensorRegistry`] - who may submit what: the sensor ids (and
//!   legacy phenomenon names) registered to a device
//! - [`MeasurementSink`] - where accepted records go; fire-and-forget
//!   from the coordinator's perspective, failures are reported upward
//!   without retry
//! - [`TrustDecision`] / [`authorize`] - pass-through of the host's
//!   authentication verdict; actual key verification stays in the host
//! - [`IngestionCoordinator`] - decode → validate → append for one
//!   submission, returning the accepted record count
//!
//! ## Error Strategy
//!
//! Every failure mode is a typed [`IngestError`] variant wrapping the
//! core's decode/validation errors or the host's registry/storage
//! errors. Nothing is swallowed: a storage failure after a clean
//! decode still fails the request, because the caller's device
//! retries based on the response.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod coordinator;

pub use coordinator::IngestionCoordinator;

use thiserror::Error;

use fieldsense_core::{DecodeError, DeviceId, MeasurementRecord, SensorId, ValidationError};

/// Failure while looking up a device's registered sensors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("registry lookup failed: {0}")]
pub struct RegistryError(pub String);

/// Failure while persisting accepted records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("storage failed: {0}")]
pub struct StorageError(pub String);

/// Sensor registry of the host application
pub trait SensorRegistry {
    /// Sensor ids registered to a device
    fn sensor_ids_for_device(&self, device: &DeviceId) -> Result<Vec<SensorId>, RegistryError>;

    /// Phenomenon-name to sensor mapping for legacy integration
    /// payloads (luftdaten `value_type`s, hackAIR reading keys)
    ///
    /// Devices without legacy integrations may return an empty map.
    fn phenomenon_map(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<(String, SensorId)>, RegistryError>;
}

/// Persistence sink for accepted measurements
pub trait MeasurementSink {
    /// Append records for a device; all-or-nothing from the caller's
    /// point of view
    fn append_measurements(
        &mut self,
        device: &DeviceId,
        records: &[MeasurementRecord],
    ) -> Result<(), StorageError>;
}

/// The host authentication layer's verdict on a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    /// Submission arrived through a trusted service; no device key
    /// needed
    TrustedService,
    /// Untrusted origin; the device's API key must match
    RequiresDeviceKey {
        /// Key presented with the request, if any
        presented: Option<String>,
    },
}

/// Apply the trust verdict against the device's expected key
///
/// Pure pass-through: the host decides *whether* a key is required and
/// supplies the expected value; this only compares.
pub fn authorize(decision: &TrustDecision, expected_key: &str) -> Result<(), IngestError> {
    match decision {
        TrustDecision::TrustedService => Ok(()),
        TrustDecision::RequiresDeviceKey { presented: Some(key) } if key == expected_key => Ok(()),
        TrustDecision::RequiresDeviceKey { .. } => Err(IngestError::Unauthorized),
    }
}

/// Anything that can go wrong while ingesting one submission
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Body could not be decoded as the declared format
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Decoded records were rejected by the validation gate
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Device/sensor registry lookup failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Persisting accepted records failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Submission did not pass the trust gate
    #[error("submission not authorized")]
    Unauthorized,
}
