//! The decode → validate → persist orchestration for one submission

use log::{debug, warn};

use fieldsense_core::{
    decode, decode_with_flags, validate, DecodeContext, DecodedSubmission, DeviceId, QueryFlags,
    SensorId, SubmissionRules, TimeSource, Timestamp, WireFormat,
};

use crate::{IngestError, MeasurementSink, SensorRegistry};

/// Runs the ingestion pipeline against the host's registry, sink, and
/// clock
///
/// The coordinator owns no policy of its own: submission rules are
/// configured at construction, receipt time comes from the injected
/// clock, and everything else is a pure core call.
pub struct IngestionCoordinator<R, S, C> {
    registry: R,
    sink: S,
    clock: C,
    rules: SubmissionRules,
}

impl<R, S, C> IngestionCoordinator<R, S, C>
where
    R: SensorRegistry,
    S: MeasurementSink,
    C: TimeSource,
{
    /// Coordinator with default submission rules (strict policy,
    /// five-minute future tolerance)
    pub fn new(registry: R, sink: S, clock: C) -> Self {
        Self {
            registry,
            sink,
            clock,
            rules: SubmissionRules::default(),
        }
    }

    /// Override the submission rules
    pub fn with_rules(mut self, rules: SubmissionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Ingest a whole-device submission
    ///
    /// Decodes `body` as `format` (dispatching legacy adapters when
    /// `flags` ask for them), validates against the device's
    /// registered sensors, and appends the accepted records. Returns
    /// how many records were written.
    pub fn ingest_device_batch(
        &mut self,
        device: &DeviceId,
        body: &[u8],
        format: WireFormat,
        flags: QueryFlags,
    ) -> Result<usize, IngestError> {
        let known = self.registry.sensor_ids_for_device(device)?;
        let received_at = self.clock.now();
        let ctx = DecodeContext::new(received_at).for_device(*device);

        let decoded = if flags.luftdaten || flags.hackair {
            let phenomena = self.registry.phenomenon_map(device)?;
            decode_with_flags(body, format, &ctx, flags, |name| {
                phenomena
                    .iter()
                    .find(|(phenomenon, _)| phenomenon == name)
                    .map(|&(_, sensor)| sensor)
            })
        } else {
            decode(body, format, &ctx)
        }
        .inspect_err(|e| warn!("device {device}: decode rejected: {e}"))?;

        self.accept(device, decoded, &known, received_at)
    }

    /// Ingest a single-sensor submission
    ///
    /// The route context fixes the target sensor; records without an
    /// explicit sensor id inherit it.
    pub fn ingest_single_sensor(
        &mut self,
        device: &DeviceId,
        sensor: SensorId,
        body: &[u8],
        format: WireFormat,
    ) -> Result<usize, IngestError> {
        let known = self.registry.sensor_ids_for_device(device)?;
        let received_at = self.clock.now();
        let ctx = DecodeContext::new(received_at)
            .for_device(*device)
            .for_sensor(sensor);

        let decoded = decode(body, format, &ctx)
            .inspect_err(|e| warn!("device {device}: decode rejected: {e}"))?;

        self.accept(device, decoded, &known, received_at)
    }

    fn accept(
        &mut self,
        device: &DeviceId,
        decoded: DecodedSubmission,
        known: &[SensorId],
        received_at: Timestamp,
    ) -> Result<usize, IngestError> {
        let accepted = validate(decoded, known, &self.rules, received_at)
            .inspect_err(|e| warn!("device {device}: submission rejected: {e}"))?;

        self.sink
            .append_measurements(device, &accepted.records)
            .inspect_err(|e| warn!("device {device}: {e}"))?;

        debug!("device {device}: accepted {} records", accepted.len());
        Ok(accepted.len())
    }
}
