//! Time handling for submission processing
//!
//! Timestamps are milliseconds since the Unix epoch, UTC. Devices
//! submit either no timestamp (receipt time applies), RFC 3339 text
//! (CSV/JSON), or epoch seconds (binary records); everything is
//! normalized to `Timestamp` at decode time.
//!
//! The clock itself is abstracted behind [`TimeSource`] so the
//! ingestion host can inject wall-clock time in production and a fixed
//! clock in tests.

/// Milliseconds since the Unix epoch, UTC
pub type Timestamp = i64;

/// Milliseconds per second, for gap and rate arithmetic
pub const MS_PER_SECOND: i64 = 1000;

/// Source of the current time
pub trait TimeSource {
    /// Current timestamp in milliseconds since the Unix epoch
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    /// Clock frozen at the given timestamp
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to a new timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&mut self, ms: i64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Parse an RFC 3339 timestamp into epoch milliseconds
///
/// Accepts any offset; the result is UTC. Returns `None` for anything
/// chrono cannot parse.
pub fn parse_rfc3339(s: &str) -> Option<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_utc() {
        assert_eq!(parse_rfc3339("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(parse_rfc3339("2023-11-14T22:13:20Z"), Some(1_700_000_000_000));
    }

    #[test]
    fn rfc3339_offset_normalized() {
        // +02:00 is two hours behind the same wall time in UTC
        assert_eq!(parse_rfc3339("1970-01-01T02:00:00+02:00"), Some(0));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_rfc3339("not-a-date"), None);
        assert_eq!(parse_rfc3339(""), None);
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(1000);
        assert_eq!(clock.now(), 1000);
        clock.advance(500);
        assert_eq!(clock.now(), 1500);
    }
}
