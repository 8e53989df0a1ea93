// Copyright 2026 HIL Test Platform Team

//! High-resolution timestamp with source tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A nanosecond-resolution Unix timestamp tagged with the clock that
/// produced it (`"local"` unless a station or instrument supplies its own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since the Unix epoch.
    pub unix_ns: i64,
    /// Free-form tag identifying the clock source.
    pub source: String,
}

impl Timestamp {
    /// Build a timestamp for the current wall-clock time.
    pub fn now(source: impl Into<String>) -> Self {
        let dur = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            unix_ns: dur.as_nanos() as i64,
            source: source.into(),
        }
    }

    /// Build a timestamp from a `chrono` `DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>, source: impl Into<String>) -> Self {
        Self {
            unix_ns: dt.timestamp_nanos_opt().unwrap_or(0),
            source: source.into(),
        }
    }

    /// Convert to a `chrono` `DateTime<Utc>`.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.unix_seconds() as i64, (self.unix_ns % 1_000_000_000) as u32)
            .unwrap_or_default()
    }

    /// Seconds since the Unix epoch, as a float.
    pub fn unix_seconds(&self) -> f64 {
        self.unix_ns as f64 / 1_000_000_000.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn unix_ms(&self) -> i64 {
        self.unix_ns / 1_000_000
    }

    /// Microseconds since the Unix epoch.
    pub fn unix_us(&self) -> i64 {
        self.unix_ns / 1_000
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now("local")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_ms_and_us_truncate_down() {
        let ts = Timestamp { unix_ns: 1_234_567_890, source: "local".to_string() };
        assert_eq!(ts.unix_ms(), 1_234);
        assert_eq!(ts.unix_us(), 1_234_567);
    }

    #[test]
    fn now_produces_plausible_timestamp() {
        let ts = Timestamp::now("local");
        assert!(ts.unix_ns > 0);
        assert_eq!(ts.source, "local");
    }
}
