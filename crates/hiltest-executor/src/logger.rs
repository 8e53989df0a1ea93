// Copyright 2026 HIL Test Platform Team

//! Logger sink interface: the persistence side that records every data
//! frame a run observes, independent of the monitor's pass/fail evaluation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use hiltest_core::{StreamData, StreamSchema};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};

/// Recognised and free-form tags describing a logging session.
///
/// `test_type` is conventionally one of `functional`, `hass`, `halt`, but
/// is not validated here — unknown tags (including an unrecognised
/// `test_type`) are preserved verbatim rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogTags {
    /// Unique id for this run.
    pub test_run_id: String,
    /// The test case this run executes.
    #[serde(default)]
    pub test_case_id: String,
    /// Conventionally `functional` | `hass` | `halt`.
    #[serde(default)]
    pub test_type: String,
    /// Which test rack this run is on.
    #[serde(default)]
    pub rack_id: String,
    /// Serial number of the device under test.
    #[serde(default)]
    pub dut_serial: String,
    /// Any tags outside the recognised set, preserved as-is.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// Persists logical channels of telemetry for a run.
///
/// Implementations own their own storage (file, database, remote
/// service); this crate only depends on the interface so the executor can
/// supervise it without knowing the backing technology.
#[async_trait]
pub trait LoggerSink: Send + Sync {
    /// Declare a logical channel's schema, so that later `log` calls can
    /// be validated against it.
    async fn register_schema(&self, topic: &str, schema: StreamSchema) -> Result<()>;

    /// Begin a logging session with the given tags.
    async fn start(&self, tags: LogTags) -> Result<()>;

    /// Append a batch of samples to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownTopic`] if `topic` was never
    /// registered, or [`crate::Error::SchemaMismatch`] if `data`'s schema
    /// id does not match the topic's registered schema.
    async fn log(&self, topic: &str, data: StreamData) -> Result<()>;

    /// Flush buffered records and release resources.
    async fn stop(&self) -> Result<()>;

    /// True while a session is active.
    async fn is_running(&self) -> bool;
}

/// An in-process [`LoggerSink`] that retains every logged batch in memory.
///
/// Useful for tests and for short-lived functional runs where durable
/// storage is unnecessary; schema registrations and logged batches are
/// module-local to one instance, never shared process-wide state.
#[derive(Default)]
pub struct InMemoryLogger {
    running: AtomicBool,
    schemas: Mutex<HashMap<String, StreamSchema>>,
    tags: Mutex<Option<LogTags>>,
    batches: Mutex<Vec<(String, StreamData)>>,
}

impl InMemoryLogger {
    /// Build an empty, stopped logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches logged so far, in arrival order, as `(topic, data)` pairs.
    pub async fn batches(&self) -> Vec<(String, StreamData)> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl LoggerSink for InMemoryLogger {
    async fn register_schema(&self, topic: &str, schema: StreamSchema) -> Result<()> {
        self.schemas.lock().await.insert(topic.to_string(), schema);
        Ok(())
    }

    async fn start(&self, tags: LogTags) -> Result<()> {
        *self.tags.lock().await = Some(tags);
        self.batches.lock().await.clear();
        self.running.store(true, Ordering::SeqCst);
        info!("logger session started");
        Ok(())
    }

    async fn log(&self, topic: &str, data: StreamData) -> Result<()> {
        let schemas = self.schemas.lock().await;
        let schema = schemas.get(topic).ok_or_else(|| Error::UnknownTopic(topic.to_string()))?;
        if schema.schema_id() != data.schema_id {
            return Err(Error::SchemaMismatch {
                topic: topic.to_string(),
                data: data.schema_id,
                expected: schema.schema_id(),
            });
        }
        drop(schemas);
        self.batches.lock().await.push((topic.to_string(), data));
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        info!("logger session stopped");
        Ok(())
    }

    async fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiltest_core::{DataType, SourceId, StreamField};

    fn sample_schema() -> StreamSchema {
        StreamSchema::new(SourceId::from("dmm-1"), vec![StreamField::new("voltage", DataType::F32, "V")])
    }

    #[tokio::test]
    async fn log_to_unregistered_topic_errors() {
        let logger = InMemoryLogger::new();
        let data = hiltest_core::StreamData {
            schema_id: sample_schema().schema_id(),
            base_timestamp_ns: 0,
            period_ns: 1_000_000,
            samples: vec![],
        };
        let result = logger.log("voltage", data).await;
        assert!(matches!(result, Err(Error::UnknownTopic(_))));
    }

    #[tokio::test]
    async fn log_with_mismatched_schema_errors() {
        let logger = InMemoryLogger::new();
        let schema = sample_schema();
        logger.register_schema("voltage", schema).await.unwrap();
        let data = hiltest_core::StreamData {
            schema_id: 0xDEAD_BEEF,
            base_timestamp_ns: 0,
            period_ns: 1_000_000,
            samples: vec![],
        };
        let result = logger.log("voltage", data).await;
        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }

    #[tokio::test]
    async fn start_and_stop_toggle_is_running() {
        let logger = InMemoryLogger::new();
        assert!(!logger.is_running().await);
        logger.start(LogTags { test_run_id: "run-1".to_string(), ..Default::default() }).await.unwrap();
        assert!(logger.is_running().await);
        logger.stop().await.unwrap();
        assert!(!logger.is_running().await);
    }
}
