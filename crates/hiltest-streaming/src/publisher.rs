// Copyright 2026 HIL Test Platform Team

//! Stream publisher: announces a schema periodically and publishes data
//! batches that conform to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hiltest_core::{StreamData, StreamSchema};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::connection::StreamingConnection;
use crate::config::StreamingConfig;
use crate::error::{Error, Result};

/// Publishes a single stream's schema and data to the broker.
///
/// Schema frames are broadcast on a timer (`schema_publish_interval_secs`)
/// so that subscribers joining at any time can discover the stream's
/// structure; data frames are published on demand via [`publish`](Self::publish).
pub struct StreamPublisher {
    config: StreamingConfig,
    schema: StreamSchema,
    connection: Arc<Mutex<StreamingConnection>>,
    owns_connection: bool,
    running: Arc<AtomicBool>,
    schema_task: Mutex<Option<JoinHandle<()>>>,
}

impl StreamPublisher {
    /// Build a publisher that owns its own connection, created and torn
    /// down by `start`/`stop`.
    pub fn new(config: StreamingConfig, schema: StreamSchema) -> Self {
        let connection = StreamingConnection::new(config.clone());
        Self {
            config,
            schema,
            connection: Arc::new(Mutex::new(connection)),
            owns_connection: true,
            running: Arc::new(AtomicBool::new(false)),
            schema_task: Mutex::new(None),
        }
    }

    /// Build a publisher over a connection shared with other callers.
    /// `start`/`stop` never connect or disconnect a shared connection.
    pub fn with_connection(
        config: StreamingConfig,
        schema: StreamSchema,
        connection: Arc<Mutex<StreamingConnection>>,
    ) -> Self {
        Self {
            config,
            schema,
            connection,
            owns_connection: false,
            running: Arc::new(AtomicBool::new(false)),
            schema_task: Mutex::new(None),
        }
    }

    /// The schema this publisher announces and validates data against.
    pub fn schema(&self) -> &StreamSchema {
        &self.schema
    }

    /// True while the publisher's schema broadcast loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Connect (if owned), ensure the stream exists, and begin
    /// broadcasting the schema on a timer. A no-op if already running.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if self.owns_connection {
            self.connection.lock().await.connect().await?;
        }

        self.connection.lock().await.ensure_stream().await?;

        let connection = self.connection.clone();
        let schema = self.schema.clone();
        let config = self.config.clone();
        let running = self.running.clone();

        let handle = tokio::spawn(async move {
            schema_broadcast_loop(connection, schema, config, running).await;
        });
        *self.schema_task.lock().await = Some(handle);

        info!(source_id = %self.schema.source_id(), "started publisher");
        Ok(())
    }

    /// Stop broadcasting the schema and, if this publisher owns its
    /// connection, disconnect it.
    pub async fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(handle) = self.schema_task.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }

        if self.owns_connection {
            self.connection.lock().await.disconnect().await?;
        }

        info!(source_id = %self.schema.source_id(), "stopped publisher");
        Ok(())
    }

    /// Publish a batch of samples. `data.schema_id` must match this
    /// publisher's schema.
    pub async fn publish(&self, data: &StreamData) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }
        if data.schema_id != self.schema.schema_id() {
            return Err(Error::SchemaMismatch { data: data.schema_id, expected: self.schema.schema_id() });
        }

        let payload = hiltest_codec::encode_data(data, &self.schema)?;
        let subject = self.config.data_subject(self.schema.source_id().as_str());

        let guard = self.connection.lock().await;
        let js = guard.jetstream()?;
        js.publish(subject.clone(), payload.into())
            .await
            .map_err(|e| Error::Publish(e.to_string()))?
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;

        debug!(subject = %subject, samples = data.sample_count(), "published data");
        Ok(())
    }

    async fn publish_schema(&self) -> Result<()> {
        let payload = hiltest_codec::encode_schema(&self.schema)?;
        let subject = self.config.schema_subject(self.schema.source_id().as_str());

        let guard = self.connection.lock().await;
        let js = guard.jetstream()?;
        js.publish(subject.clone(), payload.into())
            .await
            .map_err(|e| Error::Publish(e.to_string()))?
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;

        debug!(subject = %subject, "published schema");
        Ok(())
    }
}

async fn schema_broadcast_loop(
    connection: Arc<Mutex<StreamingConnection>>,
    schema: StreamSchema,
    config: StreamingConfig,
    running: Arc<AtomicBool>,
) {
    let interval = Duration::from_secs_f64(config.schema_publish_interval_secs.max(0.01));
    let publisher = StreamPublisher::with_connection(config, schema, connection);
    while running.load(Ordering::SeqCst) {
        if let Err(e) = publisher.publish_schema().await {
            warn!(error = %e, "failed to publish schema");
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiltest_core::{DataType, SourceId, StreamField};

    fn sample_schema() -> StreamSchema {
        StreamSchema::new(
            SourceId::from("dmm-1"),
            vec![StreamField::new("voltage", DataType::F32, "V")],
        )
    }

    #[test]
    fn publisher_starts_not_running() {
        let publisher = StreamPublisher::new(StreamingConfig::default(), sample_schema());
        assert!(!publisher.is_running());
    }
}
