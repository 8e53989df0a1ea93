// Copyright 2026 HIL Test Platform Team

//! Stream subscriber: discovers a source's schema and yields decoded
//! data batches as they arrive.

use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::consumer::{pull, DeliverPolicy as NatsDeliverPolicy};
use futures::StreamExt;
use hiltest_core::{SourceId, StreamSchema};
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{DeliverPolicy, StreamingConfig};
use crate::connection::StreamingConnection;
use crate::error::{Error, Result};

/// Subscribes to one source's schema and data subjects and exposes
/// decoded data through a channel-backed stream.
///
/// Data messages received before a schema arrives are discarded (there is
/// nothing to decode them against); messages whose `schema_id` does not
/// match the current schema are discarded with a warning rather than
/// failing the whole subscription.
pub struct StreamSubscriber {
    config: StreamingConfig,
    connection: Arc<Mutex<StreamingConnection>>,
    owns_connection: bool,
    source_id: Mutex<Option<SourceId>>,
    schema: Arc<Mutex<Option<StreamSchema>>>,
    schema_notify: Arc<Notify>,
    data_rx: Mutex<Option<mpsc::Receiver<hiltest_core::StreamData>>>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
}

impl StreamSubscriber {
    /// Build a subscriber that owns its own connection.
    pub fn new(config: StreamingConfig) -> Self {
        let connection = StreamingConnection::new(config.clone());
        Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
            owns_connection: true,
            source_id: Mutex::new(None),
            schema: Arc::new(Mutex::new(None)),
            schema_notify: Arc::new(Notify::new()),
            data_rx: Mutex::new(None),
            receive_task: Mutex::new(None),
        }
    }

    /// Build a subscriber over a connection shared with other callers.
    pub fn with_connection(config: StreamingConfig, connection: Arc<Mutex<StreamingConnection>>) -> Self {
        Self {
            config,
            connection,
            owns_connection: false,
            source_id: Mutex::new(None),
            schema: Arc::new(Mutex::new(None)),
            schema_notify: Arc::new(Notify::new()),
            data_rx: Mutex::new(None),
            receive_task: Mutex::new(None),
        }
    }

    /// The current schema, if one has been received.
    pub async fn schema(&self) -> Option<StreamSchema> {
        self.schema.lock().await.clone()
    }

    /// Connect to the broker (if owned by this subscriber).
    pub async fn connect(&self) -> Result<()> {
        if self.owns_connection {
            self.connection.lock().await.connect().await?;
        }
        Ok(())
    }

    /// Subscribe to `source_id`'s schema and data subjects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadySubscribed`] if a subscription is already
    /// active; callers must [`unsubscribe`](Self::unsubscribe) first.
    pub async fn subscribe(&self, source_id: SourceId) -> Result<()> {
        {
            let existing = self.source_id.lock().await;
            if existing.is_some() {
                return Err(Error::AlreadySubscribed);
            }
        }

        let guard = self.connection.lock().await;
        if !guard.is_connected() {
            return Err(Error::NotConnected);
        }

        let stream = guard
            .jetstream()?
            .get_stream(&self.config.stream_name)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

        let deliver_policy = match self.config.consumer_deliver_policy {
            DeliverPolicy::All => NatsDeliverPolicy::All,
            DeliverPolicy::Last => NatsDeliverPolicy::Last,
            DeliverPolicy::New => NatsDeliverPolicy::New,
        };

        let consumer = stream
            .create_consumer(pull::Config {
                durable_name: self.config.consumer_durable_name.clone(),
                filter_subject: self.config.source_wildcard(source_id.as_str()),
                deliver_policy,
                ack_wait: Duration::from_secs_f64(self.config.consumer_ack_wait_secs),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        drop(guard);

        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);
        *self.data_rx.lock().await = Some(rx);
        *self.source_id.lock().await = Some(source_id.clone());
        *self.schema.lock().await = None;

        let schema_store = self.schema.clone();
        let schema_notify = self.schema_notify.clone();

        let handle = tokio::spawn(async move {
            receive_loop(consumer, schema_store, schema_notify, tx).await;
        });
        *self.receive_task.lock().await = Some(handle);

        info!(source_id = %source_id, "subscribed to source");
        Ok(())
    }

    /// Wait for the source's schema to arrive, or return
    /// [`Error::Timeout`] if `timeout` elapses first. `None` waits
    /// indefinitely.
    pub async fn get_schema(&self, timeout: Option<Duration>) -> Result<StreamSchema> {
        if self.source_id.lock().await.is_none() {
            return Err(Error::NotSubscribed);
        }

        if let Some(schema) = self.schema.lock().await.clone() {
            return Ok(schema);
        }

        let wait = self.schema_notify.notified();
        match timeout {
            Some(d) => tokio::time::timeout(d, wait)
                .await
                .map_err(|_| Error::Timeout("schema".to_string()))?,
            None => wait.await,
        }

        self.schema
            .lock()
            .await
            .clone()
            .ok_or_else(|| Error::Timeout("schema".to_string()))
    }

    /// Receive the next decoded data batch, or `None` if the
    /// subscription has been torn down.
    pub async fn recv(&self) -> Option<hiltest_core::StreamData> {
        let mut guard = self.data_rx.lock().await;
        match guard.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Tear down the current subscription, if any, and disconnect (if
    /// this subscriber owns its connection).
    pub async fn unsubscribe(&self) -> Result<()> {
        if let Some(handle) = self.receive_task.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        *self.data_rx.lock().await = None;
        *self.source_id.lock().await = None;
        *self.schema.lock().await = None;

        info!("unsubscribed from source");
        Ok(())
    }

    /// Tear down any subscription and, if owned, disconnect.
    pub async fn disconnect(&self) -> Result<()> {
        self.unsubscribe().await?;
        if self.owns_connection {
            self.connection.lock().await.disconnect().await?;
        }
        Ok(())
    }
}

/// The result of interpreting one raw frame payload against the
/// subscriber's current schema state.
///
/// Pure and broker-independent: it does not touch the network, so it can
/// be exercised directly without a live NATS connection.
#[derive(Debug)]
pub enum FrameOutcome {
    /// A schema frame was decoded; subscribers should adopt it immediately.
    Schema(StreamSchema),
    /// A data frame was decoded against the current schema.
    Data(hiltest_core::StreamData),
    /// The frame was not usable; `reason` is a short, log-friendly cause
    /// (empty payload, no schema yet, a decode error, or an unrecognized
    /// message type).
    Discarded(&'static str),
}

/// Interpret one raw message payload. Data frames received before any
/// schema has arrived are always discarded here, never buffered or
/// retried — this is the "drop pre-schema data" rule applied at the
/// point closest to the wire.
pub fn decode_frame(payload: &[u8], current_schema: Option<&StreamSchema>) -> FrameOutcome {
    if payload.is_empty() {
        return FrameOutcome::Discarded("empty payload");
    }

    match payload[0] {
        hiltest_codec::MSG_TYPE_SCHEMA => match hiltest_codec::decode_schema(payload) {
            Ok(schema) => FrameOutcome::Schema(schema),
            Err(_) => FrameOutcome::Discarded("failed to parse schema message"),
        },
        hiltest_codec::MSG_TYPE_DATA => match current_schema {
            None => FrameOutcome::Discarded("no schema yet"),
            Some(schema) => match hiltest_codec::decode_data(payload, schema) {
                Ok(data) => FrameOutcome::Data(data),
                Err(_) => FrameOutcome::Discarded("decode error"),
            },
        },
        _ => FrameOutcome::Discarded("unknown message type"),
    }
}

async fn receive_loop(
    consumer: async_nats::jetstream::consumer::Consumer<pull::Config>,
    schema_store: Arc<Mutex<Option<StreamSchema>>>,
    schema_notify: Arc<Notify>,
    tx: mpsc::Sender<hiltest_core::StreamData>,
) {
    let mut messages = match consumer.messages().await {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "failed to start consuming messages");
            return;
        }
    };

    while let Some(next) = messages.next().await {
        let msg = match next {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "error receiving message");
                continue;
            }
        };

        let current_schema = schema_store.lock().await.clone();
        match decode_frame(&msg.payload, current_schema.as_ref()) {
            FrameOutcome::Schema(schema) => {
                debug!(source_id = %schema.source_id(), fields = schema.fields().len(), "received schema");
                *schema_store.lock().await = Some(schema);
                schema_notify.notify_waiters();
            }
            FrameOutcome::Data(data) => {
                if tx.send(data).await.is_err() {
                    warn!("data channel closed, dropping message");
                }
            }
            FrameOutcome::Discarded(reason) => {
                debug!(reason, "discarding frame");
            }
        }

        if let Err(e) = msg.ack().await {
            warn!(error = %e, "failed to ack message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_schema_without_subscribe_errors() {
        let subscriber = StreamSubscriber::new(StreamingConfig::default());
        let result = subscriber.get_schema(Some(Duration::from_millis(10))).await;
        assert!(matches!(result, Err(Error::NotSubscribed)));
    }
}
