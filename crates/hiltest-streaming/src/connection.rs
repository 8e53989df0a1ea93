// Copyright 2026 HIL Test Platform Team

//! Broker connection lifecycle: connect, ensure the telemetry stream
//! exists, and expose the JetStream context publishers and subscribers
//! build on.

use std::time::Duration;

use async_nats::jetstream::{self, Context as JetStreamContext};
use async_nats::{Client, ConnectOptions};
use tracing::{debug, info, warn};

use crate::config::StreamingConfig;
use crate::error::{Error, Result};

/// Owns a connection to the broker and its JetStream context.
///
/// Reconnection is handled by the underlying NATS client; this wrapper's
/// job is to surface connect failures as [`Error::ConnectionFailed`] and
/// to provide idempotent stream creation.
pub struct StreamingConnection {
    config: StreamingConfig,
    client: Option<Client>,
    jetstream: Option<JetStreamContext>,
}

impl StreamingConnection {
    /// Create a connection manager for `config`. Does not connect yet.
    pub fn new(config: StreamingConfig) -> Self {
        Self { config, client: None, jetstream: None }
    }

    /// The configuration this connection was built from.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// True once `connect` has succeeded and the client has not been
    /// torn down.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Borrow the JetStream context, if connected.
    pub fn jetstream(&self) -> Result<&JetStreamContext> {
        self.jetstream.as_ref().ok_or(Error::NotConnected)
    }

    /// Connect to the configured NATS servers and establish a JetStream
    /// context. A no-op if already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.client.is_some() {
            return Ok(());
        }

        let mut options = ConnectOptions::new()
            .connection_timeout(Duration::from_secs_f64(self.config.connect_timeout_secs));

        options = if let (Some(user), Some(password)) = (&self.config.user, &self.config.password)
        {
            options.user_and_password(user.clone(), password.clone())
        } else if let Some(token) = &self.config.token {
            options.token(token.clone())
        } else {
            options
        };

        let client = async_nats::connect_with_options(self.config.servers.join(","), options)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

        let jetstream = jetstream::new(client.clone());

        info!(servers = ?self.config.servers, "connected to NATS");
        self.client = Some(client);
        self.jetstream = Some(jetstream);
        Ok(())
    }

    /// Drain and close the connection.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.drain().await {
                warn!(error = %e, "error draining NATS connection");
            }
        }
        self.jetstream = None;
        info!("disconnected from NATS");
        Ok(())
    }

    /// Idempotently ensure the configured telemetry stream exists,
    /// covering `{subject_prefix}.>`.
    pub async fn ensure_stream(&self) -> Result<()> {
        let js = self.jetstream()?;
        let subjects = vec![self.config.stream_wildcard()];

        if js.get_stream(&self.config.stream_name).await.is_ok() {
            debug!(stream = %self.config.stream_name, "stream already exists");
            return Ok(());
        }

        js.create_stream(jetstream::stream::Config {
            name: self.config.stream_name.clone(),
            subjects,
            max_age: Duration::from_secs(86_400),
            storage: jetstream::stream::StorageType::File,
            discard: jetstream::stream::DiscardPolicy::Old,
            retention: jetstream::stream::RetentionPolicy::Limits,
            ..Default::default()
        })
        .await
        .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

        info!(stream = %self.config.stream_name, subject = %self.config.stream_wildcard(), "created stream");
        Ok(())
    }
}
