// Copyright 2026 HIL Test Platform Team

//! State publisher: tracks the station's current environmental state and
//! announces transitions on the state bus.

use std::sync::Arc;

use hiltest_core::{EnvironmentalState, StateTransition, Timestamp};
use hiltest_streaming::{StreamingConfig, StreamingConnection};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};
use crate::message::StateMessage;

/// Publishes environmental state transitions for a station.
///
/// Unlike the telemetry data path, state transitions are serialized as
/// JSON: they are low-rate control-plane events, not high-volume sample
/// batches, so the compact binary codec buys nothing here.
pub struct StatePublisher {
    config: StreamingConfig,
    connection: Arc<Mutex<StreamingConnection>>,
    owns_connection: bool,
    current_state: Mutex<Option<EnvironmentalState>>,
}

impl StatePublisher {
    /// Build a publisher that owns its own connection.
    pub fn new(config: StreamingConfig) -> Self {
        let connection = StreamingConnection::new(config.clone());
        Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
            owns_connection: true,
            current_state: Mutex::new(None),
        }
    }

    /// Build a publisher over a connection shared with other callers.
    pub fn with_connection(config: StreamingConfig, connection: Arc<Mutex<StreamingConnection>>) -> Self {
        Self { config, connection, owns_connection: false, current_state: Mutex::new(None) }
    }

    /// Connect to the broker (if owned) and ensure the backing stream exists.
    pub async fn connect(&self) -> Result<()> {
        if self.owns_connection {
            self.connection.lock().await.connect().await?;
        }
        self.connection.lock().await.ensure_stream().await?;
        Ok(())
    }

    /// Disconnect (if this publisher owns its connection).
    pub async fn disconnect(&self) -> Result<()> {
        if self.owns_connection {
            self.connection.lock().await.disconnect().await?;
        }
        Ok(())
    }

    /// True once `connect` has succeeded.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_connected()
    }

    /// Transition to a new environmental state and broadcast the
    /// transition on the state subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyState`] if `state.name` is empty.
    pub async fn set_state(&self, state: EnvironmentalState, reason: &str) -> Result<()> {
        if state.name.trim().is_empty() {
            return Err(Error::EmptyState);
        }

        let from_state = self.current_state.lock().await.as_ref().map(|s| s.state_id.clone());
        let transition = StateTransition {
            from_state,
            to_state: state.state_id.clone(),
            timestamp: Timestamp::now("local"),
            reason: reason.to_string(),
        };
        let message = StateMessage { transition: transition.clone(), state: state.clone() };

        let payload = serde_json::to_vec(&message).map_err(Error::Malformed)?;
        let subject = self.config.state_subject();

        let guard = self.connection.lock().await;
        let js = guard.jetstream()?;
        js.publish(subject.clone(), payload.into())
            .await
            .map_err(|e| Error::Publish(e.to_string()))?
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;
        drop(guard);

        info!(to_state = %transition.to_state, subject = %subject, "published state transition");
        *self.current_state.lock().await = Some(state);
        Ok(())
    }

    /// The current environmental state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentState`] if `set_state` has never been called.
    pub async fn get_current_state(&self) -> Result<EnvironmentalState> {
        self.current_state.lock().await.clone().ok_or(Error::NoCurrentState)
    }
}
