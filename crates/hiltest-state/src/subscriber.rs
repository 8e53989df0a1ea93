// Copyright 2026 HIL Test Platform Team

//! State subscriber: tracks the station's current environmental state and
//! exposes the stream of transitions as they arrive.

use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::consumer::{pull, DeliverPolicy as NatsDeliverPolicy};
use futures::StreamExt;
use hiltest_core::{EnvironmentalState, StateTransition};
use hiltest_streaming::{DeliverPolicy, StreamingConfig, StreamingConnection};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::message::StateMessage;

/// Subscribes to the state bus and exposes transitions through a
/// channel-backed stream.
pub struct StateSubscriber {
    config: StreamingConfig,
    connection: Arc<Mutex<StreamingConnection>>,
    owns_connection: bool,
    subscribed: Mutex<bool>,
    current_state: Arc<Mutex<Option<EnvironmentalState>>>,
    transition_rx: Mutex<Option<mpsc::Receiver<StateTransition>>>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
}

impl StateSubscriber {
    /// Build a subscriber that owns its own connection.
    pub fn new(config: StreamingConfig) -> Self {
        let connection = StreamingConnection::new(config.clone());
        Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
            owns_connection: true,
            subscribed: Mutex::new(false),
            current_state: Arc::new(Mutex::new(None)),
            transition_rx: Mutex::new(None),
            receive_task: Mutex::new(None),
        }
    }

    /// Build a subscriber over a connection shared with other callers.
    pub fn with_connection(config: StreamingConfig, connection: Arc<Mutex<StreamingConnection>>) -> Self {
        Self {
            config,
            connection,
            owns_connection: false,
            subscribed: Mutex::new(false),
            current_state: Arc::new(Mutex::new(None)),
            transition_rx: Mutex::new(None),
            receive_task: Mutex::new(None),
        }
    }

    /// Connect to the broker (if owned by this subscriber).
    pub async fn connect(&self) -> Result<()> {
        if self.owns_connection {
            self.connection.lock().await.connect().await?;
        }
        Ok(())
    }

    /// Subscribe to state transitions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadySubscribed`] if already subscribed.
    pub async fn subscribe(&self) -> Result<()> {
        {
            let mut subscribed = self.subscribed.lock().await;
            if *subscribed {
                return Err(Error::AlreadySubscribed);
            }
            *subscribed = true;
        }

        let guard = self.connection.lock().await;
        if !guard.is_connected() {
            *self.subscribed.lock().await = false;
            return Err(Error::NotConnected);
        }

        let stream = guard
            .jetstream()?
            .get_stream(&self.config.stream_name)
            .await
            .map_err(|e| hiltest_streaming::Error::ConnectionFailed(e.to_string()))?;

        let deliver_policy = match self.config.consumer_deliver_policy {
            DeliverPolicy::All => NatsDeliverPolicy::All,
            DeliverPolicy::Last => NatsDeliverPolicy::Last,
            DeliverPolicy::New => NatsDeliverPolicy::New,
        };

        let consumer = stream
            .create_consumer(pull::Config {
                durable_name: self.config.consumer_durable_name.clone(),
                filter_subject: self.config.state_subject(),
                deliver_policy,
                ack_wait: Duration::from_secs_f64(self.config.consumer_ack_wait_secs),
                ..Default::default()
            })
            .await
            .map_err(|e| hiltest_streaming::Error::ConnectionFailed(e.to_string()))?;
        drop(guard);

        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);
        *self.transition_rx.lock().await = Some(rx);

        let current_state = self.current_state.clone();
        let handle = tokio::spawn(async move {
            receive_loop(consumer, current_state, tx).await;
        });
        *self.receive_task.lock().await = Some(handle);

        info!("subscribed to state bus");
        Ok(())
    }

    /// The current environmental state, if one has been observed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentState`] if no transition has arrived yet.
    pub async fn get_current_state(&self) -> Result<EnvironmentalState> {
        self.current_state.lock().await.clone().ok_or(Error::NoCurrentState)
    }

    /// Receive the next state transition, or `None` if the subscription
    /// has been torn down.
    ///
    /// Forms the lazy sequence of transitions: callers poll this in a loop
    /// to observe the station's state history as it unfolds.
    pub async fn next_transition(&self) -> Option<StateTransition> {
        let mut guard = self.transition_rx.lock().await;
        match guard.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Tear down the current subscription, if any.
    pub async fn unsubscribe(&self) -> Result<()> {
        if let Some(handle) = self.receive_task.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        *self.transition_rx.lock().await = None;
        *self.subscribed.lock().await = false;
        info!("unsubscribed from state bus");
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

async fn receive_loop(
    consumer: async_nats::jetstream::consumer::Consumer<pull::Config>,
    current_state: Arc<Mutex<Option<EnvironmentalState>>>,
    tx: mpsc::Sender<StateTransition>,
) {
    let mut messages = match consumer.messages().await {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "failed to start consuming state messages");
            return;
        }
    };

    while let Some(next) = messages.next().await {
        let msg = match next {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "error receiving state message");
                continue;
            }
        };

        match serde_json::from_slice::<StateMessage>(&msg.payload) {
            Ok(parsed) => {
                debug!(to_state = %parsed.transition.to_state, "received state transition");
                *current_state.lock().await = Some(parsed.state);
                if tx.send(parsed.transition).await.is_err() {
                    warn!("transition channel closed, dropping message");
                }
            }
            Err(e) => warn!(error = %e, "discarding malformed state message"),
        }

        if let Err(e) = msg.ack().await {
            warn!(error = %e, "failed to ack state message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_state_before_any_transition_errors() {
        let subscriber = StateSubscriber::new(StreamingConfig::default());
        let result = subscriber.get_current_state().await;
        assert!(matches!(result, Err(Error::NoCurrentState)));
    }

    #[tokio::test]
    async fn subscribe_without_connection_errors() {
        let subscriber = StateSubscriber::new(StreamingConfig::default());
        let result = subscriber.subscribe().await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }
}
