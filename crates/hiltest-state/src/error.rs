// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for state bus operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// An operation required a connection that is not currently established.
    #[error("not connected to broker")]
    NotConnected,

    /// `set_state`/`subscribe` was given or expected a name that was empty.
    #[error("state name must not be empty")]
    EmptyState,

    /// `get_current_state` was called before any state had been observed.
    #[error("no current state has been set")]
    NoCurrentState,

    /// `subscribe` was called while a subscription was already active.
    #[error("already subscribed to state changes")]
    AlreadySubscribed,

    /// An operation required an active subscription but none exists.
    #[error("not subscribed to state changes")]
    NotSubscribed,

    /// Publishing a message to the broker failed.
    #[error("publish failed: {0}")]
    Publish(String),

    /// A received state transition failed to deserialize.
    #[error("malformed state transition: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Underlying streaming-layer error (connection, broker).
    #[error(transparent)]
    Streaming(#[from] hiltest_streaming::Error),
}

/// Result type for `hiltest-state` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn empty_state_message() {
        let err = Error::EmptyState;
        assert_eq!(err.to_string(), "state name must not be empty");
    }
}
