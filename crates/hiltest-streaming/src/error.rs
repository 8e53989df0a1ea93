// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for broker connection, publishing, and subscription operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Connecting to the broker failed.
    #[error("failed to connect to broker: {0}")]
    ConnectionFailed(String),

    /// An operation required a connection that is not currently established.
    #[error("not connected to broker")]
    NotConnected,

    /// `publish` was called before `start`, or after `stop`.
    #[error("publisher is not running")]
    NotRunning,

    /// `subscribe` was called while a subscription was already active.
    #[error("already subscribed to a source")]
    AlreadySubscribed,

    /// An operation required an active subscription but none exists.
    #[error("not subscribed to any source")]
    NotSubscribed,

    /// Waiting for a condition (connection, schema) exceeded its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// A publish call's data did not match the publisher's own schema.
    #[error("schema id mismatch: data has {data:#010x}, expected {expected:#010x}")]
    SchemaMismatch {
        /// The schema id carried by the outgoing data.
        data: u32,
        /// The publisher's schema id.
        expected: u32,
    },

    /// Publishing a message to the broker failed.
    #[error("publish failed: {0}")]
    Publish(String),

    /// Wire codec encode/decode error.
    #[error("codec error: {0}")]
    Codec(#[from] hiltest_codec::Error),

    /// Underlying NATS client error.
    #[error("NATS error: {0}")]
    Nats(String),
}

/// Result type for `hiltest-streaming` operations.
pub type Result<T> = std::result::Result<T, Error>;
