// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for test execution.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A run was requested while another run was already in progress on
    /// this executor.
    #[error("executor is busy with another run")]
    Busy,

    /// A phase reached a terminal failure.
    #[error("phase {phase} failed: {message}")]
    PhaseFailed {
        /// The phase that failed.
        phase: String,
        /// Failure detail.
        message: String,
    },

    /// `log` was called with a topic that was never registered.
    #[error("unknown log topic: {0}")]
    UnknownTopic(String),

    /// A log batch's schema did not match the topic's registered schema.
    #[error("schema mismatch on topic {topic}: data has {data:#010x}, expected {expected:#010x}")]
    SchemaMismatch {
        /// The topic being logged to.
        topic: String,
        /// The schema id carried by the outgoing data.
        data: u32,
        /// The topic's registered schema id.
        expected: u32,
    },

    /// The run was aborted by an external request.
    #[error("run aborted")]
    Aborted,

    /// The broker connection was lost or never established.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The logger sink reported an error.
    #[error("logger error: {0}")]
    Logger(String),

    /// State bus error.
    #[error(transparent)]
    State(#[from] hiltest_state::Error),
}

/// Result type for `hiltest-executor` operations.
pub type Result<T> = std::result::Result<T, Error>;
