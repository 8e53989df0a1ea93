// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for monitor configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A monitor definition had no name.
    #[error("monitor definition must have a name")]
    EmptyName,

    /// A threshold's bounds are incoherent (low > high, both exclusive at
    /// the same value, or a `NaN` bound). Detected at definition-load
    /// time, not while evaluating samples.
    #[error("invalid threshold definition: {0}")]
    InvalidThreshold(String),
}

/// Result type for `hiltest-monitor` operations.
pub type Result<T> = std::result::Result<T, Error>;
