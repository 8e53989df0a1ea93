// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for `hiltest-core` data model operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A string exceeded the 255-byte wire limit for length-prefixed encoding.
    #[error("string too long for encoding: {0} bytes (max 255)")]
    StringTooLong(usize),

    /// A sample's value count did not match the schema's field count.
    #[error("sample has {actual} values, schema has {expected} fields")]
    SampleArity {
        /// Number of values the sample actually carried.
        actual: usize,
        /// Number of fields the schema defines.
        expected: usize,
    },

    /// A schema was asked to cover zero fields.
    #[error("schema has no fields")]
    EmptySchema,

    /// JSON (de)serialization of a control-plane type failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value looked up by name was not present.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Result type for `hiltest-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_too_long_message() {
        let err = Error::StringTooLong(300);
        assert_eq!(err.to_string(), "string too long for encoding: 300 bytes (max 255)");
    }

    #[test]
    fn sample_arity_message() {
        let err = Error::SampleArity { actual: 2, expected: 3 };
        assert_eq!(err.to_string(), "sample has 2 values, schema has 3 fields");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
