// Copyright 2026 HIL Test Platform Team

use thiserror::Error;

/// Error types for wire codec operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A string exceeded the 255-byte wire limit.
    #[error("string too long for encoding: {0} bytes (max 255)")]
    StringTooLong(usize),

    /// The frame's message type byte did not match what the caller expected.
    #[error("invalid message type: expected {expected:#04x}, got {actual:#04x}")]
    InvalidMessageType {
        /// The byte the caller expected.
        expected: u8,
        /// The byte actually present.
        actual: u8,
    },

    /// The schema frame's declared id did not match the CRC-32 recomputed
    /// from its own field definitions.
    #[error("schema id mismatch: computed {computed:#010x}, expected {expected:#010x}")]
    SchemaIdMismatch {
        /// The id recomputed from the decoded fields.
        computed: u32,
        /// The id declared in the frame.
        expected: u32,
    },

    /// A data frame's schema id did not match the schema it was decoded against.
    #[error("schema id mismatch: data has {data:#010x}, schema has {schema:#010x}")]
    SchemaMismatch {
        /// The schema id carried in the data frame.
        data: u32,
        /// The schema id of the schema being decoded against.
        schema: u32,
    },

    /// A sample's value count did not match the schema's field count.
    #[error("sample has {actual} values, schema has {expected} fields")]
    SampleArity {
        /// Values actually present in the sample.
        actual: usize,
        /// Fields the schema defines.
        expected: usize,
    },

    /// A schema had zero fields, which cannot be serialized to a data frame.
    #[error("schema has no fields")]
    EmptySchema,

    /// The buffer ended before a complete frame could be read.
    #[error("unexpected end of buffer: needed {needed} more bytes")]
    Truncated {
        /// Additional bytes that would have been required.
        needed: usize,
    },

    /// The buffer had bytes left over after a complete frame was decoded.
    #[error("{extra} trailing byte(s) after a complete frame")]
    TrailingBytes {
        /// Bytes remaining in the buffer past the frame's declared length.
        extra: usize,
    },

    /// A decoded byte sequence was not valid UTF-8.
    #[error("invalid UTF-8 in encoded string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A data type byte code was not one of the ten assigned values.
    #[error("unknown data type code: {0:#04x}")]
    UnknownDataType(u8),

    /// A sample value's runtime variant did not match its field's declared type.
    #[error("value does not match field data type")]
    ValueTypeMismatch,
}

/// Result type for wire codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_message_type_message() {
        let err = Error::InvalidMessageType { expected: 0x01, actual: 0x02 };
        assert_eq!(err.to_string(), "invalid message type: expected 0x01, got 0x02");
    }

    #[test]
    fn schema_id_mismatch_message() {
        let err = Error::SchemaIdMismatch { computed: 0xdead_beef, expected: 0x1234_5678 };
        assert!(err.to_string().contains("0xdeadbeef"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
