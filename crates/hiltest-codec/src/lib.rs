// Copyright 2026 HIL Test Platform Team

//! # hiltest-codec
//!
//! Self-identifying binary wire codec for the telemetry protocol: schema
//! frames (`0x01`) that announce a stream's structure, and data frames
//! (`0x02`) that carry batches of samples conforming to a previously
//! announced schema. Both are big-endian and use a single-byte
//! length-prefixed string encoding throughout.

/// Data frame (`0x02`) encode/decode.
pub mod data_frame;
/// Crate-local error type.
pub mod error;
/// Schema frame (`0x01`) encode/decode.
pub mod schema_frame;
/// Length-prefixed string helpers shared by both frame types.
pub mod strings;

pub use data_frame::{decode_data, encode_data, MSG_TYPE_DATA};
pub use error::{Error, Result};
pub use schema_frame::{decode_schema, encode_schema, MSG_TYPE_SCHEMA};
