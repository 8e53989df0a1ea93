// Copyright 2026 HIL Test Platform Team

//! # hiltest-core
//!
//! Shared data model for the HIL telemetry and evaluation stack: stable
//! identifiers, the numeric wire type taxonomy, stream schemas and data
//! batches, environmental state and its transitions, threshold
//! definitions, and monitor result types.
//!
//! Every other crate in this workspace (`hiltest-codec`,
//! `hiltest-streaming`, `hiltest-state`, `hiltest-monitor`,
//! `hiltest-executor`) depends on these types rather than redefining
//! them, so that a schema id or a threshold check means exactly one
//! thing across the whole stack.

/// Numeric wire type taxonomy (`DataType`) and its byte codes/sizes.
pub mod data_type;
/// Crate-local error type.
pub mod error;
/// Stable newtype identifiers (`SourceId`, `ChannelId`, `StateId`, `MonitorId`).
pub mod ids;
/// Monitor evaluation result types.
pub mod monitor;
/// Stream schema and field definitions (the schema registry's payload).
pub mod schema;
/// Environmental state and state transition types.
pub mod state;
/// Decoded sample batches tied to a schema.
pub mod stream_data;
/// Threshold bound and per-state threshold collection types.
pub mod threshold;
/// High-resolution timestamp type.
pub mod timestamp;

pub use data_type::DataType;
pub use error::{Error, Result};
pub use ids::{ChannelId, MonitorId, SourceId, StateId};
pub use monitor::{MonitorResult, MonitorVerdict, ThresholdViolation};
pub use schema::{StreamField, StreamSchema};
pub use state::{EnvironmentalState, StateTransition};
pub use stream_data::{StreamData, Value};
pub use threshold::{BoundType, StateThresholds, Threshold, ThresholdBound};
pub use timestamp::Timestamp;
