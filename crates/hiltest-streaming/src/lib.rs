// Copyright 2026 HIL Test Platform Team

//! # hiltest-streaming
//!
//! NATS JetStream-backed publisher and subscriber for the telemetry
//! stream protocol: schema broadcast, data publishing, and
//! schema-then-data subscription with bounded, backpressured delivery.

/// Configuration and subject-naming for the telemetry broker.
pub mod config;
/// Broker connection lifecycle and stream provisioning.
pub mod connection;
/// Centralized environment variable names and typed accessors.
pub mod env_vars;
/// Crate-local error type.
pub mod error;
/// Stream publisher (schema broadcast + data publish).
pub mod publisher;
/// Stream subscriber (schema discovery + data delivery).
pub mod subscriber;

pub use config::{DeliverPolicy, StreamingConfig};
pub use connection::StreamingConnection;
pub use error::{Error, Result};
pub use publisher::StreamPublisher;
pub use subscriber::{decode_frame, FrameOutcome, StreamSubscriber};
