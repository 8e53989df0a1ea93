// Copyright 2026 HIL Test Platform Team

//! # hiltest-state
//!
//! State bus: publish and observe the environmental state (ambient,
//! thermal soak, transitions) a station is cycling through, independent
//! of the telemetry data path.

/// Crate-local error type.
pub mod error;
/// Wire envelope published on the state subject.
pub mod message;
/// State publisher.
pub mod publisher;
/// State subscriber.
pub mod subscriber;

pub use error::{Error, Result};
pub use message::StateMessage;
pub use publisher::StatePublisher;
pub use subscriber::StateSubscriber;
