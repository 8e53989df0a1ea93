// Copyright 2026 HIL Test Platform Team

//! # hiltest-monitor
//!
//! Threshold evaluator: checks channel values against per-state,
//! per-channel bounds and produces pass/fail/skip verdicts.

/// Per-state, per-channel bound definitions.
pub mod definition;
/// Crate-local error type.
pub mod error;
/// The monitor itself.
pub mod monitor;

pub use definition::{BoundSpec, MonitorDefinition};
pub use error::{Error, Result};
pub use monitor::Monitor;
