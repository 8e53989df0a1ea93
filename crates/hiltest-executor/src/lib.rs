// Copyright 2026 HIL Test Platform Team

//! # hiltest-executor
//!
//! Phase-sequenced test executor: drives a station through a sequence of
//! environmental states, supervising the state bus, telemetry monitors,
//! and a logger sink across a run, and recording the outcome in an
//! observable run ledger.

/// Shared execution context passed to phase actions.
pub mod context;
/// Crate-local error type.
pub mod error;
/// The executor itself.
pub mod executor;
/// The in-memory run ledger and outcome types.
pub mod ledger;
/// Logger sink interface and an in-memory reference implementation.
pub mod logger;
/// Test phases: actions, skip predicates, results.
pub mod phase;

pub use context::TestContext;
pub use error::{Error, Result};
pub use executor::{ExecutionMode, Executor};
pub use ledger::{RunLedger, RunResult, RunStatus};
pub use logger::{InMemoryLogger, LogTags, LoggerSink};
pub use phase::{PhaseAction, PhaseResult, PhaseStatus, SkipPredicate, TestPhase};
