// Copyright 2026 HIL Test Platform Team

//! Test phases: a named period of execution pinned to one environmental
//! state, with optional pre/main/post actions and a skip predicate.

use std::sync::Arc;

use async_trait::async_trait;
use hiltest_core::{EnvironmentalState, StateId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::context::TestContext;

/// Status of a test phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    /// Not yet attempted.
    Pending,
    /// Currently executing.
    Running,
    /// Reached its terminal success state.
    Completed,
    /// Reached a terminal failure.
    Failed,
    /// Bypassed by its skip predicate.
    Skipped,
}

/// Result of executing one test phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    /// The phase's name.
    pub phase_name: String,
    /// Terminal status reached.
    pub status: PhaseStatus,
    /// When the phase began.
    pub start_time: Timestamp,
    /// When the phase ended.
    pub end_time: Timestamp,
    /// The phase's target state.
    pub state_id: StateId,
    /// Human-readable summary.
    #[serde(default)]
    pub message: String,
    /// Error details accumulated during a failed phase.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl PhaseResult {
    /// True if `status` is [`PhaseStatus::Completed`].
    pub fn passed(&self) -> bool {
        self.status == PhaseStatus::Completed
    }

    /// Phase duration in nanoseconds.
    pub fn duration_ns(&self) -> i64 {
        self.end_time.unix_ns - self.start_time.unix_ns
    }

    /// Phase duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ns() as f64 / 1_000_000_000.0
    }
}

/// A pre/main/post action a phase runs, given mutable access to the
/// shared execution context.
///
/// Failures are reported through the returned `Err(String)` rather than
/// by panicking; a panic inside an implementation is not caught and will
/// unwind the run.
#[async_trait]
pub trait PhaseAction: Send + Sync {
    /// Run the action.
    async fn run(&self, context: &mut TestContext) -> Result<(), String>;
}

/// A predicate deciding whether a phase should be bypassed entirely.
pub trait SkipPredicate: Send + Sync {
    /// Return true if the phase should be skipped.
    fn should_skip(&self, context: &TestContext) -> bool;
}

/// Definition of one phase of a test run: a target environmental state
/// plus the actions that run while in it.
pub struct TestPhase {
    /// The phase's name, unique within a run.
    pub name: String,
    /// The environmental state this phase targets.
    pub state: EnvironmentalState,
    /// Nominal duration, informational only — the executor does not
    /// enforce it; `action` implementations are responsible for their
    /// own timing.
    pub duration_seconds: f64,
    /// Human-readable description.
    pub description: String,
    /// Runs before `action`. A failure here skips `action` and `post_action`.
    pub pre_action: Option<Arc<dyn PhaseAction>>,
    /// The phase's main action. A failure here skips `post_action`.
    pub action: Option<Arc<dyn PhaseAction>>,
    /// Runs only if `action` completed successfully.
    pub post_action: Option<Arc<dyn PhaseAction>>,
    /// If present and it returns true, the phase is bypassed entirely
    /// (no actions run, no state is emitted).
    pub skip_if: Option<Arc<dyn SkipPredicate>>,
}

impl TestPhase {
    /// Build a phase targeting `state` with no actions or skip predicate.
    pub fn new(name: impl Into<String>, state: EnvironmentalState) -> Self {
        Self {
            name: name.into(),
            state,
            duration_seconds: 0.0,
            description: String::new(),
            pre_action: None,
            action: None,
            post_action: None,
            skip_if: None,
        }
    }

    /// The target state's id.
    pub fn state_id(&self) -> &StateId {
        &self.state.state_id
    }

    /// Evaluate this phase's skip predicate, if any.
    pub fn should_skip(&self, context: &TestContext) -> bool {
        self.skip_if.as_ref().is_some_and(|p| p.should_skip(context))
    }

    /// Run this phase's actions against `context`.
    ///
    /// The caller must have already checked [`should_skip`](Self::should_skip)
    /// and emitted the phase's target state on the state bus; this method
    /// assumes the phase is actually running and sets `context.current_state`.
    pub async fn run_actions(&self, context: &mut TestContext) -> PhaseResult {
        let start_time = Timestamp::now("executor");
        context.set_state(self.state.clone());

        let mut errors = Vec::new();
        let status = loop {
            if let Some(action) = &self.pre_action {
                debug!(phase = %self.name, "running pre-action");
                if let Err(e) = action.run(context).await {
                    errors.push(e);
                    break PhaseStatus::Failed;
                }
            }
            if let Some(action) = &self.action {
                debug!(phase = %self.name, "running action");
                if let Err(e) = action.run(context).await {
                    errors.push(e);
                    break PhaseStatus::Failed;
                }
            }
            if let Some(action) = &self.post_action {
                debug!(phase = %self.name, "running post-action");
                if let Err(e) = action.run(context).await {
                    errors.push(e);
                    break PhaseStatus::Failed;
                }
            }
            break PhaseStatus::Completed;
        };

        let message = match status {
            PhaseStatus::Completed => "phase completed successfully".to_string(),
            PhaseStatus::Failed => {
                error!(phase = %self.name, errors = ?errors, "phase failed");
                format!("phase failed: {}", errors.join("; "))
            }
            _ => unreachable!("run_actions only produces Completed or Failed"),
        };

        PhaseResult {
            phase_name: self.name.clone(),
            status,
            start_time,
            end_time: Timestamp::now("executor"),
            state_id: self.state_id().clone(),
            message,
            errors,
        }
    }

    /// Build the result for a phase bypassed by its skip predicate.
    pub fn skipped_result(&self) -> PhaseResult {
        let now = Timestamp::now("executor");
        PhaseResult {
            phase_name: self.name.clone(),
            status: PhaseStatus::Skipped,
            start_time: now.clone(),
            end_time: now,
            state_id: self.state_id().clone(),
            message: "skipped by condition".to_string(),
            errors: Vec::new(),
        }
    }
}
