// Copyright 2026 HIL Test Platform Team

//! The in-memory run ledger: an observable record of a run's progress and
//! outcome.

use hiltest_core::{MonitorResult, Timestamp};
use serde::{Deserialize, Serialize};

use crate::phase::PhaseResult;

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Not yet started.
    Pending,
    /// Currently executing.
    Running,
    /// Every non-skipped phase reached `completed`.
    Passed,
    /// At least one phase failed; the executor completed the phases it attempted.
    Failed,
    /// An unexpected error occurred outside of a phase.
    Error,
    /// An external abort was requested mid-run.
    Aborted,
}

/// Running record of a run's phase results, monitor results, and cycle
/// count, kept up to date as the run progresses and queryable at any time.
#[derive(Debug, Clone, Default)]
pub struct RunLedger {
    /// Current status.
    pub status: Option<RunStatus>,
    /// Phase results recorded so far, across all cycles attempted.
    pub phase_results: Vec<PhaseResult>,
    /// Monitor results recorded so far, across all cycles attempted.
    pub monitor_results: Vec<MonitorResult>,
    /// Number of full passes through the phase list completed
    /// (meaningful for `hass`/`halt` modes; always 1 for `functional`).
    pub cycle_count: usize,
}

impl RunLedger {
    /// Record a phase result.
    pub fn push_phase_result(&mut self, result: PhaseResult) {
        self.phase_results.push(result);
    }

    /// Record a monitor result.
    pub fn push_monitor_result(&mut self, result: MonitorResult) {
        self.monitor_results.push(result);
    }
}

/// Final outcome of a run, returned from [`crate::Executor::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// The run's unique id.
    pub test_id: String,
    /// Terminal status.
    pub status: RunStatus,
    /// When the run started.
    pub start_time: Timestamp,
    /// When the run ended.
    pub end_time: Timestamp,
    /// Every phase result across all cycles attempted.
    pub phase_results: Vec<PhaseResult>,
    /// Every monitor result observed during the run.
    pub monitor_results: Vec<MonitorResult>,
    /// Number of full passes through the phase list completed.
    pub cycle_count: usize,
    /// Human-readable summary.
    #[serde(default)]
    pub message: String,
    /// Accumulated error detail.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl RunResult {
    /// True if `status` is [`RunStatus::Passed`].
    pub fn passed(&self) -> bool {
        self.status == RunStatus::Passed
    }

    /// True if `status` is [`RunStatus::Failed`] or [`RunStatus::Error`].
    pub fn failed(&self) -> bool {
        matches!(self.status, RunStatus::Failed | RunStatus::Error)
    }

    /// Count of phase results with status `completed`.
    pub fn phases_passed(&self) -> usize {
        self.phase_results.iter().filter(|p| p.passed()).count()
    }

    /// Count of phase results with status `failed`.
    pub fn phases_failed(&self) -> usize {
        self.phase_results.iter().filter(|p| p.status == crate::phase::PhaseStatus::Failed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_starts_empty() {
        let ledger = RunLedger::default();
        assert!(ledger.phase_results.is_empty());
        assert!(ledger.monitor_results.is_empty());
        assert_eq!(ledger.cycle_count, 0);
        assert_eq!(ledger.status, None);
    }

    #[test]
    fn status_round_trips_through_json_lowercase() {
        let json = serde_json::to_string(&RunStatus::Aborted).unwrap();
        assert_eq!(json, "\"aborted\"");
    }
}
