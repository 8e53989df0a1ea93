// Copyright 2026 HIL Test Platform Team

//! Monitor result types: the verdict and supporting detail produced by
//! one evaluation of channel values against thresholds.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, MonitorId, StateId};
use crate::threshold::Threshold;
use crate::timestamp::Timestamp;

/// The outcome of a single monitor evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorVerdict {
    /// Every checked channel was within its threshold.
    Pass,
    /// At least one checked channel violated its threshold.
    Fail,
    /// No verdict was produced (e.g. state is a transition, or no
    /// thresholds applied to any present channel).
    Skip,
    /// Evaluation itself failed (distinct from a measured failure).
    Error,
}

/// Detail of one channel violating its threshold during an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdViolation {
    /// The channel that violated its threshold.
    pub channel: ChannelId,
    /// The out-of-bounds value observed.
    pub value: f64,
    /// The threshold that was violated.
    pub threshold: Threshold,
    /// Human-readable detail.
    #[serde(default)]
    pub message: String,
}

/// Result of one monitor evaluation across a set of channel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorResult {
    /// The monitor that produced this result.
    pub monitor_id: MonitorId,
    /// The overall verdict.
    pub verdict: MonitorVerdict,
    /// When the evaluation ran.
    pub timestamp: Timestamp,
    /// The environmental state active during evaluation.
    pub state_id: StateId,
    /// Individual threshold violations, if the verdict is `Fail`.
    #[serde(default)]
    pub violations: Vec<ThresholdViolation>,
    /// Human-readable summary.
    #[serde(default)]
    pub message: String,
}

impl MonitorResult {
    /// True if `verdict` is `Pass`.
    pub fn passed(&self) -> bool {
        self.verdict == MonitorVerdict::Pass
    }

    /// True if `verdict` is `Fail`.
    pub fn failed(&self) -> bool {
        self.verdict == MonitorVerdict::Fail
    }
}
