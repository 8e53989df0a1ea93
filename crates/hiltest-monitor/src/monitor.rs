// Copyright 2026 HIL Test Platform Team

//! Generic monitor: evaluates channel values against the bounds a
//! [`MonitorDefinition`] configures for the current environmental state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use hiltest_core::{
    ChannelId, EnvironmentalState, MonitorId, MonitorResult, MonitorVerdict, ThresholdViolation, Timestamp,
};
use tracing::debug;

use crate::definition::MonitorDefinition;

/// Evaluates channel values against state-dependent bounds.
///
/// Evaluation is pure and side-effect-free: `start`/`stop` only arm or
/// disarm the monitor for callers that gate evaluation on it (the executor
/// stops routing frames to a disarmed monitor); `evaluate` itself never
/// checks `is_running`.
pub struct Monitor {
    monitor_id: MonitorId,
    definition: MonitorDefinition,
    running: AtomicBool,
}

impl Monitor {
    /// Build a monitor whose id defaults to the definition's name.
    pub fn new(definition: MonitorDefinition) -> Self {
        let monitor_id = MonitorId::from(definition.name.clone());
        Self::with_id(monitor_id, definition)
    }

    /// Build a monitor with an explicit id, independent of the
    /// definition's name.
    pub fn with_id(monitor_id: MonitorId, definition: MonitorDefinition) -> Self {
        Self { monitor_id, definition, running: AtomicBool::new(false) }
    }

    /// This monitor's identifier.
    pub fn monitor_id(&self) -> &MonitorId {
        &self.monitor_id
    }

    /// The bound configuration this monitor evaluates against.
    pub fn definition(&self) -> &MonitorDefinition {
        &self.definition
    }

    /// Arm the monitor.
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Disarm the monitor.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// True while armed.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Evaluate `values` against the bounds defined for `state`.
    ///
    /// Channels present in `values` but absent from the definition for this
    /// state, and channels in the definition but absent from `values`, are
    /// both silently ignored — this is not an error.
    pub fn evaluate(&self, values: &HashMap<ChannelId, f64>, state: &EnvironmentalState) -> MonitorResult {
        let timestamp = Timestamp::now("monitor");

        if state.is_transition {
            return MonitorResult {
                monitor_id: self.monitor_id.clone(),
                verdict: MonitorVerdict::Skip,
                timestamp,
                state_id: state.state_id.clone(),
                violations: Vec::new(),
                message: "skipping evaluation during state transition".to_string(),
            };
        }

        let mut violations = Vec::new();
        let mut checked = 0usize;
        let mut skipped = 0usize;

        for (channel, &value) in values {
            let Some(bound) = self.definition.get_bounds(&state.state_id, channel) else {
                continue;
            };

            if bound.is_any() {
                skipped += 1;
                continue;
            }

            checked += 1;
            if !bound.check(value) {
                let message = format!("{channel}={value:.4} violated its threshold");
                violations.push(ThresholdViolation {
                    channel: channel.clone(),
                    value,
                    threshold: bound.to_threshold(channel.clone()),
                    message,
                });
            }
        }

        if !violations.is_empty() {
            let summary = violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join("; ");
            debug!(monitor_id = %self.monitor_id, violations = violations.len(), "monitor evaluation failed");
            return MonitorResult {
                monitor_id: self.monitor_id.clone(),
                verdict: MonitorVerdict::Fail,
                timestamp,
                state_id: state.state_id.clone(),
                violations,
                message: format!("failed: {summary}"),
            };
        }

        if checked == 0 {
            return MonitorResult {
                monitor_id: self.monitor_id.clone(),
                verdict: MonitorVerdict::Skip,
                timestamp,
                state_id: state.state_id.clone(),
                violations: Vec::new(),
                message: format!("no fields to check (skipped {skipped})"),
            };
        }

        MonitorResult {
            monitor_id: self.monitor_id.clone(),
            verdict: MonitorVerdict::Pass,
            timestamp,
            state_id: state.state_id.clone(),
            violations: Vec::new(),
            message: format!("all {checked} field(s) within bounds for {}", state.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::BoundSpec;
    use hiltest_core::{StateId, ThresholdBound};

    fn stable_state(id: &str) -> EnvironmentalState {
        EnvironmentalState {
            state_id: StateId::from(id),
            name: id.to_string(),
            description: String::new(),
            is_transition: false,
            metadata: HashMap::new(),
        }
    }

    fn monitor_with_bound(state: &str, channel: &str, low: f64, high: f64) -> Monitor {
        let mut channels = HashMap::new();
        channels.insert(
            ChannelId::from(channel),
            BoundSpec::bounds(Some(ThresholdBound::inclusive(low)), Some(ThresholdBound::inclusive(high))),
        );
        let mut bounds = HashMap::new();
        bounds.insert(StateId::from(state), channels);
        Monitor::new(MonitorDefinition::new("echo_voltage_monitor", bounds).unwrap())
    }

    #[test]
    fn transition_state_always_skips() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        let mut transition = stable_state("ambient");
        transition.is_transition = true;
        let mut values = HashMap::new();
        values.insert(ChannelId::from("voltage"), 2.5);

        let result = monitor.evaluate(&values, &transition);
        assert_eq!(result.verdict, MonitorVerdict::Skip);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn in_bounds_value_passes() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        let state = stable_state("ambient");
        let mut values = HashMap::new();
        values.insert(ChannelId::from("voltage"), 2.5);

        let result = monitor.evaluate(&values, &state);
        assert!(result.passed());
    }

    #[test]
    fn out_of_bounds_value_fails_with_violation() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        let state = stable_state("ambient");
        let mut values = HashMap::new();
        values.insert(ChannelId::from("voltage"), 9.0);

        let result = monitor.evaluate(&values, &state);
        assert!(result.failed());
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].channel, ChannelId::from("voltage"));
    }

    #[test]
    fn nan_value_fails() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        let state = stable_state("ambient");
        let mut values = HashMap::new();
        values.insert(ChannelId::from("voltage"), f64::NAN);

        let result = monitor.evaluate(&values, &state);
        assert!(result.failed());
    }

    #[test]
    fn unconfigured_channel_is_ignored_not_an_error() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        let state = stable_state("ambient");
        let mut values = HashMap::new();
        values.insert(ChannelId::from("current"), 9_999.0);

        let result = monitor.evaluate(&values, &state);
        assert_eq!(result.verdict, MonitorVerdict::Skip);
    }

    #[test]
    fn any_marker_is_skipped_not_checked() {
        let mut channels = HashMap::new();
        channels.insert(ChannelId::from("voltage"), BoundSpec::Any);
        let mut bounds = HashMap::new();
        bounds.insert(StateId::from("ambient"), channels);
        let monitor = Monitor::new(MonitorDefinition::new("echo", bounds).unwrap());

        let state = stable_state("ambient");
        let mut values = HashMap::new();
        values.insert(ChannelId::from("voltage"), f64::NAN);

        let result = monitor.evaluate(&values, &state);
        assert_eq!(result.verdict, MonitorVerdict::Skip);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn start_stop_toggle_is_running() {
        let monitor = monitor_with_bound("ambient", "voltage", 0.0, 5.0);
        assert!(!monitor.is_running());
        monitor.start();
        assert!(monitor.is_running());
        monitor.stop();
        assert!(!monitor.is_running());
    }
}
