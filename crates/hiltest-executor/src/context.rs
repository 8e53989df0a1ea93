// Copyright 2026 HIL Test Platform Team

//! Test execution context: shared state across a run's phases.

use std::any::Any;
use std::collections::HashMap;

use hiltest_core::{EnvironmentalState, StateId, Timestamp};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Context shared across a test execution: the current environmental
/// state, timing, artifacts, and arbitrary shared resources (instrument
/// handles, connections) that phase actions need to reach each other
/// through.
pub struct TestContext {
    /// Unique identifier for this run.
    pub test_id: String,
    /// Human-readable description.
    pub description: String,
    /// When the run started.
    pub start_time: Option<Timestamp>,
    /// When the run ended.
    pub end_time: Option<Timestamp>,
    /// The environmental state of the phase currently running.
    pub current_state: Option<EnvironmentalState>,
    /// Free-form metadata supplied at run start.
    pub metadata: HashMap<String, JsonValue>,
    /// Named artifact paths produced during the run.
    pub artifacts: HashMap<String, String>,
    resources: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl TestContext {
    /// Build a fresh context for `test_id`.
    pub fn new(test_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            description: description.into(),
            start_time: None,
            end_time: None,
            current_state: None,
            metadata: HashMap::new(),
            artifacts: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    /// Mark the run as started.
    pub fn start(&mut self) {
        self.start_time = Some(Timestamp::now("executor"));
    }

    /// Mark the run as stopped.
    pub fn stop(&mut self) {
        self.end_time = Some(Timestamp::now("executor"));
    }

    /// Run duration in nanoseconds, once both `start` and `stop` have run.
    pub fn duration_ns(&self) -> Option<i64> {
        Some(self.end_time.as_ref()?.unix_ns - self.start_time.as_ref()?.unix_ns)
    }

    /// Run duration in seconds, once both `start` and `stop` have run.
    pub fn duration_seconds(&self) -> Option<f64> {
        Some(self.duration_ns()? as f64 / 1_000_000_000.0)
    }

    /// Set the environmental state the current phase is running in.
    pub fn set_state(&mut self, state: EnvironmentalState) {
        debug!(state_id = %state.state_id, "context state changed");
        self.current_state = Some(state);
    }

    /// The current state's id, if one has been set.
    pub fn state_id(&self) -> Option<&StateId> {
        Some(&self.current_state.as_ref()?.state_id)
    }

    /// Record an artifact produced during the run.
    pub fn add_artifact(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.artifacts.insert(name.into(), path.into());
    }

    /// Look up a recorded artifact by name.
    pub fn get_artifact(&self, name: &str) -> Option<&String> {
        self.artifacts.get(name)
    }

    /// Store a shared resource under `name`, replacing any prior value.
    pub fn set_resource<T: Any + Send + Sync>(&mut self, name: impl Into<String>, resource: T) {
        self.resources.insert(name.into(), Box::new(resource));
    }

    /// Borrow a shared resource by name and expected type.
    pub fn get_resource<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.resources.get(name)?.downcast_ref::<T>()
    }

    /// True if a resource with this name has been stored.
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;

    #[test]
    fn duration_is_none_until_started_and_stopped() {
        let context = TestContext::new("run-1", "");
        assert!(context.duration_ns().is_none());
    }

    #[test]
    fn resources_round_trip_by_type() {
        let mut context = TestContext::new("run-1", "");
        context.set_resource("counter", 42i32);
        assert_eq!(context.get_resource::<i32>("counter"), Some(&42));
        assert!(context.has_resource("counter"));
        assert!(context.get_resource::<String>("counter").is_none());
    }

    #[test]
    fn artifacts_round_trip() {
        let mut context = TestContext::new("run-1", "");
        context.add_artifact("log", "/tmp/log.csv");
        assert_eq!(context.get_artifact("log"), Some(&"/tmp/log.csv".to_string()));
        assert_eq!(context.get_artifact("missing"), None);
    }

    #[test]
    fn metadata_defaults_empty() {
        let context = TestContext::new("run-1", "");
        let empty: StdHashMap<String, JsonValue> = StdHashMap::new();
        assert_eq!(context.metadata, empty);
    }
}
