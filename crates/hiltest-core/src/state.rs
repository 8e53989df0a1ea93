// Copyright 2026 HIL Test Platform Team

//! Environmental state types: the discrete conditions a station cycles
//! through during a HALT/HASS profile (ambient, thermal soak, vibration,
//! transitions between them) and the record of moving between them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ids::StateId;
use crate::timestamp::Timestamp;

/// A discrete environmental condition a station can be in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalState {
    /// Unique identifier for this state.
    pub state_id: StateId,
    /// Human-readable name.
    pub name: String,
    /// Longer description of the condition.
    pub description: String,
    /// Whether this state represents a transient ramp between two stable
    /// states rather than a stable condition itself. Monitors must not
    /// evaluate pass/fail verdicts while in a transition state.
    #[serde(default)]
    pub is_transition: bool,
    /// Free-form metadata (e.g. target setpoints); preserved verbatim.
    #[serde(default)]
    pub metadata: HashMap<String, JsonValue>,
}

/// A record of the station moving from one state to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left, or `None` if this is the first state of a run.
    pub from_state: Option<StateId>,
    /// The state being entered.
    pub to_state: StateId,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Free-form reason for the transition (operator note, profile step name).
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_json() {
        let state = EnvironmentalState {
            state_id: StateId::from("ambient"),
            name: "Ambient".to_string(),
            description: "Room temperature baseline".to_string(),
            is_transition: false,
            metadata: HashMap::new(),
        };
        let bytes = serde_json::to_vec(&state).unwrap();
        let decoded: EnvironmentalState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn transition_round_trips_through_json() {
        let transition = StateTransition {
            from_state: Some(StateId::from("ambient")),
            to_state: StateId::from("thermal_soak"),
            timestamp: Timestamp::now("local"),
            reason: "profile step 2".to_string(),
        };
        let bytes = serde_json::to_vec(&transition).unwrap();
        let decoded: StateTransition = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(transition, decoded);
    }

    #[test]
    fn first_transition_has_no_from_state() {
        let transition = StateTransition {
            from_state: None,
            to_state: StateId::from("ambient"),
            timestamp: Timestamp::now("local"),
            reason: String::new(),
        };
        assert!(transition.from_state.is_none());
    }
}
