// Copyright 2026 HIL Test Platform Team

//! Wire envelope published on the state subject.
//!
//! [`StateTransition`] alone only carries state ids; subscribers that join
//! mid-run still need the full target state (name, description, metadata),
//! so each message on the bus bundles the transition with the state it
//! moves into.

use hiltest_core::{EnvironmentalState, StateTransition};
use serde::{Deserialize, Serialize};

/// A single message published on the state bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    /// The transition record (from/to ids, timestamp, reason).
    pub transition: StateTransition,
    /// The full state being entered.
    pub state: EnvironmentalState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiltest_core::{StateId, Timestamp};
    use std::collections::HashMap;

    #[test]
    fn round_trips_through_json() {
        let message = StateMessage {
            transition: StateTransition {
                from_state: None,
                to_state: StateId::from("ambient"),
                timestamp: Timestamp::now("local"),
                reason: "profile start".to_string(),
            },
            state: EnvironmentalState {
                state_id: StateId::from("ambient"),
                name: "Ambient".to_string(),
                description: "Room temperature baseline".to_string(),
                is_transition: false,
                metadata: HashMap::new(),
            },
        };
        let bytes = serde_json::to_vec(&message).unwrap();
        let decoded: StateMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(message, decoded);
    }
}
