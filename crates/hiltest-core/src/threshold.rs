// Copyright 2026 HIL Test Platform Team

//! Threshold definitions for validating measurement values against
//! acceptable bounds, organized per environmental state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, StateId};

/// Whether a boundary value is itself considered within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundType {
    /// The boundary value itself passes (`<=`, `>=`).
    Inclusive,
    /// The boundary value itself fails (`<`, `>`).
    Exclusive,
}

/// A single low or high boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBound {
    /// The boundary value. `NaN` never satisfies either check.
    pub value: f64,
    /// Whether the boundary itself is in-bounds.
    #[serde(default = "default_bound_type")]
    pub bound_type: BoundType,
}

fn default_bound_type() -> BoundType {
    BoundType::Inclusive
}

impl ThresholdBound {
    /// Build an inclusive bound at `value`.
    pub fn inclusive(value: f64) -> Self {
        Self { value, bound_type: BoundType::Inclusive }
    }

    /// Build an exclusive bound at `value`.
    pub fn exclusive(value: f64) -> Self {
        Self { value, bound_type: BoundType::Exclusive }
    }

    /// Check `test_value` against this as a lower bound. `NaN` always fails.
    pub fn check_low(&self, test_value: f64) -> bool {
        if test_value.is_nan() {
            return false;
        }
        match self.bound_type {
            BoundType::Inclusive => test_value >= self.value,
            BoundType::Exclusive => test_value > self.value,
        }
    }

    /// Check `test_value` against this as an upper bound. `NaN` always fails.
    pub fn check_high(&self, test_value: f64) -> bool {
        if test_value.is_nan() {
            return false;
        }
        match self.bound_type {
            BoundType::Inclusive => test_value <= self.value,
            BoundType::Exclusive => test_value < self.value,
        }
    }
}

/// Acceptable range for a measurement channel. Either bound may be
/// unset (`None`), meaning that side is unconstrained — equivalent to the
/// wire format's "any" marker for that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// The channel this threshold applies to.
    pub channel: ChannelId,
    /// Lower bound, or `None` for no lower limit.
    #[serde(default)]
    pub low: Option<ThresholdBound>,
    /// Upper bound, or `None` for no upper limit.
    #[serde(default)]
    pub high: Option<ThresholdBound>,
}

impl Threshold {
    /// Check whether `value` satisfies both configured bounds. A bound
    /// that is `None` is treated as always satisfied.
    pub fn check(&self, value: f64) -> bool {
        if let Some(low) = &self.low {
            if !low.check_low(value) {
                return false;
            }
        }
        if let Some(high) = &self.high {
            if !high.check_high(value) {
                return false;
            }
        }
        true
    }
}

/// Per-channel thresholds that apply while a station is in a particular
/// environmental state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateThresholds {
    /// The state these thresholds apply to.
    pub state_id: StateId,
    /// Mapping from channel to its threshold for this state.
    pub thresholds: HashMap<ChannelId, Threshold>,
}

impl StateThresholds {
    /// Look up the threshold for a channel.
    pub fn get_threshold(&self, channel: &ChannelId) -> Option<&Threshold> {
        self.thresholds.get(channel)
    }

    /// Check a value against a channel's threshold. Returns `None` if no
    /// threshold is defined for the channel (the channel is silently
    /// unmonitored in this state).
    pub fn check_value(&self, channel: &ChannelId, value: f64) -> Option<bool> {
        self.get_threshold(channel).map(|t| t.check(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_bound_accepts_boundary_value() {
        let bound = ThresholdBound::inclusive(5.0);
        assert!(bound.check_high(5.0));
        assert!(bound.check_low(5.0));
    }

    #[test]
    fn exclusive_bound_rejects_boundary_value() {
        let bound = ThresholdBound::exclusive(5.0);
        assert!(!bound.check_high(5.0));
        assert!(!bound.check_low(5.0));
    }

    #[test]
    fn nan_fails_every_bound() {
        let low = ThresholdBound::inclusive(-1.0);
        let high = ThresholdBound::inclusive(1.0);
        assert!(!low.check_low(f64::NAN));
        assert!(!high.check_high(f64::NAN));
    }

    #[test]
    fn infinities_are_checked_numerically() {
        let high = ThresholdBound::inclusive(100.0);
        assert!(!high.check_high(f64::INFINITY));
        assert!(high.check_high(f64::NEG_INFINITY));
    }

    #[test]
    fn unset_bound_is_always_satisfied() {
        let threshold = Threshold { channel: ChannelId::from("temp"), low: None, high: None };
        assert!(threshold.check(f64::MAX));
        assert!(threshold.check(f64::MIN));
    }

    #[test]
    fn unknown_channel_returns_none() {
        let thresholds = StateThresholds {
            state_id: StateId::from("ambient"),
            thresholds: HashMap::new(),
        };
        assert_eq!(thresholds.check_value(&ChannelId::from("voltage"), 1.0), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: NaN never satisfies a bound, regardless of value or type.
            #[test]
            fn prop_nan_always_fails(value in any::<f64>(), exclusive in any::<bool>()) {
                let bound = if exclusive { ThresholdBound::exclusive(value) } else { ThresholdBound::inclusive(value) };
                prop_assert!(!bound.check_low(f64::NAN));
                prop_assert!(!bound.check_high(f64::NAN));
            }

            /// Property: an inclusive bound always accepts its own boundary value.
            #[test]
            fn prop_inclusive_accepts_own_boundary(value in -1e12f64..1e12f64) {
                let bound = ThresholdBound::inclusive(value);
                prop_assert!(bound.check_low(value));
                prop_assert!(bound.check_high(value));
            }

            /// Property: an exclusive bound always rejects its own boundary value.
            #[test]
            fn prop_exclusive_rejects_own_boundary(value in -1e12f64..1e12f64) {
                let bound = ThresholdBound::exclusive(value);
                prop_assert!(!bound.check_low(value));
                prop_assert!(!bound.check_high(value));
            }

            /// Property: a threshold with no configured bounds on a side accepts
            /// every finite value on that side.
            #[test]
            fn prop_unset_bound_accepts_everything(value in any::<f64>()) {
                let threshold = Threshold { channel: ChannelId::from("x"), low: None, high: None };
                prop_assert!(threshold.check(value) || value.is_nan());
            }

            /// Property: a value strictly between low and high always passes a
            /// two-sided inclusive threshold.
            #[test]
            fn prop_value_between_bounds_passes(low in -1e6f64..0.0, span in 0.0f64..1e6) {
                let high = low + span;
                let threshold = Threshold {
                    channel: ChannelId::from("x"),
                    low: Some(ThresholdBound::inclusive(low)),
                    high: Some(ThresholdBound::inclusive(high)),
                };
                let midpoint = low + span / 2.0;
                prop_assert!(threshold.check(midpoint));
            }
        }
    }
}
