// Copyright 2026 HIL Test Platform Team

//! Monitor definitions: per-state, per-channel bounds a monitor checks
//! values against.

use std::collections::HashMap;

use hiltest_core::{BoundType, ChannelId, StateId, Threshold, ThresholdBound};

use crate::error::{Error, Result};

/// The bound configured for one `(state, channel)` pair.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundSpec {
    /// This channel is intentionally unchecked in this state.
    Any,
    /// Concrete low/high bounds, either of which may be unset.
    Bounds {
        /// Lower bound, if any.
        low: Option<ThresholdBound>,
        /// Upper bound, if any.
        high: Option<ThresholdBound>,
    },
}

impl BoundSpec {
    /// Build a bound spec from low/high values.
    pub fn bounds(low: Option<ThresholdBound>, high: Option<ThresholdBound>) -> Self {
        Self::Bounds { low, high }
    }

    /// True for the `"any"` marker.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Check `value` against this bound. Always true for [`BoundSpec::Any`];
    /// callers are expected to treat `Any` as skipped rather than checked.
    pub fn check(&self, value: f64) -> bool {
        match self {
            Self::Any => true,
            Self::Bounds { low, high } => {
                if let Some(low) = low {
                    if !low.check_low(value) {
                        return false;
                    }
                }
                if let Some(high) = high {
                    if !high.check_high(value) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Render as a [`Threshold`] for violation reporting. `Any` has no
    /// sensible threshold representation; it reports unconstrained bounds
    /// since violations are never recorded against an `Any` bound anyway.
    pub fn to_threshold(&self, channel: ChannelId) -> Threshold {
        match self {
            Self::Any => Threshold { channel, low: None, high: None },
            Self::Bounds { low, high } => Threshold { channel, low: *low, high: *high },
        }
    }

    /// Check this bound's own coherence: a `NaN` bound value, a lower
    /// bound above the upper bound, or both bounds pinned to the same
    /// value with an exclusive side (which no value could ever satisfy).
    pub fn validate(&self) -> Result<()> {
        let Self::Bounds { low, high } = self else { return Ok(()) };

        if let Some(low) = low {
            if low.value.is_nan() {
                return Err(Error::InvalidThreshold("lower bound cannot be NaN".to_string()));
            }
        }
        if let Some(high) = high {
            if high.value.is_nan() {
                return Err(Error::InvalidThreshold("upper bound cannot be NaN".to_string()));
            }
        }
        if let (Some(low), Some(high)) = (low, high) {
            if low.value > high.value {
                return Err(Error::InvalidThreshold(format!(
                    "lower bound {} exceeds upper bound {}",
                    low.value, high.value
                )));
            }
            if low.value == high.value && (low.bound_type == BoundType::Exclusive || high.bound_type == BoundType::Exclusive)
            {
                return Err(Error::InvalidThreshold(format!(
                    "bounds pinned to {} with an exclusive side admit no value",
                    low.value
                )));
            }
        }
        Ok(())
    }
}

/// A named collection of per-state, per-channel bounds.
#[derive(Debug, Clone, Default)]
pub struct MonitorDefinition {
    /// The monitor's name, used as its default [`hiltest_core::MonitorId`].
    pub name: String,
    /// `state_id -> channel_id -> bound`.
    pub bounds: HashMap<StateId, HashMap<ChannelId, BoundSpec>>,
}

impl MonitorDefinition {
    /// Build a definition from a name and its per-state bound map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`] if any bound in `bounds` is
    /// incoherent (see [`BoundSpec::validate`]). Validation happens once,
    /// here at construction, not on every evaluation.
    pub fn new(name: impl Into<String>, bounds: HashMap<StateId, HashMap<ChannelId, BoundSpec>>) -> Result<Self> {
        for channels in bounds.values() {
            for bound in channels.values() {
                bound.validate()?;
            }
        }
        Ok(Self { name: name.into(), bounds })
    }

    /// Look up the bound for a `(state, channel)` pair, if one is defined.
    pub fn get_bounds(&self, state_id: &StateId, channel: &ChannelId) -> Option<&BoundSpec> {
        self.bounds.get(state_id)?.get(channel)
    }

    /// All channel names with a defined bound in `state_id`.
    pub fn channels_for_state<'a>(&'a self, state_id: &StateId) -> Box<dyn Iterator<Item = &'a ChannelId> + 'a> {
        match self.bounds.get(state_id) {
            Some(map) => Box::new(map.keys()),
            None => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_has_no_bounds() {
        let def = MonitorDefinition::new("echo", HashMap::new()).unwrap();
        assert!(def.get_bounds(&StateId::from("ambient"), &ChannelId::from("voltage")).is_none());
    }

    #[test]
    fn any_bound_always_checks_true_but_is_flagged() {
        let bound = BoundSpec::Any;
        assert!(bound.is_any());
        assert!(bound.check(f64::NAN));
    }

    #[test]
    fn bounds_check_delegates_to_threshold_bound() {
        let bound = BoundSpec::bounds(Some(ThresholdBound::inclusive(0.0)), Some(ThresholdBound::inclusive(10.0)));
        assert!(bound.check(5.0));
        assert!(!bound.check(11.0));
        assert!(!bound.check(f64::NAN));
    }

    #[test]
    fn any_bound_is_always_valid() {
        assert!(BoundSpec::Any.validate().is_ok());
    }

    #[test]
    fn low_above_high_is_invalid() {
        let bound = BoundSpec::bounds(Some(ThresholdBound::inclusive(10.0)), Some(ThresholdBound::inclusive(0.0)));
        assert!(matches!(bound.validate(), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn pinned_exclusive_bounds_are_invalid() {
        let bound = BoundSpec::bounds(Some(ThresholdBound::exclusive(5.0)), Some(ThresholdBound::inclusive(5.0)));
        assert!(matches!(bound.validate(), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn pinned_inclusive_bounds_are_valid() {
        let bound = BoundSpec::bounds(Some(ThresholdBound::inclusive(5.0)), Some(ThresholdBound::inclusive(5.0)));
        assert!(bound.validate().is_ok());
    }

    #[test]
    fn nan_bound_is_invalid() {
        let bound = BoundSpec::bounds(Some(ThresholdBound::inclusive(f64::NAN)), None);
        assert!(matches!(bound.validate(), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn definition_construction_rejects_incoherent_bounds() {
        let mut channels = HashMap::new();
        channels.insert(
            ChannelId::from("voltage"),
            BoundSpec::bounds(Some(ThresholdBound::inclusive(10.0)), Some(ThresholdBound::inclusive(0.0))),
        );
        let mut bounds = HashMap::new();
        bounds.insert(StateId::from("ambient"), channels);
        assert!(matches!(MonitorDefinition::new("echo", bounds), Err(Error::InvalidThreshold(_))));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a valid (low <= high, non-NaN, not pinned-exclusive)
            /// bound always validates, and a value at the midpoint of the
            /// range always passes its own check.
            #[test]
            fn prop_coherent_bounds_validate_and_accept_midpoint(low in -1e6f64..0.0, span in 0.0f64..1e6) {
                let high = low + span;
                let bound = BoundSpec::bounds(Some(ThresholdBound::inclusive(low)), Some(ThresholdBound::inclusive(high)));
                prop_assert!(bound.validate().is_ok());
                prop_assert!(bound.check(low + span / 2.0));
            }

            /// Property: whenever low > high, validation always rejects it,
            /// regardless of bound type.
            #[test]
            fn prop_low_above_high_always_invalid(
                low in 0.0f64..1e6,
                gap in 1e-6f64..1e6,
                low_exclusive in any::<bool>(),
                high_exclusive in any::<bool>(),
            ) {
                let high = low - gap;
                let low_bound = if low_exclusive { ThresholdBound::exclusive(low) } else { ThresholdBound::inclusive(low) };
                let high_bound = if high_exclusive { ThresholdBound::exclusive(high) } else { ThresholdBound::inclusive(high) };
                let bound = BoundSpec::bounds(Some(low_bound), Some(high_bound));
                prop_assert!(matches!(bound.validate(), Err(Error::InvalidThreshold(_))));
            }

            /// Property: a NaN bound value is never valid, on either side.
            #[test]
            fn prop_nan_bound_always_invalid(on_low in any::<bool>()) {
                let bound = if on_low {
                    BoundSpec::bounds(Some(ThresholdBound::inclusive(f64::NAN)), None)
                } else {
                    BoundSpec::bounds(None, Some(ThresholdBound::inclusive(f64::NAN)))
                };
                prop_assert!(matches!(bound.validate(), Err(Error::InvalidThreshold(_))));
            }

            /// Property: `Any` is valid under every input — there is nothing
            /// to validate when a channel is intentionally unchecked.
            #[test]
            fn prop_any_is_always_valid(_unused in any::<u8>()) {
                prop_assert!(BoundSpec::Any.validate().is_ok());
            }
        }
    }
}
