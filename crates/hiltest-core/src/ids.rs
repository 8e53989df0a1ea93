// Copyright 2026 HIL Test Platform Team

//! Newtype identifiers shared across the telemetry and evaluation core.
//!
//! Each identifier wraps a `String` rather than aliasing it, so that a
//! `ChannelId` and a `StateId` cannot be interchanged by accident even
//! though both are strings at rest.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies the origin of a telemetry stream (an instrument or UUT channel group).
    SourceId
);
string_id!(
    /// Identifies a single measurement channel within a stream.
    ChannelId
);
string_id!(
    /// Identifies an environmental state (e.g. `"ambient"`, `"thermal_soak"`).
    StateId
);
string_id!(
    /// Identifies a configured monitor instance.
    MonitorId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner_string() {
        let id = ChannelId::from("voltage_bus_1");
        assert_eq!(id.to_string(), "voltage_bus_1");
        assert_eq!(id.as_str(), "voltage_bus_1");
    }

    #[test]
    fn distinct_id_types_do_not_unify() {
        let source = SourceId::from("dmm-1");
        let channel = ChannelId::from("dmm-1");
        assert_eq!(source.as_str(), channel.as_str());
    }
}
