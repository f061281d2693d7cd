//! Strongly typed identifier wrappers.
//!
//! Driver and stop identifiers arrive from upstream systems as free-form
//! strings (`driver_001`, `driver_001_stop_003`).  Wrapping them keeps a stop
//! id from being passed where a driver id is expected.  Both are `Ord` so they
//! can key `BTreeMap`s and give deterministic iteration order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed string key.
macro_rules! typed_key {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_key! {
    /// Identifies one driver (and therefore one route) in the fleet.
    pub struct DriverId;
}

typed_key! {
    /// Identifies one delivery stop.  Unique within a driver's route.
    pub struct StopId;
}
