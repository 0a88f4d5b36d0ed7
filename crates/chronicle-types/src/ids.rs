//! Type-safe identifier wrappers around the simulation's integer ids.
//!
//! The simulation assigns every tracked entity a stable `i32` identifier,
//! unique within its category and never reused while the entity is tracked.
//! Each category gets a newtype so identifiers cannot be mixed at compile
//! time. On the wire an id serializes as a bare integer.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `i32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wrap a raw simulation identifier.
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Return the raw `i32` value.
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a character in the simulation.
    CharacterId
}

define_id! {
    /// Unique identifier for a unit.
    UnitId
}

define_id! {
    /// Unique identifier for a city.
    CityId
}

define_id! {
    /// Index of a player participating in the simulation.
    PlayerId
}

define_id! {
    /// Unique identifier for a map tile.
    TileId
}
