//! Enumeration types shared across the Chronicle workspace.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

// ---------------------------------------------------------------------------
// Entity categories
// ---------------------------------------------------------------------------

/// The categories of entity the diff engine tracks.
///
/// Each category has its own snapshot map, its own last-processed turn,
/// and its own slot in the event cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityCategory {
    /// Named characters: rulers, heirs, spouses, courtiers.
    Character,
    /// Military and civilian units on the map.
    Unit,
    /// Cities, including tribe settlements promoted to cities.
    City,
    /// Wonders, tracked per wonder type rather than per city.
    Wonder,
}

impl EntityCategory {
    /// All categories in the order the turn publisher runs them.
    pub const ALL: [Self; 4] = [Self::Character, Self::Unit, Self::City, Self::Wonder];
}

// ---------------------------------------------------------------------------
// Wonder ownership
// ---------------------------------------------------------------------------

/// Tri-state ownership of a wonder type.
///
/// A wonder can exist in at most one city at a time, so ownership is a
/// property of the wonder type, not of any particular city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WonderOwnership {
    /// No city has completed this wonder yet.
    Unowned,
    /// Completed inside a player's territory.
    Player(PlayerId),
    /// Completed inside a tribe's territory, keyed by tribe catalog key.
    Tribe(String),
}

impl WonderOwnership {
    /// Whether the wonder is completed and owned by anyone.
    pub const fn is_owned(&self) -> bool {
        !matches!(self, Self::Unowned)
    }
}

// ---------------------------------------------------------------------------
// Hurry sources
// ---------------------------------------------------------------------------

/// The resource a city spends to hurry its current production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HurrySource {
    /// Spend civics.
    Civics,
    /// Spend training.
    Training,
    /// Spend money.
    Money,
    /// Consume population.
    Population,
    /// Spend orders.
    Orders,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wonder_ownership_owned_states() {
        assert!(!WonderOwnership::Unowned.is_owned());
        assert!(WonderOwnership::Player(PlayerId::new(0)).is_owned());
        assert!(WonderOwnership::Tribe(String::from("TRIBE_NOMADS")).is_owned());
    }

    #[test]
    fn categories_are_ordered_for_publishing() {
        assert_eq!(
            EntityCategory::ALL,
            [
                EntityCategory::Character,
                EntityCategory::Unit,
                EntityCategory::City,
                EntityCategory::Wonder,
            ]
        );
    }
}
