//! Domain events computed by the per-turn snapshot diff.
//!
//! Events are ephemeral: the event cache holds only the most recently
//! completed turn's list per category, and the push channel delivers each
//! list at most once inside the turn-boundary broadcast. On the wire every
//! event is a self-describing object tagged with `eventType`.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, CityId, PlayerId, UnitId};
use crate::views::TilePoint;

/// A single domain event detected at a turn boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "camelCase")]
pub enum TurnEvent {
    /// A character entered the population this turn.
    #[serde(rename_all = "camelCase")]
    CharacterBorn {
        /// The newborn character.
        character_id: CharacterId,
        /// Parents, when resolvable (father first when both are known).
        parent_ids: Vec<CharacterId>,
    },

    /// A character's dead flag transitioned false to true.
    #[serde(rename_all = "camelCase")]
    CharacterDied {
        /// The deceased character.
        character_id: CharacterId,
        /// Catalog key of the death reason, when resolvable.
        death_reason: Option<String>,
    },

    /// A character became a player's leader.
    #[serde(rename_all = "camelCase")]
    LeaderChanged {
        /// The player whose leadership changed, absent for tribes.
        player_id: Option<PlayerId>,
        /// The new leader.
        new_leader_id: CharacterId,
        /// The character who previously held the leader flag for the same
        /// player, absent when none did.
        old_leader_id: Option<CharacterId>,
    },

    /// A character became a player's designated heir.
    #[serde(rename_all = "camelCase")]
    HeirChanged {
        /// The player whose heir changed, absent for tribes.
        player_id: Option<PlayerId>,
        /// The new heir.
        new_heir_id: CharacterId,
        /// The previous heir for the same player, when one existed.
        old_heir_id: Option<CharacterId>,
    },

    /// Two characters became spouses.
    ///
    /// Emitted exactly once per pair, attributed to the member with the
    /// lower identifier.
    #[serde(rename_all = "camelCase")]
    CharacterMarried {
        /// The lower-id spouse.
        character1_id: CharacterId,
        /// The higher-id spouse.
        character2_id: CharacterId,
    },

    /// A unit left the population or is now flagged dead.
    #[serde(rename_all = "camelCase")]
    UnitKilled {
        /// The killed unit.
        unit_id: UnitId,
        /// Last known unit type.
        unit_type: String,
        /// Last known owner, absent for tribe units.
        last_owner_id: Option<PlayerId>,
        /// Last known map position.
        last_location: TilePoint,
    },

    /// A living unit appeared that was absent from the old snapshot.
    #[serde(rename_all = "camelCase")]
    UnitCreated {
        /// The new unit.
        unit_id: UnitId,
        /// Unit type catalog key.
        unit_type: String,
        /// Owning player, absent for tribe units.
        player_id: Option<PlayerId>,
        /// Map position at creation.
        location: TilePoint,
    },

    /// A city present in both snapshots changed owner.
    #[serde(rename_all = "camelCase")]
    CityCaptured {
        /// The captured city.
        city_id: CityId,
        /// Current city name.
        city_name: String,
        /// Owner before the capture.
        old_owner_id: PlayerId,
        /// Owner after the capture.
        new_owner_id: PlayerId,
        /// Whether the previous owner was a non-player tribe.
        was_tribe: bool,
    },

    /// A city appeared that was absent from the old snapshot.
    #[serde(rename_all = "camelCase")]
    CityFounded {
        /// The new city.
        city_id: CityId,
        /// City name.
        city_name: String,
        /// Founding player.
        player_id: PlayerId,
        /// City center position.
        location: TilePoint,
    },

    /// A wonder type transitioned from unowned to owned.
    #[serde(rename_all = "camelCase")]
    WonderCompleted {
        /// Wonder catalog key, e.g. `IMPROVEMENT_GREAT_LIGHTHOUSE`.
        wonder: String,
        /// City containing the wonder, when resolvable.
        city_id: Option<CityId>,
        /// Owning player, when player-owned.
        player_id: Option<PlayerId>,
        /// Owning tribe catalog key, when tribe-owned.
        tribe: Option<String>,
    },
}

impl TurnEvent {
    /// Whether this event reports an entity entering the population.
    pub const fn is_creation(&self) -> bool {
        matches!(
            self,
            Self::CharacterBorn { .. } | Self::UnitCreated { .. } | Self::CityFounded { .. }
        )
    }
}
