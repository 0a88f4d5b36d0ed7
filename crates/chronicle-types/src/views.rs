//! Wire-facing views of live simulation entities.
//!
//! The simulation accessor materializes these records on demand; they carry
//! exactly what external consumers see plus the fields the diff engine
//! compares. Fields the simulation cannot always provide are explicit
//! `Option`s, decided once per field, rather than best-effort bags
//! assembled under a catch-all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, CityId, PlayerId, TileId, UnitId};

/// A map position: tile identifier plus grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilePoint {
    /// Tile identifier.
    pub tile_id: TileId,
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
}

/// A character as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterView {
    /// Stable character identifier.
    pub id: CharacterId,
    /// Display name, when the simulation has one.
    pub name: Option<String>,
    /// Whether the character has died.
    pub is_dead: bool,
    /// Whether the character currently leads a player nation.
    pub is_leader: bool,
    /// Whether the character is the designated heir.
    pub is_heir: bool,
    /// Owning player, absent for tribe or unaffiliated characters.
    pub player: Option<PlayerId>,
    /// Identifiers of all current spouses.
    pub spouse_ids: Vec<CharacterId>,
    /// Father's identifier, when known.
    pub father_id: Option<CharacterId>,
    /// Mother's identifier, when known.
    pub mother_id: Option<CharacterId>,
    /// Catalog key of the death reason, set only once dead.
    pub death_reason: Option<String>,
}

/// A unit as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    /// Stable unit identifier.
    pub id: UnitId,
    /// Catalog key of the unit type, e.g. `UNIT_SPEARMAN`.
    pub unit_type: String,
    /// Owning player, absent for tribe units.
    pub player: Option<PlayerId>,
    /// Whether the unit is dead (dead units are never snapshotted).
    pub is_dead: bool,
    /// Current hit points.
    pub hp: i32,
    /// Current map position.
    pub location: TilePoint,
}

/// A city as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityView {
    /// Stable city identifier.
    pub id: CityId,
    /// City display name.
    pub name: String,
    /// Current owner.
    pub owner: PlayerId,
    /// Whether the owner is a non-player tribe.
    pub is_tribe: bool,
    /// Current population.
    pub population: i32,
    /// City center position.
    pub center: TilePoint,
    /// Tiles inside this city's territory.
    pub territory_tiles: Vec<TileId>,
}

/// A player as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Player index.
    pub index: PlayerId,
    /// Team the player belongs to.
    pub team: i32,
    /// Catalog key of the player's nation.
    pub nation: Option<String>,
    /// Current leader character, when one exists.
    pub leader_id: Option<CharacterId>,
    /// Number of cities owned.
    pub num_cities: u32,
    /// Number of units owned.
    pub num_units: u32,
    /// Current legitimacy score.
    pub legitimacy: i32,
    /// Yield stockpiles keyed by yield catalog key.
    pub stockpiles: BTreeMap<String, i32>,
}

/// A tribe (non-player faction) as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeView {
    /// Catalog key, e.g. `TRIBE_NOMADS`.
    pub tribe_type: String,
    /// Whether the tribe is still alive.
    pub is_alive: bool,
    /// Leader character, when the tribe has one.
    pub leader_id: Option<CharacterId>,
    /// Allied player, when an alliance exists.
    pub ally_player: Option<PlayerId>,
    /// Number of units fielded.
    pub num_units: u32,
    /// Number of cities held.
    pub num_cities: u32,
    /// Computed military strength.
    pub strength: i32,
}

/// One entry in the team-versus-team diplomacy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDiplomacyRow {
    /// First team.
    pub team_a: i32,
    /// Second team.
    pub team_b: i32,
    /// Catalog key of the diplomatic state, e.g. `DIPLOMACY_WAR`.
    pub state: String,
}

/// One entry in the team alliance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAllianceRow {
    /// First team.
    pub team_a: i32,
    /// Second team.
    pub team_b: i32,
    /// Whether the two teams are currently allied.
    pub allied: bool,
}

/// One entry in the tribe-versus-team diplomacy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeDiplomacyRow {
    /// Tribe catalog key.
    pub tribe: String,
    /// Player team on the other side.
    pub team: i32,
    /// Catalog key of the diplomatic state.
    pub state: String,
}

/// One entry in the tribe alliance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeAllianceRow {
    /// Tribe catalog key.
    pub tribe: String,
    /// Allied player.
    pub player: PlayerId,
}
