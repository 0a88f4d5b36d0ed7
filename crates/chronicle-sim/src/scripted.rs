//! An in-memory, fully scriptable simulation for tests and local runs.
//!
//! [`ScriptedSimulation`] implements both [`Simulation`] and
//! [`ControlSurface`] over plain maps behind a mutex. Tests drive it with
//! the mutators, script per-read and per-action failures, and inspect the
//! actions that reached [`ControlSurface::dispatch`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chronicle_types::{
    ActionKind, CharacterId, CharacterView, CityId, CityView, EntityCategory, GameAction, PlayerId,
    PlayerView, TeamAllianceRow, TeamDiplomacyRow, TileId, TribeAllianceRow, TribeDiplomacyRow,
    TribeView, UnitId, UnitView, WonderOwnership,
};

use crate::control::{ControlError, ControlSurface};
use crate::simulation::{CatalogDomain, SimResult, Simulation, SimulationError};

#[derive(Default)]
struct Inner {
    turn: u32,
    year: i32,
    current_player: Option<PlayerId>,
    multiplayer: bool,
    can_act: bool,
    characters: BTreeMap<CharacterId, CharacterView>,
    units: BTreeMap<UnitId, UnitView>,
    cities: BTreeMap<CityId, CityView>,
    players: BTreeMap<PlayerId, PlayerView>,
    tribes: BTreeMap<String, TribeView>,
    wonders: BTreeMap<String, WonderOwnership>,
    tile_improvements: BTreeMap<TileId, String>,
    catalogs: BTreeMap<CatalogDomain, Vec<String>>,
    team_diplomacy: Vec<TeamDiplomacyRow>,
    team_alliances: Vec<TeamAllianceRow>,
    tribe_diplomacy: Vec<TribeDiplomacyRow>,
    tribe_alliances: Vec<TribeAllianceRow>,
    failing_reads: BTreeSet<EntityCategory>,
    failing_wonders: BTreeSet<String>,
    failing_actions: BTreeSet<ActionKind>,
    dispatched: Vec<GameAction>,
}

/// A scriptable in-memory simulation.
///
/// All methods take `&self`; interior state lives behind a mutex so a
/// single instance can serve as both the read accessor and the control
/// surface across tasks.
#[derive(Default)]
pub struct ScriptedSimulation {
    inner: Mutex<Inner>,
}

impl ScriptedSimulation {
    /// Create an empty simulation at turn 0 with actions permitted.
    pub fn new() -> Self {
        let sim = Self::default();
        sim.with_inner(|inner| inner.can_act = true);
        sim
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Set the turn counter.
    pub fn set_turn(&self, turn: u32) {
        self.with_inner(|inner| inner.turn = turn);
    }

    /// Advance the turn counter by one.
    pub fn advance_turn(&self) {
        self.with_inner(|inner| inner.turn = inner.turn.saturating_add(1));
    }

    /// Set the in-game year.
    pub fn set_year(&self, year: i32) {
        self.with_inner(|inner| inner.year = year);
    }

    /// Set the player whose turn it is.
    pub fn set_current_player(&self, player: Option<PlayerId>) {
        self.with_inner(|inner| inner.current_player = player);
    }

    /// Toggle multiplayer mode.
    pub fn set_multiplayer(&self, multiplayer: bool) {
        self.with_inner(|inner| inner.multiplayer = multiplayer);
    }

    /// Toggle whether actions are currently permitted.
    pub fn set_can_act(&self, can_act: bool) {
        self.with_inner(|inner| inner.can_act = can_act);
    }

    /// Insert or replace a character.
    pub fn upsert_character(&self, view: CharacterView) {
        self.with_inner(|inner| {
            inner.characters.insert(view.id, view);
        });
    }

    /// Remove a character entirely.
    pub fn remove_character(&self, id: CharacterId) {
        self.with_inner(|inner| {
            inner.characters.remove(&id);
        });
    }

    /// Insert or replace a unit.
    pub fn upsert_unit(&self, view: UnitView) {
        self.with_inner(|inner| {
            inner.units.insert(view.id, view);
        });
    }

    /// Remove a unit entirely.
    pub fn remove_unit(&self, id: UnitId) {
        self.with_inner(|inner| {
            inner.units.remove(&id);
        });
    }

    /// Insert or replace a city.
    pub fn upsert_city(&self, view: CityView) {
        self.with_inner(|inner| {
            inner.cities.insert(view.id, view);
        });
    }

    /// Remove a city entirely.
    pub fn remove_city(&self, id: CityId) {
        self.with_inner(|inner| {
            inner.cities.remove(&id);
        });
    }

    /// Insert or replace a player.
    pub fn upsert_player(&self, view: PlayerView) {
        self.with_inner(|inner| {
            inner.players.insert(view.index, view);
        });
    }

    /// Insert or replace a tribe.
    pub fn upsert_tribe(&self, view: TribeView) {
        self.with_inner(|inner| {
            inner.tribes.insert(view.tribe_type.clone(), view);
        });
    }

    /// Set the ownership of a wonder kind, registering the kind if new.
    pub fn set_wonder(&self, wonder: impl Into<String>, ownership: WonderOwnership) {
        self.with_inner(|inner| {
            inner.wonders.insert(wonder.into(), ownership);
        });
    }

    /// Set the improvement present on a tile.
    pub fn set_tile_improvement(&self, tile: TileId, improvement: impl Into<String>) {
        self.with_inner(|inner| {
            inner.tile_improvements.insert(tile, improvement.into());
        });
    }

    /// Replace the name catalog for a domain.
    pub fn set_catalog(&self, domain: CatalogDomain, names: Vec<String>) {
        self.with_inner(|inner| {
            inner.catalogs.insert(domain, names);
        });
    }

    /// Replace the team diplomacy table.
    pub fn set_team_diplomacy(&self, rows: Vec<TeamDiplomacyRow>) {
        self.with_inner(|inner| inner.team_diplomacy = rows);
    }

    /// Replace the team alliance table.
    pub fn set_team_alliances(&self, rows: Vec<TeamAllianceRow>) {
        self.with_inner(|inner| inner.team_alliances = rows);
    }

    /// Replace the tribe diplomacy table.
    pub fn set_tribe_diplomacy(&self, rows: Vec<TribeDiplomacyRow>) {
        self.with_inner(|inner| inner.tribe_diplomacy = rows);
    }

    /// Replace the tribe alliance table.
    pub fn set_tribe_alliances(&self, rows: Vec<TribeAllianceRow>) {
        self.with_inner(|inner| inner.tribe_alliances = rows);
    }

    /// Script the population read for a category to fail.
    pub fn fail_population_read(&self, category: EntityCategory) {
        self.with_inner(|inner| {
            inner.failing_reads.insert(category);
        });
    }

    /// Script the ownership read for a wonder kind to fail.
    pub fn fail_wonder_read(&self, wonder: impl Into<String>) {
        self.with_inner(|inner| {
            inner.failing_wonders.insert(wonder.into());
        });
    }

    /// Script dispatch of an action kind to fail with a rejection.
    pub fn fail_action(&self, kind: ActionKind) {
        self.with_inner(|inner| {
            inner.failing_actions.insert(kind);
        });
    }

    /// Every action that reached [`ControlSurface::dispatch`] so far, in
    /// dispatch order.
    pub fn dispatched(&self) -> Vec<GameAction> {
        self.with_inner(|inner| inner.dispatched.clone())
    }

    fn read_failure(what: &str) -> SimulationError {
        SimulationError::Read {
            what: what.to_owned(),
            message: String::from("scripted failure"),
        }
    }
}

impl Simulation for ScriptedSimulation {
    fn turn(&self) -> u32 {
        self.with_inner(|inner| inner.turn)
    }

    fn year(&self) -> i32 {
        self.with_inner(|inner| inner.year)
    }

    fn current_player(&self) -> Option<PlayerId> {
        self.with_inner(|inner| inner.current_player)
    }

    fn is_multiplayer(&self) -> bool {
        self.with_inner(|inner| inner.multiplayer)
    }

    fn can_act(&self) -> bool {
        self.with_inner(|inner| inner.can_act)
    }

    fn characters(&self) -> SimResult<Vec<CharacterView>> {
        self.with_inner(|inner| {
            if inner.failing_reads.contains(&EntityCategory::Character) {
                return Err(Self::read_failure("characters"));
            }
            Ok(inner.characters.values().cloned().collect())
        })
    }

    fn units(&self) -> SimResult<Vec<UnitView>> {
        self.with_inner(|inner| {
            if inner.failing_reads.contains(&EntityCategory::Unit) {
                return Err(Self::read_failure("units"));
            }
            Ok(inner.units.values().cloned().collect())
        })
    }

    fn cities(&self) -> SimResult<Vec<CityView>> {
        self.with_inner(|inner| {
            if inner.failing_reads.contains(&EntityCategory::City) {
                return Err(Self::read_failure("cities"));
            }
            Ok(inner.cities.values().cloned().collect())
        })
    }

    fn players(&self) -> SimResult<Vec<PlayerView>> {
        self.with_inner(|inner| Ok(inner.players.values().cloned().collect()))
    }

    fn tribes(&self) -> SimResult<Vec<TribeView>> {
        self.with_inner(|inner| Ok(inner.tribes.values().cloned().collect()))
    }

    fn character(&self, id: CharacterId) -> Option<CharacterView> {
        self.with_inner(|inner| inner.characters.get(&id).cloned())
    }

    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.with_inner(|inner| {
            inner
                .units
                .get(&id)
                .filter(|unit| !unit.is_dead)
                .cloned()
        })
    }

    fn city(&self, id: CityId) -> Option<CityView> {
        self.with_inner(|inner| inner.cities.get(&id).cloned())
    }

    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.with_inner(|inner| inner.players.get(&id).cloned())
    }

    fn tribe_by_key(&self, key: &str) -> Option<TribeView> {
        self.with_inner(|inner| {
            inner
                .tribes
                .values()
                .find(|tribe| tribe.tribe_type.eq_ignore_ascii_case(key))
                .cloned()
        })
    }

    fn wonder_kinds(&self) -> SimResult<Vec<String>> {
        self.with_inner(|inner| Ok(inner.wonders.keys().cloned().collect()))
    }

    fn wonder_ownership(&self, wonder: &str) -> SimResult<WonderOwnership> {
        self.with_inner(|inner| {
            if inner.failing_wonders.contains(wonder) {
                return Err(Self::read_failure("wonder ownership"));
            }
            Ok(inner
                .wonders
                .get(wonder)
                .cloned()
                .unwrap_or(WonderOwnership::Unowned))
        })
    }

    fn tribe_wonder_city(&self, wonder: &str, tribe: &str) -> Option<CityId> {
        self.with_inner(|inner| {
            let owned_by_tribe = matches!(
                inner.wonders.get(wonder),
                Some(WonderOwnership::Tribe(owner)) if owner == tribe
            );
            if !owned_by_tribe {
                return None;
            }
            inner
                .cities
                .values()
                .find(|city| city.is_tribe)
                .map(|city| city.id)
        })
    }

    fn tile_improvement(&self, tile: TileId) -> Option<String> {
        self.with_inner(|inner| inner.tile_improvements.get(&tile).cloned())
    }

    fn catalog(&self, domain: CatalogDomain) -> SimResult<Vec<String>> {
        self.with_inner(|inner| Ok(inner.catalogs.get(&domain).cloned().unwrap_or_default()))
    }

    fn team_diplomacy(&self) -> SimResult<Vec<TeamDiplomacyRow>> {
        self.with_inner(|inner| Ok(inner.team_diplomacy.clone()))
    }

    fn team_alliances(&self) -> SimResult<Vec<TeamAllianceRow>> {
        self.with_inner(|inner| Ok(inner.team_alliances.clone()))
    }

    fn tribe_diplomacy(&self) -> SimResult<Vec<TribeDiplomacyRow>> {
        self.with_inner(|inner| Ok(inner.tribe_diplomacy.clone()))
    }

    fn tribe_alliances(&self) -> SimResult<Vec<TribeAllianceRow>> {
        self.with_inner(|inner| Ok(inner.tribe_alliances.clone()))
    }
}

impl ControlSurface for ScriptedSimulation {
    fn dispatch(&self, action: &GameAction) -> Result<Option<serde_json::Value>, ControlError> {
        self.with_inner(|inner| {
            if inner.failing_actions.contains(&action.kind()) {
                return Err(ControlError::Rejected {
                    message: format!("{} refused by script", action.kind().key()),
                });
            }
            inner.dispatched.push(action.clone());
            Ok(None)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chronicle_types::TilePoint;

    fn unit(id: i32, dead: bool) -> UnitView {
        UnitView {
            id: UnitId::new(id),
            unit_type: String::from("UNIT_SPEARMAN"),
            player: Some(PlayerId::new(0)),
            is_dead: dead,
            hp: 10,
            location: TilePoint {
                tile_id: TileId::new(1),
                x: 0,
                y: 0,
            },
        }
    }

    #[test]
    fn dead_units_do_not_resolve_individually() {
        let sim = ScriptedSimulation::new();
        sim.upsert_unit(unit(7, true));
        assert!(sim.unit(UnitId::new(7)).is_none());
        // Population reads still include them for the diff engine.
        assert_eq!(sim.units().unwrap().len(), 1);
    }

    #[test]
    fn tribe_lookup_is_case_insensitive() {
        let sim = ScriptedSimulation::new();
        sim.upsert_tribe(TribeView {
            tribe_type: String::from("TRIBE_NOMADS"),
            is_alive: true,
            leader_id: None,
            ally_player: None,
            num_units: 3,
            num_cities: 0,
            strength: 12,
        });
        assert!(sim.tribe_by_key("tribe_nomads").is_some());
        assert!(sim.tribe_by_key("TRIBE_REBELS").is_none());
    }

    #[test]
    fn scripted_read_failure_surfaces_as_error() {
        let sim = ScriptedSimulation::new();
        sim.fail_population_read(EntityCategory::Unit);
        assert!(sim.units().is_err());
        assert!(sim.characters().is_ok());
    }

    #[test]
    fn scripted_dispatch_failure_and_recording() {
        let sim = ScriptedSimulation::new();
        sim.fail_action(ActionKind::Pass);
        let pass = GameAction::Pass {
            unit: UnitId::new(1),
        };
        let wake = GameAction::Wake {
            unit: UnitId::new(1),
        };
        assert!(ControlSurface::dispatch(&sim, &pass).is_err());
        assert!(ControlSurface::dispatch(&sim, &wake).is_ok());
        assert_eq!(sim.dispatched().len(), 1);
    }
}
