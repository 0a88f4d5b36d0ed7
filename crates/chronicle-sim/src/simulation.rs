//! The [`Simulation`] accessor trait and its composition-time slot.
//!
//! The simulation itself lives in the host process; Chronicle only ever
//! reads it through this trait. One implementation exists per hosting
//! environment and is selected at composition time -- never discovered at
//! runtime. Reads are safe from any thread; all mutation goes through the
//! command executor on the authoritative task.

use std::sync::{Arc, RwLock};

use chronicle_types::{
    CharacterId, CharacterView, CityId, CityView, PlayerId, PlayerView, TeamAllianceRow,
    TeamDiplomacyRow, TileId, TribeAllianceRow, TribeDiplomacyRow, TribeView, UnitId, UnitView,
    WonderOwnership,
};

/// Errors surfaced by simulation reads.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The simulation has not been installed or has gone away.
    #[error("simulation not available")]
    Unavailable,

    /// A population or catalog read failed inside the host.
    #[error("failed to read {what}: {message}")]
    Read {
        /// What was being read, e.g. `units` or `wonder ownership`.
        what: String,
        /// Host-provided failure description.
        message: String,
    },
}

/// Convenience alias for simulation read results.
pub type SimResult<T> = Result<T, SimulationError>;

/// A domain of catalog names the resolver can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatalogDomain {
    /// Buildable unit types.
    UnitTypes,
    /// Buildable city projects.
    Projects,
    /// Researchable technologies.
    Techs,
    /// Unit promotions.
    Promotions,
    /// Tribes participating in the game.
    Tribes,
}

impl CatalogDomain {
    /// Human-readable domain name for error messages.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::UnitTypes => "unit type",
            Self::Projects => "project",
            Self::Techs => "technology",
            Self::Promotions => "promotion",
            Self::Tribes => "tribe",
        }
    }
}

/// Read-only access to the authoritative state of the running simulation.
///
/// All population reads return owned snapshots of the requested views;
/// callers never hold references into the host's object graph. Methods
/// returning `Option` are single lookups where absence is an expected
/// outcome, not a failure.
pub trait Simulation: Send + Sync {
    /// The simulation's monotonic turn counter.
    fn turn(&self) -> u32;

    /// The in-game year for the current turn.
    fn year(&self) -> i32;

    /// The player whose turn it currently is.
    fn current_player(&self) -> Option<PlayerId>;

    /// Whether the game is running in a multiplayer mode.
    ///
    /// Remote commands are single-authority only and are refused outright
    /// while this returns true.
    fn is_multiplayer(&self) -> bool;

    /// Whether the simulation currently permits actions (correct turn
    /// owner, no action lock held).
    fn can_act(&self) -> bool;

    /// All tracked characters, including dead ones.
    fn characters(&self) -> SimResult<Vec<CharacterView>>;

    /// All tracked units, including ones flagged dead this turn.
    fn units(&self) -> SimResult<Vec<UnitView>>;

    /// All cities.
    fn cities(&self) -> SimResult<Vec<CityView>>;

    /// All players.
    fn players(&self) -> SimResult<Vec<PlayerView>>;

    /// All tribes defined by the rule catalog, alive or dead.
    fn tribes(&self) -> SimResult<Vec<TribeView>>;

    /// Look up a single character.
    fn character(&self, id: CharacterId) -> Option<CharacterView>;

    /// Look up a single living unit. Dead units do not resolve.
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// Look up a single city.
    fn city(&self, id: CityId) -> Option<CityView>;

    /// Look up a single player by index.
    fn player(&self, id: PlayerId) -> Option<PlayerView>;

    /// Look up a tribe by catalog key, matched case-insensitively.
    fn tribe_by_key(&self, key: &str) -> Option<TribeView>;

    /// Catalog keys of every wonder type in the rule set.
    fn wonder_kinds(&self) -> SimResult<Vec<String>>;

    /// Current tri-state ownership of a wonder type.
    fn wonder_ownership(&self, wonder: &str) -> SimResult<WonderOwnership>;

    /// The city holding a tribe-owned wonder, when the host can resolve it.
    fn tribe_wonder_city(&self, wonder: &str, tribe: &str) -> Option<CityId>;

    /// The improvement built on a tile, when any.
    fn tile_improvement(&self, tile: TileId) -> Option<String>;

    /// All catalog names for a domain, used for name resolution.
    fn catalog(&self, domain: CatalogDomain) -> SimResult<Vec<String>>;

    /// Team-versus-team diplomacy table.
    fn team_diplomacy(&self) -> SimResult<Vec<TeamDiplomacyRow>>;

    /// Team alliance table.
    fn team_alliances(&self) -> SimResult<Vec<TeamAllianceRow>>;

    /// Tribe-versus-team diplomacy table.
    fn tribe_diplomacy(&self) -> SimResult<Vec<TribeDiplomacyRow>>;

    /// Tribe alliance table.
    fn tribe_alliances(&self) -> SimResult<Vec<TribeAllianceRow>>;
}

/// Shared handle to an installed simulation.
pub type SimulationHandle = Arc<dyn Simulation>;

/// A swappable slot holding the simulation handle, consulted per request.
///
/// The host installs its simulation here once it is ready; until then
/// every consumer observes `None` and degrades (the pull API answers 503,
/// the turn publisher broadcasts an error document). A poisoned lock is
/// treated as "not available" rather than propagated.
#[derive(Default)]
pub struct SimulationSlot {
    inner: RwLock<Option<SimulationHandle>>,
}

impl SimulationSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Create a slot with a simulation already installed.
    pub const fn with(sim: SimulationHandle) -> Self {
        Self {
            inner: RwLock::new(Some(sim)),
        }
    }

    /// The currently installed simulation, if any.
    pub fn get(&self) -> Option<SimulationHandle> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    /// Install (or replace) the simulation handle.
    pub fn install(&self, sim: SimulationHandle) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(sim);
        }
    }

    /// Remove the installed simulation, returning consumers to the
    /// not-yet-available state.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedSimulation;

    #[test]
    fn empty_slot_yields_none() {
        let slot = SimulationSlot::new();
        assert!(slot.get().is_none());
    }

    #[test]
    fn install_and_clear_cycle() {
        let slot = SimulationSlot::new();
        slot.install(Arc::new(ScriptedSimulation::new()));
        assert!(slot.get().is_some());
        slot.clear();
        assert!(slot.get().is_none());
    }
}
