//! Typed game actions produced by the command resolver.
//!
//! [`ActionKind`] enumerates every action key the gateway understands;
//! [`GameAction`] is the fully resolved form with statically typed fields.
//! The loosely-typed wire envelope is decoded into these at the boundary,
//! so the executor and control surface never see raw parameter maps.

use serde::{Deserialize, Serialize};

use crate::enums::HurrySource;
use crate::ids::{CityId, TileId, UnitId};

/// Every command kind the gateway accepts, keyed by its wire `action` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Move a unit toward a target tile.
    MoveUnit,
    /// Attack a target tile with a unit.
    Attack,
    /// Fortify a unit in place.
    Fortify,
    /// Pass a unit's turn.
    Pass,
    /// Put a unit to sleep.
    Sleep,
    /// Set a unit to sentry.
    Sentry,
    /// Wake a sleeping or sentried unit.
    Wake,
    /// Disband a unit.
    Disband,
    /// Apply a promotion to a unit.
    Promote,
    /// Queue a unit build in a city.
    BuildUnit,
    /// Queue a project build in a city.
    BuildProject,
    /// Hurry city production with civics.
    HurryCivics,
    /// Hurry city production with training.
    HurryTraining,
    /// Hurry city production with money.
    HurryMoney,
    /// Hurry city production by consuming population.
    HurryPopulation,
    /// Hurry city production with orders.
    HurryOrders,
    /// Start researching a technology.
    Research,
    /// End the current player's turn.
    EndTurn,
}

impl ActionKind {
    /// Parse a wire action key. Keys are matched exactly (camelCase).
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "moveUnit" => Some(Self::MoveUnit),
            "attack" => Some(Self::Attack),
            "fortify" => Some(Self::Fortify),
            "pass" => Some(Self::Pass),
            "sleep" => Some(Self::Sleep),
            "sentry" => Some(Self::Sentry),
            "wake" => Some(Self::Wake),
            "disband" => Some(Self::Disband),
            "promote" => Some(Self::Promote),
            "buildUnit" => Some(Self::BuildUnit),
            "buildProject" => Some(Self::BuildProject),
            "hurryCivics" => Some(Self::HurryCivics),
            "hurryTraining" => Some(Self::HurryTraining),
            "hurryMoney" => Some(Self::HurryMoney),
            "hurryPopulation" => Some(Self::HurryPopulation),
            "hurryOrders" => Some(Self::HurryOrders),
            "research" => Some(Self::Research),
            "endTurn" => Some(Self::EndTurn),
            _ => None,
        }
    }

    /// The wire action key for this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::MoveUnit => "moveUnit",
            Self::Attack => "attack",
            Self::Fortify => "fortify",
            Self::Pass => "pass",
            Self::Sleep => "sleep",
            Self::Sentry => "sentry",
            Self::Wake => "wake",
            Self::Disband => "disband",
            Self::Promote => "promote",
            Self::BuildUnit => "buildUnit",
            Self::BuildProject => "buildProject",
            Self::HurryCivics => "hurryCivics",
            Self::HurryTraining => "hurryTraining",
            Self::HurryMoney => "hurryMoney",
            Self::HurryPopulation => "hurryPopulation",
            Self::HurryOrders => "hurryOrders",
            Self::Research => "research",
            Self::EndTurn => "endTurn",
        }
    }
}

/// A fully resolved command: typed fields, live entity ids, catalog keys
/// validated against the simulation's rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move a unit toward a tile, optionally via a waypoint.
    #[serde(rename_all = "camelCase")]
    MoveUnit {
        /// The unit to move.
        unit: UnitId,
        /// Destination tile.
        tile: TileId,
        /// Intermediate waypoint, when given.
        waypoint: Option<TileId>,
        /// Queue the move behind the unit's current orders.
        queued: bool,
        /// Force-march: spend extra fatigue to move farther.
        march: bool,
    },

    /// Attack the target tile.
    #[serde(rename_all = "camelCase")]
    Attack {
        /// The attacking unit.
        unit: UnitId,
        /// Tile under attack.
        tile: TileId,
    },

    /// Fortify the unit.
    Fortify {
        /// The unit to fortify.
        unit: UnitId,
    },

    /// Pass the unit's turn.
    Pass {
        /// The unit passing.
        unit: UnitId,
    },

    /// Put the unit to sleep.
    Sleep {
        /// The unit to sleep.
        unit: UnitId,
    },

    /// Set the unit to sentry.
    Sentry {
        /// The unit to sentry.
        unit: UnitId,
    },

    /// Wake the unit.
    Wake {
        /// The unit to wake.
        unit: UnitId,
    },

    /// Disband the unit.
    Disband {
        /// The unit to disband.
        unit: UnitId,
        /// Disband even when the unit could still act.
        force: bool,
    },

    /// Apply a promotion to the unit.
    Promote {
        /// The unit to promote.
        unit: UnitId,
        /// Resolved promotion catalog key.
        promotion: String,
    },

    /// Queue a unit build in a city.
    #[serde(rename_all = "camelCase")]
    BuildUnit {
        /// The producing city.
        city: CityId,
        /// Resolved unit type catalog key.
        unit_type: String,
        /// Rally point for the finished unit, when given.
        rally: Option<TileId>,
        /// Buy outright with resources instead of producing.
        buy: bool,
        /// Insert at the front of the build queue.
        first: bool,
    },

    /// Queue a project build in a city.
    BuildProject {
        /// The producing city.
        city: CityId,
        /// Resolved project catalog key.
        project: String,
        /// Buy outright instead of producing.
        buy: bool,
        /// Insert at the front of the build queue.
        first: bool,
        /// Repeat the project when it completes.
        repeat: bool,
    },

    /// Hurry a city's current production.
    Hurry {
        /// The city to hurry.
        city: CityId,
        /// What the city spends to hurry.
        source: HurrySource,
    },

    /// Start researching a technology.
    Research {
        /// Resolved technology catalog key.
        tech: String,
    },

    /// End the current player's turn.
    EndTurn {
        /// The simulation's current turn counter, injected by the executor.
        turn: u32,
        /// Force the end of turn even with unmoved units.
        force: bool,
    },
}

impl GameAction {
    /// The action kind this resolved action corresponds to.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::MoveUnit { .. } => ActionKind::MoveUnit,
            Self::Attack { .. } => ActionKind::Attack,
            Self::Fortify { .. } => ActionKind::Fortify,
            Self::Pass { .. } => ActionKind::Pass,
            Self::Sleep { .. } => ActionKind::Sleep,
            Self::Sentry { .. } => ActionKind::Sentry,
            Self::Wake { .. } => ActionKind::Wake,
            Self::Disband { .. } => ActionKind::Disband,
            Self::Promote { .. } => ActionKind::Promote,
            Self::BuildUnit { .. } => ActionKind::BuildUnit,
            Self::BuildProject { .. } => ActionKind::BuildProject,
            Self::Hurry { source, .. } => match source {
                HurrySource::Civics => ActionKind::HurryCivics,
                HurrySource::Training => ActionKind::HurryTraining,
                HurrySource::Money => ActionKind::HurryMoney,
                HurrySource::Population => ActionKind::HurryPopulation,
                HurrySource::Orders => ActionKind::HurryOrders,
            },
            Self::Research { .. } => ActionKind::Research,
            Self::EndTurn { .. } => ActionKind::EndTurn,
        }
    }
}
