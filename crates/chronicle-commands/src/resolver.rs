//! Decodes the loosely-typed wire envelope into a typed [`GameAction`].
//!
//! Each action kind declares which named parameters it requires, their
//! expected primitive kinds, and which string parameters are catalog
//! lookups. Resolution errors are precise: a missing parameter, a
//! present-but-wrong-type parameter, a name with no catalog match, and an
//! id that does not resolve to a live entity are four distinct failures.

use chronicle_sim::{CatalogDomain, Simulation};
use chronicle_types::{
    ActionKind, CityId, Command, GameAction, HurrySource, ParamValue, TileId, UnitId,
};

/// Why a command could not be resolved into a [`GameAction`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A required parameter was absent.
    #[error("{action}: missing required parameter '{name}'")]
    MissingParameter {
        /// Wire action key.
        action: &'static str,
        /// Parameter name.
        name: &'static str,
    },

    /// A parameter was present with the wrong kind.
    #[error("{action}: parameter '{name}' must be {expected}, got {got}")]
    InvalidParameter {
        /// Wire action key.
        action: &'static str,
        /// Parameter name.
        name: &'static str,
        /// Expected kind.
        expected: &'static str,
        /// Kind actually received.
        got: &'static str,
    },

    /// A name had no case-insensitive match in the relevant catalog.
    #[error("unknown {domain} name '{name}'")]
    UnknownName {
        /// Catalog domain searched.
        domain: &'static str,
        /// The unmatched name as received.
        name: String,
    },

    /// An entity id did not resolve to a live entity.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity category.
        entity: &'static str,
        /// The unresolved id.
        id: i32,
    },

    /// The catalog itself could not be read.
    #[error("failed to read {domain} catalog: {message}")]
    CatalogUnavailable {
        /// Catalog domain.
        domain: &'static str,
        /// Read failure description.
        message: String,
    },
}

/// Resolve a command of a known kind into a typed action.
///
/// Entity ids are checked against the live simulation here, so dispatch
/// never sees a stale reference. `endTurn` captures the simulation's
/// current turn counter at resolve time.
pub fn resolve(
    kind: ActionKind,
    command: &Command,
    sim: &dyn Simulation,
) -> Result<GameAction, ResolveError> {
    let params = Params {
        action: kind.key(),
        command,
    };
    match kind {
        ActionKind::MoveUnit => Ok(GameAction::MoveUnit {
            unit: live_unit(sim, params.required_id("unitId")?)?,
            tile: TileId::new(params.required_id("tileId")?),
            waypoint: params.optional_id("waypointTileId")?.map(TileId::new),
            queued: params.flag("queued", false)?,
            march: params.flag("march", false)?,
        }),
        ActionKind::Attack => Ok(GameAction::Attack {
            unit: live_unit(sim, params.required_id("unitId")?)?,
            tile: TileId::new(params.required_id("tileId")?),
        }),
        ActionKind::Fortify => Ok(GameAction::Fortify {
            unit: live_unit(sim, params.required_id("unitId")?)?,
        }),
        ActionKind::Pass => Ok(GameAction::Pass {
            unit: live_unit(sim, params.required_id("unitId")?)?,
        }),
        ActionKind::Sleep => Ok(GameAction::Sleep {
            unit: live_unit(sim, params.required_id("unitId")?)?,
        }),
        ActionKind::Sentry => Ok(GameAction::Sentry {
            unit: live_unit(sim, params.required_id("unitId")?)?,
        }),
        ActionKind::Wake => Ok(GameAction::Wake {
            unit: live_unit(sim, params.required_id("unitId")?)?,
        }),
        ActionKind::Disband => Ok(GameAction::Disband {
            unit: live_unit(sim, params.required_id("unitId")?)?,
            force: params.flag("force", false)?,
        }),
        ActionKind::Promote => Ok(GameAction::Promote {
            unit: live_unit(sim, params.required_id("unitId")?)?,
            promotion: catalog_name(
                sim,
                CatalogDomain::Promotions,
                params.required_text("promotion")?,
            )?,
        }),
        ActionKind::BuildUnit => Ok(GameAction::BuildUnit {
            city: live_city(sim, params.required_id("cityId")?)?,
            unit_type: catalog_name(
                sim,
                CatalogDomain::UnitTypes,
                params.required_text("unitType")?,
            )?,
            rally: params.optional_id("rally")?.map(TileId::new),
            buy: params.flag("buy", false)?,
            first: params.flag("first", false)?,
        }),
        ActionKind::BuildProject => Ok(GameAction::BuildProject {
            city: live_city(sim, params.required_id("cityId")?)?,
            project: catalog_name(
                sim,
                CatalogDomain::Projects,
                params.required_text("project")?,
            )?,
            buy: params.flag("buy", false)?,
            first: params.flag("first", false)?,
            repeat: params.flag("repeat", false)?,
        }),
        ActionKind::HurryCivics
        | ActionKind::HurryTraining
        | ActionKind::HurryMoney
        | ActionKind::HurryPopulation
        | ActionKind::HurryOrders => Ok(GameAction::Hurry {
            city: live_city(sim, params.required_id("cityId")?)?,
            source: hurry_source(kind),
        }),
        ActionKind::Research => Ok(GameAction::Research {
            tech: catalog_name(sim, CatalogDomain::Techs, params.required_text("tech")?)?,
        }),
        ActionKind::EndTurn => Ok(GameAction::EndTurn {
            turn: sim.turn(),
            force: params.flag("force", true)?,
        }),
    }
}

const fn hurry_source(kind: ActionKind) -> HurrySource {
    match kind {
        ActionKind::HurryTraining => HurrySource::Training,
        ActionKind::HurryMoney => HurrySource::Money,
        ActionKind::HurryPopulation => HurrySource::Population,
        ActionKind::HurryOrders => HurrySource::Orders,
        _ => HurrySource::Civics,
    }
}

struct Params<'a> {
    action: &'static str,
    command: &'a Command,
}

impl Params<'_> {
    fn required_id(&self, name: &'static str) -> Result<i32, ResolveError> {
        match self.command.param(name) {
            None => Err(ResolveError::MissingParameter {
                action: self.action,
                name,
            }),
            Some(value) => self.as_id(name, value),
        }
    }

    fn optional_id(&self, name: &'static str) -> Result<Option<i32>, ResolveError> {
        match self.command.param(name) {
            None => Ok(None),
            Some(value) => self.as_id(name, value).map(Some),
        }
    }

    fn as_id(&self, name: &'static str, value: &ParamValue) -> Result<i32, ResolveError> {
        value
            .as_integer()
            .and_then(|raw| i32::try_from(raw).ok())
            .ok_or(ResolveError::InvalidParameter {
                action: self.action,
                name,
                expected: "an integer id",
                got: value.kind_name(),
            })
    }

    fn required_text(&self, name: &'static str) -> Result<&str, ResolveError> {
        match self.command.param(name) {
            None => Err(ResolveError::MissingParameter {
                action: self.action,
                name,
            }),
            Some(value) => value.as_text().ok_or(ResolveError::InvalidParameter {
                action: self.action,
                name,
                expected: "a string",
                got: value.kind_name(),
            }),
        }
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, ResolveError> {
        match self.command.param(name) {
            None => Ok(default),
            Some(value) => value.as_flag().ok_or(ResolveError::InvalidParameter {
                action: self.action,
                name,
                expected: "a boolean",
                got: value.kind_name(),
            }),
        }
    }
}

fn live_unit(sim: &dyn Simulation, id: i32) -> Result<UnitId, ResolveError> {
    let unit = UnitId::new(id);
    sim.unit(unit)
        .map(|_| unit)
        .ok_or(ResolveError::NotFound { entity: "unit", id })
}

fn live_city(sim: &dyn Simulation, id: i32) -> Result<CityId, ResolveError> {
    let city = CityId::new(id);
    sim.city(city)
        .map(|_| city)
        .ok_or(ResolveError::NotFound { entity: "city", id })
}

fn catalog_name(
    sim: &dyn Simulation,
    domain: CatalogDomain,
    name: &str,
) -> Result<String, ResolveError> {
    let names = sim
        .catalog(domain)
        .map_err(|error| ResolveError::CatalogUnavailable {
            domain: domain.describe(),
            message: error.to_string(),
        })?;
    names
        .into_iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
        .ok_or_else(|| ResolveError::UnknownName {
            domain: domain.describe(),
            name: name.to_owned(),
        })
}
