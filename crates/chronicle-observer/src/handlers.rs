//! Pull API endpoint handlers.
//!
//! Every handler materializes its own response from the simulation handle
//! and the event cache; nothing is held across requests. Read paths
//! degrade rather than fail: a population-level read failure serves an
//! empty collection, and a missing entity is a 404, never a 500.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/state` | Aggregate game state |
//! | `GET` | `/players`, `/player/{index}` | Players |
//! | `GET` | `/characters`, `/character/{id}` | Characters (list paginated) |
//! | `GET` | `/cities`, `/city/{id}` | Cities (list paginated) |
//! | `GET` | `/units`, `/unit/{id}` | Units (list paginated) |
//! | `GET` | `/character-events` etc. | Latest turn's events per category |
//! | `GET` | `/tribes`, `/tribe/{name}` | Tribes |
//! | `GET` | `/team-diplomacy` etc. | Diplomacy and alliance tables |
//! | `POST` | `/command`, `/commands` | Remote command submission |

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chronicle_sim::SimResult;
use chronicle_types::{
    BulkCommand, CharacterId, CityId, Command, EntityCategory, PlayerId, UnitId,
};

use crate::error::ObserverError;
use crate::state::{AppState, PageQuery};

/// Unwrap a population read, serving an empty collection on failure.
pub(crate) fn read_or_empty<T>(result: SimResult<Vec<T>>, what: &'static str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(what, %error, "population read failed, serving empty collection");
            Vec::new()
        }
    }
}

/// Aggregate game state: turn header plus every top-level collection.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    let body = serde_json::json!({
        "turn": sim.turn(),
        "year": sim.year(),
        "currentPlayer": sim.current_player(),
        "players": read_or_empty(sim.players(), "players"),
        "characters": read_or_empty(sim.characters(), "characters"),
        "cities": read_or_empty(sim.cities(), "cities"),
        "tribes": read_or_empty(sim.tribes(), "tribes"),
        "teamDiplomacy": read_or_empty(sim.team_diplomacy(), "team diplomacy"),
        "teamAlliances": read_or_empty(sim.team_alliances(), "team alliances"),
        "tribeDiplomacy": read_or_empty(sim.tribe_diplomacy(), "tribe diplomacy"),
        "tribeAlliances": read_or_empty(sim.tribe_alliances(), "tribe alliances"),
    });
    Ok(Json(body))
}

/// List all players.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.players(), "players")))
}

/// Single player by index.
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(index): Path<i32>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    sim.player(PlayerId::new(index))
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("player {index}")))
}

/// List characters, paginated.
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    let items = read_or_empty(sim.characters(), "characters");
    Ok(Json(state.pages.paginate(items, &page)))
}

/// Single character by id.
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    sim.character(CharacterId::new(id))
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("character {id}")))
}

/// List cities, paginated.
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    let items = read_or_empty(sim.cities(), "cities");
    Ok(Json(state.pages.paginate(items, &page)))
}

/// Single city by id.
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    sim.city(CityId::new(id))
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("city {id}")))
}

/// List units, paginated. Includes units flagged dead this turn.
pub async fn list_units(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    let items = read_or_empty(sim.units(), "units");
    Ok(Json(state.pages.paginate(items, &page)))
}

/// Single living unit by id.
pub async fn get_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    sim.unit(UnitId::new(id))
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("unit {id}")))
}

/// Latest turn's character events.
pub async fn character_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.events.latest(EntityCategory::Character).await)
}

/// Latest turn's unit events.
pub async fn unit_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.events.latest(EntityCategory::Unit).await)
}

/// Latest turn's city events.
pub async fn city_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.events.latest(EntityCategory::City).await)
}

/// Latest turn's wonder events.
pub async fn wonder_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.events.latest(EntityCategory::Wonder).await)
}

/// List all tribes, alive or dead.
pub async fn list_tribes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.tribes(), "tribes")))
}

/// Single tribe by catalog key, matched case-insensitively.
pub async fn get_tribe(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    sim.tribe_by_key(&name)
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("tribe {name}")))
}

/// Team-versus-team diplomacy table.
pub async fn team_diplomacy(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.team_diplomacy(), "team diplomacy")))
}

/// Team alliance table.
pub async fn team_alliances(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.team_alliances(), "team alliances")))
}

/// Tribe-versus-team diplomacy table.
pub async fn tribe_diplomacy(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.tribe_diplomacy(), "tribe diplomacy")))
}

/// Tribe alliance table.
pub async fn tribe_alliances(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let sim = state.require_simulation()?;
    Ok(Json(read_or_empty(sim.tribe_alliances(), "tribe alliances")))
}

/// Submit one command and wait for its result.
///
/// A failed command is a 400 carrying the result envelope; the submit
/// timeout surfaces the same way.
pub async fn submit_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, ObserverError> {
    state.require_simulation()?;
    let result = state.commands.submit(command).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(result)))
}

/// Submit an ordered command batch.
pub async fn submit_commands(
    State(state): State<Arc<AppState>>,
    Json(bulk): Json<BulkCommand>,
) -> Result<impl IntoResponse, ObserverError> {
    state.require_simulation()?;
    let result = state.commands.submit_bulk(bulk).await;
    let status = if result.all_succeeded {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(result)))
}
