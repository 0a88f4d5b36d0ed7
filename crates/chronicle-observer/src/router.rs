//! Axum router construction for the pull API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled so browser dashboards can query from any origin. OPTIONS
//! preflight requests are answered by the CORS layer; a known route hit
//! with an unsupported method is a 405, an unknown route a 404.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the pull API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/players", get(handlers::list_players))
        .route("/player/{index}", get(handlers::get_player))
        .route("/characters", get(handlers::list_characters))
        .route("/character/{id}", get(handlers::get_character))
        .route("/cities", get(handlers::list_cities))
        .route("/city/{id}", get(handlers::get_city))
        .route("/units", get(handlers::list_units))
        .route("/unit/{id}", get(handlers::get_unit))
        .route("/character-events", get(handlers::character_events))
        .route("/unit-events", get(handlers::unit_events))
        .route("/city-events", get(handlers::city_events))
        .route("/wonder-events", get(handlers::wonder_events))
        .route("/tribes", get(handlers::list_tribes))
        .route("/tribe/{name}", get(handlers::get_tribe))
        .route("/team-diplomacy", get(handlers::team_diplomacy))
        .route("/team-alliances", get(handlers::team_alliances))
        .route("/tribe-diplomacy", get(handlers::tribe_diplomacy))
        .route("/tribe-alliances", get(handlers::tribe_alliances))
        .route("/command", post(handlers::submit_command))
        .route("/commands", post(handlers::submit_commands))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
