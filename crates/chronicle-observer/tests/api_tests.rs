//! Integration tests for the pull API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without opening a TCP socket. A scripted simulation backs every
//! request; commands run against a real executor task.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chronicle_commands::{CommandClient, CommandExecutor};
use chronicle_events::EventCache;
use chronicle_observer::router::build_router;
use chronicle_observer::state::AppState;
use chronicle_sim::{ControlSlot, ScriptedSimulation, SimulationSlot};
use chronicle_types::{
    CharacterId, EntityCategory, PlayerId, TileId, TilePoint, TribeView, TurnEvent, UnitId,
    UnitView,
};
use serde_json::Value;
use tower::ServiceExt;

struct Harness {
    sim: Arc<ScriptedSimulation>,
    cache: Arc<EventCache>,
    router: Router,
}

fn harness() -> Harness {
    let sim = Arc::new(ScriptedSimulation::new());
    let slot = Arc::new(SimulationSlot::with(sim.clone()));
    let control = Arc::new(ControlSlot::with(sim.clone()));
    let cache = Arc::new(EventCache::new());

    let executor = CommandExecutor::new(Arc::clone(&slot), control);
    let (commands, mut receiver) = CommandClient::channel(Duration::from_secs(1));
    tokio::spawn(async move {
        while let Some(queued) = receiver.recv().await {
            executor.handle(queued);
        }
    });

    let state = Arc::new(AppState::new(slot, Arc::clone(&cache), commands));
    Harness {
        sim,
        cache,
        router: build_router(state),
    }
}

fn empty_router() -> Router {
    let (commands, _receiver) = CommandClient::channel(Duration::from_millis(50));
    let state = Arc::new(AppState::new(
        Arc::new(SimulationSlot::new()),
        Arc::new(EventCache::new()),
        commands,
    ));
    build_router(state)
}

fn spearman(id: i32) -> UnitView {
    UnitView {
        id: UnitId::new(id),
        unit_type: String::from("UNIT_SPEARMAN"),
        player: Some(PlayerId::new(0)),
        is_dead: false,
        hp: 8,
        location: TilePoint {
            tile_id: TileId::new(id),
            x: id,
            y: 0,
        },
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn state_aggregates_the_turn_header_and_collections() {
    let h = harness();
    h.sim.set_turn(12);
    h.sim.set_year(-2840);
    h.sim.set_current_player(Some(PlayerId::new(0)));
    h.sim.upsert_unit(spearman(1));

    let (status, body) = get(&h.router, "/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], 12);
    assert_eq!(body["year"], -2840);
    assert_eq!(body["currentPlayer"], 0);
    assert!(body["players"].as_array().unwrap().is_empty());
    assert!(body["tribeAlliances"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_simulation_is_a_503_everywhere() {
    let router = empty_router();
    for uri in ["/state", "/units", "/character/3", "/tribes"] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body["error"], "simulation not available");
    }
}

#[tokio::test]
async fn unit_pagination_slices_and_reports_has_more() {
    let h = harness();
    for id in 0..25 {
        h.sim.upsert_unit(spearman(id));
    }

    let (status, body) = get(&h.router, "/units?offset=0&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["hasMore"], true);

    let (_, body) = get(&h.router, "/units?offset=20&limit=10").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["hasMore"], false);

    let (status, body) = get(&h.router, "/units?offset=500&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["hasMore"], false);
}

#[tokio::test]
async fn single_lookups_resolve_or_404() {
    let h = harness();
    h.sim.upsert_unit(spearman(7));
    h.sim.upsert_tribe(TribeView {
        tribe_type: String::from("TRIBE_NOMADS"),
        is_alive: true,
        leader_id: Some(CharacterId::new(2)),
        ally_player: None,
        num_units: 4,
        num_cities: 0,
        strength: 9,
    });

    let (status, body) = get(&h.router, "/unit/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unitType"], "UNIT_SPEARMAN");

    let (status, body) = get(&h.router, "/unit/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found: unit 99");

    // Tribe lookup is case-insensitive on the catalog key.
    let (status, body) = get(&h.router, "/tribe/tribe_nomads").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tribeType"], "TRIBE_NOMADS");

    let (status, _) = get(&h.router, "/tribe/TRIBE_REBELS").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn population_read_failure_degrades_to_an_empty_page() {
    let h = harness();
    h.sim.upsert_unit(spearman(1));
    h.sim.fail_population_read(EntityCategory::Unit);

    let (status, body) = get(&h.router, "/units").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn event_routes_serve_the_latest_cached_turn() {
    let h = harness();
    h.cache
        .store(
            EntityCategory::Character,
            vec![TurnEvent::CharacterDied {
                character_id: CharacterId::new(4),
                death_reason: Some(String::from("DEATH_PLAGUE")),
            }],
        )
        .await;

    let (status, body) = get(&h.router, "/character-events").await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["eventType"], "characterDied");
    assert_eq!(events[0]["deathReason"], "DEATH_PLAGUE");

    let (status, body) = get(&h.router, "/wonder-events").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_routes_and_methods_are_distinguished() {
    let h = harness();

    let (status, _) = get(&h.router, "/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A real route hit with the wrong method is a 405, not a 404.
    let response = h
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn command_route_reports_success_and_failure_in_the_envelope() {
    let h = harness();
    h.sim.upsert_unit(spearman(3));

    let ok = serde_json::json!({
        "action": "pass",
        "requestId": "r1",
        "params": {"unitId": 3},
    });
    let (status, body) = post_json(&h.router, "/command", &ok).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["requestId"], "r1");
    assert_eq!(h.sim.dispatched().len(), 1);

    let unknown = serde_json::json!({"action": "fly"});
    let (status, body) = post_json(&h.router, "/command", &unknown).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unknown action: fly");
}

#[tokio::test]
async fn bulk_command_route_reports_the_stop_index() {
    let h = harness();
    h.sim.upsert_unit(spearman(3));

    let bulk = serde_json::json!({
        "requestId": "batch",
        "commands": [
            {"action": "pass", "params": {"unitId": 3}},
            {"action": "pass", "params": {"unitId": 42}},
            {"action": "pass", "params": {"unitId": 3}},
        ],
        "stopOnError": true,
    });
    let (status, body) = post_json(&h.router, "/commands", &bulk).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["allSucceeded"], false);
    assert_eq!(body["stoppedAtIndex"], 1);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(h.sim.dispatched().len(), 1);
}

#[tokio::test]
async fn command_route_without_a_simulation_is_a_503() {
    let router = empty_router();
    let command = serde_json::json!({"action": "endTurn"});
    let (status, _) = post_json(&router, "/command", &command).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
