//! The turn-boundary publisher.
//!
//! Runs on the authoritative task. At each turn boundary it drives the
//! diff engine over every category, then broadcasts one self-contained
//! aggregate document over the push channel. The same document shape is
//! sent for the initial `gameReady` contact, with empty event lists,
//! after the detectors baseline against the starting population.

use std::sync::Arc;

use chronicle_events::EventDetector;
use chronicle_sim::{Simulation, SimulationSlot};
use chronicle_types::EntityCategory;

use crate::handlers::read_or_empty;
use crate::push::PushServer;

/// Publishes turn-boundary documents to the push channel.
pub struct TurnPublisher {
    simulation: Arc<SimulationSlot>,
    detector: EventDetector,
    push: Arc<PushServer>,
}

impl TurnPublisher {
    /// Create a publisher owning the process's one diff engine instance.
    pub const fn new(
        simulation: Arc<SimulationSlot>,
        detector: EventDetector,
        push: Arc<PushServer>,
    ) -> Self {
        Self {
            simulation,
            detector,
            push,
        }
    }

    /// Handle the simulation's first-contact signal.
    ///
    /// Baselines every category so the starting population is never
    /// reported as newly created, then broadcasts a `gameReady` document
    /// with empty event lists.
    pub async fn game_ready(&mut self) {
        let Some(sim) = self.simulation.get() else {
            self.broadcast_unavailable("gameReady").await;
            return;
        };
        self.detector.baseline(sim.as_ref()).await;
        let document = self.document("gameReady", sim.as_ref()).await;
        self.push.broadcast(&document).await;
    }

    /// Handle a turn boundary: detect, cache, broadcast `newTurn`.
    pub async fn turn_boundary(&mut self) {
        let Some(sim) = self.simulation.get() else {
            self.broadcast_unavailable("newTurn").await;
            return;
        };
        for category in EntityCategory::ALL {
            self.detector.detect(category, sim.as_ref()).await;
        }
        let document = self.document("newTurn", sim.as_ref()).await;
        self.push.broadcast(&document).await;
        tracing::info!(turn = sim.turn(), "turn boundary published");
    }

    async fn broadcast_unavailable(&self, event: &str) {
        tracing::warn!(event, "turn publish with no simulation installed");
        let document = serde_json::json!({
            "event": event,
            "error": "simulation not available",
        });
        self.push.broadcast(&document.to_string()).await;
    }

    async fn document(&self, event: &str, sim: &dyn Simulation) -> String {
        let cache = self.detector.cache();
        serde_json::json!({
            "event": event,
            "turn": sim.turn(),
            "year": sim.year(),
            "currentPlayer": sim.current_player(),
            "characterEvents": cache.latest(EntityCategory::Character).await,
            "unitEvents": cache.latest(EntityCategory::Unit).await,
            "cityEvents": cache.latest(EntityCategory::City).await,
            "wonderEvents": cache.latest(EntityCategory::Wonder).await,
            "players": read_or_empty(sim.players(), "players"),
            "characters": read_or_empty(sim.characters(), "characters"),
            "cities": read_or_empty(sim.cities(), "cities"),
            "teamDiplomacy": read_or_empty(sim.team_diplomacy(), "team diplomacy"),
            "teamAlliances": read_or_empty(sim.team_alliances(), "team alliances"),
            "tribes": read_or_empty(sim.tribes(), "tribes"),
            "tribeDiplomacy": read_or_empty(sim.tribe_diplomacy(), "tribe diplomacy"),
            "tribeAlliances": read_or_empty(sim.tribe_alliances(), "tribe alliances"),
        })
        .to_string()
    }
}
