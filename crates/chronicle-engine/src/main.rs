//! Chronicle gateway binary.
//!
//! This is the main entry point that wires together the two network
//! surfaces and the authoritative loop. It loads configuration, seeds
//! the demo simulation, starts the push listener and the pull API
//! server, and then owns the single task on which all simulation
//! access, event detection, and command execution happen.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `chronicle.yaml`
//! 3. Build the demo simulation and install it in the slots
//! 4. Bind the push listener and start accepting subscribers
//! 5. Create the command queue
//! 6. Start the pull API server
//! 7. Broadcast `gameReady` and enter the authoritative loop

mod config;
mod demo;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chronicle_commands::{CommandClient, CommandExecutor};
use chronicle_events::{EventCache, EventDetector};
use chronicle_observer::{AppState, PageLimits, PushServer, ServerConfig, TurnPublisher};
use chronicle_sim::{ControlSlot, SimulationSlot};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::demo::build as build_demo;
use crate::error::EngineError;

/// Application entry point for the Chronicle gateway.
///
/// # Errors
///
/// Returns an error if configuration loading or either listener's bind
/// fails.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("chronicle-engine starting");

    // 2. Load configuration.
    let config = EngineConfig::from_file(Path::new("chronicle.yaml"))?;
    info!(
        push_port = config.push.port,
        pull_port = config.pull.port,
        submit_timeout_ms = config.commands.submit_timeout_ms,
        turn_interval_ms = config.demo.turn_interval_ms,
        "Configuration loaded"
    );

    // 3. Build the demo simulation and install it.
    let sim = Arc::new(build_demo());
    let simulation = Arc::new(SimulationSlot::with(
        Arc::clone(&sim) as chronicle_sim::SimulationHandle
    ));
    let control = Arc::new(ControlSlot::with(
        Arc::clone(&sim) as chronicle_sim::ControlHandle
    ));
    info!(turn = 1, "Demo simulation installed");

    // 4. Bind the push listener.
    let push = Arc::new(PushServer::new());
    let push_addr = format!("{}:{}", config.push.host, config.push.port);
    let push_listener = TcpListener::bind(&push_addr)
        .await
        .map_err(|source| EngineError::PushBind { source })?;
    info!(addr = %push_addr, "Push listener bound");
    {
        let push = Arc::clone(&push);
        tokio::spawn(async move {
            push.accept_loop(push_listener).await;
        });
    }

    // 5. Create the command queue.
    let submit_timeout = Duration::from_millis(config.commands.submit_timeout_ms);
    let (commands, mut command_rx) = CommandClient::channel(submit_timeout);
    let executor = CommandExecutor::new(Arc::clone(&simulation), Arc::clone(&control));

    // 6. Start the pull API server.
    let cache = Arc::new(EventCache::new());
    let mut state = AppState::new(Arc::clone(&simulation), Arc::clone(&cache), commands);
    state.pages = PageLimits {
        default_limit: config.pagination.default_limit,
        max_limit: config.pagination.max_limit,
    };
    let server_config = ServerConfig {
        host: config.pull.host.clone(),
        port: config.pull.port,
    };
    let state = Arc::new(state);
    tokio::spawn(async move {
        if let Err(e) = chronicle_observer::start_server(&server_config, state).await {
            error!(error = %e, "pull API server exited");
        }
    });

    // 7. Enter the authoritative loop.
    let detector = EventDetector::new(Arc::clone(&cache));
    let mut publisher = TurnPublisher::new(Arc::clone(&simulation), detector, Arc::clone(&push));
    publisher.game_ready().await;
    info!("gameReady broadcast, entering turn loop");

    let mut ticker = tokio::time::interval(Duration::from_millis(config.demo.turn_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            queued = command_rx.recv() => {
                match queued {
                    Some(queued) => executor.handle(queued),
                    None => break,
                }
            }
            _ = ticker.tick() => {
                sim.advance_turn();
                publisher.turn_boundary().await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("chronicle-engine shutdown complete");
    Ok(())
}
