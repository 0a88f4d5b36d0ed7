//! The authoritative-side command executor.
//!
//! Exactly one executor runs per process, on the task that owns all
//! simulation mutation. Every command passes the same fixed pre-flight
//! sequence before resolution and dispatch; every outcome, success or
//! failure, comes back inside the result envelope. Nothing a command does
//! can take the executor down.

use std::sync::Arc;

use chronicle_sim::{ControlSlot, SimulationSlot};
use chronicle_types::{ActionKind, Command, CommandResult};

use crate::queue::QueuedCommand;
use crate::resolver;

/// Executes resolved commands against the control surface.
pub struct CommandExecutor {
    simulation: Arc<SimulationSlot>,
    control: Arc<ControlSlot>,
}

impl CommandExecutor {
    /// Create an executor reading both slots per command.
    pub const fn new(simulation: Arc<SimulationSlot>, control: Arc<ControlSlot>) -> Self {
        Self {
            simulation,
            control,
        }
    }

    /// Execute one queued command and deliver its result.
    ///
    /// A failed reply send means the submitter stopped waiting; the
    /// command has still executed and the result is dropped.
    pub fn handle(&self, queued: QueuedCommand) {
        let result = self.execute(&queued.command);
        let _ = queued.reply.send(result);
    }

    /// Execute one command through pre-flight, resolution, and dispatch.
    ///
    /// Pre-flight order is fixed: unknown action, then unreachable
    /// upstream, then the act permission, then the multiplayer refusal.
    pub fn execute(&self, command: &Command) -> CommandResult {
        let request_id = command.request_id.clone();

        let Some(kind) = ActionKind::parse(&command.action) else {
            return CommandResult::failed(
                request_id,
                format!("unknown action: {}", command.action),
            );
        };
        let (Some(sim), Some(control)) = (self.simulation.get(), self.control.get()) else {
            return CommandResult::failed(request_id, "simulation not available");
        };
        if !sim.can_act() {
            return CommandResult::failed(
                request_id,
                "precondition failed: simulation is not accepting actions",
            );
        }
        if sim.is_multiplayer() {
            return CommandResult::failed(
                request_id,
                "precondition failed: remote commands are disabled in multiplayer games",
            );
        }

        let action = match resolver::resolve(kind, command, sim.as_ref()) {
            Ok(action) => action,
            Err(error) => {
                tracing::debug!(action = %command.action, %error, "command resolution failed");
                return CommandResult::failed(request_id, error.to_string());
            }
        };

        match control.dispatch(&action) {
            Ok(data) => {
                tracing::debug!(action = %command.action, "command dispatched");
                CommandResult {
                    request_id,
                    success: true,
                    error: None,
                    data,
                }
            }
            Err(error) => {
                tracing::warn!(action = %command.action, %error, "command dispatch failed");
                CommandResult::failed(request_id, error.to_string())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use chronicle_sim::{ControlSurface, ScriptedSimulation, Simulation};
    use chronicle_types::{
        BulkCommand, GameAction, ParamValue, PlayerId, TileId, TilePoint, UnitId, UnitView,
    };

    use super::*;
    use crate::queue::CommandClient;

    fn spearman(id: i32) -> UnitView {
        UnitView {
            id: UnitId::new(id),
            unit_type: String::from("UNIT_SPEARMAN"),
            player: Some(PlayerId::new(0)),
            is_dead: false,
            hp: 8,
            location: TilePoint {
                tile_id: TileId::new(3),
                x: 0,
                y: 0,
            },
        }
    }

    fn executor_for(sim: &Arc<ScriptedSimulation>) -> CommandExecutor {
        let as_sim: Arc<dyn Simulation> = Arc::clone(sim) as Arc<dyn Simulation>;
        let as_control: Arc<dyn ControlSurface> = Arc::clone(sim) as Arc<dyn ControlSurface>;
        CommandExecutor::new(
            Arc::new(SimulationSlot::with(as_sim)),
            Arc::new(ControlSlot::with(as_control)),
        )
    }

    fn spawn_executor(sim: &Arc<ScriptedSimulation>) -> CommandClient {
        let executor = executor_for(sim);
        let (client, mut receiver) = CommandClient::channel(Duration::from_secs(1));
        tokio::spawn(async move {
            while let Some(queued) = receiver.recv().await {
                executor.handle(queued);
            }
        });
        client
    }

    fn pass(unit_id: i64) -> Command {
        Command::new("pass").with_param("unitId", ParamValue::Integer(unit_id))
    }

    #[test]
    fn unknown_action_fails_without_panicking() {
        let sim = Arc::new(ScriptedSimulation::new());
        let result = executor_for(&sim).execute(&Command::new("fly"));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("unknown action: fly"));
    }

    #[test]
    fn empty_slots_report_upstream_unavailable() {
        let executor =
            CommandExecutor::new(Arc::new(SimulationSlot::new()), Arc::new(ControlSlot::new()));
        let result = executor.execute(&pass(1));
        assert_eq!(result.error.as_deref(), Some("simulation not available"));
    }

    #[test]
    fn multiplayer_mode_refuses_every_action_kind() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.upsert_unit(spearman(1));
        sim.set_multiplayer(true);
        let executor = executor_for(&sim);

        for command in [pass(1), Command::new("endTurn")] {
            let result = executor.execute(&command);
            assert!(!result.success);
            assert!(
                result
                    .error
                    .as_deref()
                    .is_some_and(|error| error.contains("multiplayer"))
            );
        }
        assert!(sim.dispatched().is_empty());
    }

    #[test]
    fn act_lock_is_checked_before_resolution() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.set_can_act(false);
        // The unit does not exist, but the precondition failure wins.
        let result = executor_for(&sim).execute(&pass(99));
        assert!(
            result
                .error
                .as_deref()
                .is_some_and(|error| error.contains("not accepting actions"))
        );
    }

    #[test]
    fn unresolved_unit_fails_without_touching_the_surface() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.upsert_unit(spearman(1));
        let executor = executor_for(&sim);

        let result = executor.execute(&pass(42));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("unit 42 not found"));

        // An independently submitted valid command is unaffected.
        let result = executor.execute(&pass(1));
        assert!(result.success);
        assert_eq!(sim.dispatched().len(), 1);
    }

    #[test]
    fn end_turn_carries_the_injected_turn_counter() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.set_turn(9);
        let result = executor_for(&sim).execute(&Command::new("endTurn"));
        assert!(result.success);
        assert_eq!(
            sim.dispatched(),
            vec![GameAction::EndTurn { turn: 9, force: true }]
        );
    }

    #[tokio::test]
    async fn bulk_stop_on_error_halts_at_the_failing_index() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.upsert_unit(spearman(1));
        let client = spawn_executor(&sim);

        let bulk = BulkCommand {
            request_id: Some(String::from("batch-1")),
            commands: vec![pass(1), pass(42), pass(1), pass(1)],
            stop_on_error: true,
        };
        let result = client.submit_bulk(bulk).await;

        assert!(!result.all_succeeded);
        assert_eq!(result.stopped_at_index, Some(1));
        assert_eq!(result.results.len(), 2);
        assert!(result.results[0].success);
        assert!(!result.results[1].success);
        // Items after the failure never reached dispatch.
        assert_eq!(sim.dispatched().len(), 1);
    }

    #[tokio::test]
    async fn bulk_without_stop_on_error_runs_every_item() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.upsert_unit(spearman(1));
        let client = spawn_executor(&sim);

        let bulk = BulkCommand {
            request_id: None,
            commands: vec![pass(1), pass(42), pass(1), pass(1)],
            stop_on_error: false,
        };
        let result = client.submit_bulk(bulk).await;

        assert!(!result.all_succeeded);
        assert_eq!(result.stopped_at_index, None);
        assert_eq!(result.results.len(), 4);
        assert_eq!(sim.dispatched().len(), 3);
    }

    #[tokio::test]
    async fn dispatch_failure_is_contained_to_its_command() {
        let sim = Arc::new(ScriptedSimulation::new());
        sim.upsert_unit(spearman(1));
        sim.fail_action(ActionKind::Pass);
        let client = spawn_executor(&sim);

        let failed = client.submit(pass(1)).await;
        assert!(!failed.success);

        // The executor task survives and keeps serving.
        let wake = Command::new("wake").with_param("unitId", ParamValue::Integer(1));
        let result = client.submit(wake).await;
        assert!(result.success);
    }
}
