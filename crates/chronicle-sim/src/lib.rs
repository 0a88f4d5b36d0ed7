//! Simulation access seams for the Chronicle gateway.
//!
//! This crate defines the two traits through which everything else talks
//! to the running simulation: [`Simulation`] for reads and
//! [`ControlSurface`] for the single mutation path, plus the
//! composition-time [`SimulationSlot`] the host installs its
//! implementation into. [`ScriptedSimulation`] is a fully in-memory
//! implementation of both traits for tests and local development.

pub mod control;
pub mod scripted;
pub mod simulation;

pub use control::{ControlError, ControlHandle, ControlSlot, ControlSurface};
pub use scripted::ScriptedSimulation;
pub use simulation::{
    CatalogDomain, SimResult, Simulation, SimulationError, SimulationHandle, SimulationSlot,
};
