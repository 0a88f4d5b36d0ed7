//! Shared type definitions for the Chronicle simulation mirror.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries in the Chronicle workspace: entity identifiers, wire-facing
//! entity views, turn-boundary domain events, and the command envelope with
//! its typed action counterpart.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for entity identifiers
//! - [`enums`] -- Entity categories, wonder ownership, hurry sources
//! - [`views`] -- Serializable views of live simulation entities
//! - [`events`] -- The tagged [`TurnEvent`] enum computed by the diff engine
//! - [`commands`] -- Loosely-typed command envelope and result types
//! - [`actions`] -- [`ActionKind`] and the resolved [`GameAction`] variants

pub mod actions;
pub mod commands;
pub mod enums;
pub mod events;
pub mod ids;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionKind, GameAction};
pub use commands::{
    BulkCommand, BulkCommandResult, BulkItemResult, Command, CommandResult, ParamValue,
};
pub use enums::{EntityCategory, HurrySource, WonderOwnership};
pub use events::TurnEvent;
pub use ids::{CharacterId, CityId, PlayerId, TileId, UnitId};
pub use views::{
    CharacterView, CityView, PlayerView, TeamAllianceRow, TeamDiplomacyRow, TilePoint,
    TribeAllianceRow, TribeDiplomacyRow, TribeView, UnitView,
};
