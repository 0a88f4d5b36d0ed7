//! Network surface of the Chronicle simulation mirror.
//!
//! This crate exposes the running simulation two ways:
//!
//! - **Push**: a raw TCP channel ([`PushServer`]) delivering one
//!   newline-terminated JSON document per turn boundary, at most once per
//!   connected client, with no replay.
//! - **Pull**: an Axum HTTP API serving state, entity, event, diplomacy,
//!   and command routes from the shared [`AppState`].
//!
//! The [`TurnPublisher`] ties the two halves to the diff engine: it runs
//! on the authoritative task, detects events at each turn boundary, and
//! broadcasts the aggregate document.

pub mod error;
pub mod handlers;
pub mod push;
pub mod router;
pub mod server;
pub mod state;
pub mod turn;

pub use error::ObserverError;
pub use push::PushServer;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::{AppState, Page, PageLimits, PageQuery};
pub use turn::TurnPublisher;
