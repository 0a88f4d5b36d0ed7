//! Remote command handling for the Chronicle gateway.
//!
//! Commands arrive as loosely-typed wire envelopes, cross to the
//! authoritative task through the [`CommandClient`] queue, and are
//! resolved into typed [`GameAction`]s before the [`CommandExecutor`]
//! dispatches them through the control surface. Every outcome travels
//! back in a result envelope; nothing here panics or throws across the
//! boundary.
//!
//! [`GameAction`]: chronicle_types::GameAction

pub mod executor;
pub mod queue;
pub mod resolver;

pub use executor::CommandExecutor;
pub use queue::{CommandClient, QueuedCommand};
pub use resolver::{resolve, ResolveError};
