//! Turn-boundary event detection for the Chronicle gateway.
//!
//! At each turn boundary the authoritative task runs the [`EventDetector`]
//! over every entity category, diffing the live population against the
//! snapshot captured the previous turn. The resulting [`TurnEvent`] lists
//! land in the shared [`EventCache`], which holds exactly one turn's worth
//! of events per category.
//!
//! [`TurnEvent`]: chronicle_types::TurnEvent

pub mod cache;
pub mod detector;

pub use cache::EventCache;
pub use detector::EventDetector;
