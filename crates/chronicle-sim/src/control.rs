//! The [`ControlSurface`] trait: the single mutation seam into the host.
//!
//! Every state change Chronicle performs flows through one trait method,
//! called exclusively from the authoritative command task. The surface
//! receives fully resolved, typed actions -- name resolution and
//! precondition checks happen before dispatch ever reaches it.

use std::sync::{Arc, RwLock};

use chronicle_types::GameAction;

/// Errors raised while dispatching an action into the host.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// The host refused the action (illegal move, insufficient resources,
    /// entity no longer valid at dispatch time).
    #[error("{message}")]
    Rejected {
        /// Host-provided refusal reason.
        message: String,
    },

    /// The host failed internally while applying the action.
    #[error("dispatch failed: {message}")]
    Internal {
        /// Host-provided failure description.
        message: String,
    },
}

/// The mutation seam through which all commands enter the simulation.
pub trait ControlSurface: Send + Sync {
    /// Apply a resolved action to the simulation.
    ///
    /// Returns an optional result payload for actions that produce one
    /// (most do not). Errors here are captured per command and never
    /// abort the executor.
    fn dispatch(&self, action: &GameAction) -> Result<Option<serde_json::Value>, ControlError>;
}

/// Shared handle to an installed control surface.
pub type ControlHandle = Arc<dyn ControlSurface>;

/// A swappable slot holding the control surface, consulted per command.
///
/// The executor treats an empty slot as "upstream unavailable" and fails
/// commands without attempting resolution. A poisoned lock reads as empty.
#[derive(Default)]
pub struct ControlSlot {
    inner: RwLock<Option<ControlHandle>>,
}

impl ControlSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Create a slot with a control surface already installed.
    pub const fn with(control: ControlHandle) -> Self {
        Self {
            inner: RwLock::new(Some(control)),
        }
    }

    /// The currently installed control surface, if any.
    pub fn get(&self) -> Option<ControlHandle> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    /// Install (or replace) the control surface.
    pub fn install(&self, control: ControlHandle) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(control);
        }
    }

    /// Remove the installed control surface.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}
