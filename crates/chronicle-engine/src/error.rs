//! Error types for the Chronicle gateway binary.
//!
//! [`EngineError`] is the top-level error type that wraps all failure
//! modes during startup, giving `main` a single type to propagate with
//! `?`.

/// Top-level error for the gateway binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The push listener failed to bind.
    #[error("push bind error: {source}")]
    PushBind {
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
