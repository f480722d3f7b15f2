//! # Rendering Error Types
//!
//! Failures of the engine and of bridge construction. None of these cross
//! to the GUI thread: scene failures are turned into notifications.

use std::path::PathBuf;

use marionette_core::CoreError;
use thiserror::Error;

/// Errors reported by the animation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The process-wide framework refused to start.
    #[error("engine startup failed: {0}")]
    Startup(String),

    /// A model directory could not be loaded.
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad {
        /// Model directory.
        path: PathBuf,
        /// Engine diagnostic.
        reason: String,
    },
}

/// Errors raised while bringing a bridge up or driving it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The engine runtime could not be started. Nothing can render.
    #[error("engine runtime unavailable: {0}")]
    Startup(#[source] EngineError),

    /// Thread plumbing failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
