//! # Host Error Types

use marionette_core::CoreError;
use marionette_rendering::BridgeError;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    ReadFile(String),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration value: {field} - {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Errors raised by the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bridge could not be brought up on the render thread.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The render thread could not be spawned.
    #[error("failed to spawn render thread: {0}")]
    Spawn(String),

    /// The render thread is gone.
    #[error("render thread stopped")]
    RenderThreadStopped,

    /// The render thread took the item and never returned it.
    #[error("item lost during handoff")]
    ItemLost,

    /// The render thread panicked.
    #[error("render thread panicked")]
    RenderThreadPanicked,
}

impl From<CoreError> for HostError {
    fn from(err: CoreError) -> Self {
        Self::Bridge(BridgeError::Core(err))
    }
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
