//! # Core Error Types

use thiserror::Error;

/// Errors from the cross-thread plumbing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// The other end of a channel or handoff was dropped.
    #[error("peer disconnected")]
    Disconnected,

    /// Nothing arrived before the deadline.
    #[error("timed out waiting for peer")]
    Timeout,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
