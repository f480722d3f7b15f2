//! Bridge statistics.

use marionette_shared::{ChangeSet, SceneLoadError};

/// What one synchronize pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Properties changed since the previous pass.
    pub changed: ChangeSet,
    /// Whether the surface was recreated.
    pub surface_recreated: bool,
    /// Whether a scene rebuild succeeded.
    pub scene_rebuilt: bool,
    /// Why a requested rebuild did not happen.
    pub scene_error: Option<SceneLoadError>,
    /// Pointer events drained.
    pub pointer_events: usize,
    /// Animation commands drained.
    pub animation_commands: usize,
}

/// Statistics from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames rendered so far, this one included.
    pub frame: u64,
    /// Seconds since the first frame.
    pub elapsed_seconds: f64,
    /// Seconds since the previous frame.
    pub delta_seconds: f64,
    /// Whether a model was updated and drawn.
    pub model_drawn: bool,
}

impl FrameStats {
    /// Frames per second derived from the delta.
    #[must_use]
    pub fn fps(&self) -> f64 {
        if self.delta_seconds > 0.0 {
            1.0 / self.delta_seconds
        } else {
            0.0
        }
    }
}
