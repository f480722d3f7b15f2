//! Event types crossing the GUI/render boundary.
//!
//! Inbound (GUI → render): [`PointerEvent`] and [`AnimationCommand`], each
//! kept in its own FIFO queue on the item.
//!
//! Outbound (render → GUI): [`Notification`], published on the bus the item's
//! subscribers listen to.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PropertyChange;

// =============================================================================
// POINTER INPUT
// =============================================================================

/// What a pointer event does.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    /// Cursor moved (hover or drag).
    Move = 0,
    /// Button went down.
    Press = 1,
    /// Button went up.
    Release = 2,
}

/// Button that produced a pointer event.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// No button (plain moves).
    None = 0,
    /// Primary button (left mouse button, single touch).
    Primary = 1,
    /// Secondary button.
    Secondary = 2,
    /// Middle button.
    Middle = 3,
}

/// A pointer/touch event in item (device) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Move, press or release.
    pub kind: PointerKind,
    /// Button identifier.
    pub button: PointerButton,
    /// X in item pixels.
    pub x: f64,
    /// Y in item pixels.
    pub y: f64,
    /// Bypasses follow/react gating at enqueue time.
    pub force: bool,
}

impl PointerEvent {
    /// A non-forced move.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            button: PointerButton::None,
            x,
            y,
            force: false,
        }
    }

    /// A button press.
    #[must_use]
    pub const fn press(button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Press,
            button,
            x,
            y,
            force: false,
        }
    }

    /// A button release.
    #[must_use]
    pub const fn release(button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Release,
            button,
            x,
            y,
            force: false,
        }
    }

    /// Same event with the force flag set.
    #[must_use]
    pub const fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

// =============================================================================
// ANIMATION CONTROL
// =============================================================================

/// Motion priority understood by the engine.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Never interrupts anything.
    None = 0,
    /// Idle motions.
    Idle = 1,
    /// Regular user-triggered motions.
    Normal = 2,
    /// Interrupts whatever is playing.
    Force = 3,
}

/// Request for the engine's motion/expression controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCommand {
    /// Stop every running motion.
    StopAll,
    /// Switch to a named expression.
    SetExpression {
        /// Expression name.
        name: String,
    },
    /// Start a motion from a group.
    StartMotion {
        /// Motion group.
        group: String,
        /// Motion name inside the group.
        name: String,
        /// Priority the motion is started with.
        priority: Priority,
    },
}

/// Identifier of a motion started by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotionHandle(pub u64);

// =============================================================================
// OUTBOUND NOTIFICATIONS
// =============================================================================

/// Phase of a tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapPhase {
    /// Press ("touched").
    Begin,
    /// Release ("tapped").
    End,
}

/// Why a scene rebuild did not happen.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SceneLoadError {
    /// The model path is empty.
    #[error("model path is empty")]
    EmptyPath,

    /// The model path does not name an existing directory.
    #[error("model path is not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The engine refused the model.
    #[error("engine rejected model at {}: {reason}", path.display())]
    EngineRejected {
        /// Model directory.
        path: PathBuf,
        /// Engine diagnostic.
        reason: String,
    },
}

/// Everything the bridge (and the item itself) tells subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A scene rebuild finished and the model is live.
    ModelReady,
    /// A scene rebuild was requested but did not happen.
    ModelLoadFailed(SceneLoadError),
    /// A tap began or ended at logical coordinates.
    Tap {
        /// Begin (press) or end (release).
        phase: TapPhase,
        /// Logical X.
        x: f32,
        /// Logical Y.
        y: f32,
    },
    /// The tap hit named regions of the model. Always follows the matching
    /// [`Notification::Tap`].
    HitAreas {
        /// Begin (press) or end (release).
        phase: TapPhase,
        /// Regions hit, never empty.
        names: Vec<String>,
    },
    /// The drag target moved to logical view coordinates.
    CursorMoved {
        /// Logical X.
        x: f32,
        /// Logical Y.
        y: f32,
    },
    /// A motion finished playing.
    MotionFinished {
        /// Handle returned when the motion started, if any.
        motion: Option<MotionHandle>,
        /// Motion group.
        group: String,
        /// Motion name.
        name: String,
    },
    /// A property changed value on the item.
    PropertyChanged(PropertyChange),
}
