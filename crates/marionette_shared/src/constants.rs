//! # Shared Constants
//!
//! Values both sides of the bridge must agree on.

// =============================================================================
// MODEL ASSETS
// =============================================================================

/// Suffix appended to a model directory's name to locate its manifest.
///
/// A model living in `assets/Hiyori/` is described by
/// `assets/Hiyori/Hiyori.model3.json`.
pub const MODEL_MANIFEST_SUFFIX: &str = ".model3.json";

/// Motion group used for idle motions until the user picks another one.
pub const DEFAULT_RANDOM_MOTION_GROUP: &str = "Idle";

// =============================================================================
// LOGICAL VIEW SPACE
// =============================================================================

/// Left edge of the logical view in engine units.
pub const VIEW_LOGICAL_LEFT: f32 = -1.0;

/// Right edge of the logical view in engine units.
pub const VIEW_LOGICAL_RIGHT: f32 = 1.0;
