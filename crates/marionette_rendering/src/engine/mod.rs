//! # Animation Engine Capability
//!
//! The engine is an opaque collaborator: it parses models, animates them and
//! issues the draw calls. The bridge only talks to it through
//! [`AnimationEngine`] (one per scene) and [`EngineFramework`] (once per
//! process).
//!
//! ```text
//! EngineFramework   startup ──────────────────────────────► shutdown
//!                      │                                      ▲
//! AnimationEngine      └─ load_model ─ update/draw ... ─ unload
//! ```

mod mock;

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use marionette_shared::{ItemConfig, MotionHandle, Priority, Rgba};

use crate::error::EngineError;
use crate::runtime::RuntimeOptions;
use crate::viewport::{SurfaceSize, Viewport};

pub use mock::{CallLog, EngineCall, HitRegion, MockEngine, MockFramework, MockModel};

/// Per-frame toggles copied from the item into the live model.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneParameters {
    /// Play idle motions from [`Self::random_motion_group`].
    pub play_random_motions: bool,
    /// Group idle motions are drawn from.
    pub random_motion_group: String,
    /// Eye blinking.
    pub blinking_enabled: bool,
    /// Breathing.
    pub breathing_enabled: bool,
    /// Physics.
    pub physics_enabled: bool,
    /// Lip sync.
    pub lip_sync_enabled: bool,
    /// Lip sync level, 0.0..=1.0.
    pub lip_sync_value: f32,
}

impl SceneParameters {
    /// Extracts the per-frame parameters from a configuration snapshot.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_config(config: &ItemConfig) -> Self {
        Self {
            play_random_motions: config.play_random_motions,
            random_motion_group: config.random_motion_group.clone(),
            blinking_enabled: config.blinking_enabled,
            breathing_enabled: config.breathing_enabled,
            physics_enabled: config.physics_enabled,
            lip_sync_enabled: config.lip_sync_enabled,
            lip_sync_value: config.lip_sync_value as f32,
        }
    }
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self::from_config(&ItemConfig::default())
    }
}

/// Column-major 4x4 projection handed to the engine's draw call.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawContext {
    /// Projection matrix, `diag(1, w/h, 1, 1)` for a `w`x`h` surface.
    pub projection: [[f32; 4]; 4],
    /// Seconds since the previous frame.
    pub delta_seconds: f32,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Padding to keep the struct tightly packed.
    pub _padding: u32,
}

impl DrawContext {
    /// Builds the draw context for one frame.
    #[must_use]
    pub fn new(viewport: &Viewport, delta_seconds: f32) -> Self {
        let SurfaceSize { width, height } = viewport.size();
        Self {
            projection: viewport.projection(),
            delta_seconds,
            width,
            height,
            _padding: 0,
        }
    }

    /// Returns the projection as raw bytes for uniform upload.
    #[must_use]
    pub fn projection_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.projection)
    }
}

/// A motion that finished playing during the last update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedMotion {
    /// Handle returned by [`AnimationEngine::start_motion`], if the motion
    /// was started through it.
    pub motion: Option<MotionHandle>,
    /// Motion group.
    pub group: String,
    /// Motion name.
    pub name: String,
}

/// Per-scene engine instance.
///
/// Owned by exactly one [`crate::RenderBridge`] on the render thread. Every
/// query returns an empty list while no model is loaded.
pub trait AnimationEngine {
    /// Loads the model described by `manifest` inside `directory`.
    ///
    /// # Errors
    ///
    /// [`EngineError::ModelLoad`] if the engine rejects the assets.
    fn load_model(&mut self, directory: &Path, manifest: &str) -> Result<(), EngineError>;

    /// Releases the current model, if any.
    fn unload(&mut self);

    /// Returns true while a model is loaded.
    fn has_model(&self) -> bool;

    /// Sets or clears the background image drawn behind the model.
    fn set_background(&mut self, image: Option<&Path>);

    /// (Re)creates the render target for a new surface size.
    fn resize(&mut self, viewport: &Viewport);

    /// Clears the surface.
    fn clear(&mut self, color: Rgba);

    /// Advances animation, physics and motions.
    fn update(&mut self, delta_seconds: f32);

    /// Draws the model.
    fn draw(&mut self, context: &DrawContext);

    /// Names of the hit regions containing the logical point.
    fn hit_test(&self, x: f32, y: f32) -> Vec<String>;

    /// Names of every hit region of the model.
    fn hit_area_names(&self) -> Vec<String>;

    /// Names of the model's expressions.
    fn expression_names(&self) -> Vec<String>;

    /// Names of the model's motion groups.
    fn motion_group_names(&self) -> Vec<String>;

    /// Names of the motions in `group`.
    fn motion_names(&self, group: &str) -> Vec<String>;

    /// Applies the per-frame toggles.
    fn set_parameters(&mut self, parameters: &SceneParameters);

    /// Points the model's gaze at the logical view position.
    fn set_dragging(&mut self, x: f32, y: f32);

    /// Switches expression.
    fn set_expression(&mut self, name: &str);

    /// Starts a motion. `None` if it was refused (unknown or outranked).
    fn start_motion(&mut self, group: &str, name: &str, priority: Priority)
        -> Option<MotionHandle>;

    /// Stops every running motion.
    fn stop_all_motions(&mut self);

    /// Motions that finished since the last call.
    fn take_finished_motions(&mut self) -> Vec<FinishedMotion>;
}

/// Process-wide engine framework. Started once, shut down once.
pub trait EngineFramework: Send + Sync {
    /// Starts the framework.
    ///
    /// # Errors
    ///
    /// [`EngineError::Startup`] if it cannot run. Nothing downstream works
    /// without it.
    fn startup(&self, options: &RuntimeOptions) -> Result<(), EngineError>;

    /// Shuts the framework down.
    fn shutdown(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_follow_config() {
        let mut config = ItemConfig::default();
        config.lip_sync_enabled = true;
        config.lip_sync_value = 0.25;
        config.random_motion_group = "Tap".to_string();

        let params = SceneParameters::from_config(&config);
        assert!(params.lip_sync_enabled);
        assert!((params.lip_sync_value - 0.25).abs() < f32::EPSILON);
        assert_eq!(params.random_motion_group, "Tap");
        assert!(params.blinking_enabled);
    }

    #[test]
    fn test_draw_context_bytes() {
        let viewport = Viewport::new(SurfaceSize::new(200, 100));
        let context = DrawContext::new(&viewport, 0.016);

        assert_eq!(context.projection_bytes().len(), 64);
        assert!((context.projection[1][1] - 2.0).abs() < f32::EPSILON);
        assert_eq!(context.width, 200);
    }
}
