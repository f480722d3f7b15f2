//! # Surface Geometry
//!
//! Maps item pixels to the engine's logical space and builds the projection.
//!
//! ```text
//! device (pixels)                 logical
//! (0,0) ─────────── (w,0)         (-1, h/w) ──────── (1, h/w)
//!   │                 │      ──►      │                  │
//! (0,h) ─────────── (w,h)         (-1,-h/w) ──────── (1,-h/w)
//! ```
//!
//! The horizontal axis always spans [`VIEW_LOGICAL_LEFT`, `VIEW_LOGICAL_RIGHT`];
//! the vertical axis keeps the aspect ratio and points up.

use marionette_shared::constants::{VIEW_LOGICAL_LEFT, VIEW_LOGICAL_RIGHT};

/// Surface size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Device-to-logical transform and projection for one surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    size: SurfaceSize,
}

impl Viewport {
    /// Creates the viewport of a surface.
    #[must_use]
    pub const fn new(size: SurfaceSize) -> Self {
        Self { size }
    }

    /// Surface size.
    #[must_use]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Logical units per pixel. Zero for an empty surface.
    #[allow(clippy::cast_precision_loss)]
    fn scale(&self) -> f64 {
        if self.size.is_empty() {
            return 0.0;
        }
        f64::from(VIEW_LOGICAL_RIGHT - VIEW_LOGICAL_LEFT) / f64::from(self.size.width)
    }

    /// Converts item pixels to logical coordinates.
    ///
    /// An empty surface maps everything to the origin.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_logical(&self, px: f64, py: f64) -> (f32, f32) {
        let scale = self.scale();
        let half_w = f64::from(self.size.width) * 0.5;
        let half_h = f64::from(self.size.height) * 0.5;
        let x = (px - half_w) * scale;
        let y = -(py - half_h) * scale;
        (x as f32, y as f32)
    }

    /// Logical rectangle covered by the surface: (left, right, bottom, top).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn screen_rect(&self) -> (f32, f32, f32, f32) {
        if self.size.is_empty() {
            return (VIEW_LOGICAL_LEFT, VIEW_LOGICAL_RIGHT, -1.0, 1.0);
        }
        let ratio = (f64::from(self.size.height) / f64::from(self.size.width)) as f32;
        (VIEW_LOGICAL_LEFT, VIEW_LOGICAL_RIGHT, -ratio, ratio)
    }

    /// Projection `diag(1, w/h, 1, 1)`; identity for an empty surface.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn projection(&self) -> [[f32; 4]; 4] {
        let aspect = if self.size.is_empty() {
            1.0
        } else {
            (f64::from(self.size.width) / f64::from(self.size.height)) as f32
        };
        [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, aspect, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}
