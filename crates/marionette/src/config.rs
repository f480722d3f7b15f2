//! Host configuration, loaded from TOML.
//!
//! ```toml
//! [runtime]
//! log_level = "debug"
//! touch_logging = true
//!
//! [item]
//! model_path = "assets/Hiyori"
//! follow_mouse = false
//!
//! [surface]
//! width = 800
//! height = 600
//!
//! [host]
//! continuous = false
//! frame_interval_ms = 16
//! handoff_timeout_ms = 1000
//! ```
//!
//! Every section and field is optional.

use std::path::Path;
use std::time::Duration;

use marionette_rendering::{LogLevel, RenderBridgeConfig, RuntimeOptions, SurfaceSize};
use marionette_shared::ItemConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarionetteConfig {
    /// Engine runtime options.
    pub runtime: RuntimeConfig,
    /// Initial item properties.
    pub item: ItemConfig,
    /// Initial item size.
    pub surface: SurfaceConfig,
    /// Render thread scheduling.
    pub host: HostConfig,
}

/// `[runtime]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Engine log verbosity.
    pub log_level: LogLevel,
    /// Log every tap, whatever the level.
    pub touch_logging: bool,
}

/// `[surface]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// `[host]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Hand the item over on every pump, not only when a frame is pending.
    pub continuous: bool,
    /// How long the render thread idles between frames, in milliseconds.
    pub frame_interval_ms: u64,
    /// How long a pump waits for the render thread, in milliseconds.
    pub handoff_timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_interval_ms: 16,
            handoff_timeout_ms: 1000,
        }
    }
}

impl HostConfig {
    /// Frame interval as a duration.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Handoff timeout as a duration.
    #[must_use]
    pub const fn handoff_timeout(&self) -> Duration {
        Duration::from_millis(self.handoff_timeout_ms)
    }
}

impl MarionetteConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ReadFile`] or [`ConfigError::Parse`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed input.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "surface".to_string(),
                reason: "width and height must be greater than 0".to_string(),
            });
        }

        if self.host.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "host.frame_interval_ms".to_string(),
                reason: "frame interval must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.item.lip_sync_value) {
            return Err(ConfigError::InvalidValue {
                field: "item.lip_sync_value".to_string(),
                reason: "lip sync level must be between 0.0 and 1.0".to_string(),
            });
        }

        Ok(())
    }

    /// Options the engine runtime is started with.
    #[must_use]
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions::with_level(self.runtime.log_level)
    }

    /// Diagnostics switches for the bridge.
    #[must_use]
    pub fn bridge_config(&self) -> RenderBridgeConfig {
        let mut config = RenderBridgeConfig::from_log_level(self.runtime.log_level);
        config.touch_logging |= self.runtime.touch_logging;
        config
    }

    /// Initial item size.
    #[must_use]
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.surface.width, self.surface.height)
    }
}
