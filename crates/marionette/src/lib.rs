//! # MARIONETTE
//!
//! A live animated character shown by a GUI item and drawn by an animation
//! engine on a render thread. The two sides never share state: the item is
//! handed to the render thread once per frame, and everything flowing back
//! arrives as a [`Notification`].
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────┐          ┌──────────────────────────────┐
//! │ GUI thread            │          │ render thread                │
//! │                       │  handoff │                              │
//! │  FrontendItem  ───────┼─────────►│  RenderBridge ──► engine     │
//! │   setters, input,     │◄─────────┼─  synchronize, render        │
//! │   commands, queries   │          │                              │
//! │        ▲              │          │                              │
//! │        └── notifications ◄───────┼── ModelReady, Tap, ...       │
//! └───────────────────────┘          └──────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration
//! - `host`: the render thread and its GUI-side handle
//! - `error`: host errors

pub mod config;
pub mod error;
pub mod host;

// Re-export the layers
pub use marionette_core as core;
pub use marionette_rendering as rendering;
pub use marionette_shared as shared;
pub use marionette_ui as ui;

pub use config::{HostConfig, MarionetteConfig, RuntimeConfig, SurfaceConfig};
pub use error::{ConfigError, HostError, HostResult};
pub use host::{Host, HostHandle, HostStats, RENDER_THREAD_NAME};
pub use marionette_shared::Notification;
pub use marionette_ui::FrontendItem;
