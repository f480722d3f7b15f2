//! # MARIONETTE Rendering
//!
//! The render-thread half of the item/renderer pair.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        RENDER THREAD                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  SyncSource ──► RenderBridge::synchronize ──► local mirror   │
//! │                        │                                     │
//! │                        ▼                                     │
//! │  RenderBridge::render ──► AnimationEngine (update + draw)    │
//! │                        │                                     │
//! │                        ▼                                     │
//! │                 Notification bus ──► GUI subscribers         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - The engine is owned by exactly one bridge and never leaves its thread
//! - The process-wide engine runtime starts before the first bridge and
//!   shuts down after the last one
//! - Operations needing a model are no-ops while none is loaded

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod engine;
pub mod error;
pub mod integration;
pub mod link;
pub mod runtime;
pub mod stats;
pub mod timer;
pub mod viewport;

pub use engine::{
    AnimationEngine, CallLog, DrawContext, EngineCall, EngineFramework, FinishedMotion,
    HitRegion, MockEngine, MockFramework, MockModel, SceneParameters,
};
pub use error::{BridgeError, BridgeResult, EngineError};
pub use integration::{resolve_model, ModelLocation, RenderBridge, RenderBridgeConfig, SyncSource};
pub use link::{ModelCatalog, RendererAnchor, RendererLink};
pub use runtime::{
    default_log_function, EngineRuntime, LogFunction, LogLevel, RuntimeOptions, RuntimeRegistry,
};
pub use stats::{FrameStats, SyncReport};
pub use timer::{FrameTime, FrameTimer};
pub use viewport::{SurfaceSize, Viewport};
