//! # Item/Renderer Integration
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       ONE FRAME                                 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   GUI thread    ── hands item over, blocks ─────────┐           │
//! │                                                     ▼           │
//! │   render thread ◄── synchronize(item) ◄── SyncSource            │
//! │        │              1. scene rebuild (changed flags)          │
//! │        │              2. pointer queue, FIFO                    │
//! │        │              3. per-frame parameters                   │
//! │        │              4. animation queue, FIFO                  │
//! │        ▼                                                        │
//! │   item returned ──► GUI resumes                                 │
//! │   render() ──► engine update + draw ──► notifications           │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Only `synchronize` reads the item, and only while it is handed over
//! 2. `render` works from the bridge's private mirror
//! 3. Failures become notifications, never panics or errors

pub mod render_bridge;
mod scene;

pub use render_bridge::{RenderBridge, RenderBridgeConfig, SyncSource};
pub use scene::{resolve_model, ModelLocation};
