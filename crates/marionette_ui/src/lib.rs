//! # MARIONETTE UI
//!
//! The GUI-thread half of the item/renderer pair.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       GUI THREAD                           │
//! ├────────────────────────────────────────────────────────────┤
//! │  setters ──► ItemConfig + ChangeSet ──┐                    │
//! │  input   ──► GatingPolicy ──► pointer queue ──┼──► handoff │
//! │  commands ─────────────────► animation queue ─┘            │
//! │                                                            │
//! │  queries ◄── RendererLink (weak) ◄── render thread         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here blocks. The only blocking step is the handoff, which the host
//! drives once per frame.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod input;
pub mod item;

pub use input::{GatingPolicy, InputState};
pub use item::FrontendItem;
