//! # MARIONETTE Core
//!
//! Cross-thread plumbing between a GUI-thread item and a render-thread
//! bridge.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   EventQueue<T> (owned by item)   ┌──────────────────┐
//! │    GUI thread    │ ────────────────────────────────► │  render thread   │
//! │                  │   Handoff<T> (blocking rendezvous)│                  │
//! │   FrontendItem   │ ◄───────────────────────────────► │   RenderBridge   │
//! │                  │   EventBus<T> (notifications)     │                  │
//! │                  │ ◄──────────────────────────────── │                  │
//! └──────────────────┘                                   └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Queues are written by the GUI thread and drained by the render thread,
//!    never at the same time: the item itself is handed over for the drain.
//! 2. Nothing here blocks except the handoff, and the handoff only blocks for
//!    the duration of one synchronize pass.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bus;
pub mod error;
pub mod queue;
pub mod sync;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use error::{CoreError, CoreResult};
pub use queue::{EventQueue, QueueStats};
pub use sync::{handoff, HandoffError, HandoffReceiver, HandoffSender};
