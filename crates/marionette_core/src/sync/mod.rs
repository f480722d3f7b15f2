//! # Synchronization Between GUI and Render Threads
//!
//! ## The Problem
//!
//! ```text
//! GUI thread:     WRITES item configuration, APPENDS input events
//! Render thread:  READS configuration, DRAINS queues, CLEARS changed flags
//!
//! Without synchronization: torn configuration, lost or reordered events
//! ```
//!
//! ## The Solution: Ownership Handoff
//!
//! ```text
//! Frame N:
//!   GUI thread hands the item to the render thread and blocks
//!   Render thread synchronizes (copy config, drain queues) and hands it back
//!   GUI thread resumes; render thread draws from its private copy
//! ```
//!
//! Moving the item across the rendezvous is what makes the GUI thread
//! quiescent during the sync: it cannot touch what it no longer owns.

mod handoff;

pub use handoff::{handoff, HandoffError, HandoffReceiver, HandoffSender};
