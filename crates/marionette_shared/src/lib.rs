//! # MARIONETTE Shared
//!
//! Types that travel between the GUI-thread item and the render-thread
//! bridge.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - threading primitives (`parking_lot`, `crossbeam-channel`)
//! - the animation engine capability
//!
//! Everything here is plain data that is either copied at the sync point or
//! published on the notification bus.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod events;

pub use config::{ChangeSet, ItemConfig, Property, PropertyChange, Rgba};
pub use constants::{DEFAULT_RANDOM_MOTION_GROUP, MODEL_MANIFEST_SUFFIX};
pub use events::{
    AnimationCommand, MotionHandle, Notification, PointerButton, PointerEvent, PointerKind,
    Priority, SceneLoadError, TapPhase,
};
