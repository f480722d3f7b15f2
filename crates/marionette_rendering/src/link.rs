//! # Renderer Back-Reference
//!
//! The item needs read-only facts about the loaded model (hit areas,
//! expressions, motions) but must never reach into the engine. The bridge
//! publishes a [`ModelCatalog`] behind an `Arc`; the item holds a `Weak`.
//!
//! ```text
//! RenderBridge ── RendererAnchor (Arc) ──► RendererShared { catalog }
//!                                                ▲
//! FrontendItem ── RendererLink (Weak) ───────────┘
//! ```
//!
//! Dropping the bridge drops the anchor, and every link fails to upgrade from
//! that moment on.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::engine::AnimationEngine;

/// Read-only facts about the loaded model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    /// Hit region names.
    pub hit_areas: Vec<String>,
    /// Expression names.
    pub expressions: Vec<String>,
    /// Motion group names.
    pub motion_groups: Vec<String>,
    /// Motion names per group.
    pub motions: BTreeMap<String, Vec<String>>,
}

impl ModelCatalog {
    /// Snapshots the engine's current model. Empty if none is loaded.
    #[must_use]
    pub fn from_engine<E: AnimationEngine + ?Sized>(engine: &E) -> Self {
        let motion_groups = engine.motion_group_names();
        let motions = motion_groups
            .iter()
            .map(|group| (group.clone(), engine.motion_names(group)))
            .collect();

        Self {
            hit_areas: engine.hit_area_names(),
            expressions: engine.expression_names(),
            motion_groups,
            motions,
        }
    }

    /// Motion names in `group`, empty for unknown groups.
    #[must_use]
    pub fn motion_names(&self, group: &str) -> Vec<String> {
        self.motions.get(group).cloned().unwrap_or_default()
    }
}

struct RendererShared {
    id: u64,
    catalog: RwLock<ModelCatalog>,
}

/// Strong side, owned by the bridge.
pub struct RendererAnchor {
    shared: Arc<RendererShared>,
}

impl RendererAnchor {
    /// Creates an anchor with a fresh renderer id and an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        Self {
            shared: Arc::new(RendererShared {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                catalog: RwLock::new(ModelCatalog::default()),
            }),
        }
    }

    /// Unique id of this renderer.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// A weak link for the item.
    #[must_use]
    pub fn link(&self) -> RendererLink {
        RendererLink {
            inner: Arc::downgrade(&self.shared),
        }
    }

    /// Replaces the published catalog.
    pub fn publish(&self, catalog: ModelCatalog) {
        *self.shared.catalog.write() = catalog;
    }
}

impl Default for RendererAnchor {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak side, held by the item. Every query is empty once the renderer is
/// gone or before one was ever bound.
#[derive(Clone, Default)]
pub struct RendererLink {
    inner: Weak<RendererShared>,
}

impl RendererLink {
    /// A link bound to nothing.
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Returns true while the renderer exists.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Id of the linked renderer, if it is alive.
    #[must_use]
    pub fn renderer_id(&self) -> Option<u64> {
        self.inner.upgrade().map(|shared| shared.id)
    }

    /// Runs `f` on the catalog if the renderer is alive.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&ModelCatalog) -> R) -> Option<R> {
        let shared = self.inner.upgrade()?;
        let catalog = shared.catalog.read();
        Some(f(&*catalog))
    }

    /// Hit region names.
    #[must_use]
    pub fn hit_area_names(&self) -> Vec<String> {
        self.with_catalog(|c| c.hit_areas.clone()).unwrap_or_default()
    }

    /// Expression names.
    #[must_use]
    pub fn expression_names(&self) -> Vec<String> {
        self.with_catalog(|c| c.expressions.clone()).unwrap_or_default()
    }

    /// Motion group names.
    #[must_use]
    pub fn motion_group_names(&self) -> Vec<String> {
        self.with_catalog(|c| c.motion_groups.clone())
            .unwrap_or_default()
    }

    /// Motion names in `group`.
    #[must_use]
    pub fn motion_names(&self, group: &str) -> Vec<String> {
        self.with_catalog(|c| c.motion_names(group))
            .unwrap_or_default()
    }
}
