//! # Two-Thread Host
//!
//! Stands in for a toolkit frame scheduler: the GUI thread keeps the item,
//! a dedicated render thread owns the bridge and the engine.
//!
//! ```text
//! GUI thread                         render thread ("marionette-render")
//! ──────────                         ──────────────────────────────────
//! HostHandle::pump(&mut item)
//!   frame pending? ── item ────────► Host::step
//!   (blocked)                          bridge.synchronize(&mut item)
//!              ◄──────────── item ─────┘
//!   item back, GUI resumes             bridge.render()
//! ```
//!
//! While the item is away the GUI thread is parked inside `pump`, so
//! synchronize never races the item's setters.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::bounded;
use marionette_core::{handoff, CoreError, EventSender, HandoffError, HandoffReceiver, HandoffSender};
use marionette_rendering::{
    AnimationEngine, BridgeResult, EngineFramework, FrameStats, RenderBridge, SyncReport,
};
use marionette_shared::Notification;
use marionette_ui::FrontendItem;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{HostConfig, MarionetteConfig};
use crate::error::{HostError, HostResult};

/// Name of the render thread.
pub const RENDER_THREAD_NAME: &str = "marionette-render";

/// Counters shared by both sides of the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostStats {
    /// Completed synchronize passes.
    pub syncs: u64,
    /// Rendered frames.
    pub frames: u64,
    /// Successful scene rebuilds.
    pub scene_rebuilds: u64,
    /// Failed scene rebuilds.
    pub scene_failures: u64,
    /// Statistics of the last frame.
    pub last_frame: FrameStats,
}

impl HostStats {
    fn record_sync(&mut self, report: &SyncReport) {
        self.syncs += 1;
        if report.scene_rebuilt {
            self.scene_rebuilds += 1;
        }
        if report.scene_error.is_some() {
            self.scene_failures += 1;
        }
    }

    fn record_frame(&mut self, frame: FrameStats) {
        self.frames += 1;
        self.last_frame = frame;
    }
}

/// Render-thread side: the bridge plus the receiving end of the handoff.
pub struct Host<E: AnimationEngine> {
    bridge: RenderBridge<E>,
    receiver: HandoffReceiver<FrontendItem>,
    config: HostConfig,
    stats: Arc<Mutex<HostStats>>,
}

impl<E: AnimationEngine + 'static> Host<E> {
    /// Starts the render thread and returns the GUI-side handle.
    ///
    /// `factory` runs on the render thread, so the engine never has to be
    /// `Send`. Returns once the bridge is up.
    ///
    /// # Errors
    ///
    /// [`HostError::Bridge`] if the engine runtime refuses to start,
    /// [`HostError::Spawn`] if the thread cannot be created.
    pub fn spawn<F>(
        factory: F,
        framework: Arc<dyn EngineFramework>,
        config: &MarionetteConfig,
        notifier: EventSender<Notification>,
    ) -> HostResult<HostHandle>
    where
        F: FnOnce() -> E + Send + 'static,
    {
        let (sender, receiver) = handoff::<FrontendItem>();
        let (ready_tx, ready_rx) = bounded::<BridgeResult<u64>>(1);
        let stats = Arc::new(Mutex::new(HostStats::default()));

        let runtime_options = config.runtime_options();
        let bridge_config = config.bridge_config();
        let host_config = config.host;
        let thread_stats = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(RENDER_THREAD_NAME.to_string())
            .spawn(move || {
                let bridge = match RenderBridge::start(factory(), &framework, &runtime_options, notifier) {
                    Ok(bridge) => bridge.with_config(bridge_config),
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if ready_tx.send(Ok(bridge.renderer_id())).is_err() {
                    return;
                }

                Host {
                    bridge,
                    receiver,
                    config: host_config,
                    stats: thread_stats,
                }
                .run();
            })
            .map_err(|e| HostError::Spawn(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(renderer_id)) => {
                info!(renderer = renderer_id, "render thread started");
                Ok(HostHandle {
                    sender: Some(sender),
                    thread: Some(thread),
                    config: host_config,
                    stats,
                    renderer_id,
                })
            }
            Ok(Err(err)) => {
                error!("render thread failed to start: {err}");
                let _ = thread.join();
                Err(err.into())
            }
            Err(_) => {
                let _ = thread.join();
                Err(HostError::RenderThreadPanicked)
            }
        }
    }

    /// Serves handoffs until the GUI side hangs up.
    fn run(mut self) {
        let err = loop {
            if let Err(err) = self.step() {
                break err;
            }
        };
        debug!("handoff closed: {err}");
        info!(
            renderer = self.bridge.renderer_id(),
            frames = self.stats.lock().frames,
            "render thread stopping"
        );
    }

    /// Waits one frame interval for the item.
    ///
    /// A served handoff is followed by a frame. Without one, continuous mode
    /// still renders so running motions keep moving. Returns whether a
    /// frame was rendered.
    fn step(&mut self) -> Result<bool, CoreError> {
        let bridge = &mut self.bridge;
        let served = self
            .receiver
            .serve_timeout(self.config.frame_interval(), |item| bridge.synchronize(item))?;

        match served {
            Some(report) => {
                let frame = self.bridge.render();
                let mut stats = self.stats.lock();
                stats.record_sync(&report);
                stats.record_frame(frame);
                Ok(true)
            }
            None if self.config.continuous && self.bridge.has_model() => {
                let frame = self.bridge.render();
                self.stats.lock().record_frame(frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// GUI-side handle to a running render thread.
pub struct HostHandle {
    sender: Option<HandoffSender<FrontendItem>>,
    thread: Option<JoinHandle<()>>,
    config: HostConfig,
    stats: Arc<Mutex<HostStats>>,
    renderer_id: u64,
}

impl HostHandle {
    /// Hands `item` to the render thread if a frame is due, and blocks until
    /// it is synchronized.
    ///
    /// A frame is due when the item requested one, or always in continuous
    /// mode. Returns whether a synchronize happened. If the render thread is
    /// busy past the handoff timeout, the frame request is kept for the next
    /// pump.
    ///
    /// # Errors
    ///
    /// [`HostError::RenderThreadStopped`] if the render thread is gone (the
    /// item is left untouched), [`HostError::ItemLost`] if it vanished while
    /// holding the item; `item` is then a blank item.
    pub fn pump(&self, item: &mut FrontendItem) -> HostResult<bool> {
        let due = item.take_frame_request() || self.config.continuous;
        if !due {
            return Ok(false);
        }
        let Some(sender) = self.sender.as_ref() else {
            item.request_frame();
            return Err(HostError::RenderThreadStopped);
        };

        let blank = FrontendItem::placeholder(item.notifier());
        let owned = std::mem::replace(item, blank);
        match sender.exchange_timeout(owned, self.config.handoff_timeout()) {
            Ok(returned) => {
                *item = returned;
                Ok(true)
            }
            Err(HandoffError::Timeout(returned)) => {
                *item = returned;
                item.request_frame();
                warn!(
                    timeout_ms = self.config.handoff_timeout_ms,
                    "render thread busy, frame postponed"
                );
                Ok(false)
            }
            Err(HandoffError::Disconnected(returned)) => {
                *item = returned;
                item.request_frame();
                Err(HostError::RenderThreadStopped)
            }
            Err(HandoffError::Lost) => Err(HostError::ItemLost),
        }
    }

    /// Id of the renderer on the render thread.
    #[must_use]
    pub fn renderer_id(&self) -> u64 {
        self.renderer_id
    }

    /// Scheduling settings.
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> HostStats {
        *self.stats.lock()
    }

    /// Returns true until the render thread exits.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Closes the handoff and joins the render thread.
    ///
    /// The bridge is dropped on the render thread, which unloads the model
    /// and releases its runtime handle.
    ///
    /// # Errors
    ///
    /// [`HostError::RenderThreadPanicked`] if the thread panicked.
    pub fn shutdown(mut self) -> HostResult<HostStats> {
        self.stop()?;
        Ok(self.stats())
    }

    fn stop(&mut self) -> HostResult<()> {
        drop(self.sender.take());
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| HostError::RenderThreadPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("render thread shutdown failed: {err}");
        }
    }
}
