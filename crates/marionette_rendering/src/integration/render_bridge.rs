//! Render Bridge - the render-thread owner of the engine.
//!
//! Reads the item only inside [`RenderBridge::synchronize`], while the item is
//! handed over and the GUI thread is blocked. Everything else works from the
//! bridge's own copy.

use std::path::Path;
use std::sync::Arc;

use marionette_core::EventSender;
use marionette_shared::{
    AnimationCommand, ChangeSet, ItemConfig, Notification, PointerButton, PointerEvent,
    PointerKind, Property, Rgba, SceneLoadError, TapPhase,
};
use tracing::{debug, info, trace, warn};

use super::scene::{resolve_model, ModelLocation};
use crate::engine::{AnimationEngine, DrawContext, EngineFramework, SceneParameters};
use crate::error::{BridgeResult, EngineError};
use crate::link::{ModelCatalog, RendererAnchor, RendererLink};
use crate::runtime::{EngineRuntime, LogLevel, RuntimeOptions, RuntimeRegistry};
use crate::stats::{FrameStats, SyncReport};
use crate::timer::FrameTimer;
use crate::viewport::{SurfaceSize, Viewport};

/// Diagnostics switches for the render bridge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderBridgeConfig {
    /// Log scene rebuilds, refused motions and dropped commands
    pub debug_logging: bool,
    /// Log every tap with its logical coordinates
    pub touch_logging: bool,
}

impl RenderBridgeConfig {
    /// Switches implied by an engine log level
    #[must_use]
    pub const fn from_log_level(level: LogLevel) -> Self {
        Self {
            debug_logging: level.debug_logging(),
            touch_logging: level.touch_logging(),
        }
    }
}

/// Trait for the item side of a synchronize pass
///
/// This abstracts over the actual item, so the bridge can be driven by
/// anything that owns a configuration snapshot and the two event queues.
pub trait SyncSource {
    /// Stores the back-reference the item uses for its queries
    fn bind_renderer(&mut self, link: RendererLink);

    /// Current item size in pixels
    fn surface_size(&self) -> SurfaceSize;

    /// Current configuration snapshot
    fn config(&self) -> &ItemConfig;

    /// Returns the properties changed since the last call and clears them
    fn take_changes(&mut self) -> ChangeSet;

    /// Drains the pointer queue, oldest first
    fn take_pointer_events(&mut self) -> Vec<PointerEvent>;

    /// Drains the animation queue, oldest first
    fn take_animation_commands(&mut self) -> Vec<AnimationCommand>;
}

/// The bridge between the item and the animation engine
///
/// IMPORTANT: This owns the engine and the surface. The item never sees
/// either; it gets notifications and a [`RendererLink`].
///
/// ## Usage
///
/// ```rust,ignore
/// let (notifier, notifications) = EventBus::create_pair();
/// let mut bridge = RenderBridge::start(engine, &framework, &options, notifier)?;
///
/// // Each frame, with the item handed over:
/// let report = bridge.synchronize(&mut item);
/// // Item handed back, then:
/// let stats = bridge.render();
/// ```
pub struct RenderBridge<E: AnimationEngine> {
    /// The engine, exclusively owned
    engine: E,
    /// Diagnostics switches
    config: RenderBridgeConfig,
    /// Strong side of the item's back-reference
    anchor: RendererAnchor,
    /// Outbound notifications
    notifier: EventSender<Notification>,
    /// Current surface, `None` before the first synchronize
    viewport: Option<Viewport>,
    /// Clear colour copied at the last synchronize
    background_color: Rgba,
    /// Per-frame parameters copied at the last synchronize
    parameters: SceneParameters,
    /// Location of the live model
    scene: Option<ModelLocation>,
    /// A press was seen and its release is pending
    captured: bool,
    /// Last pointer position in item pixels
    cursor: (f64, f64),
    /// Frame clock
    timer: FrameTimer,
    /// Statistics of the last rendered frame
    last_frame: FrameStats,
    /// Keeps the engine framework alive; dropped last
    runtime: EngineRuntime,
}

impl<E: AnimationEngine> RenderBridge<E> {
    /// Creates a bridge around `engine`
    ///
    /// Diagnostics follow the runtime's log level.
    #[must_use]
    pub fn new(
        engine: E,
        runtime: EngineRuntime,
        notifier: EventSender<Notification>,
    ) -> Self {
        let mut timer = FrameTimer::new();
        timer.tick();

        Self {
            config: RenderBridgeConfig::from_log_level(runtime.options().log_level),
            engine,
            anchor: RendererAnchor::new(),
            notifier,
            viewport: None,
            background_color: Rgba::TRANSPARENT,
            parameters: SceneParameters::default(),
            scene: None,
            captured: false,
            cursor: (0.0, 0.0),
            timer,
            last_frame: FrameStats::default(),
            runtime,
        }
    }

    /// Acquires the process-wide runtime (starting it if needed) and creates
    /// a bridge
    ///
    /// # Errors
    ///
    /// [`crate::BridgeError::Startup`] if the framework cannot start.
    pub fn start(
        engine: E,
        framework: &Arc<dyn EngineFramework>,
        options: &RuntimeOptions,
        notifier: EventSender<Notification>,
    ) -> BridgeResult<Self> {
        let runtime = RuntimeRegistry::global().acquire(framework, options)?;
        Ok(Self::new(engine, runtime, notifier))
    }

    /// Replaces the diagnostics switches
    #[must_use]
    pub fn with_config(mut self, config: RenderBridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Copies the item's state and drains its queues
    ///
    /// This is the MAIN INTERFACE between the two threads. It must run with
    /// the GUI thread blocked, which a handoff guarantees.
    pub fn synchronize<S: SyncSource + ?Sized>(&mut self, source: &mut S) -> SyncReport {
        let mut report = SyncReport {
            changed: source.take_changes(),
            ..SyncReport::default()
        };
        source.bind_renderer(self.anchor.link());

        let size = source.surface_size();
        if self.viewport.map(|viewport| viewport.size()) != Some(size) {
            self.recreate_surface(size);
            report.surface_recreated = true;
        }

        let config = source.config();
        self.background_color = config.background_color;
        self.parameters = SceneParameters::from_config(config);
        let scene_request = report
            .changed
            .invalidates_scene()
            .then(|| (config.model_path.clone(), config.background_path.clone()));

        // 1. Scene
        if let Some((model_path, background_path)) = scene_request {
            if model_path.is_empty() && !report.changed.contains(Property::ModelPath) {
                // Background set ahead of the model: nothing to rebuild yet
                debug!(
                    background = background_path.as_str(),
                    "background stored, no model to rebuild yet"
                );
            } else {
                match self.rebuild_scene(&model_path, &background_path) {
                    Ok(()) => report.scene_rebuilt = true,
                    Err(err) => report.scene_error = Some(err),
                }
            }
        }

        // 2. Pointer events
        let events = source.take_pointer_events();
        report.pointer_events = events.len();
        for event in events {
            self.process_pointer(event);
        }

        // 3. Per-frame parameters
        if self.engine.has_model() {
            self.engine.set_parameters(&self.parameters);
        }

        // 4. Animation commands
        let commands = source.take_animation_commands();
        report.animation_commands = commands.len();
        for command in commands {
            self.process_command(command);
        }

        trace!(
            changed = report.changed.len(),
            pointer_events = report.pointer_events,
            animation_commands = report.animation_commands,
            "synchronized"
        );
        report
    }

    /// Renders one frame from the local mirror
    pub fn render(&mut self) -> FrameStats {
        let time = self.timer.tick();
        self.engine.clear(self.background_color);

        let model_drawn = self.engine.has_model();
        if model_drawn {
            let delta = self.timer.delta_seconds();
            self.engine.update(delta);
            let context = DrawContext::new(&self.viewport.unwrap_or_default(), delta);
            self.engine.draw(&context);

            for finished in self.engine.take_finished_motions() {
                self.notifier.send(Notification::MotionFinished {
                    motion: finished.motion,
                    group: finished.group,
                    name: finished.name,
                });
            }
        }

        self.last_frame = FrameStats {
            frame: self.last_frame.frame + 1,
            elapsed_seconds: time.elapsed,
            delta_seconds: time.delta,
            model_drawn,
        };
        self.last_frame
    }

    /// Synchronizes, then renders
    pub fn frame<S: SyncSource + ?Sized>(&mut self, source: &mut S) -> (SyncReport, FrameStats) {
        let report = self.synchronize(source);
        (report, self.render())
    }

    fn recreate_surface(&mut self, size: SurfaceSize) {
        let viewport = Viewport::new(size);
        self.engine.resize(&viewport);
        self.viewport = Some(viewport);
        debug!(width = size.width, height = size.height, "surface recreated");
    }

    // =========================================================================
    // SCENE
    // =========================================================================

    fn rebuild_scene(&mut self, model_path: &str, background_path: &str) -> Result<(), SceneLoadError> {
        let result = self.load_scene(model_path, background_path);
        match &result {
            Ok(()) => {
                info!(model = model_path, "scene rebuilt");
                self.notifier.send(Notification::ModelReady);
            }
            Err(err) => {
                warn!(model = model_path, "scene rebuild skipped: {err}");
                self.notifier
                    .send(Notification::ModelLoadFailed(err.clone()));
            }
        }
        result
    }

    fn load_scene(&mut self, model_path: &str, background_path: &str) -> Result<(), SceneLoadError> {
        let location = resolve_model(model_path)?;

        self.engine.unload();
        self.scene = None;
        if let Err(err) = self
            .engine
            .load_model(&location.directory, &location.manifest)
        {
            self.anchor.publish(ModelCatalog::default());
            let reason = match err {
                EngineError::ModelLoad { reason, .. } => reason,
                other @ EngineError::Startup(_) => other.to_string(),
            };
            return Err(SceneLoadError::EngineRejected {
                path: location.directory,
                reason,
            });
        }

        let background = (!background_path.is_empty()).then(|| Path::new(background_path));
        self.engine.set_background(background);
        self.anchor.publish(ModelCatalog::from_engine(&self.engine));
        self.scene = Some(location);
        Ok(())
    }

    // =========================================================================
    // POINTER
    // =========================================================================

    fn process_pointer(&mut self, event: PointerEvent) {
        match event.kind {
            PointerKind::Move => {
                self.cursor = (event.x, event.y);
                let (x, y) = self.logical_cursor();
                self.drag_to(x, y);
            }
            PointerKind::Press if event.button == PointerButton::Primary => {
                self.cursor = (event.x, event.y);
                self.captured = true;
                let (x, y) = self.logical_cursor();
                self.tap(TapPhase::Begin, x, y);
            }
            PointerKind::Release if event.button == PointerButton::Primary && self.captured => {
                self.cursor = (event.x, event.y);
                self.captured = false;
                self.drag_to(0.0, 0.0);
                let (x, y) = self.logical_cursor();
                self.tap(TapPhase::End, x, y);
            }
            PointerKind::Press | PointerKind::Release => {}
        }
    }

    fn logical_cursor(&self) -> (f32, f32) {
        let (px, py) = self.cursor;
        self.viewport.unwrap_or_default().to_logical(px, py)
    }

    fn drag_to(&mut self, x: f32, y: f32) {
        if self.engine.has_model() {
            self.engine.set_dragging(x, y);
        }
        self.notifier.send(Notification::CursorMoved { x, y });
    }

    fn tap(&mut self, phase: TapPhase, x: f32, y: f32) {
        if self.config.touch_logging {
            debug!(?phase, x, y, "tap");
        }
        self.notifier.send(Notification::Tap { phase, x, y });

        if !self.engine.has_model() {
            return;
        }
        let names = self.engine.hit_test(x, y);
        if !names.is_empty() {
            self.notifier.send(Notification::HitAreas { phase, names });
        }
    }

    // =========================================================================
    // ANIMATION
    // =========================================================================

    fn process_command(&mut self, command: AnimationCommand) {
        if !self.engine.has_model() {
            if self.config.debug_logging {
                debug!(?command, "no model loaded, command dropped");
            }
            return;
        }

        match command {
            AnimationCommand::StopAll => self.engine.stop_all_motions(),
            AnimationCommand::SetExpression { name } => self.engine.set_expression(&name),
            AnimationCommand::StartMotion {
                group,
                name,
                priority,
            } => {
                let handle = self.engine.start_motion(&group, &name, priority);
                if handle.is_none() && self.config.debug_logging {
                    debug!(%group, %name, ?priority, "motion refused");
                }
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The engine
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// A fresh weak link to this renderer
    #[must_use]
    pub fn link(&self) -> RendererLink {
        self.anchor.link()
    }

    /// Unique id of this renderer
    #[must_use]
    pub fn renderer_id(&self) -> u64 {
        self.anchor.id()
    }

    /// Returns the diagnostics switches
    #[must_use]
    pub fn config(&self) -> &RenderBridgeConfig {
        &self.config
    }

    /// Returns true while a model is loaded
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.engine.has_model()
    }

    /// Location of the live model
    #[must_use]
    pub fn scene(&self) -> Option<&ModelLocation> {
        self.scene.as_ref()
    }

    /// Returns true between a press and its release
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Current surface, if one was created
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Statistics of the last rendered frame
    #[must_use]
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// The runtime this bridge keeps alive
    #[must_use]
    pub fn runtime(&self) -> &EngineRuntime {
        &self.runtime
    }
}

impl<E: AnimationEngine> Drop for RenderBridge<E> {
    fn drop(&mut self) {
        if self.engine.has_model() {
            self.engine.unload();
        }
        debug!(renderer = self.anchor.id(), "render bridge torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CallLog, EngineCall, MockEngine, MockFramework, MockModel};
    use marionette_core::{EventBus, EventReceiver};
    use marionette_shared::{MotionHandle, Priority, PropertyChange};
    use std::fs;
    use tempfile::TempDir;

    /// Minimal item stand-in
    #[derive(Default)]
    struct TestSource {
        config: ItemConfig,
        changes: ChangeSet,
        size: SurfaceSize,
        pointer: Vec<PointerEvent>,
        commands: Vec<AnimationCommand>,
        link: RendererLink,
    }

    impl TestSource {
        fn new() -> Self {
            Self {
                size: SurfaceSize::new(200, 200),
                ..Self::default()
            }
        }

        fn set(&mut self, change: PropertyChange) {
            let property = change.property();
            if self.config.apply(change) {
                self.changes.insert(property);
            }
        }
    }

    impl SyncSource for TestSource {
        fn bind_renderer(&mut self, link: RendererLink) {
            self.link = link;
        }

        fn surface_size(&self) -> SurfaceSize {
            self.size
        }

        fn config(&self) -> &ItemConfig {
            &self.config
        }

        fn take_changes(&mut self) -> ChangeSet {
            std::mem::take(&mut self.changes)
        }

        fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
            std::mem::take(&mut self.pointer)
        }

        fn take_animation_commands(&mut self) -> Vec<AnimationCommand> {
            std::mem::take(&mut self.commands)
        }
    }

    struct Fixture {
        bridge: RenderBridge<MockEngine>,
        log: CallLog,
        notifications: EventReceiver<Notification>,
        source: TestSource,
        models: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_engine(MockEngine::new(MockModel::sample()))
        }

        fn with_engine(engine: MockEngine) -> Self {
            let framework: Arc<dyn EngineFramework> = Arc::new(MockFramework::new());
            let runtime = RuntimeRegistry::new()
                .acquire(&framework, &RuntimeOptions::default())
                .unwrap();
            let (notifier, notifications) = EventBus::create_pair();
            let log = engine.call_log();

            Self {
                bridge: RenderBridge::new(engine, runtime, notifier),
                log,
                notifications,
                source: TestSource::new(),
                models: tempfile::tempdir().unwrap(),
            }
        }

        fn model_dir(&self, name: &str) -> String {
            let dir = self.models.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            dir.to_string_lossy().into_owned()
        }

        fn load(&mut self, name: &str) {
            let path = self.model_dir(name);
            self.source.set(PropertyChange::ModelPath(path));
            self.bridge.synchronize(&mut self.source);
            self.notifications.drain();
            self.log.clear();
        }
    }

    #[test]
    fn test_model_path_change_rebuilds_once() {
        let mut fx = Fixture::new();
        let path = fx.model_dir("Hiyori");

        fx.source.set(PropertyChange::ModelPath(path.clone()));
        let report = fx.bridge.synchronize(&mut fx.source);

        assert!(report.scene_rebuilt);
        assert_eq!(fx.log.loads(), 1);
        assert_eq!(fx.notifications.drain(), vec![Notification::ModelReady]);
        assert_eq!(
            fx.bridge.scene().map(|s| s.manifest.as_str()),
            Some("Hiyori.model3.json")
        );

        // Same value again: no flag, no rebuild, no notification
        fx.source.set(PropertyChange::ModelPath(path));
        let report = fx.bridge.synchronize(&mut fx.source);
        assert!(!report.scene_rebuilt);
        assert_eq!(fx.log.loads(), 1);
        assert!(fx.notifications.drain().is_empty());
    }

    #[test]
    fn test_invalid_path_keeps_previous_scene() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source
            .set(PropertyChange::ModelPath("/definitely/not/here".to_string()));
        let report = fx.bridge.synchronize(&mut fx.source);

        assert!(!report.scene_rebuilt);
        assert!(matches!(
            report.scene_error,
            Some(SceneLoadError::NotADirectory { .. })
        ));
        assert!(fx.bridge.has_model());
        assert_eq!(fx.log.count(|c| *c == EngineCall::Unload), 0);
        assert!(matches!(
            fx.notifications.drain().as_slice(),
            [Notification::ModelLoadFailed(SceneLoadError::NotADirectory { .. })]
        ));
    }

    #[test]
    fn test_empty_path_reported() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source.set(PropertyChange::ModelPath(String::new()));
        let report = fx.bridge.synchronize(&mut fx.source);
        assert_eq!(report.scene_error, Some(SceneLoadError::EmptyPath));
    }

    #[test]
    fn test_engine_rejection_reported() {
        let mut fx = Fixture::with_engine(MockEngine::new(MockModel::sample()).rejecting_loads());
        let path = fx.model_dir("Broken");

        fx.source.set(PropertyChange::ModelPath(path));
        let report = fx.bridge.synchronize(&mut fx.source);

        assert!(matches!(
            report.scene_error,
            Some(SceneLoadError::EngineRejected { .. })
        ));
        assert!(!fx.bridge.has_model());
        assert!(fx.source.link.hit_area_names().is_empty());
    }

    #[test]
    fn test_background_path_handed_to_engine() {
        let mut fx = Fixture::new();
        let path = fx.model_dir("Hiyori");
        fx.source.set(PropertyChange::ModelPath(path));
        fx.source
            .set(PropertyChange::BackgroundPath("/assets/back.png".to_string()));
        fx.bridge.synchronize(&mut fx.source);

        assert_eq!(fx.log.loads(), 1);
        assert!(fx.log.snapshot().contains(&EngineCall::SetBackground(Some(
            "/assets/back.png".into()
        ))));
    }

    #[test]
    fn test_background_only_change_reloads_live_model() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source
            .set(PropertyChange::BackgroundPath("/assets/room.png".to_string()));
        let report = fx.bridge.synchronize(&mut fx.source);

        assert!(report.scene_rebuilt);
        assert_eq!(fx.log.count(|c| *c == EngineCall::Unload), 1);
        assert_eq!(fx.log.loads(), 1);
        assert_eq!(
            fx.log.count(|c| *c == EngineCall::SetBackground(Some("/assets/room.png".into()))),
            1
        );
        assert_eq!(fx.notifications.drain(), vec![Notification::ModelReady]);
        assert!(fx.bridge.has_model());
    }

    #[test]
    fn test_background_before_model_is_quiet() {
        let mut fx = Fixture::new();

        fx.source
            .set(PropertyChange::BackgroundPath("/assets/room.png".to_string()));
        let report = fx.bridge.synchronize(&mut fx.source);

        assert!(!report.scene_rebuilt);
        assert_eq!(report.scene_error, None);
        assert!(fx.notifications.drain().is_empty());
        assert_eq!(fx.log.loads(), 0);

        // The stored background goes in with the model
        let path = fx.model_dir("Hiyori");
        fx.source.set(PropertyChange::ModelPath(path));
        let report = fx.bridge.synchronize(&mut fx.source);
        assert!(report.scene_rebuilt);
        assert!(fx.log.snapshot().contains(&EngineCall::SetBackground(Some(
            "/assets/room.png".into()
        ))));
    }

    #[test]
    fn test_pointer_fifo_press_move_release() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source.pointer = vec![
            PointerEvent::press(PointerButton::Primary, 100.0, 100.0),
            PointerEvent::moved(150.0, 100.0),
            PointerEvent::release(PointerButton::Primary, 120.0, 100.0),
        ];
        let report = fx.bridge.synchronize(&mut fx.source);
        assert_eq!(report.pointer_events, 3);
        assert!(!fx.bridge.is_captured());

        let drags: Vec<_> = fx
            .log
            .snapshot()
            .into_iter()
            .filter(|c| matches!(c, EngineCall::SetDragging { .. }))
            .collect();
        assert_eq!(
            drags,
            vec![
                EngineCall::SetDragging { x: 0.5, y: 0.0 },
                EngineCall::SetDragging { x: 0.0, y: 0.0 },
            ]
        );

        let notes = fx.notifications.drain();
        assert!(matches!(
            notes.as_slice(),
            [
                Notification::Tap { phase: TapPhase::Begin, .. },
                Notification::HitAreas { phase: TapPhase::Begin, .. },
                Notification::CursorMoved { .. },
                Notification::CursorMoved { x, y },
                Notification::Tap { phase: TapPhase::End, .. },
                Notification::HitAreas { phase: TapPhase::End, .. },
            ] if *x == 0.0 && *y == 0.0
        ));
    }

    #[test]
    fn test_release_hit_test() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        // Head is around the upper middle of a 200x200 surface
        fx.source.pointer = vec![
            PointerEvent::press(PointerButton::Primary, 100.0, 50.0),
            PointerEvent::release(PointerButton::Primary, 100.0, 50.0),
        ];
        fx.bridge.synchronize(&mut fx.source);
        let notes: Vec<_> = fx
            .notifications
            .drain()
            .into_iter()
            .filter(|n| !matches!(n, Notification::CursorMoved { .. }))
            .collect();
        assert_eq!(
            &notes[2..],
            &[
                Notification::Tap {
                    phase: TapPhase::End,
                    x: 0.0,
                    y: 0.5
                },
                Notification::HitAreas {
                    phase: TapPhase::End,
                    names: vec!["Head".to_string()]
                },
            ]
        );

        // Corner hits nothing: position only
        fx.source.pointer = vec![
            PointerEvent::press(PointerButton::Primary, 190.0, 190.0),
            PointerEvent::release(PointerButton::Primary, 190.0, 190.0),
        ];
        fx.bridge.synchronize(&mut fx.source);
        let notes: Vec<_> = fx
            .notifications
            .drain()
            .into_iter()
            .filter(|n| !matches!(n, Notification::CursorMoved { .. }))
            .collect();
        assert_eq!(notes.len(), 2);
        assert!(matches!(
            notes[1],
            Notification::Tap {
                phase: TapPhase::End,
                ..
            }
        ));
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source.pointer = vec![PointerEvent::release(PointerButton::Primary, 10.0, 10.0)];
        fx.bridge.synchronize(&mut fx.source);

        assert!(fx.notifications.drain().is_empty());
        assert_eq!(
            fx.log
                .count(|c| matches!(c, EngineCall::SetDragging { .. })),
            0
        );
    }

    #[test]
    fn test_taps_without_model_report_position_only() {
        let mut fx = Fixture::new();
        fx.source.pointer = vec![PointerEvent::press(PointerButton::Primary, 100.0, 50.0)];
        fx.bridge.synchronize(&mut fx.source);

        assert_eq!(
            fx.notifications.drain(),
            vec![Notification::Tap {
                phase: TapPhase::Begin,
                x: 0.0,
                y: 0.5
            }]
        );
        assert!(fx.bridge.is_captured());
    }

    #[test]
    fn test_stop_all_without_model_is_noop() {
        let mut fx = Fixture::new();
        fx.source.commands = vec![AnimationCommand::StopAll, AnimationCommand::StopAll];

        let report = fx.bridge.synchronize(&mut fx.source);
        assert_eq!(report.animation_commands, 2);
        assert_eq!(fx.log.count(|c| *c == EngineCall::StopAllMotions), 0);
        assert!(fx.notifications.drain().is_empty());
    }

    #[test]
    fn test_commands_in_order_and_motion_finished() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source.commands = vec![
            AnimationCommand::SetExpression {
                name: "F02".to_string(),
            },
            AnimationCommand::StartMotion {
                group: "TapBody".to_string(),
                name: "TapBody_0".to_string(),
                priority: Priority::Force,
            },
            AnimationCommand::StopAll,
            AnimationCommand::StartMotion {
                group: "Idle".to_string(),
                name: "Idle_0".to_string(),
                priority: Priority::Idle,
            },
        ];
        fx.bridge.synchronize(&mut fx.source);

        let calls: Vec<_> = fx
            .log
            .snapshot()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    EngineCall::SetExpression(_)
                        | EngineCall::StartMotion { .. }
                        | EngineCall::StopAllMotions
                )
            })
            .collect();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], EngineCall::SetExpression("F02".to_string()));
        assert_eq!(calls[2], EngineCall::StopAllMotions);

        let stats = fx.bridge.render();
        assert!(stats.model_drawn);
        assert_eq!(
            fx.notifications.drain(),
            vec![Notification::MotionFinished {
                motion: Some(MotionHandle(2)),
                group: "Idle".to_string(),
                name: "Idle_0".to_string(),
            }]
        );
    }

    #[test]
    fn test_parameters_copied_each_sync() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        fx.source.set(PropertyChange::LipSyncEnabled(true));
        fx.source.set(PropertyChange::LipSyncValue(0.5));
        fx.bridge.synchronize(&mut fx.source);
        fx.bridge.synchronize(&mut fx.source);

        let params: Vec<_> = fx
            .log
            .snapshot()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::SetParameters(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(params.len(), 2);
        assert!(params[1].lip_sync_enabled);
        assert!((params[1].lip_sync_value - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_surface_recreated_on_resize_only() {
        let mut fx = Fixture::new();
        assert!(fx.bridge.synchronize(&mut fx.source).surface_recreated);
        assert!(!fx.bridge.synchronize(&mut fx.source).surface_recreated);

        fx.source.size = SurfaceSize::new(640, 480);
        assert!(fx.bridge.synchronize(&mut fx.source).surface_recreated);
        assert_eq!(
            fx.bridge.viewport().map(|v| v.size()),
            Some(SurfaceSize::new(640, 480))
        );
        assert_eq!(
            fx.log.count(|c| matches!(c, EngineCall::Resize(_))),
            2
        );
    }

    #[test]
    fn test_render_clears_without_model() {
        let mut fx = Fixture::new();
        fx.source
            .set(PropertyChange::BackgroundColor(Rgba::WHITE));
        fx.bridge.synchronize(&mut fx.source);

        let first = fx.bridge.render();
        let second = fx.bridge.render();

        assert!(!first.model_drawn);
        assert_eq!(second.frame, 2);
        assert_eq!(fx.log.count(|c| *c == EngineCall::Clear(Rgba::WHITE)), 2);
        assert_eq!(fx.log.count(|c| *c == EngineCall::Draw), 0);
    }

    #[test]
    fn test_link_bound_and_invalidated() {
        let mut fx = Fixture::new();
        fx.load("Hiyori");

        let link = fx.source.link.clone();
        assert_eq!(link.renderer_id(), Some(fx.bridge.renderer_id()));
        assert_eq!(link.expression_names(), vec!["F01", "F02"]);

        let Fixture { bridge, log, .. } = fx;
        drop(bridge);
        assert!(!link.is_alive());
        assert!(link.motion_group_names().is_empty());
        assert_eq!(log.count(|c| *c == EngineCall::Unload), 1);
    }

    #[test]
    fn test_config_from_log_level() {
        let config = RenderBridgeConfig::from_log_level(LogLevel::Verbose);
        assert!(config.debug_logging && config.touch_logging);
        assert_eq!(
            RenderBridgeConfig::from_log_level(LogLevel::Warning),
            RenderBridgeConfig::default()
        );
    }
}
