//! Scriptable engine used by tests and the headless demo.
//!
//! Models are plain descriptions (rectangular hit regions, expression and
//! motion names). Every call is appended to a shared [`CallLog`] so callers
//! can assert on what the bridge asked the engine to do.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use marionette_shared::{MotionHandle, Priority, Rgba};
use parking_lot::Mutex;

use super::{AnimationEngine, DrawContext, EngineFramework, FinishedMotion, SceneParameters};
use crate::error::EngineError;
use crate::runtime::RuntimeOptions;
use crate::viewport::{SurfaceSize, Viewport};

/// One recorded engine call.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    /// [`AnimationEngine::load_model`].
    LoadModel {
        /// Model directory.
        directory: PathBuf,
        /// Manifest file name.
        manifest: String,
    },
    /// [`AnimationEngine::unload`].
    Unload,
    /// [`AnimationEngine::set_background`].
    SetBackground(Option<PathBuf>),
    /// [`AnimationEngine::resize`].
    Resize(SurfaceSize),
    /// [`AnimationEngine::clear`].
    Clear(Rgba),
    /// [`AnimationEngine::update`].
    Update,
    /// [`AnimationEngine::draw`].
    Draw,
    /// [`AnimationEngine::set_parameters`].
    SetParameters(SceneParameters),
    /// [`AnimationEngine::set_dragging`].
    SetDragging {
        /// Logical X.
        x: f32,
        /// Logical Y.
        y: f32,
    },
    /// [`AnimationEngine::set_expression`].
    SetExpression(String),
    /// [`AnimationEngine::start_motion`].
    StartMotion {
        /// Motion group.
        group: String,
        /// Motion name.
        name: String,
        /// Requested priority.
        priority: Priority,
    },
    /// [`AnimationEngine::stop_all_motions`].
    StopAllMotions,
}

/// Shared, cloneable view of a mock engine's call history.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl CallLog {
    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }

    /// Copy of every call so far, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Number of model loads.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::LoadModel { .. }))
    }

    /// Forgets the history.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Axis-aligned hit region in logical coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
    /// Region name.
    pub name: String,
    /// Lower-left corner.
    pub min: [f32; 2],
    /// Upper-right corner.
    pub max: [f32; 2],
}

impl HitRegion {
    /// Creates a region.
    #[must_use]
    pub fn new(name: &str, min: [f32; 2], max: [f32; 2]) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

/// What a loaded mock model looks like.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockModel {
    /// Hit regions, tested in order.
    pub hit_regions: Vec<HitRegion>,
    /// Expression names.
    pub expressions: Vec<String>,
    /// Motion names per group.
    pub motions: BTreeMap<String, Vec<String>>,
}

impl MockModel {
    /// A small character: a head above a body, two expressions, idle and tap
    /// motions.
    #[must_use]
    pub fn sample() -> Self {
        let names = |list: &[&str]| list.iter().map(ToString::to_string).collect::<Vec<_>>();
        let mut motions = BTreeMap::new();
        motions.insert("Idle".to_string(), names(&["Idle_0", "Idle_1"]));
        motions.insert("TapBody".to_string(), names(&["TapBody_0"]));

        Self {
            hit_regions: vec![
                HitRegion::new("Head", [-0.3, 0.2], [0.3, 0.8]),
                HitRegion::new("Body", [-0.4, -0.8], [0.4, 0.2]),
            ],
            expressions: names(&["F01", "F02"]),
            motions,
        }
    }
}

#[derive(Debug)]
struct PlayingMotion {
    handle: MotionHandle,
    group: String,
    name: String,
}

/// In-memory [`AnimationEngine`].
///
/// Motions finish on the first update after they start. Motions requested
/// with [`Priority::None`] or naming an unknown group/motion are refused.
pub struct MockEngine {
    model: MockModel,
    loaded: Option<PathBuf>,
    reject_loads: bool,
    draw_delay: Duration,
    log: CallLog,
    next_handle: u64,
    playing: Vec<PlayingMotion>,
    finished: Vec<FinishedMotion>,
}

impl MockEngine {
    /// Creates an engine that loads `model` from any directory.
    #[must_use]
    pub fn new(model: MockModel) -> Self {
        Self {
            model,
            loaded: None,
            reject_loads: false,
            draw_delay: Duration::ZERO,
            log: CallLog::default(),
            next_handle: 1,
            playing: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Makes every load fail.
    #[must_use]
    pub fn rejecting_loads(mut self) -> Self {
        self.reject_loads = true;
        self
    }

    /// Makes every draw take at least `delay`, like a stalled GPU.
    #[must_use]
    pub fn with_draw_delay(mut self, delay: Duration) -> Self {
        self.draw_delay = delay;
        self
    }

    /// Handle on the call history. Stays valid after the engine moves.
    #[must_use]
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// Directory of the loaded model.
    #[must_use]
    pub fn loaded_directory(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    fn model(&self) -> Option<&MockModel> {
        self.loaded.as_ref().map(|_| &self.model)
    }
}

impl AnimationEngine for MockEngine {
    fn load_model(&mut self, directory: &Path, manifest: &str) -> Result<(), EngineError> {
        self.log.record(EngineCall::LoadModel {
            directory: directory.to_path_buf(),
            manifest: manifest.to_string(),
        });
        if self.reject_loads {
            return Err(EngineError::ModelLoad {
                path: directory.to_path_buf(),
                reason: format!("{manifest} is not a valid manifest"),
            });
        }
        self.loaded = Some(directory.to_path_buf());
        Ok(())
    }

    fn unload(&mut self) {
        self.log.record(EngineCall::Unload);
        self.loaded = None;
        self.playing.clear();
        self.finished.clear();
    }

    fn has_model(&self) -> bool {
        self.loaded.is_some()
    }

    fn set_background(&mut self, image: Option<&Path>) {
        self.log
            .record(EngineCall::SetBackground(image.map(Path::to_path_buf)));
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.log.record(EngineCall::Resize(viewport.size()));
    }

    fn clear(&mut self, color: Rgba) {
        self.log.record(EngineCall::Clear(color));
    }

    fn update(&mut self, _delta_seconds: f32) {
        self.log.record(EngineCall::Update);
        self.finished
            .extend(self.playing.drain(..).map(|motion| FinishedMotion {
                motion: Some(motion.handle),
                group: motion.group,
                name: motion.name,
            }));
    }

    fn draw(&mut self, _context: &DrawContext) {
        self.log.record(EngineCall::Draw);
        if !self.draw_delay.is_zero() {
            thread::sleep(self.draw_delay);
        }
    }

    fn hit_test(&self, x: f32, y: f32) -> Vec<String> {
        self.model()
            .map(|model| {
                model
                    .hit_regions
                    .iter()
                    .filter(|region| region.contains(x, y))
                    .map(|region| region.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn hit_area_names(&self) -> Vec<String> {
        self.model()
            .map(|model| model.hit_regions.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    fn expression_names(&self) -> Vec<String> {
        self.model()
            .map(|model| model.expressions.clone())
            .unwrap_or_default()
    }

    fn motion_group_names(&self) -> Vec<String> {
        self.model()
            .map(|model| model.motions.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn motion_names(&self, group: &str) -> Vec<String> {
        self.model()
            .and_then(|model| model.motions.get(group).cloned())
            .unwrap_or_default()
    }

    fn set_parameters(&mut self, parameters: &SceneParameters) {
        self.log.record(EngineCall::SetParameters(parameters.clone()));
    }

    fn set_dragging(&mut self, x: f32, y: f32) {
        self.log.record(EngineCall::SetDragging { x, y });
    }

    fn set_expression(&mut self, name: &str) {
        self.log.record(EngineCall::SetExpression(name.to_string()));
    }

    fn start_motion(
        &mut self,
        group: &str,
        name: &str,
        priority: Priority,
    ) -> Option<MotionHandle> {
        self.log.record(EngineCall::StartMotion {
            group: group.to_string(),
            name: name.to_string(),
            priority,
        });
        if priority == Priority::None {
            return None;
        }
        let known = self
            .model()
            .and_then(|model| model.motions.get(group))
            .is_some_and(|motions| motions.iter().any(|m| m == name));
        if !known {
            return None;
        }

        let handle = MotionHandle(self.next_handle);
        self.next_handle += 1;
        self.playing.push(PlayingMotion {
            handle,
            group: group.to_string(),
            name: name.to_string(),
        });
        Some(handle)
    }

    fn stop_all_motions(&mut self) {
        self.log.record(EngineCall::StopAllMotions);
        self.playing.clear();
    }

    fn take_finished_motions(&mut self) -> Vec<FinishedMotion> {
        std::mem::take(&mut self.finished)
    }
}

/// Counting [`EngineFramework`].
#[derive(Debug, Default)]
pub struct MockFramework {
    startups: AtomicUsize,
    shutdowns: AtomicUsize,
    fail_startup: bool,
}

impl MockFramework {
    /// A framework that starts successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A framework whose startup always fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_startup: true,
            ..Self::default()
        }
    }

    /// Number of startups so far.
    #[must_use]
    pub fn startups(&self) -> usize {
        self.startups.load(Ordering::Acquire)
    }

    /// Number of shutdowns so far.
    #[must_use]
    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::Acquire)
    }
}

impl EngineFramework for MockFramework {
    fn startup(&self, options: &RuntimeOptions) -> Result<(), EngineError> {
        if self.fail_startup {
            return Err(EngineError::Startup("no rendering context".to_string()));
        }
        self.startups.fetch_add(1, Ordering::AcqRel);
        options.log(&format!("framework started (level {:?})", options.log_level));
        Ok(())
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::AcqRel);
    }
}
