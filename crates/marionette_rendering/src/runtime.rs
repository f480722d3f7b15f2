//! # Process-Wide Engine Runtime
//!
//! The engine framework must be started exactly once before any scene exists
//! and shut down once after the last scene is gone.
//!
//! ```text
//! RuntimeRegistry ── Mutex<Slot { live framework, holders }>
//!                          ▲                  ▲
//!        EngineRuntime ────┘                  └──── EngineRuntime
//!        (RenderBridge #1)                          (RenderBridge #2)
//!
//! first acquire  : framework.startup()      holders = 1
//! later acquires : share the live framework holders += 1
//! last hold drop : framework.shutdown()     holders = 0
//! ```
//!
//! Startup and shutdown both run under the slot lock, so the framework's
//! lifetime is exactly the union of the bridges' lifetimes.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::engine::EngineFramework;
use crate::error::{BridgeError, BridgeResult};

/// Engine log verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including touch coordinates.
    Verbose,
    /// Debug diagnostics.
    Debug,
    /// Informational messages.
    Info,
    /// Warnings.
    Warning,
    /// Errors only.
    Error,
    /// Nothing.
    #[default]
    Off,
}

impl LogLevel {
    /// Whether bridge debug logging is on at this level.
    #[must_use]
    pub const fn debug_logging(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Whether touch coordinates are logged at this level.
    #[must_use]
    pub const fn touch_logging(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Sink for engine log lines.
pub type LogFunction = Arc<dyn Fn(&str) + Send + Sync>;

/// Forwards engine messages into `tracing`.
#[must_use]
pub fn default_log_function() -> LogFunction {
    Arc::new(|message: &str| info!(target: "marionette::engine", "{message}"))
}

/// Options handed to [`EngineFramework::startup`].
#[derive(Clone)]
pub struct RuntimeOptions {
    /// Engine verbosity.
    pub log_level: LogLevel,
    /// Where engine messages go.
    pub log_function: LogFunction,
}

impl RuntimeOptions {
    /// Options with the given level and the default log function.
    #[must_use]
    pub fn with_level(log_level: LogLevel) -> Self {
        Self {
            log_level,
            log_function: default_log_function(),
        }
    }

    /// Sends a message to the log function unless logging is off.
    pub fn log(&self, message: &str) {
        if self.log_level != LogLevel::Off {
            (self.log_function)(message);
        }
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::with_level(LogLevel::default())
    }
}

impl fmt::Debug for RuntimeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeOptions")
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

/// The started framework, owned by the registry slot.
struct LiveFramework {
    framework: Arc<dyn EngineFramework>,
    options: RuntimeOptions,
}

#[derive(Default)]
struct Slot {
    live: Option<LiveFramework>,
    holders: usize,
}

/// A hold on the started engine framework.
///
/// Each [`RuntimeRegistry::acquire`] hands out its own hold. Dropping the
/// last one shuts the framework down with the registry locked, so a
/// concurrent acquire sees either the old framework or none at all.
pub struct EngineRuntime {
    slot: Arc<Mutex<Slot>>,
    options: RuntimeOptions,
}

impl EngineRuntime {
    /// Options the framework was started with.
    #[must_use]
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        slot.holders = slot.holders.saturating_sub(1);
        if slot.holders > 0 {
            return;
        }
        if let Some(live) = slot.live.take() {
            live.framework.shutdown();
            info!("engine runtime shut down");
        }
    }
}

impl fmt::Debug for EngineRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRuntime")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Hands out holds on the single live engine framework.
pub struct RuntimeRegistry {
    slot: Arc<Mutex<Slot>>,
}

impl RuntimeRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<RuntimeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns a hold on the live framework, starting `framework` if none
    /// is running.
    ///
    /// When a framework is already live, `framework` and `options` are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Startup`] if the framework fails to start.
    pub fn acquire(
        &self,
        framework: &Arc<dyn EngineFramework>,
        options: &RuntimeOptions,
    ) -> BridgeResult<EngineRuntime> {
        let mut slot = self.slot.lock();
        if let Some(live_options) = slot.live.as_ref().map(|live| live.options.clone()) {
            slot.holders += 1;
            return Ok(self.hold(live_options));
        }

        if let Err(err) = framework.startup(options) {
            error!("engine runtime failed to start: {err}");
            return Err(BridgeError::Startup(err));
        }
        info!(log_level = ?options.log_level, "engine runtime started");

        slot.live = Some(LiveFramework {
            framework: Arc::clone(framework),
            options: options.clone(),
        });
        slot.holders = 1;
        Ok(self.hold(options.clone()))
    }

    fn hold(&self, options: RuntimeOptions) -> EngineRuntime {
        EngineRuntime {
            slot: Arc::clone(&self.slot),
            options,
        }
    }

    /// Returns true while some bridge holds the runtime.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot.lock().live.is_some()
    }

    /// Number of outstanding holds.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.slot.lock().holders
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockFramework;
    use crate::error::EngineError;
    use std::thread;
    use std::time::Duration;

    fn framework() -> (Arc<MockFramework>, Arc<dyn EngineFramework>) {
        let mock = Arc::new(MockFramework::new());
        let shared: Arc<dyn EngineFramework> = mock.clone();
        (mock, shared)
    }

    #[test]
    fn test_startup_runs_once() {
        let registry = RuntimeRegistry::new();
        let (mock, shared) = framework();
        let options = RuntimeOptions::default();

        let first = registry.acquire(&shared, &options).unwrap();
        let second = registry.acquire(&shared, &options).unwrap();

        assert_eq!(registry.holders(), 2);
        assert_eq!(mock.startups(), 1);
        assert!(registry.is_running());

        drop(first);
        assert_eq!(mock.shutdowns(), 0);
        drop(second);
        assert_eq!(mock.shutdowns(), 1);
        assert!(!registry.is_running());
    }

    #[test]
    fn test_restart_after_teardown() {
        let registry = RuntimeRegistry::new();
        let (mock, shared) = framework();

        drop(registry.acquire(&shared, &RuntimeOptions::default()).unwrap());
        drop(registry.acquire(&shared, &RuntimeOptions::default()).unwrap());

        assert_eq!(mock.startups(), 2);
        assert_eq!(mock.shutdowns(), 2);
    }

    #[test]
    fn test_startup_failure() {
        let registry = RuntimeRegistry::new();
        let shared: Arc<dyn EngineFramework> = Arc::new(MockFramework::failing());

        let result = registry.acquire(&shared, &RuntimeOptions::default());
        assert!(matches!(result, Err(BridgeError::Startup(_))));
        assert!(!registry.is_running());
        assert_eq!(registry.holders(), 0);
    }

    /// Records lifecycle calls; shutdown takes a while.
    struct SlowFramework {
        events: Mutex<Vec<&'static str>>,
        shutdown_delay: Duration,
    }

    impl EngineFramework for SlowFramework {
        fn startup(&self, _options: &RuntimeOptions) -> Result<(), EngineError> {
            self.events.lock().push("startup");
            Ok(())
        }

        fn shutdown(&self) {
            thread::sleep(self.shutdown_delay);
            self.events.lock().push("shutdown");
        }
    }

    #[test]
    fn test_acquire_during_slow_shutdown_waits_for_teardown() {
        let registry = RuntimeRegistry::new();
        let slow = Arc::new(SlowFramework {
            events: Mutex::new(Vec::new()),
            shutdown_delay: Duration::from_millis(100),
        });
        let shared: Arc<dyn EngineFramework> = slow.clone();

        let old = registry.acquire(&shared, &RuntimeOptions::default()).unwrap();
        let releaser = thread::spawn(move || drop(old));

        thread::sleep(Duration::from_millis(20));
        let fresh = registry.acquire(&shared, &RuntimeOptions::default()).unwrap();
        releaser.join().unwrap();

        assert_eq!(*slow.events.lock(), vec!["startup", "shutdown", "startup"]);
        assert!(registry.is_running());
        assert_eq!(registry.holders(), 1);

        drop(fresh);
        assert_eq!(
            *slow.events.lock(),
            vec!["startup", "shutdown", "startup", "shutdown"]
        );
    }

    #[test]
    fn test_log_function_respects_level() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let mut options = RuntimeOptions {
            log_level: LogLevel::Off,
            log_function: Arc::new(move |message: &str| sink.lock().push(message.to_string())),
        };

        options.log("hidden");
        options.log_level = LogLevel::Info;
        options.log("shown");

        assert_eq!(*lines.lock(), vec!["shown".to_string()]);
    }

    #[test]
    fn test_level_flags() {
        assert!(LogLevel::Verbose.touch_logging());
        assert!(LogLevel::Debug.debug_logging());
        assert!(!LogLevel::Debug.touch_logging());
        assert!(!LogLevel::default().debug_logging());
    }
}
