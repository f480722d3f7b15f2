//! Frame timing.
//!
//! Elapsed time is measured from the first tick; the first tick's delta is
//! zero.

use std::time::Instant;

/// Time values for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the first tick.
    pub elapsed: f64,
    /// Seconds since the previous tick.
    pub delta: f64,
}

/// Monotonic frame clock.
#[derive(Debug, Default)]
pub struct FrameTimer {
    start: Option<Instant>,
    last: FrameTime,
}

impl FrameTimer {
    /// A timer that starts on its first tick.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances to `now`. Instants before the previous tick give a zero
    /// delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        let delta = (elapsed - self.last.elapsed).max(0.0);
        self.last = FrameTime {
            elapsed: elapsed.max(self.last.elapsed),
            delta,
        };
        self.last
    }

    /// The last tick's values.
    #[must_use]
    pub fn last(&self) -> FrameTime {
        self.last
    }

    /// Delta of the last tick as `f32`, the engine's unit.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn delta_seconds(&self) -> f32 {
        self.last.delta as f32
    }
}
