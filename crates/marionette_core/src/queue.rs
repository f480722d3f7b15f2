//! Unbounded FIFO event queue.
//!
//! Producers append without ever failing or blocking; the consumer takes the
//! whole backlog in one step. There is no backpressure: the input source
//! (pointer hardware, user scripts) is the rate limiter.
//!
//! ```text
//! GUI thread ──► push ──► [e0, e1, e2, ...] ──► take_all ──► render thread
//!                         (only during the handoff)
//! ```

use std::collections::VecDeque;

/// Initial capacity, sized for one frame of pointer input.
const INITIAL_CAPACITY: usize = 64;

/// Counters kept by an [`EventQueue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Events pushed since creation.
    pub received: u64,
    /// Events handed to the consumer since creation.
    pub drained: u64,
    /// Largest backlog seen.
    pub high_water: usize,
}

/// Ordered, unbounded queue of discrete events.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
    stats: QueueStats,
}

impl<T> EventQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(INITIAL_CAPACITY),
            stats: QueueStats::default(),
        }
    }

    /// Creates an empty queue without reserving any space.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            events: VecDeque::new(),
            stats: QueueStats {
                received: 0,
                drained: 0,
                high_water: 0,
            },
        }
    }

    /// Appends an event. Never fails.
    pub fn push(&mut self, event: T) {
        self.events.push_back(event);
        self.stats.received += 1;
        self.stats.high_water = self.stats.high_water.max(self.events.len());
    }

    /// Drains every pending event in FIFO order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, T> {
        self.stats.drained += self.events.len() as u64;
        self.events.drain(..)
    }

    /// Takes the whole backlog, leaving the queue empty.
    pub fn take_all(&mut self) -> Vec<T> {
        self.drain().collect()
    }

    /// Iterates over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Events the queue can hold before it reallocates.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
