//! # Notification Bus
//!
//! Replaces push-style signal wiring with an explicit outbound channel: the
//! bridge (and the item, for property changes) publish, subscribers drain.
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │ RenderBridge │──┐                   │  subscriber  │
//! └──────────────┘  │   ┌───────────┐   │  (GUI code)  │
//!                   ├──►│  EventBus │──►│              │
//! ┌──────────────┐  │   └───────────┘   └──────────────┘
//! │ FrontendItem │──┘
//! └──────────────┘
//! ```
//!
//! Uses crossbeam channels. The channel is unbounded so publishing never
//! blocks the render thread.

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::error::{CoreError, CoreResult};

/// Owner of one notification channel.
pub struct EventBus<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> EventBus<T> {
    /// Creates a new bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple publishers).
    #[must_use]
    pub fn sender(&self) -> EventSender<T> {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    ///
    /// Receivers share one queue: each event goes to exactly one of them.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver<T> {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender/receiver pair and drops the bus.
    #[must_use]
    pub fn create_pair() -> (EventSender<T>, EventReceiver<T>) {
        let bus = Self::new();
        (bus.sender(), bus.receiver())
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for publishing.
pub struct EventSender<T> {
    sender: Sender<T>,
}

impl<T> Clone for EventSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> EventSender<T> {
    /// Publishes an event. Never blocks.
    ///
    /// Returns `false` if every receiver is gone; the event is dropped.
    #[inline]
    pub fn send(&self, event: T) -> bool {
        self.sender.send(event).is_ok()
    }

    /// A sender with nobody listening.
    #[must_use]
    pub fn detached() -> Self {
        let (sender, _) = unbounded();
        Self { sender }
    }
}

/// Handle for draining.
pub struct EventReceiver<T> {
    receiver: Receiver<T>,
}

impl<T> Clone for EventReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T> EventReceiver<T> {
    /// Receives all pending events (non-blocking), oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for one event.
    ///
    /// # Errors
    ///
    /// [`CoreError::Timeout`] if nothing arrived, [`CoreError::Disconnected`]
    /// if every sender is gone and the queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> CoreResult<T> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => CoreError::Timeout,
            RecvTimeoutError::Disconnected => CoreError::Disconnected,
        })
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let (tx, rx) = EventBus::create_pair();
        assert!(tx.send(1));
        assert!(tx.clone().send(2));

        assert_eq!(rx.pending_count(), 2);
        assert_eq!(rx.drain(), vec![1, 2]);
        assert!(!rx.has_events());
    }

    #[test]
    fn test_detached_sender_drops_silently() {
        let tx = EventSender::detached();
        assert!(!tx.send("lost"));
    }

    #[test]
    fn test_recv_timeout() {
        let (tx, rx) = EventBus::<u8>::create_pair();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(1)),
            Err(CoreError::Timeout)
        );

        drop(tx);
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(1)),
            Err(CoreError::Disconnected)
        );
    }
}
