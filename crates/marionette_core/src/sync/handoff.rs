//! # Blocking Ownership Handoff
//!
//! A rendezvous that moves a value to the render thread and back.
//!
//! ```text
//! GUI thread                              render thread
//! ──────────                              ─────────────
//! exchange(item) ──── forward (cap 0) ───► serve(|item| sync(item))
//!      │ blocked                                  │
//!      ◄─────────────  back (cap 0) ──────────────┘
//! item returned, GUI resumes
//! ```
//!
//! Both channels have zero capacity: a send completes only when the other
//! side receives. While the value is away the caller holds nothing, so the
//! GUI thread is quiescent for exactly one `serve` pass.

use std::fmt;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use thiserror::Error;
use tracing::{trace, warn};

use crate::error::{CoreError, CoreResult};

/// Creates a connected handoff pair.
#[must_use]
pub fn handoff<T: Send>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (forward_tx, forward_rx) = bounded(0);
    let (back_tx, back_rx) = bounded(0);
    (
        HandoffSender {
            forward: forward_tx,
            back: back_rx,
        },
        HandoffReceiver {
            forward: forward_rx,
            back: back_tx,
        },
    )
}

/// Failure of [`HandoffSender::exchange`].
///
/// When the value never left the caller it is carried back in the error.
#[derive(Error)]
pub enum HandoffError<T> {
    /// The receiving side is gone. The value was not sent.
    #[error("handoff receiver disconnected")]
    Disconnected(T),
    /// Nobody picked the value up in time. The value was not sent.
    #[error("handoff receiver did not respond in time")]
    Timeout(T),
    /// The receiving side took the value and vanished before returning it.
    #[error("handoff receiver dropped the value")]
    Lost,
}

impl<T> HandoffError<T> {
    /// Recovers the value if it never left.
    #[must_use]
    pub fn into_inner(self) -> Option<T> {
        match self {
            Self::Disconnected(value) | Self::Timeout(value) => Some(value),
            Self::Lost => None,
        }
    }
}

impl<T> fmt::Debug for HandoffError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected(_) => f.write_str("Disconnected(..)"),
            Self::Timeout(_) => f.write_str("Timeout(..)"),
            Self::Lost => f.write_str("Lost"),
        }
    }
}

/// Owner side: lends a value out and blocks until it comes back.
pub struct HandoffSender<T> {
    forward: Sender<T>,
    back: Receiver<T>,
}

impl<T> HandoffSender<T> {
    /// Hands `value` over and blocks until the receiver returns it.
    ///
    /// # Errors
    ///
    /// [`HandoffError::Disconnected`] with the value if the receiver is gone,
    /// [`HandoffError::Lost`] if it disappeared mid-exchange.
    pub fn exchange(&self, value: T) -> Result<T, HandoffError<T>> {
        self.forward
            .send(value)
            .map_err(|err| HandoffError::Disconnected(err.into_inner()))?;
        trace!("handoff: value accepted, waiting for return");
        self.await_return()
    }

    /// Like [`Self::exchange`], but gives up if nobody accepts the value
    /// within `timeout`. Once accepted, waits for the return without limit.
    ///
    /// # Errors
    ///
    /// As [`Self::exchange`], plus [`HandoffError::Timeout`] with the value.
    pub fn exchange_timeout(&self, value: T, timeout: Duration) -> Result<T, HandoffError<T>> {
        self.forward
            .send_timeout(value, timeout)
            .map_err(|err| match err {
                SendTimeoutError::Timeout(value) => HandoffError::Timeout(value),
                SendTimeoutError::Disconnected(value) => HandoffError::Disconnected(value),
            })?;
        self.await_return()
    }

    fn await_return(&self) -> Result<T, HandoffError<T>> {
        self.back.recv().map_err(|_| {
            warn!("handoff: receiver vanished while holding the value");
            HandoffError::Lost
        })
    }
}

/// Borrower side: receives the value, works on it, hands it back.
pub struct HandoffReceiver<T> {
    forward: Receiver<T>,
    back: Sender<T>,
}

impl<T> HandoffReceiver<T> {
    /// Blocks until a value arrives, runs `f` on it and returns it.
    ///
    /// # Errors
    ///
    /// [`CoreError::Disconnected`] if the sender is gone.
    pub fn serve<R>(&self, f: impl FnOnce(&mut T) -> R) -> CoreResult<R> {
        let value = self.forward.recv().map_err(|_| CoreError::Disconnected)?;
        self.run(value, f)
    }

    /// Waits up to `timeout` for a value. `Ok(None)` if none arrived.
    ///
    /// # Errors
    ///
    /// [`CoreError::Disconnected`] if the sender is gone.
    pub fn serve_timeout<R>(
        &self,
        timeout: Duration,
        f: impl FnOnce(&mut T) -> R,
    ) -> CoreResult<Option<R>> {
        match self.forward.recv_timeout(timeout) {
            Ok(value) => self.run(value, f).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(CoreError::Disconnected),
        }
    }

    fn run<R>(&self, mut value: T, f: impl FnOnce(&mut T) -> R) -> CoreResult<R> {
        let result = f(&mut value);
        self.back
            .send(value)
            .map_err(|_| CoreError::Disconnected)?;
        Ok(result)
    }
}
