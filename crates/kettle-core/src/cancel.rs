//! Cooperative cancellation for the heating loop.
//!
//! A [`CancelToken`] is created for every heating run and stored in the
//! kettle's state next to the status it belongs to. Switching the kettle
//! off takes the token out of the state and cancels it while the state
//! lock is held, so the loop observes the signal at its next step
//! boundary at the latest.
//!
//! # Architecture
//!
//! The flag is an [`AtomicBool`] for lock-free checks on the loop's hot
//! path. A [`Notify`] wakes a loop that is suspended between steps, so a
//! cancelled loop exits promptly instead of sleeping out the tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    wake: Notify,
}

/// Shared, cloneable cancellation signal for one heating run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation and wake every task waiting on
    /// [`cancelled`](Self::cancelled). Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.wake.notify_waiters();
    }

    /// Check whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait until the token is cancelled.
    ///
    /// Returns immediately if it already is.
    pub async fn cancelled(&self) {
        loop {
            // Register interest before checking the flag so a cancel that
            // lands in between is not missed.
            let notified = self.inner.wake.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Return `true` if both handles refer to the same heating run.
    pub fn same_run(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
