//! Simulation ticker for the heating loop.
//!
//! The ticker is the single source of simulated time. Each call to
//! [`Ticker::tick`] suspends the caller for one simulated second and then
//! advances the tick counter. It is the only suspension point of the
//! heating loop.
//!
//! # Design Principles
//!
//! - The counter uses checked arithmetic (no silent overflow).
//! - Real-time pacing comes from configuration, so tests can run with a
//!   zero interval or a paused Tokio clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::PhysicsConfig;

/// Errors that can occur during ticker operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Ticker producing one tick per simulated second.
#[derive(Debug)]
pub struct Ticker {
    /// Real-time length of one simulated second.
    interval: Duration,

    /// Number of completed ticks.
    ticks: AtomicU64,
}

impl Ticker {
    /// Create a ticker with an explicit interval.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticks: AtomicU64::new(0),
        }
    }

    /// Create a ticker paced by the physics configuration.
    pub const fn from_physics(physics: &PhysicsConfig) -> Self {
        Self::new(physics.tick_interval())
    }

    /// Wait one simulated second and advance the counter. Returns the new
    /// tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub async fn tick(&self) -> Result<u64, ClockError> {
        if self.interval.is_zero() {
            // Still yield so a zero interval never starves other tasks.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.interval).await;
        }
        self.advance()
    }

    /// Advance the counter without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&self) -> Result<u64, ClockError> {
        let previous = self
            .ticks
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_add(1))
            .map_err(|_current| ClockError::TickOverflow)?;
        previous.checked_add(1).ok_or(ClockError::TickOverflow)
    }

    /// Return the number of completed ticks.
    pub fn elapsed(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Return the real-time length of one simulated second.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
