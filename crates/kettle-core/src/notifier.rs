//! Seam through which kettles report state changes.
//!
//! The kettle and its heating loop emit [`Notification`] values; what
//! happens to them (console output, the persistent message log, tracing)
//! is decided by the driver that owns the [`Notifier`].

use kettle_types::{KettleId, Notification};

/// Receiver of kettle notifications.
///
/// Notifications are delivered while the kettle's state lock is held, in
/// the order the state changed. Implementations must not block; hand the
/// work to a channel or a background task instead.
pub trait Notifier: Send + Sync {
    /// Called for every user-facing state change of a kettle.
    fn notify(&self, kettle: KettleId, notification: &Notification);
}

/// A notifier that drops everything. Useful for tests and tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _kettle: KettleId, _notification: &Notification) {}
}

#[cfg(test)]
pub(crate) use recording::RecordingNotifier;
