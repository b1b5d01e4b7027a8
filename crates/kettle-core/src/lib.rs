//! Kettle state machine, heating loop and concurrent control surface.
//!
//! This crate owns every piece of the simulation that has ordering or
//! concurrency hazards: a heating loop running on one task while HTTP
//! handlers or a console driver read and switch the same kettle.
//!
//! # Modules
//!
//! - [`cancel`] -- Cooperative cancellation token observed at each
//!   heating step boundary.
//! - [`clock`] -- Ticker producing one tick per simulated second.
//! - [`config`] -- Configuration loading from `kettle-config.yaml` into
//!   strongly-typed structs.
//! - [`heating`] -- The cancellable, time-stepped heating loop.
//! - [`kettle`] -- The kettle entity and its status-switch protocol.
//! - [`messages`] -- Notification catalogue (data to user-facing text).
//! - [`notifier`] -- [`Notifier`] seam through which state changes are
//!   reported to logging and presentation collaborators.
//! - [`registry`] -- Concurrency-safe map of live kettles for the web
//!   surface.
//! - [`water`] -- Water amount parsing and range validation.
//!
//! [`Notifier`]: notifier::Notifier

pub mod cancel;
pub mod clock;
pub mod config;
pub mod heating;
pub mod kettle;
pub mod messages;
pub mod notifier;
pub mod registry;
pub mod water;

pub use heating::{HeatingLoop, HeatingOutcome, HeatingReport};
pub use kettle::{Kettle, KettleModel, Transition};
pub use notifier::{NoOpNotifier, Notifier};
pub use registry::{KettleRegistry, RegistryError};
pub use water::WaterAmountError;
