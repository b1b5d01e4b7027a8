//! Shared type definitions for the virtual kettle simulation.
//!
//! This crate is the single source of truth for the types exchanged
//! between the kettle core, the message log and the web surface. Types
//! defined here flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for kettle identifiers
//! - [`enums`] -- Power status and user-facing notifications
//! - [`structs`] -- Descriptive attributes and state snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Notification, Status};
pub use ids::KettleId;
pub use structs::{KettleSnapshot, KettleSpecs};
