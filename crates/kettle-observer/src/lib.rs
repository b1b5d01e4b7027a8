//! Web control surface for the virtual kettle simulation.
//!
//! This crate provides an Axum HTTP server that lets many users create
//! kettles and switch them concurrently:
//!
//! - **HTML pages** rendered with `minijinja`: a creation form and one
//!   page per kettle with an on/off switch
//! - **JSON endpoint** (`/api/kettles/:id`) returning a consistent
//!   snapshot of one kettle
//!
//! # Architecture
//!
//! Handlers share one [`AppState`] holding the kettle registry. Turning a
//! kettle on spawns its heating loop on a background task; turning it off
//! cancels that loop through the kettle's own switch, so the request that
//! observed OFF never sees another heating step.

pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
