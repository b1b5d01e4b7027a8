//! Message log for the virtual kettle simulation (`SQLite`).
//!
//! Every rendered notification is appended to a `messages` table so a
//! session can be reviewed after the fact. The log is write-mostly and
//! never on the heating loop's critical path: the engine feeds it from a
//! background writer task.
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool and configuration
//! - [`message_store`] -- Message insertion and querying
//! - [`error`] -- Shared error types

pub mod error;
pub mod message_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use error::DbError;
pub use message_store::{MessageRow, MessageStore, TIMESTAMP_FORMAT};
pub use sqlite::{MessagePool, SqliteConfig};
