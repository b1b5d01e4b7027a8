//! Message log operations.
//!
//! Every user-facing message the kettle produces is appended to the
//! `messages` table together with the local wall-clock time it was
//! recorded at. Rows are never updated or deleted.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbError;

/// Format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d | %H:%M:%S";

/// One row of the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MessageRow {
    /// Auto-incremented row identifier.
    pub id: i64,
    /// Local time the message was recorded, formatted with
    /// [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Rendered message text.
    pub message: String,
}

/// Operations on the `messages` table.
pub struct MessageStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageStore<'a> {
    /// Create a new message store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message stamped with the current local time.
    ///
    /// Returns the new row's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the insert fails.
    pub async fn record(&self, message: &str) -> Result<i64, DbError> {
        self.record_at(&Local::now(), message).await
    }

    /// Append a message with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the insert fails.
    pub async fn record_at<Tz>(&self, at: &DateTime<Tz>, message: &str) -> Result<i64, DbError>
    where
        Tz: TimeZone,
        Tz::Offset: core::fmt::Display,
    {
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let result = sqlx::query("INSERT INTO messages (timestamp, message) VALUES ($1, $2)")
            .bind(&timestamp)
            .bind(message)
            .execute(self.pool)
            .await?;

        tracing::debug!(%timestamp, "Message recorded");
        Ok(result.last_insert_rowid())
    }

    /// Return up to `limit` messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<MessageRow>, DbError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, timestamp, message FROM messages ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Total number of recorded messages.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
