//! Integration tests for the `kettle-db` message log.
//!
//! Every test opens its own private in-memory database, so no external
//! service is required.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{Local, NaiveDateTime, TimeZone};
use kettle_db::{MessagePool, MessageStore, TIMESTAMP_FORMAT};

async fn setup() -> MessagePool {
    MessagePool::in_memory()
        .await
        .expect("Failed to open in-memory SQLite")
}

#[tokio::test]
async fn record_then_read_back() {
    let pool = setup().await;
    let store = MessageStore::new(pool.pool());

    let id = store.record("The kettle is now turned ON.").await.unwrap();
    assert!(id > 0);

    let rows = store.recent(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].message, "The kettle is now turned ON.");
    assert!(
        NaiveDateTime::parse_from_str(&rows[0].timestamp, TIMESTAMP_FORMAT).is_ok(),
        "unexpected timestamp {:?}",
        rows[0].timestamp
    );
}

#[tokio::test]
async fn timestamp_uses_log_format() {
    let pool = setup().await;
    let store = MessageStore::new(pool.pool());

    let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    store.record_at(&at, "hello").await.unwrap();

    let rows = store.recent(1).await.unwrap();
    assert_eq!(rows[0].timestamp, "2024-03-09 | 07:05:01");
}

#[tokio::test]
async fn recent_returns_newest_first_and_honours_limit() {
    let pool = setup().await;
    let store = MessageStore::new(pool.pool());

    for n in 0..5 {
        store.record(&format!("message {n}")).await.unwrap();
    }

    let rows = store.recent(3).await.unwrap();
    let texts: Vec<&str> = rows.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(texts, vec!["message 4", "message 3", "message 2"]);
    assert_eq!(store.count().await.unwrap(), 5);
}

#[tokio::test]
async fn quotes_are_stored_verbatim() {
    let pool = setup().await;
    let store = MessageStore::new(pool.pool());

    let text = "It's a white kettle; DROP TABLE messages; --";
    store.record(text).await.unwrap();

    let rows = store.recent(1).await.unwrap();
    assert_eq!(rows[0].message, text);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let pool = setup().await;
    pool.run_migrations().await.unwrap();
    let store = MessageStore::new(pool.pool());
    assert_eq!(store.count().await.unwrap(), 0);
}
