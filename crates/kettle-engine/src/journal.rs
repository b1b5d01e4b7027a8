//! Journal notifier bridging kettle notifications to the user and the
//! message log.
//!
//! Kettles deliver notifications while holding their state lock, so
//! [`Journal::notify`] never waits: it renders the text and hands it to a
//! background writer task over an unbounded channel. The writer echoes
//! console text to its sink and appends every message to the `SQLite`
//! message log, one entry at a time and in arrival order. Storage and echo
//! failures are logged and otherwise ignored.

use kettle_core::config::StorageConfig;
use kettle_core::{Notifier, messages};
use kettle_db::{MessagePool, MessageStore, SqliteConfig};
use kettle_types::{KettleId, Notification};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Whether notifications are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Record only.
    Silent,
    /// Print to stdout with console hints, then record.
    Console,
}

#[derive(Debug)]
enum Entry {
    Record {
        message: String,
        echo: Option<String>,
    },
    Flush(oneshot::Sender<()>),
    Close,
}

/// Notifier that echoes and records every notification.
#[derive(Debug)]
pub struct Journal {
    tx: mpsc::UnboundedSender<Entry>,
    echo: Echo,
}

/// Owner of the journal's writer task.
#[derive(Debug)]
pub struct JournalWriter {
    tx: mpsc::UnboundedSender<Entry>,
    task: JoinHandle<()>,
}

impl Journal {
    /// Start the writer task and return the notifier plus its writer.
    ///
    /// With `pool` set to `None` messages are still echoed but not stored.
    pub fn spawn(pool: Option<MessagePool>, echo: Echo) -> (Self, JournalWriter) {
        match echo {
            Echo::Silent => Self::spawn_with_sink(pool, None::<tokio::io::Stdout>),
            Echo::Console => Self::spawn_with_sink(pool, Some(tokio::io::stdout())),
        }
    }

    /// Start the writer task echoing to `sink` instead of stdout.
    pub(crate) fn spawn_with_sink<W>(
        pool: Option<MessagePool>,
        sink: Option<W>,
    ) -> (Self, JournalWriter)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let echo = if sink.is_some() { Echo::Console } else { Echo::Silent };
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(write_loop(pool, sink, rx));
        (
            Self {
                tx: tx.clone(),
                echo,
            },
            JournalWriter { tx, task },
        )
    }

    /// Show and record a notification that belongs to no kettle.
    pub fn announce(&self, notification: &Notification) {
        let entry = Entry::Record {
            message: messages::render(notification),
            echo: (self.echo == Echo::Console).then(|| messages::render_console(notification)),
        };
        if self.tx.send(entry).is_err() {
            debug!(kind = notification.kind(), "Journal writer closed, message dropped");
        }
    }

    /// Wait until everything queued so far has been echoed and stored.
    ///
    /// Drivers call this before writing to the terminal themselves so
    /// their prompts appear after the notifications that precede them.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Entry::Flush(done)).is_err() {
            return;
        }
        if wait.await.is_err() {
            debug!("Journal writer stopped before flushing");
        }
    }
}

impl Notifier for Journal {
    fn notify(&self, kettle: KettleId, notification: &Notification) {
        debug!(kettle_id = %kettle, kind = notification.kind(), "Kettle notification");
        self.announce(notification);
    }
}

impl JournalWriter {
    /// Store everything queued so far, then stop the writer task.
    ///
    /// The pool itself stays open; its owner closes it.
    pub async fn close(self) {
        if self.tx.send(Entry::Close).is_err() {
            debug!("Journal writer already stopped");
        }
        if let Err(e) = self.task.await {
            warn!(error = %e, "Journal writer task failed");
        }
    }
}

async fn write_loop<W>(
    pool: Option<MessagePool>,
    mut sink: Option<W>,
    mut rx: mpsc::UnboundedReceiver<Entry>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(entry) = rx.recv().await {
        match entry {
            Entry::Record { message, echo } => {
                if let (Some(out), Some(text)) = (sink.as_mut(), echo) {
                    if let Err(e) = echo_line(out, &text).await {
                        warn!(error = %e, "Failed to echo message");
                    }
                }
                let Some(pool) = &pool else { continue };
                if let Err(e) = MessageStore::new(pool.pool()).record(&message).await {
                    warn!(error = %e, "Failed to record message");
                }
            }
            Entry::Flush(done) => {
                // The flusher may have given up waiting.
                let _ignored = done.send(());
            }
            Entry::Close => break,
        }
    }
}

async fn echo_line<W>(out: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Open the message log and create its schema.
///
/// Returns `None` if the database is unusable; the simulation then runs
/// without persisting messages.
pub async fn open_message_log(storage: &StorageConfig) -> Option<MessagePool> {
    let config = SqliteConfig::new(&storage.database_url)
        .with_max_connections(storage.max_connections)
        .with_acquire_timeout(storage.acquire_timeout());
    let pool = match MessagePool::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(
                database_url = %storage.database_url,
                error = %e,
                "Message log unavailable, messages will not be persisted"
            );
            return None;
        }
    };
    if let Err(e) = pool.run_migrations().await {
        warn!(error = %e, "Message log migration failed, messages will not be persisted");
        pool.close().await;
        return None;
    }
    info!(database_url = %storage.database_url, "Message log ready");
    Some(pool)
}
