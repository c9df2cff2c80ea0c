//! SQLite-backed FIFO queue, the reference [`Queue`] implementation.
//!
//! One table, one text column; SQLite's monotonically increasing `rowid`
//! defines FIFO order for a single producer. Dequeue collapses peek, lock,
//! and remove into a single `DELETE ... RETURNING` statement, so a row is
//! claimed by at most one receiver without any lease or visibility-timeout
//! machinery. The cost of that simplicity: a message claimed by a consumer
//! that crashes before finishing its work is permanently lost.
//!
//! Intended for single-node deployments. Multiple instances may target the
//! same database file; cross-instance serialization is delegated entirely to
//! SQLite's own locking.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;
use tracing::debug;

use packrat_core::{JsonObject, Result, SimpleError};

use crate::error::{connect_error, receive_error, send_error};
use crate::message::{decode_message, encode_record};
use crate::Queue;

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

/// Reserved storage target for a process-lifetime queue with no persisted
/// artifact.
pub const IN_MEMORY_TARGET: &str = ":memory:";

/// Fixed delay between claim attempts while the queue is empty.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a writer waits on a locked database before giving up. Only
/// relevant when several instances share one file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS
        messages
        (
            message TEXT NOT NULL
        );
";

/// The claim statement: delete the oldest row and return its content in one
/// transactional step. This is the sole dequeue mechanism.
const CLAIM_SQL: &str = "
    DELETE FROM
        messages
    WHERE
        rowid = (
            SELECT
                min(rowid)
            FROM
                messages
        )
    RETURNING
        message;
";

const INSERT_SQL: &str = "
    INSERT INTO
        messages
        (
            message
        )
    VALUES
        (
            ?1
        );
";

/// Options to control the behavior of the [`LocalQueue`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalQueueConfig {
    /// The file on disk used to store the backing database. Set to
    /// [`IN_MEMORY_TARGET`] (the default) for a queue scoped to the process
    /// lifetime.
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    IN_MEMORY_TARGET.to_string()
}

impl Default for LocalQueueConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
        }
    }
}

/// SQLite-backed FIFO queue.
///
/// The connection is established lazily: `send` and `receive` connect on
/// first use. One handle is exclusively owned by one queue instance and is
/// closed when the instance is dropped or [`Queue::disconnect`] is called.
pub struct LocalQueue {
    config: LocalQueueConfig,
    conn: Mutex<Option<Connection>>,
}

impl LocalQueue {
    /// Create a queue over the given storage target. No connection is opened
    /// until first use.
    pub fn new(config: LocalQueueConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    /// Create a process-lifetime queue with no persisted artifact.
    pub fn in_memory() -> Self {
        Self::new(LocalQueueConfig::default())
    }

    /// Open the backing database, create the schema, and validate both
    /// cached statements. Any step failing fails the open as a whole, even
    /// though the idempotent schema creation may already have persisted.
    async fn open(&self) -> Result<Connection> {
        let conn = if self.config.filename == IN_MEMORY_TARGET {
            Connection::open_in_memory().await
        } else {
            Connection::open(&self.config.filename).await
        }
        .map_err(|e| {
            connect_error(
                "unable to open sqlite database",
                SimpleError::from_error(&e),
            )
        })?;

        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute(CREATE_TABLE_SQL, [])?;
            Ok(())
        })
        .await
        .map_err(|e| {
            connect_error(
                "unable to create underlying sqlite table",
                SimpleError::from_error(&e),
            )
        })?;

        conn.call(|conn| {
            conn.prepare_cached(CLAIM_SQL)?;
            Ok(())
        })
        .await
        .map_err(|e| {
            connect_error(
                "unable to cache query used to receive messages",
                SimpleError::from_error(&e),
            )
        })?;

        conn.call(|conn| {
            conn.prepare_cached(INSERT_SQL)?;
            Ok(())
        })
        .await
        .map_err(|e| {
            connect_error(
                "unable to cache query used to send messages",
                SimpleError::from_error(&e),
            )
        })?;

        Ok(conn)
    }

    /// Return the live connection, establishing it if needed. A fresh open
    /// would discard a `:memory:` database, so an established connection is
    /// always reused.
    async fn connection(&self) -> Result<Connection> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.open().await?;
        debug!(filename = %self.config.filename, "connected to sqlite backing store");
        *guard = Some(conn.clone());
        Ok(conn)
    }
}

#[async_trait::async_trait]
impl Queue for LocalQueue {
    async fn connect(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    async fn disconnect(&self) -> Result<()> {
        let conn = self.conn.lock().await.take();
        match conn {
            None => Ok(()),
            Some(conn) => {
                conn.close().await.map_err(|e| {
                    connect_error(
                        "unable to close sqlite database",
                        SimpleError::from_error(&e),
                    )
                })?;
                debug!(filename = %self.config.filename, "closed sqlite backing store");
                Ok(())
            }
        }
    }

    async fn send(&self, message: &JsonObject) -> Result<()> {
        // Encode before touching storage so a rejected message leaves the
        // stored record count unchanged.
        let record = encode_record(message)?;

        let conn = self.connection().await?;
        conn.call(move |conn| {
            conn.prepare_cached(INSERT_SQL)?.execute([record])?;
            Ok(())
        })
        .await
        .map_err(|e| send_error(SimpleError::from_error(&e)))
    }

    async fn receive(&self) -> Result<JsonObject> {
        let conn = self.connection().await?;

        loop {
            let claimed = conn
                .call(|conn| {
                    let mut claim = conn.prepare_cached(CLAIM_SQL)?;
                    match claim.query_row([], |row| row.get::<_, String>(0)) {
                        Ok(record) => Ok(Some(record)),
                        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                        Err(e) => Err(e.into()),
                    }
                })
                .await
                .map_err(|e| receive_error(SimpleError::from_error(&e)))?;

            match claimed {
                Some(record) => return decode_message(&record),
                None => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }
}
