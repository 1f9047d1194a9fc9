//! Asynchronously initialized SQLite database backing the durable stores.
//!
//! The connection opens and migrates on a background task at process
//! start. Until that finishes, every query fails with
//! [`StoreError::NotReady`] and the stores degrade to their empty
//! defaults instead of blocking. All access goes through one mutex on a
//! blocking task, which is the single-writer serialization for both
//! record kinds.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{error, info};

use crate::domain::errors::StoreError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Handle to the shared database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Mutex<Option<Connection>>>,
}

impl Database {
    /// Opens the database at `path`, initializing it in the background.
    ///
    /// Returns immediately; consumers observe [`StoreError::NotReady`]
    /// until the open and schema migration complete. Must be called from
    /// within a tokio runtime.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let db = Self {
            inner: Arc::new(Mutex::new(None)),
        };

        let inner = Arc::clone(&db.inner);
        tokio::spawn(async move {
            let opened =
                tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    let conn = Connection::open(&path)?;
                    init_schema(&conn)?;
                    Ok(conn)
                })
                .await;

            match opened {
                Ok(Ok(conn)) => {
                    *inner.lock() = Some(conn);
                    info!("Database initialized");
                }
                Ok(Err(e)) => error!(error = %e, "Failed to initialize database"),
                Err(e) => error!(error = %e, "Database init task panicked"),
            }
        });

        db
    }

    /// Returns true once the background initialization has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Polls with a bounded sleep loop until the store is ready or the
    /// timeout elapses. Returns the final readiness.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while !self.is_ready() {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        true
    }

    /// Runs a query on the blocking pool under the connection mutex.
    pub(crate) async fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let guard = inner.lock();
            guard.as_ref().map_or(Err(StoreError::NotReady), f)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }

    /// A handle that never becomes ready, for exercising degraded paths.
    #[cfg(test)]
    pub(crate) fn unavailable() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS bookmarks (
            id            INTEGER PRIMARY KEY,
            title         TEXT NOT NULL,
            overview      TEXT NOT NULL,
            poster_path   TEXT,
            backdrop_path TEXT,
            release_date  TEXT NOT NULL,
            vote_average  REAL NOT NULL,
            vote_count    INTEGER NOT NULL,
            popularity    REAL NOT NULL,
            is_bookmarked INTEGER NOT NULL DEFAULT 1,
            saved_date    INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_bookmarks_saved_date
            ON bookmarks(saved_date DESC);

        CREATE TABLE IF NOT EXISTS response_cache (
            fingerprint TEXT PRIMARY KEY,
            data        BLOB NOT NULL,
            timestamp   INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_response_cache_timestamp
            ON response_cache(timestamp);",
    )?;
    Ok(())
}
