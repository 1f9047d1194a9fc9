//! Persistent store error types.
//!
//! These never propagate to the UI layer: callers of the response cache
//! and bookmark store translate them into miss / false / empty defaults
//! and log the cause.

use thiserror::Error;

/// Errors from the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has not finished its asynchronous initialization.
    #[error("store is not ready yet")]
    NotReady,

    /// The underlying database rejected the operation.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database file or its directory could not be accessed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored blob could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The blocking task running the query was cancelled or panicked.
    #[error("store task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    /// Creates a corrupt-record error.
    #[must_use]
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Corrupt(detail.into())
    }
}
