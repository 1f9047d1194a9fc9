//! Durable storage adapters: the shared database and the stores on it.

mod bookmark_store;
mod database;
mod response_cache;

pub use bookmark_store::SqliteBookmarkStore;
pub use database::Database;
pub use response_cache::{RESPONSE_TTL, SqliteResponseCache};
