//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, loading).
pub mod image;
/// Durable storage (database, bookmark store, response cache).
pub mod storage;
/// Catalog API client and service.
pub mod tmdb;

pub use config::{AppConfig, CliArgs, Command, LogLevel};
pub use image::{CacheStats, DiskImageCache, ImageLoader, ImageSource, MemoryImageCache};
pub use storage::{Database, SqliteBookmarkStore, SqliteResponseCache};
pub use tmdb::{MovieCatalogService, TmdbClient};
