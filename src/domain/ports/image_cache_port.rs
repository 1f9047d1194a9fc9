//! Port definition for image caching.

use std::sync::Arc;

/// Result type for image cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during image cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Failed to decode image bytes.
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Port for the in-memory image tier, keyed by absolute image URL.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    /// Returns None if not cached.
    async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image in the cache.
    async fn put(&self, url: &str, image: Arc<image::DynamicImage>);

    /// Removes an image from the cache.
    async fn evict(&self, url: &str);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    async fn clear(&self);
}
