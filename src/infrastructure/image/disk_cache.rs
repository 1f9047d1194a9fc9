//! Disk-based image cache for persistence across sessions.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace, warn};

use crate::domain::ports::{CacheError, CacheResult};

/// Maximum age of a cached image file before the sweep deletes it (7 days).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Disk-based image cache that persists raw image bytes.
///
/// Files are keyed by a URL-safe encoding of the image URL. There is no
/// size cap; a background sweep removes files older than `max_age`.
pub struct DiskImageCache {
    cache_dir: PathBuf,
    max_age: Duration,
}

impl DiskImageCache {
    /// Creates a new disk cache in the specified directory and spawns the
    /// age sweep over whatever it already contains.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn new(cache_dir: PathBuf, max_age: Duration) -> CacheResult<Arc<Self>> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        let cache = Arc::new(Self { cache_dir, max_age });

        let sweeper = Arc::clone(&cache);
        tokio::spawn(async move {
            let removed = sweeper.sweep_old_files().await;
            if removed > 0 {
                debug!(removed, "Startup image cache sweep complete");
            }
        });

        Ok(cache)
    }

    /// Creates a cache in the default location with the 7-day age limit.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn default_location() -> CacheResult<Arc<Self>> {
        Self::new(dirs_cache_path(), DEFAULT_MAX_AGE).await
    }

    /// Returns the path for a cached image.
    fn cache_path(&self, url: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(url.as_bytes());
        self.cache_dir.join(format!("{name}.img"))
    }

    /// Gets raw image bytes from disk cache.
    pub async fn get_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.cache_path(url);
        if let Ok(bytes) = fs::read(&path).await {
            trace!(url, path = %path.display(), "Disk cache hit");
            Some(bytes)
        } else {
            trace!(url, "Disk cache miss");
            None
        }
    }

    /// Loads and decodes an image from disk cache.
    pub async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        let bytes = self.get_bytes(url).await?;

        let result = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        match result {
            Ok(Ok(img)) => {
                debug!(url, "Decoded image from disk cache");
                Some(Arc::new(img))
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "Failed to decode cached image");
                None
            }
            Err(e) => {
                error!(url, error = %e, "Decode task panicked");
                None
            }
        }
    }

    /// Stores raw bytes in the disk cache.
    ///
    /// # Errors
    /// Returns error if file cannot be created or written.
    pub async fn put_bytes(&self, url: &str, bytes: &[u8]) -> CacheResult<()> {
        let path = self.cache_path(url);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;

        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))?;

        debug!(url, path = %path.display(), size = bytes.len(), "Stored image in disk cache");

        Ok(())
    }

    /// Removes an image from disk cache.
    pub async fn evict(&self, url: &str) {
        let path = self.cache_path(url);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(url, error = %e, "Failed to evict from disk cache");
            }
        } else {
            debug!(url, "Evicted from disk cache");
        }
    }

    /// Clears the entire disk cache.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be read.
    pub async fn clear(&self) -> CacheResult<()> {
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "img")
                && fs::remove_file(&path).await.is_err()
            {
                warn!(path = %path.display(), "Failed to remove cache file");
            }
        }
        debug!("Cleared disk cache");
        Ok(())
    }

    /// Checks if an image is cached.
    pub async fn contains(&self, url: &str) -> bool {
        let path = self.cache_path(url);
        fs::try_exists(&path).await.unwrap_or(false)
    }

    /// Number of cached files currently on disk.
    pub async fn len(&self) -> usize {
        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return 0;
        };
        let mut count = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.path().extension().is_some_and(|ext| ext == "img") {
                count += 1;
            }
        }
        count
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Deletes cached files older than `max_age`. Returns how many were
    /// removed.
    pub async fn sweep_old_files(&self) -> usize {
        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return 0;
        };

        let mut removed = 0usize;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "img") {
                continue;
            }

            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            let age = meta
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok());

            if age.is_some_and(|age| age > self.max_age) {
                if let Err(e) = fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
                } else {
                    trace!(path = %path.display(), "Removed old cache file");
                    removed += 1;
                }
            }
        }

        removed
    }
}

/// Returns the default cache directory path.
fn dirs_cache_path() -> PathBuf {
    directories::ProjectDirs::from("com", "tecknian", "cinema").map_or_else(
        || {
            std::env::temp_dir()
                .join("cinema")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str = "https://image.tmdb.org/t/p/w500/poster.jpg";

    async fn create_test_cache() -> (Arc<DiskImageCache>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskImageCache::new(temp_dir.path().to_path_buf(), DEFAULT_MAX_AGE)
            .await
            .unwrap();
        (cache, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get_bytes() {
        let (cache, _temp) = create_test_cache().await;
        let data = b"test image data";

        cache.put_bytes(URL, data).await.unwrap();
        let retrieved = cache.get_bytes(URL).await;

        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap(), data);
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let (cache, _temp) = create_test_cache().await;

        let result = cache.get_bytes("https://img/nonexistent").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_filenames_are_url_safe() {
        let (cache, temp) = create_test_cache().await;
        let awkward = "https://image.tmdb.org/t/p/w500/a b?x=1&y=2#frag";

        cache.put_bytes(awkward, b"data").await.unwrap();
        assert!(cache.contains(awkward).await);

        // Exactly one file, and its name contains no path separators.
        let mut entries = std::fs::read_dir(temp.path()).unwrap();
        let name = entries.next().unwrap().unwrap().file_name();
        assert!(!name.to_string_lossy().contains('/'));
    }

    #[tokio::test]
    async fn test_evict() {
        let (cache, _temp) = create_test_cache().await;

        cache.put_bytes(URL, b"test").await.unwrap();
        assert!(cache.contains(URL).await);

        cache.evict(URL).await;
        assert!(!cache.contains(URL).await);
    }

    #[tokio::test]
    async fn test_clear() {
        let (cache, _temp) = create_test_cache().await;

        cache.put_bytes("https://img/1", b"data1").await.unwrap();
        cache.put_bytes("https://img/2", b"data2").await.unwrap();

        assert_eq!(cache.len().await, 2);

        cache.clear().await.unwrap();
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_files() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskImageCache::new(temp_dir.path().to_path_buf(), Duration::from_millis(40))
            .await
            .unwrap();

        cache.put_bytes("https://img/old", b"old").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.put_bytes("https://img/new", b"new").await.unwrap();

        let removed = cache.sweep_old_files().await;

        assert_eq!(removed, 1);
        assert!(!cache.contains("https://img/old").await);
        assert!(cache.contains("https://img/new").await);
    }
}
