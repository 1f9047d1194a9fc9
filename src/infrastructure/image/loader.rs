//! Async image loading orchestrator.
//!
//! Implements a two-tier cache in front of the network:
//! Memory -> Disk -> Network.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::domain::ports::{CacheError, CacheResult, ImageCachePort};

use super::disk_cache::DiskImageCache;
use super::memory_cache::MemoryImageCache;

const DOWNLOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Where a loaded image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory tier.
    MemoryCache,
    /// Served from the on-disk tier.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

/// Orchestrates image loading from memory, disk, and network.
pub struct ImageLoader {
    memory_cache: Arc<MemoryImageCache>,
    disk_cache: Arc<DiskImageCache>,
    http_client: reqwest::Client,
}

impl ImageLoader {
    /// Creates a loader over the two cache tiers.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        memory_cache: Arc<MemoryImageCache>,
        disk_cache: Arc<DiskImageCache>,
    ) -> CacheResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            memory_cache,
            disk_cache,
            http_client,
        })
    }

    /// Checks memory cache synchronously (non-promoting peek).
    pub async fn check_memory_cache(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        self.memory_cache.peek(url).await
    }

    /// Loads an image, checking caches first.
    ///
    /// A network download writes through to both tiers; the disk write
    /// runs off the caller's path.
    ///
    /// # Errors
    /// Returns error if the image cannot be loaded from any source.
    pub async fn load(&self, url: &str) -> CacheResult<(Arc<image::DynamicImage>, ImageSource)> {
        if let Some(img) = self.memory_cache.get(url).await {
            return Ok((img, ImageSource::MemoryCache));
        }

        if let Some(img) = self.disk_cache.get(url).await {
            self.memory_cache.put(url, img.clone()).await;
            return Ok((img, ImageSource::DiskCache));
        }

        debug!(url, "Downloading image from network");
        let bytes = self.download(url).await?;

        let disk_cache = Arc::clone(&self.disk_cache);
        let url_for_disk = url.to_string();
        let bytes_for_disk = bytes.clone();
        tokio::spawn(async move {
            if let Err(e) = disk_cache.put_bytes(&url_for_disk, &bytes_for_disk).await {
                warn!(url = %url_for_disk, error = %e, "Failed to cache to disk");
            }
        });

        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| CacheError::DecodeError(format!("Decode task panicked: {e}")))?
            .map_err(|e| CacheError::DecodeError(format!("Failed to decode image: {e}")))?;

        let img = Arc::new(decoded);
        self.memory_cache.put(url, img.clone()).await;

        debug!(url, "Image loaded from network");
        Ok((img, ImageSource::Network))
    }

    /// Removes an image from both tiers.
    pub async fn evict(&self, url: &str) {
        self.memory_cache.evict(url).await;
        self.disk_cache.evict(url).await;
    }

    /// Clears both tiers.
    pub async fn clear_all(&self) {
        self.memory_cache.clear().await;
        if let Err(e) = self.disk_cache.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
        info!("Cleared all image caches");
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn memory_cache_stats(&self) -> super::memory_cache::CacheStats {
        self.memory_cache.stats()
    }

    /// Downloads image bytes from a URL.
    async fn download(&self, url: &str) -> CacheResult<Bytes> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CacheError::NetworkError(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Failed to read body: {e}")))
    }
}
