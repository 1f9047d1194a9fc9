//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_MEMORY_COUNT: usize = 100;

/// Default total byte cost of decoded images held in memory (50 MB).
pub const DEFAULT_MEMORY_COST: u64 = 50 * 1024 * 1024;

/// Approximate in-memory cost of a decoded image (RGBA).
fn image_cost(image: &image::DynamicImage) -> u64 {
    u64::from(image.width()) * u64::from(image.height()) * 4
}

/// LRU store bounded by entry count and by total byte cost.
struct CostedLru {
    entries: LruCache<String, Arc<image::DynamicImage>>,
    cost: u64,
    max_cost: u64,
}

impl CostedLru {
    fn new(capacity: usize, max_cost: u64) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            cost: 0,
            max_cost,
        }
    }

    fn insert(&mut self, url: String, image: Arc<image::DynamicImage>) {
        self.cost += image_cost(&image);
        if let Some((_, displaced)) = self.entries.push(url, image) {
            self.cost = self.cost.saturating_sub(image_cost(&displaced));
        }
        while self.cost > self.max_cost {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.cost = self.cost.saturating_sub(image_cost(&evicted));
                }
                None => break,
            }
        }
    }

    fn remove(&mut self, url: &str) -> bool {
        if let Some(evicted) = self.entries.pop(url) {
            self.cost = self.cost.saturating_sub(image_cost(&evicted));
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.cost = 0;
    }
}

/// In-memory LRU cache for decoded images, keyed by absolute URL.
/// Thread-safe and optimized for frequent reads.
pub struct MemoryImageCache {
    cache: Arc<RwLock<CostedLru>>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified count and byte-cost caps.
    #[must_use]
    pub fn new(capacity: usize, max_cost: u64) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CostedLru::new(capacity, max_cost))),
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default caps.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MEMORY_COUNT, DEFAULT_MEMORY_COST)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(std::sync::atomic::Ordering::Relaxed);
        let misses = self.misses.load(std::sync::atomic::Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an image without promoting it in the LRU.
    /// Use this in read-only contexts to avoid write locks.
    pub async fn peek(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        let cache = self.cache.read().await;
        cache.entries.peek(url).cloned()
    }

    /// Current total byte cost of cached images.
    pub async fn current_cost(&self) -> u64 {
        self.cache.read().await.cost
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        let mut cache = self.cache.write().await;
        if let Some(img) = cache.entries.get(url) {
            self.hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            trace!(url, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            trace!(url, "Memory cache miss");
            None
        }
    }

    async fn put(&self, url: &str, image: Arc<image::DynamicImage>) {
        let mut cache = self.cache.write().await;
        debug!(url, "Storing image in memory cache");
        cache.insert(url.to_string(), image);
    }

    async fn evict(&self, url: &str) {
        let mut cache = self.cache.write().await;
        if cache.remove(url) {
            debug!(url, "Evicted image from memory cache");
        }
    }

    fn len(&self) -> usize {
        // This is a best-effort estimate; actual size may differ slightly
        // due to concurrent modifications
        let cache = self.cache.try_read();
        cache.map(|c| c.entries.len()).unwrap_or(0)
    }

    async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        debug!("Cleared memory image cache");
    }
}
