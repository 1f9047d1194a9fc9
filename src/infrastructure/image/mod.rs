//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction under count and byte-cost caps
//! - Disk caching for persistence with an age sweep
//! - Async image loading pipeline

pub mod disk_cache;
pub mod loader;
pub mod memory_cache;

pub use disk_cache::DiskImageCache;
pub use loader::{ImageLoader, ImageSource};
pub use memory_cache::{CacheStats, MemoryImageCache};
