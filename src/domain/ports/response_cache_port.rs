//! Response cache port definition.

use async_trait::async_trait;

use crate::domain::entities::MoviePage;

/// Port for the keyed page-response cache.
///
/// The cache is best-effort and never a source of truth: implementations
/// must degrade to a miss on any internal failure rather than surface an
/// error.
#[async_trait]
pub trait ResponseCachePort: Send + Sync {
    /// Looks up a cached page by fingerprint.
    ///
    /// Returns `None` for absent, expired, or undecodable entries.
    /// Expired entries are deleted off the caller's path.
    async fn get(&self, fingerprint: &str) -> Option<MoviePage>;

    /// Stores a page under a fingerprint, superseding any existing entry.
    ///
    /// Fire-and-forget: the write runs on a background task and failures
    /// are logged and dropped.
    fn put(&self, fingerprint: &str, page: &MoviePage);

    /// Deletes every entry older than the TTL.
    async fn sweep_expired(&self);
}
