//! SQLite-backed page response cache with time-based expiry.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::database::Database;
use crate::domain::entities::MoviePage;
use crate::domain::errors::StoreError;
use crate::domain::ports::ResponseCachePort;

/// How long a cached page response stays servable.
pub const RESPONSE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Response cache keyed by request fingerprint.
///
/// One live row per fingerprint; writes supersede via delete-then-insert
/// inside a transaction. Reads are awaited by the caller, writes and
/// expiry deletes run on background tasks.
pub struct SqliteResponseCache {
    db: Database,
    ttl: Duration,
}

impl SqliteResponseCache {
    /// Creates a cache with the standard 24-hour TTL.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self::with_ttl(db, RESPONSE_TTL)
    }

    /// Creates a cache with a custom TTL.
    #[must_use]
    pub const fn with_ttl(db: Database, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    fn delete_in_background(&self, fingerprint: &str) {
        let db = self.db.clone();
        let key = fingerprint.to_string();
        tokio::spawn(async move {
            let deleted = db
                .call(move |conn| {
                    conn.execute("DELETE FROM response_cache WHERE fingerprint = ?1", [&key])
                        .map_err(StoreError::from)
                })
                .await;
            if let Err(e) = deleted {
                warn!(error = %e, "Failed to delete expired cache entry");
            }
        });
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl ResponseCachePort for SqliteResponseCache {
    async fn get(&self, fingerprint: &str) -> Option<MoviePage> {
        let key = fingerprint.to_string();
        let row = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT data, timestamp FROM response_cache WHERE fingerprint = ?1",
                )?;
                let mut rows = stmt.query([&key])?;
                match rows.next()? {
                    Some(row) => {
                        let data: Vec<u8> = row.get(0)?;
                        let timestamp: i64 = row.get(1)?;
                        Ok(Some((data, timestamp)))
                    }
                    None => Ok(None),
                }
            })
            .await;

        let (data, timestamp) = match row {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                trace!(fingerprint, "Response cache miss");
                return None;
            }
            Err(e) => {
                warn!(fingerprint, error = %e, "Response cache read failed");
                return None;
            }
        };

        let age = chrono::Utc::now().timestamp_millis() - timestamp;
        if age > self.ttl_millis() {
            debug!(fingerprint, age_ms = age, "Response cache entry expired");
            self.delete_in_background(fingerprint);
            return None;
        }

        match serde_json::from_slice(&data) {
            Ok(page) => {
                debug!(fingerprint, "Response cache hit");
                Some(page)
            }
            Err(e) => {
                warn!(fingerprint, error = %e, "Dropping undecodable cache entry");
                self.delete_in_background(fingerprint);
                None
            }
        }
    }

    fn put(&self, fingerprint: &str, page: &MoviePage) {
        let bytes = match serde_json::to_vec(page) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(fingerprint, error = %e, "Failed to serialize page for cache");
                return;
            }
        };

        let db = self.db.clone();
        let key = fingerprint.to_string();
        tokio::spawn(async move {
            let log_key = key.clone();
            let stored = db
                .call(move |conn| {
                    let tx = conn.unchecked_transaction()?;
                    tx.execute("DELETE FROM response_cache WHERE fingerprint = ?1", [&key])?;
                    tx.execute(
                        "INSERT INTO response_cache (fingerprint, data, timestamp)
                         VALUES (?1, ?2, ?3)",
                        rusqlite::params![key, bytes, chrono::Utc::now().timestamp_millis()],
                    )?;
                    tx.commit()?;
                    Ok(())
                })
                .await;
            match stored {
                Ok(()) => debug!(fingerprint = %log_key, "Response cached"),
                Err(e) => warn!(fingerprint = %log_key, error = %e, "Response cache write failed"),
            }
        });
    }

    async fn sweep_expired(&self) {
        let cutoff = chrono::Utc::now().timestamp_millis() - self.ttl_millis();
        let swept = self
            .db
            .call(move |conn| {
                conn.execute("DELETE FROM response_cache WHERE timestamp < ?1", [cutoff])
                    .map_err(StoreError::from)
            })
            .await;
        match swept {
            Ok(count) if count > 0 => debug!(count, "Swept expired cache entries"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Cache sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Movie, MovieId};
    use tempfile::TempDir;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "2025-01-01".to_string(),
            vote_average: 6.0,
            vote_count: 10,
            popularity: 1.0,
        }
    }

    fn page(movies: Vec<Movie>) -> MoviePage {
        MoviePage::new(1, movies)
    }

    async fn ready_db(temp: &TempDir) -> Database {
        let db = Database::open(temp.path().join("cinema.db"));
        assert!(db.wait_ready(Duration::from_secs(5)).await);
        db
    }

    async fn row_count(db: &Database, fingerprint: &str) -> i64 {
        let key = fingerprint.to_string();
        db.call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM response_cache WHERE fingerprint = ?1",
                [&key],
                |row| row.get(0),
            )
            .map_err(StoreError::from)
        })
        .await
        .unwrap()
    }

    /// Writes run on a background task; poll until the entry lands.
    async fn settle(cache: &SqliteResponseCache, fingerprint: &str) {
        for _ in 0..100 {
            if cache.get(fingerprint).await.is_some() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("cache write did not settle for {fingerprint}");
    }

    #[tokio::test]
    async fn test_put_then_get_returns_identical_page() {
        let temp = TempDir::new().unwrap();
        let cache = SqliteResponseCache::new(ready_db(&temp).await);
        let stored = page(vec![movie(1, "Alpha"), movie(2, "Beta")]);

        cache.put("/trending/movie/week?page=1", &stored);
        settle(&cache, "/trending/movie/week?page=1").await;

        let loaded = cache.get("/trending/movie/week?page=1").await.unwrap();
        assert_eq!(loaded, stored);
    }

    #[tokio::test]
    async fn test_get_after_ttl_returns_absent_and_deletes() {
        let temp = TempDir::new().unwrap();
        let db = ready_db(&temp).await;
        let cache = SqliteResponseCache::with_ttl(db.clone(), Duration::from_millis(40));

        cache.put("/movie/now_playing?page=1", &page(vec![movie(1, "A")]));
        settle(&cache, "/movie/now_playing?page=1").await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("/movie/now_playing?page=1").await.is_none());

        // Lazy delete runs in the background.
        for _ in 0..100 {
            if row_count(&db, "/movie/now_playing?page=1").await == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expired entry was not deleted");
    }

    #[tokio::test]
    async fn test_repeated_puts_leave_one_entry() {
        let temp = TempDir::new().unwrap();
        let db = ready_db(&temp).await;
        let cache = SqliteResponseCache::new(db.clone());

        cache.put("/trending/movie/week?page=1", &page(vec![movie(1, "A")]));
        settle(&cache, "/trending/movie/week?page=1").await;
        cache.put("/trending/movie/week?page=1", &page(vec![movie(2, "B")]));

        // Wait for the superseding write to land.
        for _ in 0..100 {
            let current = cache.get("/trending/movie/week?page=1").await;
            if current.is_some_and(|p| p.results[0].id == MovieId(2)) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(row_count(&db, "/trending/movie/week?page=1").await, 1);
    }

    #[tokio::test]
    async fn test_sweep_deletes_everything_older_than_ttl() {
        let temp = TempDir::new().unwrap();
        let db = ready_db(&temp).await;
        let cache = SqliteResponseCache::with_ttl(db.clone(), Duration::from_millis(40));

        cache.put("/a", &page(vec![movie(1, "A")]));
        settle(&cache, "/a").await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        cache.sweep_expired().await;
        assert_eq!(row_count(&db, "/a").await, 0);
    }

    #[tokio::test]
    async fn test_not_ready_store_behaves_as_miss() {
        let cache = SqliteResponseCache::new(Database::unavailable());

        assert!(cache.get("/trending/movie/week?page=1").await.is_none());
        // A write against an unavailable store must not panic.
        cache.put("/trending/movie/week?page=1", &page(vec![movie(1, "A")]));
        cache.sweep_expired().await;
    }
}
