//! SQLite-backed bookmark store.

use async_trait::async_trait;
use rusqlite::Row;
use tracing::{debug, info, warn};

use super::database::Database;
use crate::domain::entities::{Movie, MovieId};
use crate::domain::errors::StoreError;
use crate::domain::ports::BookmarkStorePort;

/// Durable set of bookmarked movies, one snapshot row per movie id.
///
/// Every operation degrades instead of erroring: a broken or
/// not-yet-ready database reads as "nothing bookmarked".
pub struct SqliteBookmarkStore {
    db: Database,
}

impl SqliteBookmarkStore {
    /// Creates a store over the shared database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: MovieId(row.get::<_, i64>(0)?.unsigned_abs()),
        title: row.get(1)?,
        overview: row.get(2)?,
        poster_path: row.get(3)?,
        backdrop_path: row.get(4)?,
        release_date: row.get(5)?,
        vote_average: row.get(6)?,
        vote_count: row.get(7)?,
        popularity: row.get(8)?,
    })
}

#[async_trait]
impl BookmarkStorePort for SqliteBookmarkStore {
    async fn save(&self, movie: &Movie) {
        let snapshot = movie.clone();
        let title = movie.title.clone();
        let saved = self
            .db
            .call(move |conn| {
                // Conditional insert: the id primary key makes the
                // idempotency check and the write one atomic statement.
                conn.execute(
                    "INSERT OR IGNORE INTO bookmarks
                        (id, title, overview, poster_path, backdrop_path,
                         release_date, vote_average, vote_count, popularity,
                         is_bookmarked, saved_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
                    rusqlite::params![
                        i64::try_from(snapshot.id.as_u64()).unwrap_or(i64::MAX),
                        snapshot.title,
                        snapshot.overview,
                        snapshot.poster_path,
                        snapshot.backdrop_path,
                        snapshot.release_date,
                        snapshot.vote_average,
                        snapshot.vote_count,
                        snapshot.popularity,
                        chrono::Utc::now().timestamp_millis(),
                    ],
                )
                .map_err(StoreError::from)
            })
            .await;

        match saved {
            Ok(0) => debug!(title = %title, "Movie already bookmarked"),
            Ok(_) => info!(title = %title, "Movie bookmarked"),
            Err(e) => warn!(title = %title, error = %e, "Failed to save bookmark"),
        }
    }

    async fn remove(&self, id: MovieId) {
        let removed = self
            .db
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM bookmarks WHERE id = ?1",
                    [i64::try_from(id.as_u64()).unwrap_or(i64::MAX)],
                )
                .map_err(StoreError::from)
            })
            .await;

        match removed {
            Ok(count) if count > 0 => info!(movie_id = %id, "Bookmark removed"),
            Ok(_) => debug!(movie_id = %id, "No bookmark to remove"),
            Err(e) => warn!(movie_id = %id, error = %e, "Failed to remove bookmark"),
        }
    }

    async fn is_bookmarked(&self, id: MovieId) -> bool {
        let result = self
            .db
            .call(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM bookmarks
                     WHERE id = ?1 AND is_bookmarked = 1",
                    [i64::try_from(id.as_u64()).unwrap_or(i64::MAX)],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(StoreError::from)
            })
            .await;

        match result {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(movie_id = %id, error = %e, "Bookmark check failed");
                false
            }
        }
    }

    async fn list(&self) -> Vec<Movie> {
        let result = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, overview, poster_path, backdrop_path,
                            release_date, vote_average, vote_count, popularity
                     FROM bookmarks
                     WHERE is_bookmarked = 1
                     ORDER BY saved_date DESC",
                )?;
                let movies = stmt
                    .query_map([], movie_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(movies)
            })
            .await;

        match result {
            Ok(movies) => movies,
            Err(e) => {
                warn!(error = %e, "Failed to list bookmarks");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use tempfile::TempDir;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            overview: "plot".to_string(),
            poster_path: Some("/p.jpg".to_string()),
            backdrop_path: None,
            release_date: "2025-01-01".to_string(),
            vote_average: 7.0,
            vote_count: 42,
            popularity: 3.5,
        }
    }

    async fn ready_store(temp: &TempDir) -> SqliteBookmarkStore {
        let db = Database::open(temp.path().join("cinema.db"));
        assert!(db.wait_ready(Duration::from_secs(5)).await);
        SqliteBookmarkStore::new(db)
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = ready_store(&temp).await;
        let m = movie(603, "The Matrix");

        store.save(&m).await;
        store.save(&m).await;

        assert!(store.is_bookmarked(MovieId(603)).await);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_then_check_returns_false() {
        let temp = TempDir::new().unwrap();
        let store = ready_store(&temp).await;
        let m = movie(603, "The Matrix");

        store.save(&m).await;
        store.remove(MovieId(603)).await;

        assert!(!store.is_bookmarked(MovieId(603)).await);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_saved_date_descending() {
        let temp = TempDir::new().unwrap();
        let store = ready_store(&temp).await;

        store.save(&movie(1, "First")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.save(&movie(2, "Second")).await;

        let titles: Vec<String> = store
            .list()
            .await
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Second".to_string(), "First".to_string()]);
    }

    #[tokio::test]
    async fn test_snapshot_survives_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ready_store(&temp).await;
        let m = movie(7, "Se7en");

        store.save(&m).await;
        let listed = store.list().await;

        assert_eq!(listed, vec![m]);
    }

    #[tokio::test]
    async fn test_not_ready_store_reads_as_empty() {
        let store = SqliteBookmarkStore::new(Database::unavailable());

        assert!(!store.is_bookmarked(MovieId(1)).await);
        assert!(store.list().await.is_empty());
        // Writes must not panic either.
        store.save(&movie(1, "A")).await;
        store.remove(MovieId(1)).await;
    }
}
