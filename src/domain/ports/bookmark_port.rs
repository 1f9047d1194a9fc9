//! Bookmark store port definition.

use async_trait::async_trait;

use crate::domain::entities::{Movie, MovieId};

/// Port for the durable set of user-bookmarked movies.
///
/// None of these operations surface errors: a broken or not-yet-ready
/// store behaves as if nothing were bookmarked.
#[async_trait]
pub trait BookmarkStorePort: Send + Sync {
    /// Bookmarks a movie, snapshotting it at save time.
    ///
    /// Idempotent: saving an id that already has a record is a no-op.
    async fn save(&self, movie: &Movie);

    /// Removes every record for the given id.
    async fn remove(&self, id: MovieId);

    /// Whether the movie is currently bookmarked.
    async fn is_bookmarked(&self, id: MovieId) -> bool;

    /// All bookmarked movies, most recently saved first.
    async fn list(&self) -> Vec<Movie>;
}
