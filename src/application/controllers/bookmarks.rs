//! Bookmarked movies controller.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{Movie, MovieId};
use crate::domain::ports::BookmarkStorePort;

/// View model over the durable bookmark store.
pub struct BookmarksController {
    store: Arc<dyn BookmarkStorePort>,
    movies: Vec<Movie>,
    is_loading: bool,
    error_message: Option<String>,
}

impl BookmarksController {
    /// Creates a controller over the bookmark store.
    #[must_use]
    pub fn new(store: Arc<dyn BookmarkStorePort>) -> Self {
        Self {
            store,
            movies: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    /// Bookmarked movies, most recently saved first.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Whether a load is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// User-visible message, set when the list is empty.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Reloads the bookmark list from the store.
    pub async fn load(&mut self) {
        self.is_loading = true;
        self.error_message = None;

        self.movies = self.store.list().await;
        debug!(count = self.movies.len(), "Loaded bookmarks");

        self.is_loading = false;
        if self.movies.is_empty() {
            self.error_message = Some("No bookmarked movies yet".to_string());
        }
    }

    /// Removes a bookmark and reloads the list.
    pub async fn remove(&mut self, movie: &Movie) {
        self.store.remove(movie.id).await;
        self.load().await;
    }

    /// Same as [`load`](Self::load); exists for pull-to-refresh callers.
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    /// Whether a movie is currently bookmarked.
    pub async fn is_bookmarked(&self, id: MovieId) -> bool {
        self.store.is_bookmarked(id).await
    }
}
