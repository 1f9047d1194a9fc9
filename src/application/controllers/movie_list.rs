//! Paginated list controller for the trending and now-playing surfaces.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{ListState, Movie, MovieId};
use crate::domain::errors::CatalogError;
use crate::domain::ports::{BookmarkStorePort, CatalogPort};

/// Which catalog list a controller instance drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// This week's trending movies.
    Trending,
    /// Movies currently in theaters.
    NowPlaying,
}

impl ListKind {
    /// Human-readable label, used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::NowPlaying => "now_playing",
        }
    }
}

/// Owns the cursor, flags, and accumulated results of one movie list.
///
/// Exactly one instance exists per list surface. Every load takes
/// `&mut self`, so two fetches for the same list can never be in flight
/// concurrently and a slow response cannot overwrite a later one.
pub struct MovieListController {
    kind: ListKind,
    catalog: Arc<dyn CatalogPort>,
    bookmarks: Arc<dyn BookmarkStorePort>,
    state: ListState,
}

impl MovieListController {
    /// Creates a controller for one list surface.
    #[must_use]
    pub fn new(
        kind: ListKind,
        catalog: Arc<dyn CatalogPort>,
        bookmarks: Arc<dyn BookmarkStorePort>,
    ) -> Self {
        Self {
            kind,
            catalog,
            bookmarks,
            state: ListState::default(),
        }
    }

    /// Current list state.
    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    async fn fetch(&self, page: u32) -> Result<Vec<Movie>, CatalogError> {
        match self.kind {
            ListKind::Trending => self.catalog.trending(page).await,
            ListKind::NowPlaying => self.catalog.now_playing(page).await,
        }
    }

    /// Loads the first page, replacing the accumulated list on success.
    ///
    /// A failure surfaces an error message only while the accumulated
    /// list is empty; otherwise prior results stay visible.
    pub async fn load_initial(&mut self) {
        self.state.current_page = 1;
        self.state.has_more = true;
        self.state.is_loading = true;
        self.state.error_message = None;

        match self.fetch(1).await {
            Ok(movies) => {
                debug!(list = self.kind.label(), count = movies.len(), "Loaded first page");
                self.state.has_more = ListState::page_is_full(movies.len());
                if movies.is_empty() {
                    self.state.error_message = Some("No movies found".to_string());
                }
                self.state.movies = movies;
            }
            Err(e) => {
                warn!(list = self.kind.label(), error = %e, "Failed to load first page");
                if self.state.movies.is_empty() {
                    self.state.error_message = Some(e.to_string());
                }
            }
        }

        self.state.is_loading = false;
    }

    /// Fetches and appends the next page.
    ///
    /// No-op while the last page has been reached or a load-more is
    /// already running.
    pub async fn load_more(&mut self) {
        if !self.state.has_more || self.state.is_loading_more {
            return;
        }

        self.state.is_loading_more = true;
        let next = self.state.current_page + 1;

        match self.fetch(next).await {
            Ok(movies) => {
                debug!(
                    list = self.kind.label(),
                    page = next,
                    count = movies.len(),
                    "Loaded next page"
                );
                self.state.has_more = ListState::page_is_full(movies.len());
                self.state.current_page = next;
                self.state.movies.extend(movies);
            }
            Err(e) => {
                warn!(list = self.kind.label(), page = next, error = %e, "Failed to load next page");
                if self.state.movies.is_empty() {
                    self.state.error_message = Some(e.to_string());
                }
            }
        }

        self.state.is_loading_more = false;
    }

    /// Reloads from page one. Callable any time.
    pub async fn refresh(&mut self) {
        self.load_initial().await;
    }

    /// Toggles the bookmark for a movie; returns the new state once the
    /// store operation has completed.
    pub async fn toggle_bookmark(&self, movie: &Movie) -> bool {
        if self.bookmarks.is_bookmarked(movie.id).await {
            self.bookmarks.remove(movie.id).await;
            false
        } else {
            self.bookmarks.save(movie).await;
            true
        }
    }

    /// Whether a movie is currently bookmarked.
    pub async fn is_bookmarked(&self, id: MovieId) -> bool {
        self.bookmarks.is_bookmarked(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::ports::mocks::{MockBookmarkStore, MockCatalog};

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "2025-01-01".to_string(),
            vote_average: 7.0,
            vote_count: 1,
            popularity: 1.0,
        }
    }

    fn movies(count: usize) -> Vec<Movie> {
        (0..count)
            .map(|i| movie(i as u64 + 1, &format!("Movie {}", i + 1)))
            .collect()
    }

    fn controller(catalog: MockCatalog) -> MovieListController {
        MovieListController::new(
            ListKind::Trending,
            Arc::new(catalog),
            Arc::new(MockBookmarkStore::new()),
        )
    }

    #[tokio::test]
    async fn test_full_first_page_sets_has_more() {
        let mut ctrl = controller(MockCatalog::with_page(1, movies(20)));

        ctrl.load_initial().await;

        assert_eq!(ctrl.state().movies.len(), 20);
        assert!(ctrl.state().has_more);
        assert!(!ctrl.state().is_loading);
        assert!(ctrl.state().error_message.is_none());
    }

    #[tokio::test]
    async fn test_short_first_page_clears_has_more() {
        let mut ctrl = controller(MockCatalog::with_page(1, movies(15)));

        ctrl.load_initial().await;

        assert_eq!(ctrl.state().movies.len(), 15);
        assert!(!ctrl.state().has_more);
    }

    #[tokio::test]
    async fn test_empty_first_page_sets_error() {
        let mut ctrl = controller(MockCatalog::with_page(1, movies(0)));

        ctrl.load_initial().await;

        assert!(ctrl.state().movies.is_empty());
        assert!(!ctrl.state().has_more);
        assert_eq!(
            ctrl.state().error_message.as_deref(),
            Some("No movies found")
        );
    }

    #[tokio::test]
    async fn test_two_item_page_accumulates_and_stops() {
        let mut ctrl = controller(MockCatalog::with_page(1, movies(2)));

        ctrl.load_initial().await;

        let state = ctrl.state();
        assert_eq!(state.movies.len(), 2);
        assert_eq!(state.movies[0].title, "Movie 1");
        assert!(!state.has_more);
        assert!(!state.is_loading);
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn test_failure_on_empty_list_surfaces_message() {
        let mut ctrl = controller(MockCatalog::failing(CatalogError::server("boom")));

        ctrl.load_initial().await;

        assert!(ctrl.state().movies.is_empty());
        assert!(!ctrl.state().is_loading);
        assert_eq!(
            ctrl.state().error_message.as_deref(),
            Some("Server error: boom")
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_prior_results_visible() {
        let catalog = Arc::new(MockCatalog::with_page(1, movies(20)));
        let mut ctrl = MovieListController::new(
            ListKind::Trending,
            Arc::clone(&catalog) as _,
            Arc::new(MockBookmarkStore::new()),
        );

        ctrl.load_initial().await;
        assert_eq!(ctrl.state().movies.len(), 20);

        catalog.set_error(Some(CatalogError::Timeout));
        ctrl.refresh().await;

        // Prior content stays, no error message on a non-empty list.
        assert_eq!(ctrl.state().movies.len(), 20);
        assert!(ctrl.state().error_message.is_none());
        assert!(!ctrl.state().is_loading);
    }

    #[tokio::test]
    async fn test_load_more_appends_and_advances_cursor() {
        let pages = HashMap::from([(1, movies(20)), (2, movies(5))]);
        let mut ctrl = controller(MockCatalog::with_pages(pages));

        ctrl.load_initial().await;
        ctrl.load_more().await;

        assert_eq!(ctrl.state().movies.len(), 25);
        assert_eq!(ctrl.state().current_page, 2);
        assert!(!ctrl.state().has_more);
        assert!(!ctrl.state().is_loading_more);
    }

    #[tokio::test]
    async fn test_load_more_without_more_pages_is_noop() {
        let catalog = Arc::new(MockCatalog::with_page(1, movies(15)));
        let mut ctrl = MovieListController::new(
            ListKind::Trending,
            Arc::clone(&catalog) as _,
            Arc::new(MockBookmarkStore::new()),
        );

        ctrl.load_initial().await;
        assert_eq!(catalog.call_count(), 1);

        ctrl.load_more().await;

        assert_eq!(catalog.call_count(), 1);
        assert_eq!(ctrl.state().movies.len(), 15);
        assert_eq!(ctrl.state().current_page, 1);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_kept() {
        let pages = HashMap::from([(1, movies(20)), (2, movies(20))]);
        let mut ctrl = controller(MockCatalog::with_pages(pages));

        ctrl.load_initial().await;
        ctrl.load_more().await;

        // Append is unconditional; the same ids appear twice.
        assert_eq!(ctrl.state().movies.len(), 40);
    }

    #[tokio::test]
    async fn test_toggle_bookmark_round_trip() {
        let ctrl = controller(MockCatalog::with_page(1, movies(1)));
        let m = movie(603, "The Matrix");

        assert!(ctrl.toggle_bookmark(&m).await);
        assert!(ctrl.is_bookmarked(m.id).await);
        assert!(!ctrl.toggle_bookmark(&m).await);
        assert!(!ctrl.is_bookmarked(m.id).await);
    }
}
