//! Debounced search controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::{ListState, Movie, MovieId};
use crate::domain::ports::{BookmarkStorePort, CatalogPort};

/// Delay between the last keystroke and the search request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// State shared with the debounce task.
struct SearchInner {
    catalog: Arc<dyn CatalogPort>,
    state: Mutex<ListState>,
    // Bumped on every keystroke; a fetch whose generation is no longer
    // current must not touch state.
    generation: AtomicU64,
}

/// Drives the search surface: debounced queries plus pagination.
///
/// Every keystroke aborts the pending debounce task and bumps the
/// generation counter, so only the most recent query executes and a
/// fetch that already escaped the abort is dropped on completion.
pub struct SearchController {
    inner: Arc<SearchInner>,
    bookmarks: Arc<dyn BookmarkStorePort>,
    query: String,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Creates a search controller with the standard debounce delay.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>, bookmarks: Arc<dyn BookmarkStorePort>) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                catalog,
                state: Mutex::new(ListState::default()),
                generation: AtomicU64::new(0),
            }),
            bookmarks,
            query: String::new(),
            debounce: SEARCH_DEBOUNCE,
            pending: None,
        }
    }

    /// Snapshot of the current search state.
    #[must_use]
    pub fn state(&self) -> ListState {
        self.inner.state.lock().clone()
    }

    /// The current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Records a keystroke and schedules a debounced page-one search.
    ///
    /// Must be called from within a tokio runtime. An empty or
    /// whitespace-only query resets the state without a fetch.
    pub fn search(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.query.clone_from(&query);

        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            *self.inner.state.lock() = ListState::default();
            return;
        }

        let inner = Arc::clone(&self.inner);
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            perform_search(&inner, &query, 1, generation).await;
        }));
    }

    /// Fetches and appends the next page of results for the current
    /// query. No debounce; no-op while exhausted or already loading.
    pub async fn load_more(&self) {
        let (has_more, busy, current_page) = {
            let state = self.inner.state.lock();
            (state.has_more, state.is_loading_more, state.current_page)
        };
        if !has_more || busy || self.query.trim().is_empty() {
            return;
        }

        let generation = self.inner.generation.load(Ordering::SeqCst);
        perform_search(&self.inner, &self.query, current_page + 1, generation).await;
    }

    /// Clears the query, the results, and any pending debounce.
    pub fn clear(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.query.clear();
        *self.inner.state.lock() = ListState::default();
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

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

async fn perform_search(inner: &Arc<SearchInner>, query: &str, page: u32, generation: u64) {
    {
        let mut state = inner.state.lock();
        if inner.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        if page == 1 {
            state.is_loading = true;
            state.movies.clear();
        } else {
            state.is_loading_more = true;
        }
        state.error_message = None;
    }

    let result = inner.catalog.search(query, page).await;

    let mut state = inner.state.lock();
    if inner.generation.load(Ordering::SeqCst) != generation {
        debug!(query, page, "Dropping stale search response");
        return;
    }

    match result {
        Ok(movies) => {
            debug!(query, page, count = movies.len(), "Loaded search results");
            state.has_more = ListState::page_is_full(movies.len());
            state.current_page = page;
            if page == 1 {
                if movies.is_empty() {
                    state.error_message = Some(format!("No movies found for '{query}'"));
                }
                state.movies = movies;
            } else {
                state.movies.extend(movies);
            }
        }
        Err(e) => {
            warn!(query, page, error = %e, "Search failed");
            if page == 1 && state.movies.is_empty() {
                state.error_message = Some(e.to_string());
            }
        }
    }

    if page == 1 {
        state.is_loading = false;
    } else {
        state.is_loading_more = false;
    }
}
