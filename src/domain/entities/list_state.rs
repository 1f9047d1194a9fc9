//! In-memory state of a paginated movie list.

use super::Movie;

/// Number of results the API returns for a full page.
///
/// Exactly this many results on a page is the signal that more pages
/// exist; fewer (including zero) signals the last page. This is a known
/// approximation: the envelope's `total_pages` field would be
/// authoritative, but the page-size heuristic is the documented contract.
pub const PAGE_SIZE: usize = 20;

/// Accumulated state owned by one list controller instance.
///
/// `movies` appends pages in arrival order without deduplication.
/// `is_loading` covers the first page, `is_loading_more` subsequent
/// pages; they are modeled as independent booleans.
#[derive(Debug, Clone)]
pub struct ListState {
    pub current_page: u32,
    pub has_more: bool,
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error_message: Option<String>,
}

impl ListState {
    /// Recomputes `has_more` from the size of the page just received.
    #[must_use]
    pub const fn page_is_full(count: usize) -> bool {
        count == PAGE_SIZE
    }

    /// Resets the cursor back to page one with everything cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            current_page: 1,
            has_more: true,
            movies: Vec::new(),
            is_loading: false,
            is_loading_more: false,
            error_message: None,
        }
    }
}
