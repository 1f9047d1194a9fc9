//! Application layer with the list controllers.

/// Paginated list controllers.
pub mod controllers;

pub use controllers::{
    BookmarksController, ListKind, MovieListController, SEARCH_DEBOUNCE, SearchController,
};
