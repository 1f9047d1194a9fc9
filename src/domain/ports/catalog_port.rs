//! Catalog service port definition.

use async_trait::async_trait;

use crate::domain::entities::{Movie, MovieId};
use crate::domain::errors::CatalogError;

/// Port for fetching movie lists and single movies from the catalog.
///
/// Controllers depend on this trait so they can be driven by test
/// doubles. All page numbers are one-based.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetches one page of this week's trending movies.
    async fn trending(&self, page: u32) -> Result<Vec<Movie>, CatalogError>;

    /// Fetches one page of movies currently in theaters.
    async fn now_playing(&self, page: u32) -> Result<Vec<Movie>, CatalogError>;

    /// Searches the catalog. Never served from cache.
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Movie>, CatalogError>;

    /// Fetches full details for a single movie.
    async fn movie_details(&self, id: MovieId) -> Result<Movie, CatalogError>;
}
