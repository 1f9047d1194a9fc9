//! Movie catalog service: remote fetches behind the response cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::client::{RequestError, TmdbClient};
use super::endpoints;
use crate::domain::entities::{Movie, MovieId, MoviePage};
use crate::domain::errors::CatalogError;
use crate::domain::ports::{CatalogPort, ResponseCachePort};

/// Orchestrates the remote client and the response cache, and maps raw
/// transport failures onto the stable [`CatalogError`] taxonomy.
pub struct MovieCatalogService {
    client: TmdbClient,
    cache: Arc<dyn ResponseCachePort>,
}

impl MovieCatalogService {
    /// Creates the service over a client and a response cache.
    #[must_use]
    pub fn new(client: TmdbClient, cache: Arc<dyn ResponseCachePort>) -> Self {
        Self { client, cache }
    }

    /// Serves a list page from cache, falling back to the network with a
    /// write-through on success.
    async fn fetch_page_cached(&self, endpoint: &str) -> Result<Vec<Movie>, CatalogError> {
        if let Some(page) = self.cache.get(endpoint).await {
            debug!(endpoint, count = page.results.len(), "Serving page from cache");
            return Ok(page.results);
        }

        let page: MoviePage = self.client.get_json(endpoint).await.map_err(classify)?;
        self.cache.put(endpoint, &page);

        info!(endpoint, count = page.results.len(), "Fetched page from network");
        Ok(page.results)
    }
}

/// Maps raw request failures onto the user-facing taxonomy.
fn classify(error: RequestError) -> CatalogError {
    match error {
        RequestError::InvalidUrl { .. } => CatalogError::InvalidUrl,
        RequestError::Transport(e) if e.is_timeout() => CatalogError::Timeout,
        RequestError::Transport(e) if e.is_connect() => CatalogError::NoInternet,
        RequestError::Transport(e) => CatalogError::server(e.to_string()),
        RequestError::Status(status) => CatalogError::server(format!("HTTP {status}")),
        RequestError::Decode(_) => CatalogError::InvalidResponse,
    }
}

#[async_trait]
impl CatalogPort for MovieCatalogService {
    async fn trending(&self, page: u32) -> Result<Vec<Movie>, CatalogError> {
        self.fetch_page_cached(&endpoints::trending(page)).await
    }

    async fn now_playing(&self, page: u32) -> Result<Vec<Movie>, CatalogError> {
        self.fetch_page_cached(&endpoints::now_playing(page)).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Vec<Movie>, CatalogError> {
        // The query space is too large for useful reuse; search always
        // hits the network and is never written to the cache.
        let endpoint = endpoints::search(query, page);
        let page: MoviePage = self.client.get_json(&endpoint).await.map_err(classify)?;

        info!(query, count = page.results.len(), "Fetched search results");
        Ok(page.results)
    }

    async fn movie_details(&self, id: MovieId) -> Result<Movie, CatalogError> {
        let endpoint = endpoints::movie_details(id);
        let movie: Movie = self.client.get_json(&endpoint).await.map_err(classify)?;

        debug!(movie_id = %id, "Fetched movie details");
        Ok(movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockResponseCache;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "2025-01-01".to_string(),
            vote_average: 6.5,
            vote_count: 5,
            popularity: 2.0,
        }
    }

    /// Client whose base URL points at a closed local port: any request
    /// that actually goes out fails fast instead of reaching a network.
    fn offline_client() -> TmdbClient {
        TmdbClient::with_base_url("http://127.0.0.1:9", "test-key").unwrap()
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let cache = Arc::new(MockResponseCache::new());
        cache.seed(
            "/trending/movie/week?page=1",
            MoviePage::new(1, vec![movie(1, "Cached")]),
        );
        let service = MovieCatalogService::new(offline_client(), cache);

        let movies = service.trending(1).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Cached");
    }

    #[tokio::test]
    async fn test_cache_miss_surfaces_classified_error() {
        let cache = Arc::new(MockResponseCache::new());
        let service = MovieCatalogService::new(offline_client(), Arc::clone(&cache) as _);

        let result = service.now_playing(1).await;
        assert!(matches!(
            result,
            Err(CatalogError::NoInternet | CatalogError::Timeout | CatalogError::ServerError(_))
        ));
        // A failed fetch must not populate the cache.
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_never_cached() {
        let cache = Arc::new(MockResponseCache::new());
        // Even a seeded entry under the search fingerprint is ignored.
        cache.seed(
            "/search/movie?query=neo&page=1",
            MoviePage::new(1, vec![movie(1, "Stale")]),
        );
        let service = MovieCatalogService::new(offline_client(), Arc::clone(&cache) as _);

        let result = service.search("neo", 1).await;
        assert!(result.is_err());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_base_url_classifies_as_invalid_url() {
        let cache = Arc::new(MockResponseCache::new());
        let client = TmdbClient::with_base_url("not a url", "k").unwrap();
        let service = MovieCatalogService::new(client, cache);

        assert_eq!(
            service.trending(1).await.unwrap_err(),
            CatalogError::InvalidUrl
        );
    }
}
