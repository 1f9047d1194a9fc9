//! Catalog API HTTP client.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoints::DEFAULT_BASE_URL;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
const USER_AGENT: &str = concat!("cinema/", env!("CARGO_PKG_VERSION"));

/// Raw transport-level request failures.
///
/// Deliberately unclassified: the catalog service maps these onto the
/// user-facing [`CatalogError`](crate::domain::errors::CatalogError)
/// taxonomy.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request URL could not be constructed.
    #[error("invalid request URL: {url}")]
    InvalidUrl { url: String },

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// The server answered outside the 200-299 range.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(reqwest::Error),
}

/// One-shot GET-and-decode client for the catalog API.
///
/// Credentials are injected transparently: callers pass the endpoint
/// (path + query, no secrets) and the client appends the API key.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Creates a client against the default base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RequestError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RequestError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Issues one typed GET against `{base_url}{endpoint}`.
    ///
    /// # Errors
    /// Returns the raw transport, status, or decode failure.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RequestError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|_| RequestError::InvalidUrl { url: raw })?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        debug!(endpoint, "Requesting catalog endpoint");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Catalog request failed");
            RequestError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = %status, "Catalog returned error status");
            return Err(RequestError::Status(status));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(endpoint, error = %e, "Failed to decode catalog response");
            RequestError::Decode(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = TmdbClient::new("secret");
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unparseable_base_url_is_rejected() {
        let client = TmdbClient::with_base_url("not a url", "secret").unwrap();

        let result: Result<serde_json::Value, _> = client.get_json("/movie/1").await;
        assert!(matches!(result, Err(RequestError::InvalidUrl { .. })));
    }
}
