//! Catalog error taxonomy.

use thiserror::Error;

/// Errors surfaced by the catalog service.
///
/// The `Display` strings are suitable for showing to the user directly;
/// controllers copy them verbatim into `error_message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request URL could not be constructed. Fatal to that call.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The request timed out. Transient; the caller may retry.
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// Connectivity was lost. Transient.
    #[error("No internet connection. Please check your network settings.")]
    NoInternet,

    /// Catch-all transport failure with a human-readable detail.
    #[error("Server error: {0}")]
    ServerError(String),

    /// The transport succeeded but the payload was unusable.
    #[error("Invalid response from server")]
    InvalidResponse,
}

impl CatalogError {
    /// Creates a server error with the given detail.
    #[must_use]
    pub fn server(detail: impl Into<String>) -> Self {
        Self::ServerError(detail.into())
    }

    /// Returns whether the caller could reasonably retry.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::NoInternet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(CatalogError::Timeout.is_transient());
        assert!(CatalogError::NoInternet.is_transient());
        assert!(!CatalogError::InvalidUrl.is_transient());
        assert!(!CatalogError::server("boom").is_transient());
    }

    #[test]
    fn test_server_error_detail_is_displayed() {
        assert_eq!(
            CatalogError::server("boom").to_string(),
            "Server error: boom"
        );
    }
}
