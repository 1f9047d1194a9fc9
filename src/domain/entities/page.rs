//! Paginated response envelope.

use serde::{Deserialize, Serialize};

use super::Movie;

/// One page of catalog results, as served by the API and as cached.
///
/// `results` preserves server order. `total_pages`/`total_results` come
/// from the API but are not used to drive pagination (see `PAGE_SIZE`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl MoviePage {
    /// Builds a page envelope around a list of results.
    #[must_use]
    pub fn new(page: u32, results: Vec<Movie>) -> Self {
        let total_results = u32::try_from(results.len()).unwrap_or(u32::MAX);
        Self {
            page,
            results,
            total_pages: page,
            total_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_without_totals() {
        let json = r#"{"page": 1, "results": []}"#;

        let page: MoviePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
