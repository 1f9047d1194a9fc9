//! Catalog endpoint paths and request fingerprints.
//!
//! The endpoint string (path + query, credentials excluded) doubles as
//! the response-cache fingerprint.

use crate::domain::entities::MovieId;

/// Default catalog API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const TRENDING_PATH: &str = "/trending/movie/week";
const NOW_PLAYING_PATH: &str = "/movie/now_playing";
const SEARCH_PATH: &str = "/search/movie";
const MOVIE_DETAILS_PATH: &str = "/movie";

/// Endpoint for one page of this week's trending movies.
#[must_use]
pub fn trending(page: u32) -> String {
    format!("{TRENDING_PATH}?page={page}")
}

/// Endpoint for one page of now-playing movies.
#[must_use]
pub fn now_playing(page: u32) -> String {
    format!("{NOW_PLAYING_PATH}?page={page}")
}

/// Endpoint for one page of search results.
#[must_use]
pub fn search(query: &str, page: u32) -> String {
    format!("{SEARCH_PATH}?query={}&page={page}", encode_component(query))
}

/// Endpoint for a single movie's details.
#[must_use]
pub fn movie_details(id: MovieId) -> String {
    format!("{MOVIE_DETAILS_PATH}/{id}")
}

/// Percent-encodes a query component (RFC 3986 unreserved set).
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    encoded
}
