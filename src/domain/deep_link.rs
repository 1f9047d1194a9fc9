//! Deep link handling for `cinema://movie/{id}` URIs.

use super::entities::MovieId;

/// URI scheme registered by the application.
pub const DEEP_LINK_SCHEME: &str = "cinema";

/// Builds the deep link that opens the details screen for a movie.
#[must_use]
pub fn movie_deep_link(id: MovieId) -> String {
    format!("{DEEP_LINK_SCHEME}://movie/{id}")
}

/// Resolves a deep link to the movie id it points at.
///
/// Anything that is not exactly `cinema://movie/{id}` (a foreign scheme,
/// a different host, a missing or non-numeric id) resolves to `None` and
/// is ignored by the caller.
#[must_use]
pub fn parse_movie_deep_link(url: &str) -> Option<MovieId> {
    let rest = url.strip_prefix(DEEP_LINK_SCHEME)?.strip_prefix("://")?;
    let id = rest.strip_prefix("movie/")?;
    let id = id.split(['/', '?', '#']).next()?;
    id.parse::<u64>().ok().map(MovieId)
}
