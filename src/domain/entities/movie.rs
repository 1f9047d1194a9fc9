//! Movie catalog entity.

use serde::{Deserialize, Serialize};

use crate::domain::deep_link;

/// Base URL for TMDB image assets.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
/// Size tier for poster images.
pub const POSTER_SIZE: &str = "w500";
/// Size tier for backdrop images.
pub const BACKDROP_SIZE: &str = "w780";
/// Size tier for list thumbnails.
pub const THUMBNAIL_SIZE: &str = "w200";

/// Stable catalog identity of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    /// Returns the raw id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A movie as served by the catalog API.
///
/// Immutable value: created per request or per bookmark snapshot, never
/// mutated. Field names match the snake_case wire format one to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
}

impl Movie {
    /// Full-size poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{IMAGE_BASE_URL}/{POSTER_SIZE}{path}"))
    }

    /// Backdrop URL, if the movie has a backdrop.
    #[must_use]
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_ref()
            .map(|path| format!("{IMAGE_BASE_URL}/{BACKDROP_SIZE}{path}"))
    }

    /// Thumbnail-sized poster URL for list rows.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{IMAGE_BASE_URL}/{THUMBNAIL_SIZE}{path}"))
    }

    /// Deep link that resolves back to this movie.
    #[must_use]
    pub fn share_url(&self) -> String {
        deep_link::movie_deep_link(self.id)
    }

    /// Average rating rendered with one decimal, e.g. `"7.8"`.
    #[must_use]
    pub fn formatted_rating(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Release date in medium style, e.g. `"Aug 22, 2025"`.
    ///
    /// Falls back to the raw wire string when it is not a `YYYY-MM-DD`
    /// date.
    #[must_use]
    pub fn formatted_release_date(&self) -> String {
        chrono::NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").map_or_else(
            |_| self.release_date.clone(),
            |date| date.format("%b %-d, %Y").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie(id: u64, title: &str) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            overview: "A movie.".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: "2025-08-22".to_string(),
            vote_average: 7.85,
            vote_count: 1200,
            popularity: 99.5,
        }
    }

    #[test]
    fn test_derived_urls() {
        let movie = sample_movie(603, "The Matrix");

        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(
            movie.thumbnail_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w200/poster.jpg")
        );
        assert!(movie.backdrop_url().is_none());
        assert_eq!(movie.share_url(), "cinema://movie/603");
    }

    #[test]
    fn test_formatted_fields() {
        let movie = sample_movie(1, "A");

        assert_eq!(movie.formatted_rating(), "7.8");
        assert_eq!(movie.formatted_release_date(), "Aug 22, 2025");
    }

    #[test]
    fn test_formatted_date_falls_back_on_garbage() {
        let mut movie = sample_movie(1, "A");
        movie.release_date = "coming soon".to_string();

        assert_eq!(movie.formatted_release_date(), "coming soon");
    }

    #[test]
    fn test_wire_format_round_trip() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "overview": "Neo.",
            "poster_path": "/p.jpg",
            "backdrop_path": null,
            "release_date": "1999-03-31",
            "vote_average": 8.2,
            "vote_count": 25000,
            "popularity": 88.1
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, MovieId(603));
        assert_eq!(movie.poster_path.as_deref(), Some("/p.jpg"));
        assert!(movie.backdrop_path.is_none());
    }
}
