//! TMDB API response types and discover parameters.

use chrono::NaiveDate;
use serde::Deserialize;

// --- Genres ---

/// Response from `genre/tv/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreListResponse {
    /// TV genres.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Keywords ---

/// Response from `search/keyword` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbKeywordSearchResponse {
    /// Current page number.
    pub page: u32,
    /// Matching keywords.
    pub results: Vec<TmdbKeyword>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// Keyword entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbKeyword {
    /// Keyword ID.
    pub id: u64,
    /// Keyword name.
    pub name: String,
}

/// Keywords attached to a TV series (`append_to_response=keywords`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbKeywordList {
    /// Attached keywords.
    #[serde(default)]
    pub results: Vec<TmdbKeyword>,
}

// --- Discover TV ---

/// Response from `discover/tv` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDiscoverTvResponse {
    /// Current page number.
    pub page: u32,
    /// Candidate shows.
    pub results: Vec<TmdbDiscoverTvResult>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single discover candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDiscoverTvResult {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Overview text.
    pub overview: Option<String>,
    /// First air date (YYYY-MM-DD or null).
    pub first_air_date: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

// --- TV Details ---

/// Response from `tv/{series_id}?append_to_response=keywords`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Status (e.g., "Returning Series", "Ended").
    pub status: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Attached keywords.
    #[serde(default)]
    pub keywords: TmdbKeywordList,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Discover Parameters ---

/// Parameters for `discover/tv` endpoint.
///
/// Ratings are on TMDB's `vote_average` scale (0-10).
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverTvParams {
    /// TMDB status code (`with_status`).
    pub with_status: u8,
    /// Earliest first air date (inclusive).
    pub first_air_date_gte: NaiveDate,
    /// Latest first air date (inclusive).
    pub first_air_date_lte: NaiveDate,
    /// Minimum vote average.
    pub vote_average_gte: f64,
    /// Genre IDs joined by the genre combinator.
    pub with_genres: Option<String>,
    /// Keyword IDs joined by the keyword combinator.
    pub with_keywords: Option<String>,
    /// Result page (only the first page is consumed).
    pub page: u32,
}

impl DiscoverTvParams {
    /// Builds the query string pairs sent to `discover/tv`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = vec![
            ("with_status", self.with_status.to_string()),
            (
                "first_air_date.gte",
                self.first_air_date_gte.format("%Y-%m-%d").to_string(),
            ),
            (
                "first_air_date.lte",
                self.first_air_date_lte.format("%Y-%m-%d").to_string(),
            ),
            ("vote_average.gte", self.vote_average_gte.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(ref genres) = self.with_genres {
            query.push(("with_genres", genres.clone()));
        }
        if let Some(ref keywords) = self.with_keywords {
            query.push(("with_keywords", keywords.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn make_params() -> DiscoverTvParams {
        DiscoverTvParams {
            with_status: 3,
            first_air_date_gte: NaiveDate::from_ymd_opt(1910, 1, 1).unwrap(),
            first_air_date_lte: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            vote_average_gte: 0.0,
            with_genres: None,
            with_keywords: None,
            page: 1,
        }
    }

    fn keys(query: &[(&'static str, String)]) -> Vec<&'static str> {
        query.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_to_query_mandatory_only() {
        // Arrange
        let params = make_params();

        // Act
        let query = params.to_query();

        // Assert
        assert_eq!(
            keys(&query),
            vec![
                "with_status",
                "first_air_date.gte",
                "first_air_date.lte",
                "vote_average.gte",
                "page"
            ]
        );
        assert_eq!(query[0].1, "3");
        assert_eq!(query[1].1, "1910-01-01");
        assert_eq!(query[2].1, "2024-12-31");
        assert_eq!(query[3].1, "0");
    }

    #[test]
    fn test_to_query_with_optional_fields() {
        // Arrange
        let params = DiscoverTvParams {
            with_genres: Some(String::from("18|35")),
            with_keywords: Some(String::from("210024,9715")),
            ..make_params()
        };

        // Act
        let query = params.to_query();

        // Assert
        assert!(query.contains(&("with_genres", String::from("18|35"))));
        assert!(query.contains(&("with_keywords", String::from("210024,9715"))));
    }

    #[test]
    fn test_parse_details_without_keywords_block() {
        // Arrange
        let json = r#"{"id":1,"name":"Show","number_of_episodes":10,"number_of_seasons":2,"status":"Ended"}"#;

        // Act
        let details: TmdbTvDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.number_of_episodes, 10);
        assert!(details.keywords.results.is_empty());
        assert!(details.genres.is_empty());
    }
}
