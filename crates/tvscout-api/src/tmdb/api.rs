//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    DiscoverTvParams, TmdbDiscoverTvResponse, TmdbGenreListResponse, TmdbKeywordSearchResponse,
    TmdbTvDetails,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the TV genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_genres(&self) -> Result<TmdbGenreListResponse>;

    /// Searches keywords by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_keywords(&self, query: &str) -> Result<TmdbKeywordSearchResponse>;

    /// Fetches TV series details with attached keywords.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails>;

    /// Runs a discover query for TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_tv(&self, params: &DiscoverTvParams) -> Result<TmdbDiscoverTvResponse>;
}
