//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints used by discover:
//! the TV genre list, keyword search, TV details and `discover/tv`.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder, TmdbCredential};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverTvParams, TmdbDiscoverTvResponse, TmdbDiscoverTvResult, TmdbGenre,
    TmdbGenreListResponse, TmdbKeyword, TmdbKeywordList, TmdbKeywordSearchResponse,
    TmdbTvDetails,
};
