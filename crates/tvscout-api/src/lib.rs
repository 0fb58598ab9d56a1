//! API client library for tvscout.
//!
//! Provides the TMDB API client and the discover pipeline built on top of it:
//! filter criteria, the season/episode post-filter, the search orchestrator
//! and typeahead helpers.

/// Discover criteria, post-filtering and search orchestration.
pub mod discover;

/// TMDB API client.
pub mod tmdb;
