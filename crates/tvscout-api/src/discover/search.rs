//! Discover search orchestration: remote query, detail enrichment, post-filter.

use std::pin::pin;

use anyhow::{Context, Result};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::instrument;

use super::criteria::FilterCriteria;
use super::filter::passes_post_filter;
use crate::tmdb::{LocalTmdbApi, TmdbTvDetails};

/// Tuning for [`search_shows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum detail requests in flight (`1` = strictly sequential).
    pub concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Shows that passed the post-filter, in discover order.
    pub shows: Vec<TmdbTvDetails>,
    /// Number of discover candidates examined (first page only).
    pub candidates: usize,
    /// Total matches reported by discover across all pages.
    pub total_results: u32,
}

/// Runs a discover search and refines it locally.
///
/// Fetches the first discover page, then the details of each candidate
/// (at most `options.concurrency` at a time, results kept in discover
/// order) and keeps the shows that pass the season/episode bounds and
/// the excluded-genre check.
///
/// # Errors
///
/// Returns an error if the criteria are invalid, the discover request
/// fails, or any detail request fails. A failed detail request aborts
/// the remaining fetches; no partial result is returned.
#[instrument(skip_all, fields(status = %criteria.status))]
pub async fn search_shows(
    api: &(impl LocalTmdbApi + Sync),
    criteria: &FilterCriteria,
    options: &SearchOptions,
) -> Result<SearchResult> {
    criteria.validate()?;
    let params = criteria.to_discover_params()?;

    let discover = api
        .discover_tv(&params)
        .await
        .context("discover/tv request failed")?;

    let ids: Vec<u64> = discover.results.iter().map(|c| c.id).collect();
    tracing::info!(
        candidates = ids.len(),
        total_results = discover.total_results,
        total_pages = discover.total_pages,
        "discover page fetched"
    );

    let concurrency = options.concurrency.max(1);
    let mut details = pin!(
        stream::iter(ids.iter().copied())
            .map(|id| async move {
                api.tv_details(id)
                    .await
                    .with_context(|| format!("failed to fetch details for TV series {id}"))
            })
            .buffered(concurrency)
    );

    let mut shows: Vec<TmdbTvDetails> = Vec::new();
    while let Some(show) = details.try_next().await? {
        if passes_post_filter(&show, criteria) {
            shows.push(show);
        } else {
            tracing::debug!(
                id = show.id,
                episodes = show.number_of_episodes,
                seasons = show.number_of_seasons,
                "rejected by post-filter"
            );
        }
    }

    tracing::info!(
        kept = shows.len(),
        candidates = ids.len(),
        "discover search completed"
    );

    Ok(SearchResult {
        shows,
        candidates: ids.len(),
        total_results: discover.total_results,
    })
}
