//! Typeahead helpers: local genre filtering and debounced keyword search.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::instrument;

use crate::tmdb::{LocalTmdbApi, TmdbGenre, TmdbKeyword};

/// Quiet period before a keyword query is sent.
pub const KEYWORD_DEBOUNCE: Duration = Duration::from_millis(500);

/// Maximum keyword suggestions kept from one search.
pub const KEYWORD_RESULT_LIMIT: usize = 14;

/// Queries must be longer than this many characters to hit the network.
pub const MIN_KEYWORD_QUERY_CHARS: usize = 2;

/// Live, case-insensitive substring view over a shared genre list.
///
/// Recomputed on every change of the term. Several filters may share
/// one source list (included and excluded genre pickers).
#[derive(Debug, Clone)]
pub struct GenreFilter {
    /// Source genres.
    genres: Arc<[TmdbGenre]>,
    /// Current search term.
    term: String,
    /// Indices into `genres` matching `term`.
    matches: Vec<usize>,
}

impl GenreFilter {
    /// Creates a filter with an empty term (everything matches).
    #[must_use]
    pub fn new(genres: Arc<[TmdbGenre]>) -> Self {
        let mut filter = Self {
            genres,
            term: String::new(),
            matches: Vec::new(),
        };
        filter.recompute();
        filter
    }

    /// Replaces the source list, keeping the term.
    pub fn set_source(&mut self, genres: Arc<[TmdbGenre]>) {
        self.genres = genres;
        self.recompute();
    }

    /// Current term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Replaces the term.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.recompute();
    }

    /// Appends a character to the term.
    pub fn push(&mut self, ch: char) {
        self.term.push(ch);
        self.recompute();
    }

    /// Removes the last character from the term.
    pub fn pop(&mut self) {
        self.term.pop();
        self.recompute();
    }

    /// Genres matching the current term, in source order.
    pub fn matching(&self) -> impl Iterator<Item = &TmdbGenre> {
        self.matches.iter().filter_map(|&i| self.genres.get(i))
    }

    /// Number of matching genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether nothing matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matching genre at `index` within the filtered view.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TmdbGenre> {
        self.matches.get(index).and_then(|&i| self.genres.get(i))
    }

    fn recompute(&mut self) {
        let needle = self.term.to_lowercase();
        self.matches = self
            .genres
            .iter()
            .enumerate()
            .filter(|(_, g)| g.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
    }
}

/// Returns whether `query` is long enough to be sent to the keyword search.
#[must_use]
pub fn is_searchable_keyword_query(query: &str) -> bool {
    query.chars().count() > MIN_KEYWORD_QUERY_CHARS
}

/// Fetches keyword suggestions for `query`.
///
/// Queries of two characters or fewer return an empty list without
/// touching the network. Results are capped at [`KEYWORD_RESULT_LIMIT`].
///
/// # Errors
///
/// Returns an error if the keyword search request fails.
#[instrument(skip_all)]
pub async fn suggest_keywords(
    api: &(impl LocalTmdbApi + Sync),
    query: &str,
) -> Result<Vec<TmdbKeyword>> {
    if !is_searchable_keyword_query(query) {
        tracing::debug!(chars = query.chars().count(), "keyword query too short");
        return Ok(Vec::new());
    }

    let response = api
        .search_keywords(query)
        .await
        .with_context(|| format!("keyword search failed: {query}"))?;

    let mut keywords = response.results;
    keywords.truncate(KEYWORD_RESULT_LIMIT);
    tracing::debug!(
        returned = keywords.len(),
        total = response.total_results,
        "keyword suggestions"
    );
    Ok(keywords)
}

/// Trailing-edge debouncer for keyword input.
///
/// Each keystroke restarts the quiet period; the latest query is released
/// once no input arrived for the configured delay. Time is passed in so the
/// caller's event loop decides when to check.
#[derive(Debug, Clone)]
pub struct KeywordDebouncer {
    /// Quiet period.
    delay: Duration,
    /// Latest query and the instant it becomes ready.
    pending: Option<(String, Instant)>,
}

impl Default for KeywordDebouncer {
    fn default() -> Self {
        Self::new(KEYWORD_DEBOUNCE)
    }
}

impl KeywordDebouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records new input at `now`, restarting the quiet period.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        let ready_at = now.checked_add(self.delay).unwrap_or(now);
        self.pending = Some((query.into(), ready_at));
    }

    /// Whether a query is waiting for its quiet period to end.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending query if its quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, ready_at)| now >= *ready_at);
        if ready {
            self.pending.take().map(|(query, _)| query)
        } else {
            None
        }
    }

    /// Drops any pending query.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
