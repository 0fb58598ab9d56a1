//! TV discover pipeline.
//!
//! Turns user criteria into a `discover/tv` query, enriches each candidate
//! with its details and refines the result locally by season/episode counts
//! and excluded genres.

mod criteria;
mod filter;
mod search;
mod typeahead;

pub use criteria::{CountBounds, Combinator, FilterCriteria, MAX_RATING, MIN_YEAR, ShowStatus};
pub use filter::{has_excluded_genre, passes_count_filters, passes_post_filter};
pub use search::{SearchOptions, SearchResult, search_shows};
pub use typeahead::{
    GenreFilter, KEYWORD_DEBOUNCE, KEYWORD_RESULT_LIMIT, KeywordDebouncer,
    MIN_KEYWORD_QUERY_CHARS, is_searchable_keyword_query, suggest_keywords,
};
