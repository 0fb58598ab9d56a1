//! Discover filter criteria and their translation to `discover/tv` parameters.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};

use crate::tmdb::DiscoverTvParams;

/// Earliest selectable first-air year.
pub const MIN_YEAR: i32 = 1910;

/// Upper end of the rating scale used by criteria (TMDB uses 0-10).
pub const MAX_RATING: u8 = 100;

/// Join semantics for multiple genre or keyword IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combinator {
    /// All IDs must match (`,`).
    #[default]
    And,
    /// Any ID may match (`|`).
    Or,
}

impl Combinator {
    /// Separator TMDB expects between IDs.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::And => ',',
            Self::Or => '|',
        }
    }

    /// Returns the other combinator.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
        }
    }
}

impl FromStr for Combinator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" | "," => Ok(Self::And),
            "or" | "|" => Ok(Self::Or),
            other => bail!("invalid combinator: {other} (expected and|or)"),
        }
    }
}

/// Series status as understood by `discover/tv` `with_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowStatus {
    /// Returning Series (0).
    ReturningSeries,
    /// Planned (1).
    Planned,
    /// In Production (2).
    InProduction,
    /// Ended (3).
    #[default]
    Ended,
    /// Cancelled (4).
    Cancelled,
    /// Pilot (5).
    Pilot,
}

impl ShowStatus {
    /// All statuses in TMDB code order.
    pub const ALL: [Self; 6] = [
        Self::ReturningSeries,
        Self::Planned,
        Self::InProduction,
        Self::Ended,
        Self::Cancelled,
        Self::Pilot,
    ];

    /// TMDB status code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::ReturningSeries => 0,
            Self::Planned => 1,
            Self::InProduction => 2,
            Self::Ended => 3,
            Self::Cancelled => 4,
            Self::Pilot => 5,
        }
    }

    /// Human-readable label, matching TMDB's detail `status` strings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReturningSeries => "Returning Series",
            Self::Planned => "Planned",
            Self::InProduction => "In Production",
            Self::Ended => "Ended",
            Self::Cancelled => "Cancelled",
            Self::Pilot => "Pilot",
        }
    }

    /// Next status in code order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = usize::from(self.code())
            .saturating_add(1)
            .checked_rem(Self::ALL.len())
            .unwrap_or(0);
        Self::ALL.get(idx).copied().unwrap_or_default()
    }

    /// Previous status in code order, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        let idx = usize::from(self.code())
            .saturating_add(len.saturating_sub(1))
            .checked_rem(len)
            .unwrap_or(0);
        Self::ALL.get(idx).copied().unwrap_or_default()
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShowStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "0" | "returning" | "returning-series" => Ok(Self::ReturningSeries),
            "1" | "planned" => Ok(Self::Planned),
            "2" | "in-production" => Ok(Self::InProduction),
            "3" | "ended" => Ok(Self::Ended),
            "4" | "cancelled" | "canceled" => Ok(Self::Cancelled),
            "5" | "pilot" => Ok(Self::Pilot),
            _ => bail!(
                "invalid status: {s} (expected returning|planned|in-production|ended|cancelled|pilot)"
            ),
        }
    }
}

/// Count bounds for one dimension (seasons or episodes).
///
/// Both ends are exclusive: a count passes when `min < count` and,
/// if `max` is set, `count < max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountBounds {
    /// Lower bound (exclusive).
    pub min: u32,
    /// Optional upper bound (exclusive).
    pub max: Option<u32>,
}

impl CountBounds {
    /// Creates new bounds.
    #[must_use]
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Checks that `max`, when present, is strictly greater than `min`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the dimension when the bounds are inverted or equal.
    pub fn validate(&self, dimension: &str) -> Result<()> {
        if let Some(max) = self.max
            && max <= self.min
        {
            bail!(
                "{dimension} max ({max}) must be greater than {dimension} min ({})",
                self.min
            );
        }
        Ok(())
    }
}

/// User-chosen discover criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Join semantics for `genres`.
    pub genre_combinator: Combinator,
    /// Join semantics for `keywords`.
    pub keyword_combinator: Combinator,
    /// Season count bounds (local post-filter).
    pub seasons: CountBounds,
    /// Episode count bounds (local post-filter).
    pub episodes: CountBounds,
    /// Minimum rating on the 0-100 scale.
    pub rating_min: u8,
    /// Maximum rating on the 0-100 scale.
    pub rating_max: u8,
    /// First year of the first-air-date range.
    pub year_min: i32,
    /// Last year of the first-air-date range.
    pub year_max: i32,
    /// Genre IDs to include.
    pub genres: BTreeSet<u32>,
    /// Genre IDs to drop after fetching details.
    pub excluded_genres: BTreeSet<u32>,
    /// Keyword IDs to include.
    pub keywords: BTreeSet<u64>,
    /// Series status.
    pub status: ShowStatus,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::for_year(Local::now().year())
    }
}

impl FilterCriteria {
    /// Form defaults with `current_year` as the upper year bound.
    #[must_use]
    pub const fn for_year(current_year: i32) -> Self {
        Self {
            genre_combinator: Combinator::And,
            keyword_combinator: Combinator::And,
            seasons: CountBounds::new(0, None),
            episodes: CountBounds::new(0, None),
            rating_min: 0,
            rating_max: MAX_RATING,
            year_min: MIN_YEAR,
            year_max: current_year,
            genres: BTreeSet::new(),
            excluded_genres: BTreeSet::new(),
            keywords: BTreeSet::new(),
            status: ShowStatus::Ended,
        }
    }

    /// Validates the bound invariants.
    ///
    /// Inverted year or rating ranges are accepted and only logged.
    ///
    /// # Errors
    ///
    /// Returns an error if a max count bound is not greater than its min,
    /// or a rating is above 100.
    pub fn validate(&self) -> Result<()> {
        self.seasons.validate("season")?;
        self.episodes.validate("episode")?;
        if self.rating_min > MAX_RATING || self.rating_max > MAX_RATING {
            bail!(
                "rating must be within 0..={MAX_RATING} (got {}..{})",
                self.rating_min,
                self.rating_max
            );
        }
        if self.year_min > self.year_max {
            tracing::warn!(
                year_min = self.year_min,
                year_max = self.year_max,
                "year range is inverted; discover will return nothing"
            );
        }
        if self.rating_min > self.rating_max {
            tracing::warn!(
                rating_min = self.rating_min,
                rating_max = self.rating_max,
                "rating range is inverted"
            );
        }
        Ok(())
    }

    /// Builds the first-page `discover/tv` parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a year is outside chrono's supported range.
    pub fn to_discover_params(&self) -> Result<DiscoverTvParams> {
        let first_air_date_gte = NaiveDate::from_ymd_opt(self.year_min, 1, 1)
            .with_context(|| format!("invalid year_min: {}", self.year_min))?;
        let first_air_date_lte = NaiveDate::from_ymd_opt(self.year_max, 12, 31)
            .with_context(|| format!("invalid year_max: {}", self.year_max))?;

        Ok(DiscoverTvParams {
            with_status: self.status.code(),
            first_air_date_gte,
            first_air_date_lte,
            vote_average_gte: to_vote_average(self.rating_min),
            with_genres: join_ids(&self.genres, self.genre_combinator),
            with_keywords: join_ids(&self.keywords, self.keyword_combinator),
            page: 1,
        })
    }
}

/// Maps a 0-100 rating onto TMDB's 0-10 `vote_average`.
fn to_vote_average(rating: u8) -> f64 {
    f64::from(rating) / 10.0
}

/// Joins IDs with the combinator separator; `None` when there are none.
fn join_ids<T: fmt::Display>(ids: &BTreeSet<T>, combinator: Combinator) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    let separator = combinator.separator().to_string();
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&separator);
    Some(joined)
}
