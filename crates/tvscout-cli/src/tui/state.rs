//! Discover form state management.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tvscout_api::discover::{
    CountBounds, FilterCriteria, GenreFilter, KeywordDebouncer, MAX_RATING, MIN_YEAR,
    SearchResult,
};
use tvscout_api::tmdb::{TmdbGenre, TmdbKeyword};

/// Rating change per left/right key press.
const RATING_STEP: u8 = 5;

/// Identifies which pane has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Scalar criteria fields.
    Criteria,
    /// Genre picker for `with_genres`.
    IncludedGenres,
    /// Genre picker for the excluded set.
    ExcludedGenres,
    /// Keyword typeahead.
    Keywords,
    /// Search results.
    Results,
}

impl Pane {
    /// Focus order for Tab.
    const ORDER: [Self; 5] = [
        Self::Criteria,
        Self::IncludedGenres,
        Self::ExcludedGenres,
        Self::Keywords,
        Self::Results,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// Next pane in focus order (wraps).
    #[must_use]
    pub fn next(self) -> Self {
        let idx = self
            .position()
            .saturating_add(1)
            .checked_rem(Self::ORDER.len())
            .unwrap_or(0);
        Self::ORDER.get(idx).copied().unwrap_or(Self::Criteria)
    }

    /// Previous pane in focus order (wraps).
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = self
            .position()
            .checked_sub(1)
            .unwrap_or(Self::ORDER.len().saturating_sub(1));
        Self::ORDER.get(idx).copied().unwrap_or(Self::Criteria)
    }
}

/// Editable scalar field in the criteria pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaField {
    /// AND/OR for genres.
    GenreCombinator,
    /// AND/OR for keywords.
    KeywordCombinator,
    /// Season lower bound.
    SeasonMin,
    /// Season upper bound.
    SeasonMax,
    /// Episode lower bound.
    EpisodeMin,
    /// Episode upper bound.
    EpisodeMax,
    /// Rating lower bound.
    RatingMin,
    /// Rating upper bound.
    RatingMax,
    /// First-air year lower bound.
    YearMin,
    /// First-air year upper bound.
    YearMax,
    /// Series status.
    Status,
}

impl CriteriaField {
    /// Display order in the criteria pane.
    pub const ALL: [Self; 11] = [
        Self::GenreCombinator,
        Self::KeywordCombinator,
        Self::SeasonMin,
        Self::SeasonMax,
        Self::EpisodeMin,
        Self::EpisodeMax,
        Self::RatingMin,
        Self::RatingMax,
        Self::YearMin,
        Self::YearMax,
        Self::Status,
    ];

    /// Field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GenreCombinator => "Genres match",
            Self::KeywordCombinator => "Keywords match",
            Self::SeasonMin => "Seasons >",
            Self::SeasonMax => "Seasons <",
            Self::EpisodeMin => "Episodes >",
            Self::EpisodeMax => "Episodes <",
            Self::RatingMin => "Rating from",
            Self::RatingMax => "Rating to",
            Self::YearMin => "Aired from",
            Self::YearMax => "Aired to",
            Self::Status => "Status",
        }
    }
}

/// Genre list with a typeahead term and a cursor.
#[derive(Debug, Clone)]
pub struct GenrePicker {
    /// Filtered genre view.
    pub filter: GenreFilter,
    /// Cursor within the filtered view.
    pub cursor: usize,
}

impl GenrePicker {
    fn new(genres: Arc<[TmdbGenre]>) -> Self {
        Self {
            filter: GenreFilter::new(genres),
            cursor: 0,
        }
    }

    /// Genre under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&TmdbGenre> {
        self.filter.get(self.cursor)
    }

    fn push(&mut self, ch: char) {
        self.filter.push(ch);
        self.cursor = 0;
    }

    fn pop(&mut self) {
        self.filter.pop();
        self.cursor = 0;
    }

    const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.cursor.saturating_add(1) < self.filter.len() {
            self.cursor = self.cursor.saturating_add(1);
        }
    }
}

/// Keyword typeahead: query, debounced suggestions and the selected set.
#[derive(Debug, Clone, Default)]
pub struct KeywordPicker {
    /// Current query text.
    pub query: String,
    /// Latest suggestions for the query.
    pub suggestions: Vec<TmdbKeyword>,
    /// Cursor within `suggestions`.
    pub cursor: usize,
    /// Selected keywords by ID.
    pub selected: BTreeMap<u64, String>,
    /// Delays remote lookups until typing pauses.
    pub debouncer: KeywordDebouncer,
}

impl KeywordPicker {
    /// Appends to the query and restarts the debounce window.
    pub fn push(&mut self, ch: char, now: Instant) {
        self.query.push(ch);
        self.debouncer.input(self.query.clone(), now);
    }

    /// Removes the last query character and restarts the debounce window.
    pub fn pop(&mut self, now: Instant) {
        self.query.pop();
        self.debouncer.input(self.query.clone(), now);
    }

    /// Replaces the suggestion list.
    pub fn set_suggestions(&mut self, suggestions: Vec<TmdbKeyword>) {
        self.suggestions = suggestions;
        self.cursor = 0;
    }

    /// Selected keywords sorted by name.
    #[must_use]
    pub fn selected_sorted(&self) -> Vec<(u64, &str)> {
        let mut sorted: Vec<(u64, &str)> = self
            .selected
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        sorted.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));
        sorted
    }

    /// Adds or removes the suggestion under the cursor.
    fn toggle_current(&mut self) {
        let Some(keyword) = self.suggestions.get(self.cursor) else {
            return;
        };
        if self.selected.remove(&keyword.id).is_none() {
            self.selected.insert(keyword.id, keyword.name.clone());
        }
    }

    const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.cursor.saturating_add(1) < self.suggestions.len() {
            self.cursor = self.cursor.saturating_add(1);
        }
    }
}

/// State for the discover form TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FormState {
    /// Criteria being edited.
    pub criteria: FilterCriteria,
    /// Focused pane.
    pub focus: Pane,
    /// Selected row in the criteria pane.
    pub field_cursor: usize,
    /// Included genre picker.
    pub included: GenrePicker,
    /// Excluded genre picker.
    pub excluded: GenrePicker,
    /// Keyword typeahead.
    pub keywords: KeywordPicker,
    /// Last search result.
    pub results: Option<SearchResult>,
    /// Selected row in the results pane.
    pub result_cursor: usize,
    /// Status line text.
    pub status: String,
    /// Upper bound for the year fields.
    current_year: i32,
    /// Genre source shared by both pickers.
    genres: Arc<[TmdbGenre]>,
}

impl FormState {
    /// Creates a form with default criteria.
    #[must_use]
    pub fn new(genres: Vec<TmdbGenre>, current_year: i32) -> Self {
        Self::with_genres(genres.into(), current_year)
    }

    fn with_genres(genres: Arc<[TmdbGenre]>, current_year: i32) -> Self {
        Self {
            criteria: FilterCriteria::for_year(current_year),
            focus: Pane::Criteria,
            field_cursor: 0,
            included: GenrePicker::new(Arc::clone(&genres)),
            excluded: GenrePicker::new(Arc::clone(&genres)),
            keywords: KeywordPicker::default(),
            results: None,
            result_cursor: 0,
            status: String::from("Ready"),
            current_year,
            genres,
        }
    }

    /// Restores default criteria and clears pickers and results.
    pub fn reset(&mut self) {
        *self = Self::with_genres(Arc::clone(&self.genres), self.current_year);
        self.status = String::from("Form reset");
    }

    /// Field under the criteria cursor.
    #[must_use]
    pub fn current_field(&self) -> CriteriaField {
        CriteriaField::ALL
            .get(self.field_cursor)
            .copied()
            .unwrap_or(CriteriaField::GenreCombinator)
    }

    /// Display value for a criteria field.
    #[must_use]
    pub fn field_value(&self, field: CriteriaField) -> String {
        let c = &self.criteria;
        let open_max = |max: Option<u32>| max.map_or_else(|| String::from("-"), |m| m.to_string());
        match field {
            CriteriaField::GenreCombinator => c.genre_combinator.to_string().to_uppercase(),
            CriteriaField::KeywordCombinator => c.keyword_combinator.to_string().to_uppercase(),
            CriteriaField::SeasonMin => c.seasons.min.to_string(),
            CriteriaField::SeasonMax => open_max(c.seasons.max),
            CriteriaField::EpisodeMin => c.episodes.min.to_string(),
            CriteriaField::EpisodeMax => open_max(c.episodes.max),
            CriteriaField::RatingMin => c.rating_min.to_string(),
            CriteriaField::RatingMax => c.rating_max.to_string(),
            CriteriaField::YearMin => c.year_min.to_string(),
            CriteriaField::YearMax => c.year_max.to_string(),
            CriteriaField::Status => c.status.label().to_owned(),
        }
    }

    /// Moves focus to the next pane.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Moves focus to the previous pane.
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Moves the cursor up in the focused pane.
    pub const fn move_up(&mut self) {
        match self.focus {
            Pane::Criteria => self.field_cursor = self.field_cursor.saturating_sub(1),
            Pane::IncludedGenres => self.included.move_up(),
            Pane::ExcludedGenres => self.excluded.move_up(),
            Pane::Keywords => self.keywords.move_up(),
            Pane::Results => self.result_cursor = self.result_cursor.saturating_sub(1),
        }
    }

    /// Moves the cursor down in the focused pane.
    pub fn move_down(&mut self) {
        match self.focus {
            Pane::Criteria => {
                if self.field_cursor.saturating_add(1) < CriteriaField::ALL.len() {
                    self.field_cursor = self.field_cursor.saturating_add(1);
                }
            }
            Pane::IncludedGenres => self.included.move_down(),
            Pane::ExcludedGenres => self.excluded.move_down(),
            Pane::Keywords => self.keywords.move_down(),
            Pane::Results => {
                let count = self.results.as_ref().map_or(0, |r| r.shows.len());
                if self.result_cursor.saturating_add(1) < count {
                    self.result_cursor = self.result_cursor.saturating_add(1);
                }
            }
        }
    }

    /// Steps the current criteria field forward (`right`) or backward.
    pub fn adjust(&mut self, forward: bool) {
        let current_year = self.current_year;
        let field = self.current_field();
        let c = &mut self.criteria;
        match field {
            CriteriaField::GenreCombinator => c.genre_combinator = c.genre_combinator.toggled(),
            CriteriaField::KeywordCombinator => {
                c.keyword_combinator = c.keyword_combinator.toggled();
            }
            CriteriaField::SeasonMin => step_min(&mut c.seasons, forward),
            CriteriaField::SeasonMax => step_max(&mut c.seasons, forward),
            CriteriaField::EpisodeMin => step_min(&mut c.episodes, forward),
            CriteriaField::EpisodeMax => step_max(&mut c.episodes, forward),
            CriteriaField::RatingMin => {
                c.rating_min = if forward {
                    c.rating_min.saturating_add(RATING_STEP).min(MAX_RATING)
                } else {
                    c.rating_min.saturating_sub(RATING_STEP)
                };
                c.rating_max = c.rating_max.max(c.rating_min);
            }
            CriteriaField::RatingMax => {
                c.rating_max = if forward {
                    c.rating_max.saturating_add(RATING_STEP).min(MAX_RATING)
                } else {
                    c.rating_max.saturating_sub(RATING_STEP).max(c.rating_min)
                };
            }
            CriteriaField::YearMin => {
                c.year_min = if forward {
                    c.year_min.saturating_add(1).min(c.year_max)
                } else {
                    c.year_min.saturating_sub(1).max(MIN_YEAR)
                };
            }
            CriteriaField::YearMax => {
                c.year_max = if forward {
                    c.year_max.saturating_add(1).min(current_year)
                } else {
                    c.year_max.saturating_sub(1).max(c.year_min)
                };
            }
            CriteriaField::Status => {
                c.status = if forward {
                    c.status.next()
                } else {
                    c.status.prev()
                };
            }
        }
    }

    /// Resets the current field's upper bound to "unbounded".
    pub fn clear_current_max(&mut self) {
        match self.current_field() {
            CriteriaField::SeasonMax => self.criteria.seasons.max = None,
            CriteriaField::EpisodeMax => self.criteria.episodes.max = None,
            CriteriaField::RatingMax => self.criteria.rating_max = MAX_RATING,
            CriteriaField::YearMax => self.criteria.year_max = self.current_year,
            _ => {}
        }
    }

    /// Toggles the item under the cursor in a picker pane.
    ///
    /// A genre lives in at most one of the included and excluded sets.
    pub fn toggle_current(&mut self) {
        match self.focus {
            Pane::IncludedGenres => {
                if let Some(id) = self.included.current().map(|g| g.id) {
                    toggle_genre(&mut self.criteria, id, true);
                }
            }
            Pane::ExcludedGenres => {
                if let Some(id) = self.excluded.current().map(|g| g.id) {
                    toggle_genre(&mut self.criteria, id, false);
                }
            }
            Pane::Keywords => {
                self.keywords.toggle_current();
                self.criteria.keywords = self.keywords.selected.keys().copied().collect();
            }
            Pane::Criteria | Pane::Results => {}
        }
    }

    /// Feeds a typed character to the focused typeahead.
    pub fn type_char(&mut self, ch: char, now: Instant) {
        match self.focus {
            Pane::IncludedGenres => self.included.push(ch),
            Pane::ExcludedGenres => self.excluded.push(ch),
            Pane::Keywords => self.keywords.push(ch, now),
            Pane::Criteria | Pane::Results => {}
        }
    }

    /// Deletes the last character of the focused typeahead.
    pub fn backspace(&mut self, now: Instant) {
        match self.focus {
            Pane::IncludedGenres => self.included.pop(),
            Pane::ExcludedGenres => self.excluded.pop(),
            Pane::Keywords => self.keywords.pop(now),
            Pane::Criteria | Pane::Results => {}
        }
    }

    /// Stores a finished search.
    pub fn set_results(&mut self, result: SearchResult) {
        self.status = format!(
            "{} of {} candidates matched ({} total on TMDB)",
            result.shows.len(),
            result.candidates,
            result.total_results
        );
        self.results = Some(result);
        self.result_cursor = 0;
    }

    /// Shows an error in the status line.
    pub fn set_error(&mut self, err: &anyhow::Error) {
        self.status = format!("Error: {err:#}");
    }
}

fn step_min(bounds: &mut CountBounds, forward: bool) {
    bounds.min = if forward {
        bounds.min.saturating_add(1)
    } else {
        bounds.min.saturating_sub(1)
    };
    if bounds.max.is_some_and(|max| max <= bounds.min) {
        bounds.max = Some(bounds.min.saturating_add(1));
    }
}

fn step_max(bounds: &mut CountBounds, forward: bool) {
    bounds.max = match (bounds.max, forward) {
        (None, true) => Some(bounds.min.saturating_add(1)),
        (None, false) => None,
        (Some(max), true) => Some(max.saturating_add(1)),
        (Some(max), false) => {
            let lowered = max.saturating_sub(1);
            (lowered > bounds.min).then_some(lowered)
        }
    };
}

fn toggle_genre(criteria: &mut FilterCriteria, id: u32, include: bool) {
    let (target, other) = if include {
        (&mut criteria.genres, &mut criteria.excluded_genres)
    } else {
        (&mut criteria.excluded_genres, &mut criteria.genres)
    };
    if !target.remove(&id) {
        target.insert(id);
        other.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::BTreeSet;

    use tvscout_api::discover::{Combinator, ShowStatus};

    use super::*;

    fn genre(id: u32, name: &str) -> TmdbGenre {
        TmdbGenre {
            id,
            name: String::from(name),
        }
    }

    fn keyword(id: u64, name: &str) -> TmdbKeyword {
        TmdbKeyword {
            id,
            name: String::from(name),
        }
    }

    fn sample_state() -> FormState {
        FormState::new(
            vec![
                genre(10759, "Action & Adventure"),
                genre(16, "Animation"),
                genre(35, "Comedy"),
                genre(18, "Drama"),
            ],
            2024,
        )
    }

    fn select_field(state: &mut FormState, field: CriteriaField) {
        state.focus = Pane::Criteria;
        state.field_cursor = CriteriaField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap();
    }

    #[test]
    fn test_new_uses_form_defaults() {
        // Arrange & Act
        let state = sample_state();

        // Assert
        assert_eq!(state.criteria, FilterCriteria::for_year(2024));
        assert_eq!(state.focus, Pane::Criteria);
        assert!(state.results.is_none());
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        // Arrange
        let mut state = sample_state();

        // Act
        for _ in 0..5 {
            state.focus_next();
        }
        let after_full_cycle = state.focus;
        state.focus_prev();

        // Assert
        assert_eq!(after_full_cycle, Pane::Criteria);
        assert_eq!(state.focus, Pane::Results);
    }

    #[test]
    fn test_season_max_never_reaches_min() {
        // Arrange
        let mut state = sample_state();
        select_field(&mut state, CriteriaField::SeasonMax);

        // Act
        state.adjust(true);
        let first = state.criteria.seasons.max;
        state.adjust(false);

        // Assert
        assert_eq!(first, Some(1));
        assert_eq!(state.criteria.seasons.max, None);
        assert!(state.criteria.validate().is_ok());
    }

    #[test]
    fn test_raising_min_pushes_max_up() {
        // Arrange
        let mut state = sample_state();
        state.criteria.episodes = CountBounds::new(3, Some(4));
        select_field(&mut state, CriteriaField::EpisodeMin);

        // Act
        state.adjust(true);

        // Assert
        assert_eq!(state.criteria.episodes, CountBounds::new(4, Some(5)));
    }

    #[test]
    fn test_rating_steps_are_clamped() {
        // Arrange
        let mut state = sample_state();
        select_field(&mut state, CriteriaField::RatingMax);

        // Act
        state.adjust(true);
        let at_top = state.criteria.rating_max;
        select_field(&mut state, CriteriaField::RatingMin);
        state.adjust(false);

        // Assert
        assert_eq!(at_top, MAX_RATING);
        assert_eq!(state.criteria.rating_min, 0);
    }

    #[test]
    fn test_year_bounds_stay_in_range() {
        // Arrange
        let mut state = sample_state();
        select_field(&mut state, CriteriaField::YearMax);

        // Act
        state.adjust(true);
        let max_after_increment = state.criteria.year_max;
        select_field(&mut state, CriteriaField::YearMin);
        state.adjust(false);

        // Assert
        assert_eq!(max_after_increment, 2024);
        assert_eq!(state.criteria.year_min, MIN_YEAR);
    }

    #[test]
    fn test_status_and_combinator_cycle() {
        // Arrange
        let mut state = sample_state();

        // Act
        select_field(&mut state, CriteriaField::Status);
        state.adjust(true);
        select_field(&mut state, CriteriaField::GenreCombinator);
        state.adjust(false);

        // Assert
        assert_eq!(state.criteria.status, ShowStatus::Ended.next());
        assert_eq!(state.criteria.genre_combinator, Combinator::Or);
    }

    #[test]
    fn test_clear_max_restores_unbounded() {
        // Arrange
        let mut state = sample_state();
        state.criteria.seasons = CountBounds::new(1, Some(4));
        state.criteria.rating_max = 60;
        select_field(&mut state, CriteriaField::SeasonMax);

        // Act
        state.clear_current_max();
        select_field(&mut state, CriteriaField::RatingMax);
        state.clear_current_max();

        // Assert
        assert_eq!(state.criteria.seasons.max, None);
        assert_eq!(state.criteria.rating_max, MAX_RATING);
    }

    #[test]
    fn test_genre_typeahead_narrows_and_toggles() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::IncludedGenres;
        let now = Instant::now();

        // Act
        state.type_char('d', now);
        state.type_char('r', now);
        state.toggle_current();

        // Assert
        assert_eq!(state.included.filter.len(), 1);
        assert_eq!(state.criteria.genres, BTreeSet::from([18]));
        assert!(!state.keywords.debouncer.is_pending());
    }

    #[test]
    fn test_genre_moves_between_included_and_excluded() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::IncludedGenres;
        state.included.cursor = 1;
        state.toggle_current();

        // Act
        state.focus = Pane::ExcludedGenres;
        state.excluded.cursor = 1;
        state.toggle_current();

        // Assert
        assert!(state.criteria.genres.is_empty());
        assert_eq!(state.criteria.excluded_genres, BTreeSet::from([16]));
    }

    #[test]
    fn test_keyword_typing_arms_debouncer() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::Keywords;
        let start = Instant::now();

        // Act
        for ch in "time".chars() {
            state.type_char(ch, start);
        }

        // Assert
        assert!(state.keywords.debouncer.is_pending());
        assert_eq!(state.keywords.debouncer.poll(start), None);
    }

    #[test]
    fn test_keyword_toggle_syncs_criteria_and_sorts_by_name() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::Keywords;
        state.keywords.set_suggestions(vec![
            keyword(4379, "time travel"),
            keyword(9882, "space"),
        ]);

        // Act
        state.toggle_current();
        state.move_down();
        state.toggle_current();

        // Assert
        assert_eq!(state.criteria.keywords, BTreeSet::from([4379, 9882]));
        assert_eq!(
            state.keywords.selected_sorted(),
            vec![(9882, "space"), (4379, "time travel")]
        );
    }

    #[test]
    fn test_keyword_toggle_twice_removes() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::Keywords;
        state.keywords.set_suggestions(vec![keyword(4379, "time travel")]);

        // Act
        state.toggle_current();
        state.toggle_current();

        // Assert
        assert!(state.criteria.keywords.is_empty());
        assert!(state.keywords.selected.is_empty());
    }

    #[test]
    fn test_reset_restores_defaults_and_keeps_genres() {
        // Arrange
        let mut state = sample_state();
        state.criteria.rating_min = 70;
        state.focus = Pane::IncludedGenres;
        state.type_char('c', Instant::now());

        // Act
        state.reset();

        // Assert
        assert_eq!(state.criteria, FilterCriteria::for_year(2024));
        assert_eq!(state.included.filter.len(), 4);
        assert_eq!(state.focus, Pane::Criteria);
        assert_eq!(state.status, "Form reset");
    }

    #[test]
    fn test_set_results_updates_status() {
        // Arrange
        let mut state = sample_state();
        let result = SearchResult {
            shows: Vec::new(),
            candidates: 20,
            total_results: 231,
        };

        // Act
        state.set_results(result);

        // Assert
        assert_eq!(state.status, "0 of 20 candidates matched (231 total on TMDB)");
        assert_eq!(state.result_cursor, 0);
    }

    #[test]
    fn test_set_error_includes_context_chain() {
        // Arrange
        let mut state = sample_state();
        let err = anyhow::anyhow!("HTTP 401").context("discover/tv request failed");

        // Act
        state.set_error(&err);

        // Assert
        assert_eq!(state.status, "Error: discover/tv request failed: HTTP 401");
    }
}
