//! Local post-filter for criteria the discover endpoint cannot express.

use std::collections::BTreeSet;

use super::criteria::{CountBounds, FilterCriteria};
use crate::tmdb::TmdbTvDetails;

impl CountBounds {
    /// Returns whether `count` lies strictly inside the bounds.
    ///
    /// A count equal to `min` or `max` is rejected.
    #[must_use]
    pub const fn accepts(self, count: u32) -> bool {
        let min_satisfied = count > self.min;
        match self.max {
            None => min_satisfied,
            Some(max) => min_satisfied && count < max,
        }
    }
}

/// Combined season/episode predicate.
#[must_use]
pub const fn passes_count_filters(
    episode_count: u32,
    season_count: u32,
    episodes: CountBounds,
    seasons: CountBounds,
) -> bool {
    episodes.accepts(episode_count) && seasons.accepts(season_count)
}

/// Returns whether any of the show's genres is in `excluded`.
#[must_use]
pub fn has_excluded_genre(details: &TmdbTvDetails, excluded: &BTreeSet<u32>) -> bool {
    details.genres.iter().any(|g| excluded.contains(&g.id))
}

/// Full post-filter: count bounds, then excluded genres.
#[must_use]
pub fn passes_post_filter(details: &TmdbTvDetails, criteria: &FilterCriteria) -> bool {
    passes_count_filters(
        details.number_of_episodes,
        details.number_of_seasons,
        criteria.episodes,
        criteria.seasons,
    ) && !has_excluded_genre(details, &criteria.excluded_genres)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn make_details(episodes: u32, seasons: u32, genre_ids: &[u32]) -> TmdbTvDetails {
        let json = serde_json::json!({
            "id": 1,
            "name": "Show",
            "number_of_episodes": episodes,
            "number_of_seasons": seasons,
            "genres": genre_ids
                .iter()
                .map(|id| serde_json::json!({"id": id, "name": format!("g{id}")}))
                .collect::<Vec<_>>(),
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_min_only_is_strict() {
        // Arrange
        let bounds = CountBounds::new(0, None);

        // Act & Assert
        assert!(bounds.accepts(5));
        assert!(!bounds.accepts(0));
    }

    #[test]
    fn test_min_only_matches_greater_than_for_all_counts() {
        // Arrange & Act & Assert
        for min in 0u32..12 {
            let bounds = CountBounds::new(min, None);
            for count in 0..15 {
                assert_eq!(bounds.accepts(count), count > min, "min={min} count={count}");
            }
        }
    }

    #[test]
    fn test_min_and_max_match_open_interval_for_all_counts() {
        // Arrange & Act & Assert
        for min in 0u32..8 {
            for max in min.saturating_add(1)..12 {
                let bounds = CountBounds::new(min, Some(max));
                for count in 0..15 {
                    assert_eq!(
                        bounds.accepts(count),
                        count > min && count < max,
                        "min={min} max={max} count={count}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_max_is_exclusive() {
        // Arrange
        let bounds = CountBounds::new(2, Some(10));

        // Act & Assert
        assert!(!bounds.accepts(10));
        assert!(bounds.accepts(9));
        assert!(!bounds.accepts(2));
        assert!(bounds.accepts(3));
    }

    #[test]
    fn test_combined_is_logical_and() {
        // Arrange
        let episodes = CountBounds::new(10, Some(100));
        let seasons = CountBounds::new(1, Some(5));

        // Act & Assert
        assert!(passes_count_filters(50, 3, episodes, seasons));
        assert!(!passes_count_filters(50, 5, episodes, seasons));
        assert!(!passes_count_filters(10, 3, episodes, seasons));
        assert!(!passes_count_filters(100, 6, episodes, seasons));
    }

    #[test]
    fn test_post_filter_drops_excluded_genre() {
        // Arrange
        let criteria = FilterCriteria {
            excluded_genres: BTreeSet::from([16]),
            ..FilterCriteria::for_year(2024)
        };
        let animated = make_details(24, 2, &[16, 35]);
        let live_action = make_details(24, 2, &[35]);

        // Act & Assert
        assert!(!passes_post_filter(&animated, &criteria));
        assert!(passes_post_filter(&live_action, &criteria));
    }

    #[test]
    fn test_post_filter_applies_count_bounds() {
        // Arrange
        let criteria = FilterCriteria {
            seasons: CountBounds::new(2, None),
            ..FilterCriteria::for_year(2024)
        };
        let details = make_details(24, 2, &[]);

        // Act & Assert
        assert!(!passes_post_filter(&details, &criteria));
    }
}
