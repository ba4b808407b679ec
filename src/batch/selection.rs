//! Catalog filtering: genre set, then a deterministic prefix.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogEntry, Genre};

/// Default pause between consecutive items (1 second).
pub const DEFAULT_COURTESY_DELAY: Duration = Duration::from_secs(1);

/// Which catalog items a batch fetches and how politely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Keep at most this many items after genre filtering.
    pub max_items: Option<usize>,
    /// Keep only items whose key classifies into one of these genres.
    pub genres: Option<BTreeSet<Genre>>,
    /// Fixed pause between consecutive items.
    pub delay: Duration,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            max_items: None,
            genres: None,
            delay: DEFAULT_COURTESY_DELAY,
        }
    }
}

impl Selection {
    /// Limits the batch to the first `max_items` matching entries.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Restricts the batch to the given genres.
    #[must_use]
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.genres = Some(genres.into_iter().collect());
        self
    }

    /// Sets the courtesy delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the selected entries with their genres, in catalog order.
    ///
    /// The genre filter is applied first, then the result is truncated to
    /// `max_items`, so the selection is always a prefix of the filtered
    /// catalog.
    #[must_use]
    pub fn select<'a>(&self, catalog: &'a Catalog) -> Vec<(&'a CatalogEntry, Genre)> {
        let limit = self.max_items.unwrap_or(usize::MAX);
        catalog
            .classified()
            .filter(|(_, genre)| self.genres.as_ref().is_none_or(|set| set.contains(genre)))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{GenreClassifier, GenreRule};

    fn abc_catalog() -> Catalog {
        let classifier = GenreClassifier::new(
            vec![
                GenreRule::new("a", Genre::ThrillerMystery),
                GenreRule::new("b", Genre::ThrillerMystery),
                GenreRule::new("c", Genre::FantasySciFi),
            ],
            Genre::GeneralLiterature,
        );
        Catalog::new(
            vec![
                CatalogEntry::new("a", 100),
                CatalogEntry::new("b", 200),
                CatalogEntry::new("c", 300),
            ],
            classifier,
        )
        .unwrap()
    }

    fn keys(selected: &[(&CatalogEntry, Genre)]) -> Vec<String> {
        selected.iter().map(|(e, _)| e.key.clone()).collect()
    }

    #[test]
    fn test_default_selects_everything_in_order() {
        let catalog = abc_catalog();
        let selected = Selection::default().select(&catalog);
        assert_eq!(keys(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_genre_filter_then_max_items() {
        let catalog = abc_catalog();
        let selected = Selection::default()
            .with_genres([Genre::ThrillerMystery])
            .with_max_items(1)
            .select(&catalog);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0.key, "a");
        assert_eq!(selected[0].0.remote_id, 100);
        assert_eq!(selected[0].1, Genre::ThrillerMystery);
    }

    #[test]
    fn test_max_items_larger_than_filtered_returns_all() {
        let catalog = abc_catalog();
        let selected = Selection::default()
            .with_genres([Genre::ThrillerMystery])
            .with_max_items(10)
            .select(&catalog);
        assert_eq!(keys(&selected), vec!["a", "b"]);
    }

    #[test]
    fn test_max_items_zero_selects_nothing() {
        let catalog = abc_catalog();
        assert!(Selection::default().with_max_items(0).select(&catalog).is_empty());
    }

    #[test]
    fn test_empty_genre_set_selects_nothing() {
        let catalog = abc_catalog();
        let selection = Selection::default().with_genres(std::iter::empty());
        assert!(selection.select(&catalog).is_empty());
    }

    #[test]
    fn test_filter_composition_on_curated_catalog() {
        let catalog = Catalog::curated().unwrap();
        for genre in Genre::ALL {
            let filtered: Vec<_> = catalog
                .classified()
                .filter(|(_, g)| *g == genre)
                .map(|(e, _)| e.key.clone())
                .collect();
            for n in [1, 2, 5, 100] {
                let selected = Selection::default()
                    .with_genres([genre])
                    .with_max_items(n)
                    .select(&catalog);
                let expected: Vec<_> = filtered.iter().take(n).cloned().collect();
                assert_eq!(keys(&selected), expected, "genre {genre}, n {n}");
            }
        }
    }
}
