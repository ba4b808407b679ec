//! The fixed, hand-curated table of fetchable items.
//!
//! A [`Catalog`] is an immutable value: an ordered list of
//! [`CatalogEntry`] plus the [`GenreClassifier`] used to tag each key.
//! The curated corpus is embedded at compile time from `curated.toml`;
//! tests and callers can build their own catalogs with [`Catalog::new`]
//! or [`Catalog::from_toml_str`].
//!
//! # Example
//!
//! ```
//! use corpus_fetcher_core::catalog::{Catalog, Genre};
//!
//! let catalog = Catalog::curated().unwrap();
//! assert_eq!(catalog.classify("verne_tour_monde"), Genre::FantasySciFi);
//! ```

mod error;
mod genre;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::CatalogError;
pub use genre::{Genre, GenreClassifier, GenreRule, ParseGenreError};

/// Embedded curated catalog document.
const CURATED_TOML: &str = include_str!("curated.toml");

/// One fetchable item: a human-readable key and the remote identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Stable human-readable key (unique within a catalog).
    pub key: String,
    /// The remote source's integer identifier.
    pub remote_id: u64,
}

impl CatalogEntry {
    /// Creates an entry.
    pub fn new(key: impl Into<String>, remote_id: u64) -> Self {
        Self {
            key: key.into(),
            remote_id,
        }
    }
}

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default = "default_fallback_genre")]
    fallback_genre: Genre,
    #[serde(default)]
    genre_prefixes: Vec<GenreRule>,
    #[serde(default)]
    items: Vec<CatalogEntry>,
}

fn default_fallback_genre() -> Genre {
    Genre::GeneralLiterature
}

/// Ordered catalog of items with its genre classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    classifier: GenreClassifier,
}

impl Catalog {
    /// Creates a catalog, validating that keys are non-empty and unique.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyKey`] or [`CatalogError::DuplicateKey`].
    pub fn new(
        entries: Vec<CatalogEntry>,
        classifier: GenreClassifier,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.key.is_empty() {
                return Err(CatalogError::EmptyKey {
                    remote_id: entry.remote_id,
                });
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(CatalogError::DuplicateKey {
                    key: entry.key.clone(),
                });
            }
        }
        Ok(Self {
            entries,
            classifier,
        })
    }

    /// Returns the embedded curated catalog.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is malformed, which the test
    /// suite guards against.
    pub fn curated() -> Result<Self, CatalogError> {
        Self::parse_document(CURATED_TOML, "embedded")
    }

    /// Parses a catalog from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed documents, or a
    /// validation error from [`Catalog::new`].
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        Self::parse_document(raw, "document")
    }

    /// Loads a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Read`] if the file cannot be read, otherwise
    /// the same errors as [`Catalog::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::read(path, e))?;
        Self::parse_document(&raw, path.display().to_string())
    }

    fn parse_document(raw: &str, origin: impl Into<String>) -> Result<Self, CatalogError> {
        let origin = origin.into();
        let document: CatalogDocument =
            toml::from_str(raw).map_err(|e| CatalogError::parse(origin.clone(), e))?;
        let catalog = Self::new(
            document.items,
            GenreClassifier::new(document.genre_prefixes, document.fallback_genre),
        )?;
        debug!(
            origin = %origin,
            items = catalog.len(),
            rules = catalog.classifier.rules().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Classifies a key with this catalog's rules.
    #[must_use]
    pub fn classify(&self, key: &str) -> Genre {
        self.classifier.classify(key)
    }

    /// Iterates entries with their classified genre, in declaration order.
    pub fn classified(&self) -> impl Iterator<Item = (&CatalogEntry, Genre)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry, self.classifier.classify(&entry.key)))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
