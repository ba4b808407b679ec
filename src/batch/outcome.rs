//! Per-item outcome records.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, Genre};
use crate::download::{FetchError, FetchedItem};

/// What happened to one selected catalog item during a batch run.
///
/// Serialized with camelCase field names; `filePath` is empty and
/// `fileSizeBytes` is 0 for failed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    /// Remote identifier.
    pub remote_id: u64,
    /// Catalog key.
    pub key: String,
    /// Genre assigned by the catalog classifier.
    pub genre: Genre,
    /// Destination path, empty on failure.
    pub file_path: String,
    /// Size of the destination file, 0 on failure.
    pub file_size_bytes: u64,
    /// Whether the item is present on disk after the run.
    pub succeeded: bool,
    /// Failure reason, `None` on success.
    pub error: Option<String>,
    /// True when an earlier run had already fetched the item.
    #[serde(default)]
    pub skipped: bool,
}

impl FetchOutcome {
    /// Builds a successful outcome.
    #[must_use]
    pub fn succeeded(entry: &CatalogEntry, genre: Genre, item: &FetchedItem) -> Self {
        Self {
            remote_id: entry.remote_id,
            key: entry.key.clone(),
            genre,
            file_path: item.path.display().to_string(),
            file_size_bytes: item.size_bytes,
            succeeded: true,
            error: None,
            skipped: item.skipped,
        }
    }

    /// Builds a failed outcome with the given reason.
    #[must_use]
    pub fn failed(entry: &CatalogEntry, genre: Genre, reason: impl Into<String>) -> Self {
        Self {
            remote_id: entry.remote_id,
            key: entry.key.clone(),
            genre,
            file_path: String::new(),
            file_size_bytes: 0,
            succeeded: false,
            error: Some(reason.into()),
            skipped: false,
        }
    }

    /// Builds the outcome for an item skipped by an interrupt.
    ///
    /// The reason matches what an item interrupted mid-fetch records.
    #[must_use]
    pub fn interrupted(entry: &CatalogEntry, genre: Genre) -> Self {
        let reason = FetchError::Interrupted {
            remote_id: entry.remote_id,
        }
        .kind();
        Self::failed(entry, genre, reason)
    }

    /// Builds an outcome from a fetch result; failures record [`FetchError::kind`].
    #[must_use]
    pub fn from_result(
        entry: &CatalogEntry,
        genre: Genre,
        result: &Result<FetchedItem, FetchError>,
    ) -> Self {
        match result {
            Ok(item) => Self::succeeded(entry, genre, item),
            Err(e) => Self::failed(entry, genre, e.kind()),
        }
    }
}
