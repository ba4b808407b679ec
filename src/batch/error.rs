//! Error types for batch runs.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal batch failures. Per-item failures are recorded as outcomes instead.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Requested output directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A fetched item could not be written to the output directory.
    #[error("cannot write item '{key}' ({remote_id}) to {path}: {source}")]
    ItemWrite {
        /// Catalog key of the item.
        key: String,
        /// Remote identifier of the item.
        remote_id: u64,
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    /// Creates an output directory error.
    pub fn output_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputDir {
            path: path.into(),
            source,
        }
    }

    /// Creates an item write error.
    pub fn item_write(
        key: impl Into<String>,
        remote_id: u64,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::ItemWrite {
            key: key.into(),
            remote_id,
            path: path.into(),
            source,
        }
    }
}
