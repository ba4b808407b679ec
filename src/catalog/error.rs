//! Error types for catalog loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not valid TOML or does not match the schema.
    #[error("invalid catalog {origin}: {source}")]
    Parse {
        /// Where the document came from (file path or "embedded").
        origin: String,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The catalog file could not be read.
    #[error("cannot read catalog file {path}: {source}")]
    Read {
        /// Path of the catalog file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Two entries share the same key.
    #[error("duplicate catalog key '{key}'")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// An entry has an empty key.
    #[error("catalog entry with remote id {remote_id} has an empty key")]
    EmptyKey {
        /// Remote identifier of the offending entry.
        remote_id: u64,
    },
}

impl CatalogError {
    /// Creates a parse error.
    pub fn parse(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
