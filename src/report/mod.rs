//! Outcome report serialization.
//!
//! The report is a pretty-printed JSON array of [`FetchOutcome`] records in
//! selection order, written once at the end of a batch. Unlike item
//! failures, a report that cannot be written is a fatal error.

mod summary;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::batch::FetchOutcome;

pub use summary::BatchSummary;

/// File name of the report inside the output directory.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Errors produced while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sink could not be written.
    #[error("cannot write report to {target}: {source}")]
    Sink {
        /// Where the report was going.
        target: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The outcomes could not be serialized.
    #[error("cannot serialize report: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ReportError {
    fn sink(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            target: target.into(),
            source,
        }
    }

    /// Splits serde_json's IO failures from genuine serialization failures.
    fn from_json(target: &str, error: serde_json::Error) -> Self {
        if error.is_io() {
            Self::sink(target, std::io::Error::from(error))
        } else {
            Self::Serialize(error)
        }
    }
}

/// Serializes outcome lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportWriter;

impl ReportWriter {
    /// Returns the report path for an output directory.
    #[must_use]
    pub fn metadata_path(output_dir: &Path) -> PathBuf {
        output_dir.join(METADATA_FILE_NAME)
    }

    /// Writes `outcomes` to `sink` as a JSON array, order preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if serialization or the sink fails.
    pub fn write<W: Write>(outcomes: &[FetchOutcome], sink: W) -> Result<(), ReportError> {
        Self::write_named(outcomes, sink, "sink")
    }

    /// Writes `outcomes` to `path`, replacing any previous report atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the temporary file cannot be written or
    /// renamed into place.
    #[instrument(skip(outcomes), fields(count = outcomes.len(), path = %path.display()))]
    pub fn write_to_path(outcomes: &[FetchOutcome], path: &Path) -> Result<(), ReportError> {
        let target = path.display().to_string();
        let partial = partial_path(path);

        let file = fs::File::create(&partial).map_err(|e| ReportError::sink(&target, e))?;
        let result = Self::write_named(outcomes, BufWriter::new(file), &target)
            .and_then(|()| fs::rename(&partial, path).map_err(|e| ReportError::sink(&target, e)));
        if result.is_err() {
            // Best-effort cleanup; the previous report, if any, stays intact.
            let _ = fs::remove_file(&partial);
        }
        result?;

        debug!("report written");
        Ok(())
    }

    fn write_named<W: Write>(
        outcomes: &[FetchOutcome],
        sink: W,
        target: &str,
    ) -> Result<(), ReportError> {
        let mut sink = sink;
        serde_json::to_writer_pretty(&mut sink, outcomes)
            .map_err(|e| ReportError::from_json(target, e))?;
        sink.write_all(b"\n")
            .and_then(|()| sink.flush())
            .map_err(|e| ReportError::sink(target, e))
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| METADATA_FILE_NAME.to_string());
    path.with_file_name(format!(".{name}.part"))
}
