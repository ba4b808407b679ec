//! Sequential batch runner over a catalog selection.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, instrument, warn};

use super::error::BatchError;
use super::outcome::FetchOutcome;
use super::selection::Selection;
use crate::catalog::{Catalog, CatalogEntry, Genre};
use crate::download::{FetchError, Fetcher, Sleeper, TokioSleeper};
use crate::report::BatchSummary;

/// Receives progress notifications from a running batch.
///
/// Every method has a no-op default.
pub trait BatchObserver: Send {
    /// Called once before the first item with the number of selected items.
    fn batch_started(&mut self, _total: usize) {}

    /// Called before an item is handed to the fetcher (`position` is 1-based).
    fn item_started(&mut self, _position: usize, _total: usize, _entry: &CatalogEntry, _genre: Genre) {
    }

    /// Called once per selected item, including interrupted ones.
    fn item_finished(&mut self, _position: usize, _total: usize, _outcome: &FetchOutcome) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Result of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// One outcome per selected item, in selection order.
    pub outcomes: Vec<FetchOutcome>,
    /// True when an interrupt cut the run short.
    pub interrupted: bool,
}

impl BatchReport {
    /// Aggregate counts over the outcomes.
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_outcomes(&self.outcomes)
    }
}

/// Runs a selection of catalog items through a [`Fetcher`], one at a time.
#[derive(Debug)]
pub struct BatchOrchestrator {
    catalog: Catalog,
    fetcher: Fetcher,
    sleeper: Arc<dyn Sleeper>,
    interrupted: Arc<AtomicBool>,
}

impl BatchOrchestrator {
    /// Creates an orchestrator over `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog, fetcher: Fetcher) -> Self {
        Self {
            catalog,
            fetcher,
            sleeper: Arc::new(TokioSleeper),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the sleeper used for the courtesy delay.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Shares an interrupt flag with the orchestrator and its fetcher.
    #[must_use]
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.fetcher = self.fetcher.with_interrupt(Arc::clone(&interrupted));
        self.interrupted = interrupted;
        self
    }

    /// Fetches every selected item into `output_dir`.
    ///
    /// Item failures never abort the run; each selected entry yields exactly
    /// one outcome. Once the interrupt flag is observed, the remaining
    /// entries are recorded as interrupted without network access.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::OutputDir`] if the output directory cannot be
    /// created, or [`BatchError::ItemWrite`] as soon as a fetched body cannot
    /// be persisted (the remaining items are not fetched).
    #[instrument(skip_all, fields(output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        selection: &Selection,
        output_dir: &Path,
        observer: &mut dyn BatchObserver,
    ) -> Result<BatchReport, BatchError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| BatchError::output_dir(output_dir, e))?;

        let selected = selection.select(&self.catalog);
        let total = selected.len();
        info!(
            total,
            catalog_size = self.catalog.len(),
            delay_ms = selection.delay.as_millis(),
            "starting batch"
        );
        observer.batch_started(total);

        let mut outcomes = Vec::with_capacity(total);
        let mut interrupted = false;

        for (index, (entry, genre)) in selected.into_iter().enumerate() {
            let position = index + 1;

            if !interrupted && self.interrupted.load(Ordering::SeqCst) {
                warn!(remaining = total - index, "interrupt requested, stopping batch");
                interrupted = true;
            }

            let outcome = if interrupted {
                FetchOutcome::interrupted(entry, genre)
            } else {
                observer.item_started(position, total, entry, genre);
                info!(position, total, key = %entry.key, remote_id = entry.remote_id, %genre, "fetching item");
                let result = match self.fetcher.fetch(entry.remote_id, output_dir).await {
                    Err(FetchError::Write {
                        remote_id,
                        path,
                        source,
                    }) => {
                        error!(key = %entry.key, remote_id, path = %path.display(), error = %source, "cannot persist item, aborting batch");
                        return Err(BatchError::item_write(&entry.key, remote_id, path, source));
                    }
                    other => other,
                };
                if let Err(e) = &result {
                    warn!(key = %entry.key, remote_id = entry.remote_id, error = %e, "item failed");
                    if matches!(e, FetchError::Interrupted { .. }) {
                        interrupted = true;
                    }
                }
                FetchOutcome::from_result(entry, genre, &result)
            };

            observer.item_finished(position, total, &outcome);
            outcomes.push(outcome);

            if position < total
                && !selection.delay.is_zero()
                && !interrupted
                && !self.interrupted.load(Ordering::SeqCst)
            {
                self.sleeper.sleep(selection.delay).await;
            }
        }

        let report = BatchReport {
            outcomes,
            interrupted,
        };
        let summary = report.summary();
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            total_bytes = summary.total_bytes,
            interrupted,
            "batch finished"
        );
        Ok(report)
    }
}
