//! Progress bar for batch runs.

use corpus_fetcher_core::batch::{BatchObserver, FetchOutcome};
use corpus_fetcher_core::catalog::{CatalogEntry, Genre};
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{pos}/{len}] {wide_bar} {msg}";

/// Drives an `indicatif` bar from batch notifications.
///
/// Disabled observers never create a bar, so non-interactive runs only
/// produce log lines.
pub(crate) struct ProgressObserver {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            enabled: true,
            bar: Some(ProgressBar::hidden()),
        }
    }

    pub(crate) fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl BatchObserver for ProgressObserver {
    fn batch_started(&mut self, total: usize) {
        if !self.enabled {
            return;
        }
        let length = u64::try_from(total).unwrap_or(u64::MAX);
        let bar = match self.bar.take() {
            Some(bar) => {
                bar.set_length(length);
                bar
            }
            None => ProgressBar::new(length),
        };
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar = Some(bar);
    }

    fn item_started(&mut self, _position: usize, _total: usize, entry: &CatalogEntry, genre: Genre) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} ({genre})", entry.key));
        }
    }

    fn item_finished(&mut self, _position: usize, _total: usize, outcome: &FetchOutcome) {
        if let Some(bar) = &self.bar {
            if let Some(error) = &outcome.error {
                bar.println(format!("  {}: {error}", outcome.key));
            }
            bar.inc(1);
        }
    }
}
