//! Stdout rendering: the catalog listing and the end-of-run summary.

use std::io::{self, Write};
use std::path::Path;

use corpus_fetcher_core::catalog::{Catalog, Genre};
use corpus_fetcher_core::report::BatchSummary;

/// Renders every catalog entry with its remote identifier and genre.
pub(crate) fn render_listing(catalog: &Catalog) -> String {
    let width = catalog
        .entries()
        .iter()
        .map(|entry| entry.key.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (entry, genre) in catalog.classified() {
        out.push_str(&format!(
            "{:<width$}  {:>7}  {genre}\n",
            entry.key, entry.remote_id
        ));
    }

    out.push('\n');
    for genre in Genre::ALL {
        let count = catalog.classified().filter(|(_, g)| *g == genre).count();
        out.push_str(&format!("{genre}: {count}\n"));
    }
    out.push_str(&format!("total: {}\n", catalog.len()));
    out
}

pub(crate) fn print_listing(catalog: &Catalog) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(render_listing(catalog).as_bytes())?;
    stdout.flush()
}

/// One-line human summary of a finished batch.
pub(crate) fn render_summary(summary: &BatchSummary, metadata_path: &Path) -> String {
    format!(
        "Fetched {}/{} items ({:.1} MiB, {} already present); metadata: {}",
        summary.succeeded,
        summary.total,
        summary.total_mib(),
        summary.skipped,
        metadata_path.display()
    )
}
