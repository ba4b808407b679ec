//! Composition of one fetch run: config, catalog, orchestrator, report.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use corpus_fetcher_core::batch::BatchOrchestrator;
use corpus_fetcher_core::catalog::Catalog;
use corpus_fetcher_core::download::constants::MAX_BODY_BYTES;
use corpus_fetcher_core::download::{
    Fetcher, HttpClient, HttpClientOptions, RemoteSource, RetryPolicy,
};
use corpus_fetcher_core::report::ReportWriter;
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::progress::ProgressObserver;
use crate::app::{config, exit_handler, output, terminal};

pub(crate) async fn run_fetcher() -> Result<ProcessExit> {
    let (args, cli_sources) = config::parse_cli_with_sources();

    let default_level = config::resolve_default_log_level(&args);
    terminal::init_tracing(
        default_level,
        terminal::no_color_env_requested() || terminal::is_dumb_terminal(),
    );
    debug!(?args, "CLI arguments parsed");

    let file_config = config::load_config(args.config.as_deref())?;
    let settings = config::resolve_settings(&args, &cli_sources, file_config.as_ref())?;

    let catalog = load_catalog(settings.catalog_path.as_deref())?;

    if args.list {
        output::print_listing(&catalog).context("Failed to print catalog listing")?;
        return Ok(ProcessExit::Success);
    }

    info!(
        output_dir = %settings.output_dir.display(),
        catalog_size = catalog.len(),
        max_retries = settings.max_retries,
        "corpus-fetcher starting"
    );

    let source = RemoteSource::new(settings.url_template.clone())
        .context("Invalid source URL template")?;
    let client = HttpClient::new(HttpClientOptions {
        connect_timeout: settings.connect_timeout,
        request_timeout: settings.request_timeout,
        user_agent: settings.user_agent.clone(),
        max_body_bytes: MAX_BODY_BYTES,
    })
    .context("Failed to build HTTP client")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let fetcher = Fetcher::new(Arc::new(client), source)
        .with_retry_policy(RetryPolicy::with_max_attempts(settings.max_retries));
    let orchestrator =
        BatchOrchestrator::new(catalog, fetcher).with_interrupt(Arc::clone(&interrupted));

    let use_progress = terminal::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
        args.no_progress,
        terminal::is_dumb_terminal(),
    );
    let mut observer = ProgressObserver::new(use_progress);

    let report = orchestrator
        .run(&settings.selection, &settings.output_dir, &mut observer)
        .await
        .context("Batch run failed")?;
    observer.finish();

    let metadata_path = ReportWriter::metadata_path(&settings.output_dir);
    ReportWriter::write_to_path(&report.outcomes, &metadata_path).with_context(|| {
        format!(
            "Failed to write outcome report '{}'",
            metadata_path.display()
        )
    })?;

    let summary = report.summary();
    if !args.quiet {
        println!("{}", output::render_summary(&summary, &metadata_path));
    }

    if report.interrupted || interrupted.load(Ordering::SeqCst) {
        warn!(
            succeeded = summary.succeeded,
            total = summary.total,
            "Interrupted. Run again to resume."
        );
    }

    Ok(exit_handler::determine_exit_outcome(
        &summary,
        report.interrupted,
    ))
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading catalog file");
            Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog '{}'", path.display()))
        }
        None => Catalog::curated().context("Built-in catalog is invalid"),
    }
}
