//! Batch runs over a catalog selection.
//!
//! [`Selection`] picks entries (genre filter, then a deterministic prefix),
//! [`BatchOrchestrator`] feeds them one by one through the fetcher with a
//! courtesy delay between items, and every selected entry ends up as
//! exactly one [`FetchOutcome`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use corpus_fetcher_core::batch::{BatchOrchestrator, NoopObserver, Selection};
//! use corpus_fetcher_core::catalog::{Catalog, Genre};
//! use corpus_fetcher_core::download::{Fetcher, HttpClient, HttpClientOptions, RemoteSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(HttpClientOptions::default())?;
//! let fetcher = Fetcher::new(Arc::new(client), RemoteSource::default());
//! let orchestrator = BatchOrchestrator::new(Catalog::curated()?, fetcher);
//!
//! let selection = Selection::default()
//!     .with_genres([Genre::ThrillerMystery])
//!     .with_max_items(2);
//! let report = orchestrator
//!     .run(&selection, Path::new("data/raw"), &mut NoopObserver)
//!     .await?;
//! println!("{}/{} fetched", report.summary().succeeded, report.outcomes.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod orchestrator;
mod outcome;
mod selection;

pub use error::BatchError;
pub use orchestrator::{BatchObserver, BatchOrchestrator, BatchReport, NoopObserver};
pub use outcome::FetchOutcome;
pub use selection::{DEFAULT_COURTESY_DELAY, Selection};
