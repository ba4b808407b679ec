//! Single-item retrieval from the remote archive.
//!
//! This module owns everything between "fetch item 17489 into `data/raw`"
//! and a validated file on disk:
//!
//! - [`RemoteSource`] renders the URL and local file name for an identifier
//! - [`Transport`] performs one GET; [`HttpClient`] is the reqwest-backed one
//! - [`RetryPolicy`] and [`classify_error`] decide whether a failure is worth
//!   another attempt and how long to wait
//! - [`Fetcher`] ties them together with the idempotent skip and size checks
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use corpus_fetcher_core::download::{Fetcher, HttpClient, HttpClientOptions, RemoteSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(HttpClientOptions::default())?;
//! let fetcher = Fetcher::new(Arc::new(client), RemoteSource::default());
//! let item = fetcher.fetch(17489, Path::new("data/raw")).await?;
//! println!("{} ({} bytes)", item.path.display(), item.size_bytes);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod fetcher;
mod retry;
mod sleeper;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpClient, HttpClientOptions, Transport};
pub use error::{DownloadError, FetchError};
pub use fetcher::{FetchedItem, Fetcher};
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
pub use sleeper::{Sleeper, TokioSleeper};
pub use source::{DEFAULT_URL_TEMPLATE, ID_PLACEHOLDER, RemoteSource};

// Note: no module-local Result aliases; spell out `Result<T, FetchError>`.
