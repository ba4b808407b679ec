//! Corpus Fetcher Core Library
//!
//! This library acquires a fixed, hand-curated set of public-domain texts
//! from a remote archive, persists them idempotently and records one
//! outcome per item for downstream corpus building.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - The curated item table and the key-prefix genre classifier
//! - [`download`] - Transport, retry policy and the single-item fetcher
//! - [`batch`] - Selection filtering and the sequential batch orchestrator
//! - [`report`] - Outcome serialization and summary statistics
//! - [`user_agent`] - The identifying User-Agent sent with every request

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod catalog;
pub mod download;
pub mod report;
pub mod user_agent;

// Re-export commonly used types
pub use batch::{
    BatchError, BatchObserver, BatchOrchestrator, BatchReport, FetchOutcome, NoopObserver,
    Selection,
};
pub use catalog::{Catalog, CatalogEntry, CatalogError, Genre, GenreClassifier, GenreRule};
pub use download::{
    DEFAULT_MAX_RETRIES, DownloadError, FailureType, FetchError, FetchedItem, Fetcher,
    HttpClient, HttpClientOptions, RemoteSource, RetryDecision, RetryPolicy, Sleeper,
    TokioSleeper, Transport, classify_error,
};
pub use report::{BatchSummary, ReportError, ReportWriter};
