//! Per-item retrieval with idempotent skip, bounded retries and backoff.
//!
//! # Attempt flow
//!
//! ```text
//! existing file > 1000 bytes? ── yes ──> Ok(skipped)
//!        │ no
//!        v
//!   Attempting(k) ── body >= 500 bytes ──> persist ──> Ok
//!        │
//!        ├── 404 / invalid URL ─────────────────────> Err(permanent)
//!        └── transient ── k < max ── sleep(backoff k) ──> Attempting(k+1)
//!                          └─ k == max ─────────────> Err(ExhaustedRetries)
//! ```
//!
//! The body is validated in memory and written through a temporary file
//! that is renamed into place, so a failed attempt never touches an
//! existing destination file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::Transport;
use super::constants::{MIN_BODY_BYTES, MIN_EXISTING_FILE_BYTES};
use super::error::{DownloadError, FetchError};
use super::retry::{FailureType, RetryDecision, RetryPolicy, classify_error};
use super::sleeper::{Sleeper, TokioSleeper};
use super::source::RemoteSource;

/// A successfully fetched (or already present) item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItem {
    /// Destination file path.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Network attempts made (0 when skipped).
    pub attempts: u32,
    /// True when an existing file satisfied the request.
    pub skipped: bool,
}

/// Retrieves single items from a [`RemoteSource`] through a [`Transport`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    source: RemoteSource,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    interrupted: Arc<AtomicBool>,
}

impl Fetcher {
    /// Creates a fetcher with the default retry policy and the tokio timer.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, source: RemoteSource) -> Self {
        Self {
            transport,
            source,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the sleeper used for backoff waits.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Shares an interrupt flag checked before every attempt.
    #[must_use]
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = interrupted;
        self
    }

    /// Returns the destination path for an item.
    #[must_use]
    pub fn destination_path(&self, remote_id: u64, destination_dir: &Path) -> PathBuf {
        destination_dir.join(RemoteSource::file_name(remote_id))
    }

    /// Fetches one item into `destination_dir`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NotFound`] after a single 404 response
    /// - [`FetchError::ExhaustedRetries`] when every attempt failed transiently
    /// - [`FetchError::InvalidUrl`] when the rendered URL is malformed
    /// - [`FetchError::Write`] when the validated body cannot be persisted
    /// - [`FetchError::Interrupted`] when the interrupt flag is raised between attempts
    #[instrument(skip(self, destination_dir), fields(dir = %destination_dir.display()))]
    pub async fn fetch(
        &self,
        remote_id: u64,
        destination_dir: &Path,
    ) -> Result<FetchedItem, FetchError> {
        let path = self.destination_path(remote_id, destination_dir);

        if let Some(size_bytes) = Self::existing_size(&path).await {
            info!(path = %path.display(), bytes = size_bytes, "already fetched, skipping");
            return Ok(FetchedItem {
                path,
                size_bytes,
                attempts: 0,
                skipped: true,
            });
        }

        let url = self.source.url_for(remote_id);
        if Url::parse(&url).is_err() {
            return Err(FetchError::InvalidUrl { remote_id, url });
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            if self.interrupted.load(Ordering::SeqCst) {
                debug!(attempt, "interrupt observed before attempt");
                return Err(FetchError::Interrupted { remote_id });
            }

            debug!(attempt, max_attempts = self.policy.max_attempts(), url = %url, "attempting fetch");

            let error = match self.attempt(&url).await {
                Ok(body) => return self.persist(remote_id, &path, &body, attempt).await,
                Err(error) => error,
            };

            let failure_type = classify_error(&error);
            match self.policy.should_retry(failure_type, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    warn!(
                        attempt,
                        next_attempt,
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "attempt failed, backing off"
                    );
                    if self.interrupted.load(Ordering::SeqCst) {
                        return Err(FetchError::Interrupted { remote_id });
                    }
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(attempt, %reason, error = %error, "giving up");
                    return Err(terminal_error(remote_id, failure_type, attempt, error));
                }
            }
        }
    }

    /// One network attempt plus in-memory validation.
    ///
    /// An undersized body is an ordinary transient failure here, so it backs
    /// off like a timeout instead of retrying immediately.
    async fn attempt(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let body = self.transport.get(url).await?;
        let len = u64::try_from(body.len()).unwrap_or(u64::MAX);
        if len < MIN_BODY_BYTES {
            return Err(DownloadError::undersized_body(url, len, MIN_BODY_BYTES));
        }
        Ok(body)
    }

    /// Size of a plausible existing file at `path`, if any.
    async fn existing_size(path: &Path) -> Option<u64> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        (metadata.is_file() && metadata.len() > MIN_EXISTING_FILE_BYTES).then(|| metadata.len())
    }

    async fn persist(
        &self,
        remote_id: u64,
        path: &Path,
        body: &[u8],
        attempts: u32,
    ) -> Result<FetchedItem, FetchError> {
        let write_error = |source| FetchError::Write {
            remote_id,
            path: path.to_path_buf(),
            source,
        };

        let partial = partial_path(path);
        if let Err(e) = tokio::fs::write(&partial, body).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(write_error(e));
        }
        if let Err(e) = tokio::fs::rename(&partial, path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(write_error(e));
        }

        let size_bytes = u64::try_from(body.len()).unwrap_or(u64::MAX);
        info!(path = %path.display(), bytes = size_bytes, attempts, "fetch complete");
        Ok(FetchedItem {
            path: path.to_path_buf(),
            size_bytes,
            attempts,
            skipped: false,
        })
    }
}

/// Sibling temporary path: `dir/.pg123.txt.part`.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.part"))
}

fn terminal_error(
    remote_id: u64,
    failure_type: FailureType,
    attempts: u32,
    error: DownloadError,
) -> FetchError {
    match (failure_type, error) {
        (FailureType::Permanent, DownloadError::HttpStatus { status: 404, .. }) => {
            FetchError::NotFound { remote_id }
        }
        (FailureType::Permanent, DownloadError::InvalidUrl { url }) => {
            FetchError::InvalidUrl { remote_id, url }
        }
        (_, error) => FetchError::ExhaustedRetries {
            remote_id,
            attempts,
            last_error: error.to_string(),
        },
    }
}
