//! Error types for the download module.
//!
//! [`DownloadError`] describes why a single transport attempt failed.
//! [`FetchError`] describes why fetching an item failed as a whole, after
//! the retry policy has had its say.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a single transport attempt.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response body exceeded the in-memory cap.
    #[error("response body from {url} exceeds {limit_bytes} bytes")]
    BodyTooLarge {
        /// The URL being downloaded.
        url: String,
        /// Configured cap in bytes.
        limit_bytes: u64,
    },

    /// Response body was too small to be real content.
    #[error("response body from {url} too small ({actual_bytes} < {min_bytes} bytes)")]
    UndersizedBody {
        /// The URL being downloaded.
        url: String,
        /// Size actually received.
        actual_bytes: u64,
        /// Minimum plausible size.
        min_bytes: u64,
    },

    /// The rendered URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a body-too-large error.
    pub fn body_too_large(url: impl Into<String>, limit_bytes: u64) -> Self {
        Self::BodyTooLarge {
            url: url.into(),
            limit_bytes,
        }
    }

    /// Creates an undersized-body error.
    pub fn undersized_body(url: impl Into<String>, actual_bytes: u64, min_bytes: u64) -> Self {
        Self::UndersizedBody {
            url: url.into(),
            actual_bytes,
            min_bytes,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Terminal failure for one item.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote source confirmed the identifier does not exist.
    #[error("item {remote_id} not found")]
    NotFound {
        /// Remote identifier.
        remote_id: u64,
    },

    /// Every allowed attempt failed transiently.
    #[error("item {remote_id}: exhausted retries after {attempts} attempts ({last_error})")]
    ExhaustedRetries {
        /// Remote identifier.
        remote_id: u64,
        /// Attempts made.
        attempts: u32,
        /// Display text of the last attempt's error.
        last_error: String,
    },

    /// The source URL for this item is malformed.
    #[error("item {remote_id}: invalid URL {url}")]
    InvalidUrl {
        /// Remote identifier.
        remote_id: u64,
        /// The rendered URL.
        url: String,
    },

    /// The validated body could not be persisted.
    #[error("item {remote_id}: cannot write {path}: {source}")]
    Write {
        /// Remote identifier.
        remote_id: u64,
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An interrupt was requested before the item completed.
    #[error("item {remote_id}: interrupted")]
    Interrupted {
        /// Remote identifier.
        remote_id: u64,
    },
}

impl FetchError {
    /// Short stable reason recorded in outcome reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not found",
            Self::ExhaustedRetries { .. } => "exhausted retries",
            Self::InvalidUrl { .. } => "invalid url",
            Self::Write { .. } => "write failed",
            Self::Interrupted { .. } => "interrupted",
        }
    }

    /// Remote identifier the failure belongs to.
    #[must_use]
    pub fn remote_id(&self) -> u64 {
        match self {
            Self::NotFound { remote_id }
            | Self::ExhaustedRetries { remote_id, .. }
            | Self::InvalidUrl { remote_id, .. }
            | Self::Write { remote_id, .. }
            | Self::Interrupted { remote_id } => *remote_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/pg1.txt");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/pg1.txt"));
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://example.com/pg1.txt", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(msg.contains("https://example.com/pg1.txt"));
    }

    #[test]
    fn test_download_error_undersized_display() {
        let error = DownloadError::undersized_body("https://example.com/pg1.txt", 50, 500);
        let msg = error.to_string();
        assert!(msg.contains("50"), "Expected actual size in: {msg}");
        assert!(msg.contains("500"), "Expected minimum in: {msg}");
    }

    #[test]
    fn test_fetch_error_kinds_are_stable() {
        assert_eq!(FetchError::NotFound { remote_id: 1 }.kind(), "not found");
        assert_eq!(
            FetchError::ExhaustedRetries {
                remote_id: 1,
                attempts: 3,
                last_error: "HTTP 503".to_string(),
            }
            .kind(),
            "exhausted retries"
        );
        assert_eq!(FetchError::Interrupted { remote_id: 1 }.kind(), "interrupted");
    }

    #[test]
    fn test_fetch_error_remote_id() {
        let error = FetchError::InvalidUrl {
            remote_id: 42,
            url: "nope".to_string(),
        };
        assert_eq!(error.remote_id(), 42);
        assert!(error.to_string().contains("nope"));
    }
}
