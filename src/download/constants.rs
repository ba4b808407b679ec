//! Constants for the download module (timeouts, size thresholds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default per-attempt request timeout (30 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bodies smaller than this are treated as invalid content and retried.
pub const MIN_BODY_BYTES: u64 = 500;

/// An existing destination file larger than this is considered already fetched.
pub const MIN_EXISTING_FILE_BYTES: u64 = 1000;

/// Hard cap on an in-memory response body (64 MiB).
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;
