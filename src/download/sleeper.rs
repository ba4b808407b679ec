//! Injectable waiting for backoff and courtesy delays.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task for a duration.
///
/// Production code uses [`TokioSleeper`]; tests substitute an
/// implementation that records requested waits and returns immediately.
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
