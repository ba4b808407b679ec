//! Exit code logic for the fetcher process.
//!
//! Single responsibility: map a batch's summary to the process exit outcome.

use corpus_fetcher_core::report::BatchSummary;

use crate::ProcessExit;

/// Determines the process exit outcome from a batch summary.
pub(crate) fn determine_exit_outcome(summary: &BatchSummary, interrupted: bool) -> ProcessExit {
    if interrupted {
        ProcessExit::Failure
    } else if summary.all_succeeded() {
        ProcessExit::Success
    } else if summary.succeeded > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
