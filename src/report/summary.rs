//! Aggregate statistics over a batch's outcomes.

use serde::Serialize;

use crate::batch::FetchOutcome;

/// Counts derived from a list of outcomes; never stored, always recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Outcomes with `succeeded == true`.
    pub succeeded: usize,
    /// Outcomes with `succeeded == false`.
    pub failed: usize,
    /// All outcomes.
    pub total: usize,
    /// Successful outcomes that were already on disk.
    pub skipped: usize,
    /// Sum of `fileSizeBytes` over successful outcomes.
    pub total_bytes: u64,
}

impl BatchSummary {
    /// Computes the summary for `outcomes`.
    #[must_use]
    pub fn from_outcomes(outcomes: &[FetchOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            if outcome.succeeded {
                summary.succeeded += 1;
                summary.total_bytes = summary.total_bytes.saturating_add(outcome.file_size_bytes);
                if outcome.skipped {
                    summary.skipped += 1;
                }
            } else {
                summary.failed += 1;
            }
            summary
        })
    }

    /// True when nothing was selected or every item succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Total size in MiB, for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_mib(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }
}
