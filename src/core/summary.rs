// ZipDrop - core/summary.rs
//
// Batch summary: the immutable result of a batch, computed once every
// unit is terminal, and the single source of the user-facing message.

use crate::core::unit::{TransferOutcome, TransferUnit};
use serde::{Deserialize, Serialize};

/// One failed unit, by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub name: String,
    pub reason: String,
}

/// Which of the three terminal messages applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    AllSucceeded,
    Mixed,
    AllFailed,
}

/// Aggregate result of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failures in slot order.
    pub failures: Vec<FailureRecord>,
}

impl BatchSummary {
    /// Fold `(name, outcome)` pairs, given in slot order.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a TransferOutcome)>,
    {
        let mut summary = Self::default();
        for (name, outcome) in outcomes {
            match outcome {
                TransferOutcome::Succeeded => summary.succeeded += 1,
                TransferOutcome::Failed { reason } => {
                    summary.failed += 1;
                    summary.failures.push(FailureRecord {
                        name: name.to_string(),
                        reason: reason.clone(),
                    });
                }
            }
        }
        summary
    }

    /// Summarise a batch. Returns `None` while any unit is not yet terminal.
    pub fn from_units(units: &[TransferUnit]) -> Option<Self> {
        let mut outcomes = Vec::with_capacity(units.len());
        for unit in units {
            outcomes.push((unit.name(), unit.outcome()?));
        }
        Some(Self::from_outcomes(outcomes))
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn kind(&self) -> SummaryKind {
        if self.failed == 0 {
            SummaryKind::AllSucceeded
        } else if self.succeeded == 0 {
            SummaryKind::AllFailed
        } else {
            SummaryKind::Mixed
        }
    }

    /// One-line status text.
    pub fn headline(&self) -> String {
        match self.kind() {
            SummaryKind::AllSucceeded => {
                format!("Successfully uploaded {} file(s)", self.succeeded)
            }
            SummaryKind::Mixed => format!(
                "Uploaded {} of {} file(s); {} failed",
                self.succeeded,
                self.total(),
                self.failed
            ),
            SummaryKind::AllFailed => format!("Upload failed for all {} file(s)", self.failed),
        }
    }

    /// Headline followed by one `name: reason` line per failure.
    pub fn message(&self) -> String {
        let mut text = self.headline();
        for failure in &self.failures {
            text.push('\n');
            text.push_str(&failure.name);
            text.push_str(": ");
            text.push_str(&failure.reason);
        }
        text
    }
}

/// Aggregate progress fraction: terminal units over total units.
///
/// In-flight partial progress does not count; the value only moves when a
/// unit finishes.
pub fn aggregate_fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed.min(total) as f64 / total as f64
}
