// ZipDrop - core/unit.rs
//
// Transfer unit: one candidate file plus its slot in the batch, with a
// small state machine (pending -> in-flight -> succeeded | failed).
// Transitions out of order are ignored and reported as `false`/`None`.

use crate::core::model::CandidateFile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Terminal result of one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TransferOutcome {
    Succeeded,
    Failed { reason: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Succeeded)
    }
}

/// Lifecycle state of a transfer unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Pending,
    InFlight,
    Done(TransferOutcome),
}

impl UnitState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitState::Done(_))
    }
}

/// The orchestrator's record of one file's upload.
#[derive(Debug, Clone)]
pub struct TransferUnit {
    slot: usize,
    file: Arc<CandidateFile>,
    progress: f64,
    state: UnitState,
}

impl TransferUnit {
    pub fn new(slot: usize, file: CandidateFile) -> Self {
        Self {
            slot,
            file: Arc::new(file),
            progress: 0.0,
            state: UnitState::Pending,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn file(&self) -> &Arc<CandidateFile> {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// Last observed progress fraction. Frozen once the unit fails;
    /// 1.0 once it succeeds.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> &UnitState {
        &self.state
    }

    /// Terminal outcome, if the unit has one.
    pub fn outcome(&self) -> Option<&TransferOutcome> {
        match &self.state {
            UnitState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Pending -> in-flight. Returns false if the unit was not pending.
    pub fn begin(&mut self) -> bool {
        if self.state != UnitState::Pending {
            return false;
        }
        self.state = UnitState::InFlight;
        true
    }

    /// Record byte progress while in flight.
    ///
    /// The fraction is `sent / total`, or 0 when the total is unknown or
    /// zero, clamped to [0, 1]. Returns the new fraction only when it
    /// advanced; progress never moves backwards.
    pub fn record_progress(&mut self, sent: u64, total: Option<u64>) -> Option<f64> {
        if self.state != UnitState::InFlight {
            return None;
        }
        let fraction = match total {
            Some(total) if total > 0 => (sent as f64 / total as f64).min(1.0),
            _ => 0.0,
        };
        if fraction > self.progress {
            self.progress = fraction;
            Some(fraction)
        } else {
            None
        }
    }

    /// In-flight -> terminal. Success pins progress to 1.0.
    /// Returns false if the unit was not in flight.
    pub fn finish(&mut self, outcome: TransferOutcome) -> bool {
        if self.state != UnitState::InFlight {
            return false;
        }
        if outcome.is_success() {
            self.progress = 1.0;
        }
        self.state = UnitState::Done(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> TransferUnit {
        TransferUnit::new(0, CandidateFile::from_bytes("a.zip", vec![0u8; 10]))
    }

    #[test]
    fn progress_is_ignored_until_in_flight() {
        let mut u = unit();
        assert_eq!(u.record_progress(5, Some(10)), None);
        assert!(u.begin());
        assert_eq!(u.record_progress(5, Some(10)), Some(0.5));
    }

    #[test]
    fn progress_never_decreases() {
        let mut u = unit();
        u.begin();
        assert_eq!(u.record_progress(8, Some(10)), Some(0.8));
        assert_eq!(u.record_progress(4, Some(10)), None);
        assert_eq!(u.progress(), 0.8);
    }

    #[test]
    fn unknown_total_reports_zero() {
        let mut u = unit();
        u.begin();
        assert_eq!(u.record_progress(500, None), None);
        assert_eq!(u.record_progress(500, Some(0)), None);
        assert_eq!(u.progress(), 0.0);
    }

    #[test]
    fn success_pins_progress_to_one() {
        let mut u = unit();
        u.begin();
        u.record_progress(3, Some(10));
        assert!(u.finish(TransferOutcome::Succeeded));
        assert_eq!(u.progress(), 1.0);
        assert!(u.state().is_terminal());
    }

    #[test]
    fn failure_freezes_progress() {
        let mut u = unit();
        u.begin();
        u.record_progress(3, Some(10));
        u.finish(TransferOutcome::Failed {
            reason: "disk full".to_string(),
        });
        assert!((u.progress() - 0.3).abs() < f64::EPSILON);
        assert_eq!(u.record_progress(10, Some(10)), None);
    }

    #[test]
    fn terminal_state_is_final() {
        let mut u = unit();
        assert!(!u.finish(TransferOutcome::Succeeded), "pending cannot finish");
        u.begin();
        u.finish(TransferOutcome::Succeeded);
        assert!(!u.begin());
        assert!(!u.finish(TransferOutcome::Failed {
            reason: "late".to_string()
        }));
        assert_eq!(u.outcome(), Some(&TransferOutcome::Succeeded));
    }
}
