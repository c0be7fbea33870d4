// ZipDrop - app/state.rs
//
// Presentation state for the upload window. Folds orchestrator events into
// per-row progress, the overall bar, and the status line. Panels write the
// `request_*` / `pending_*` intent fields; gui.rs consumes them each frame.

use crate::core::model::{CandidateFile, UploadEvent};
use crate::core::summary::{aggregate_fraction, BatchSummary, SummaryKind};
use crate::core::unit::TransferOutcome;
use crate::util::constants;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Styling class of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Text shown in the status line.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

/// A file waiting in the pending list (preview surface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub name: String,
    pub size: u64,
}

/// One transfer unit as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRow {
    pub slot: usize,
    pub name: String,
    pub size: u64,
    pub progress: f32,
    pub in_flight: bool,
    pub outcome: Option<TransferOutcome>,
}

/// Top-level presentation state.
#[derive(Debug)]
pub struct UploadState {
    /// Server listing page, shown in the "reload" prompt.
    pub listing_url: String,

    /// Accepted suffix, for labels and the file picker.
    pub accepted_suffix: String,

    /// Snapshot of the orchestrator's pending list.
    pub pending: Vec<PendingRow>,

    /// Rows of the current (or last) batch, in slot order.
    pub rows: Vec<UploadRow>,

    /// Units that reached a terminal state in the current batch.
    pub completed: usize,

    /// Whether a batch is being transferred.
    pub uploading: bool,

    /// Summary of the most recent completed batch.
    pub summary: Option<BatchSummary>,

    /// Current status line.
    pub status: Option<StatusMessage>,

    /// Whether to show the summary window.
    pub show_summary: bool,

    /// Whether files are being dragged over the window.
    pub drop_hovering: bool,

    /// Paths chosen in the file picker, waiting to become candidates.
    pub pending_paths: Option<Vec<PathBuf>>,

    /// Pending slot the user asked to remove.
    pub request_remove: Option<usize>,

    /// User clicked "Upload".
    pub request_upload: bool,

    /// User clicked "Clear".
    pub request_clear: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl UploadState {
    pub fn new(listing_url: String, accepted_suffix: String, debug_mode: bool) -> Self {
        Self {
            listing_url,
            accepted_suffix,
            pending: Vec::new(),
            rows: Vec::new(),
            completed: 0,
            uploading: false,
            summary: None,
            status: None,
            show_summary: false,
            drop_hovering: false,
            pending_paths: None,
            request_remove: None,
            request_upload: false,
            request_clear: false,
            debug_mode,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// Status to display at `now`. Success messages disappear after a
    /// few seconds; info and error messages stay until replaced.
    pub fn visible_status(&self, now: Instant) -> Option<&StatusMessage> {
        let status = self.status.as_ref()?;
        let ttl = Duration::from_millis(constants::SUCCESS_STATUS_VISIBLE_MS);
        if status.kind == StatusKind::Success && now.duration_since(status.shown_at) >= ttl {
            return None;
        }
        Some(status)
    }

    /// Replace the pending snapshot with the orchestrator's list.
    pub fn sync_pending(&mut self, files: &[CandidateFile]) {
        self.pending = files
            .iter()
            .map(|f| PendingRow {
                name: f.name.clone(),
                size: f.size,
            })
            .collect();
    }

    /// Total payload bytes in the pending list.
    pub fn pending_bytes(&self) -> u64 {
        self.pending.iter().map(|p| p.size).sum()
    }

    /// Overall progress: terminal units over total units.
    pub fn overall_fraction(&self) -> f32 {
        aggregate_fraction(self.completed, self.rows.len()) as f32
    }

    /// True once a summary exists; the server listing is stale until reloaded.
    pub fn reload_prompt(&self) -> bool {
        self.summary.is_some() && !self.uploading
    }

    /// Fold one orchestrator event into the view.
    pub fn apply_event(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::BatchStarted { batch_id, names } => {
                tracing::debug!(batch = batch_id, files = names.len(), "Batch rows created");
                let sizes: Vec<u64> = self.pending.iter().map(|p| p.size).collect();
                self.rows = names
                    .into_iter()
                    .enumerate()
                    .map(|(slot, name)| UploadRow {
                        slot,
                        name,
                        size: sizes.get(slot).copied().unwrap_or(0),
                        progress: 0.0,
                        in_flight: false,
                        outcome: None,
                    })
                    .collect();
                self.pending.clear();
                self.completed = 0;
                self.summary = None;
                self.show_summary = false;
                self.uploading = true;
                let count = self.rows.len();
                self.set_status(format!("Uploading {count} file(s)..."), StatusKind::Info);
            }
            UploadEvent::UnitStarted { slot, size, .. } => {
                if let Some(row) = self.rows.get_mut(slot) {
                    row.in_flight = true;
                    row.size = size;
                }
            }
            UploadEvent::UnitProgress { slot, fraction } => {
                if let Some(row) = self.rows.get_mut(slot) {
                    row.progress = row.progress.max(fraction as f32);
                }
            }
            UploadEvent::UnitFinished { slot, outcome, .. } => {
                if let Some(row) = self.rows.get_mut(slot) {
                    row.in_flight = false;
                    if outcome.is_success() {
                        row.progress = 1.0;
                    }
                    row.outcome = Some(outcome);
                }
            }
            UploadEvent::BatchProgress { completed, .. } => {
                self.completed = completed;
            }
            UploadEvent::BatchCompleted { summary } => {
                let kind = match summary.kind() {
                    SummaryKind::AllSucceeded => StatusKind::Success,
                    SummaryKind::Mixed | SummaryKind::AllFailed => StatusKind::Error,
                };
                self.set_status(summary.headline(), kind);
                self.show_summary = summary.failed > 0;
                self.summary = Some(summary);
                self.uploading = false;
            }
        }
    }

    /// Forget the last batch's rows and summary.
    pub fn clear_results(&mut self) {
        self.rows.clear();
        self.completed = 0;
        self.summary = None;
        self.show_summary = false;
        self.status = None;
    }
}
