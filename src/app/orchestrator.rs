// ZipDrop - app/orchestrator.rs
//
// Upload batch lifecycle. Owns the pending file list, turns it into a
// batch of transfer units, and drives the units through the transport on
// a background thread, one at a time, streaming `UploadEvent`s back over
// an mpsc channel.
//
// Architecture:
//   - `UploadOrchestrator` lives on the presentation thread; `run_batch`
//     runs on a worker thread, one per batch.
//   - An `Arc<AtomicBool>` in-flight flag enforces one active batch.
//   - All cross-thread communication is via `UploadEvent` channel messages.
//   - Per-unit failures are recorded and the loop moves on; a batch always
//     ends with exactly one `BatchCompleted`.

use crate::core::model::{CandidateFile, UploadEvent};
use crate::core::selection::SelectionFilter;
use crate::core::summary::BatchSummary;
use crate::core::transfer::{self, Transport};
use crate::core::unit::{TransferOutcome, TransferUnit};
use crate::util::constants;
use crate::util::error::UploadError;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

// =============================================================================
// UploadOrchestrator
// =============================================================================

/// Owns the pending selection and starts upload batches.
pub struct UploadOrchestrator {
    transport: Arc<dyn Transport>,
    filter: SelectionFilter,

    /// Files waiting for "upload now". Slot = index.
    pending: Vec<CandidateFile>,

    /// Set while a batch worker is running.
    in_flight: Arc<AtomicBool>,

    next_batch_id: u64,
}

impl UploadOrchestrator {
    pub fn new(transport: Arc<dyn Transport>, filter: SelectionFilter) -> Self {
        Self {
            transport,
            filter,
            pending: Vec::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
            next_batch_id: 1,
        }
    }

    pub fn filter(&self) -> &SelectionFilter {
        &self.filter
    }

    /// True while a batch worker is transferring.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Files queued for the next batch, in slot order.
    pub fn pending(&self) -> &[CandidateFile] {
        &self.pending
    }

    /// Filter `files` and append the accepted ones to the pending list.
    ///
    /// Returns how many were accepted. An all-rejected selection is
    /// `EmptyBatch` and leaves the pending list untouched.
    pub fn provide_candidates(&mut self, files: Vec<CandidateFile>) -> Result<usize, UploadError> {
        self.ensure_pending_phase("add files")?;
        let accepted = self.filter.select(files)?;
        let count = accepted.len();
        self.pending.extend(accepted);
        tracing::debug!(added = count, pending = self.pending.len(), "Candidates queued");
        Ok(count)
    }

    /// Remove the pending file in `slot`; later slots shift down by one.
    pub fn remove_pending(&mut self, slot: usize) -> Result<CandidateFile, UploadError> {
        self.ensure_pending_phase("remove a pending file")?;
        if slot >= self.pending.len() {
            return Err(UploadError::SlotOutOfRange {
                slot,
                len: self.pending.len(),
            });
        }
        let removed = self.pending.remove(slot);
        tracing::debug!(slot, name = %removed.name, "Pending file removed");
        Ok(removed)
    }

    /// Drop every pending file.
    pub fn clear_pending(&mut self) -> Result<(), UploadError> {
        self.ensure_pending_phase("clear pending files")?;
        self.pending.clear();
        Ok(())
    }

    /// Submit the pending list as a batch.
    ///
    /// On success the pending list is empty. If a batch is already in
    /// flight the pending list is kept as it is.
    pub fn start_upload(&mut self) -> Result<BatchHandle, UploadError> {
        if self.is_in_flight() {
            return Err(UploadError::BatchInProgress);
        }
        let files = std::mem::take(&mut self.pending);
        self.start_batch(files)
    }

    /// Filter `files`, create one transfer unit per accepted file, and start
    /// transferring them in order on a worker thread.
    ///
    /// Fails fast with `BatchInProgress` if a batch is already running on
    /// this orchestrator and with `EmptyBatch` if nothing passes the filter.
    /// Neither failure creates units or touches the network.
    pub fn start_batch(&mut self, files: Vec<CandidateFile>) -> Result<BatchHandle, UploadError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UploadError::BatchInProgress);
        }

        let accepted = match self.filter.select(files) {
            Ok(accepted) => accepted,
            Err(e) => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let units: Vec<TransferUnit> = accepted
            .into_iter()
            .enumerate()
            .map(|(slot, file)| TransferUnit::new(slot, file))
            .collect();

        let batch_id = self.next_batch_id;
        self.next_batch_id += 1;
        let total = units.len();

        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        std::thread::spawn(move || {
            run_batch(batch_id, units, transport, tx, guard);
        });

        tracing::info!(batch = batch_id, files = total, "Upload batch started");

        Ok(BatchHandle {
            batch_id,
            total,
            rx,
            disconnected: Cell::new(false),
        })
    }

    fn ensure_pending_phase(&self, operation: &'static str) -> Result<(), UploadError> {
        if self.is_in_flight() {
            return Err(UploadError::InvalidState { operation });
        }
        Ok(())
    }
}

// =============================================================================
// BatchHandle
// =============================================================================

/// Subscription to one batch's event stream.
pub struct BatchHandle {
    batch_id: u64,
    total: usize,
    rx: mpsc::Receiver<UploadEvent>,
    disconnected: Cell<bool>,
}

impl BatchHandle {
    pub fn batch_id(&self) -> u64 {
        self.batch_id
    }

    /// Number of transfer units in the batch.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Drain up to `max` pending events without blocking.
    pub fn poll(&self, max: usize) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while events.len() < max {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.disconnected.set(true);
                    break;
                }
            }
        }
        events
    }

    /// True once `poll` has seen the worker's end of the channel close.
    /// Every event sent before that has already been returned.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.get()
    }

    /// Block for the next event. `None` once the worker has finished and
    /// every event has been delivered.
    pub fn next_event(&self) -> Option<UploadEvent> {
        self.rx.recv().ok()
    }

    /// Block until the batch completes, handing every event to `on_event`.
    pub fn wait<F>(self, mut on_event: F) -> Result<BatchSummary, UploadError>
    where
        F: FnMut(&UploadEvent),
    {
        while let Some(event) = self.next_event() {
            on_event(&event);
            if let UploadEvent::BatchCompleted { summary } = event {
                return Ok(summary);
            }
        }
        Err(UploadError::WorkerDisconnected)
    }
}

// =============================================================================
// Background drive loop
// =============================================================================

/// Clears the in-flight flag when dropped, including on worker panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Event sender that keeps going after the receiver is dropped: a batch
/// runs to completion whether or not anyone is still listening.
struct EventSink {
    tx: mpsc::Sender<UploadEvent>,
    detached: bool,
}

impl EventSink {
    fn emit(&mut self, event: UploadEvent) {
        if self.detached {
            return;
        }
        if self.tx.send(event).is_err() {
            self.detached = true;
            tracing::debug!("Event receiver dropped; batch continues unobserved");
        }
    }
}

/// Sequential drive loop: slot 0..n, one transfer at a time.
fn run_batch(
    batch_id: u64,
    mut units: Vec<TransferUnit>,
    transport: Arc<dyn Transport>,
    tx: mpsc::Sender<UploadEvent>,
    guard: InFlightGuard,
) {
    let mut sink = EventSink {
        tx,
        detached: false,
    };
    let total = units.len();

    sink.emit(UploadEvent::BatchStarted {
        batch_id,
        names: units.iter().map(|u| u.name().to_string()).collect(),
    });

    let mut completed = 0usize;

    for unit in units.iter_mut() {
        let slot = unit.slot();
        let file = Arc::clone(unit.file());

        unit.begin();
        sink.emit(UploadEvent::UnitStarted {
            slot,
            name: file.name.clone(),
            size: file.size,
        });

        // The first report is always emitted, even at 0 (unknown total).
        let mut last_emitted: Option<f64> = None;
        let result = transport.send(&file, &mut |sent, total_bytes| {
            let fraction = match (unit.record_progress(sent, total_bytes), last_emitted) {
                (Some(fraction), Some(last))
                    if fraction - last >= constants::PROGRESS_EMIT_STEP || fraction >= 1.0 =>
                {
                    fraction
                }
                (Some(fraction), None) => fraction,
                (None, None) => unit.progress(),
                _ => return,
            };
            last_emitted = Some(fraction);
            tracing::trace!(batch = batch_id, slot, fraction, "Unit progress");
            sink.emit(UploadEvent::UnitProgress { slot, fraction });
        });

        let outcome = transfer::evaluate(result);
        match &outcome {
            TransferOutcome::Succeeded => {
                tracing::info!(batch = batch_id, slot, file = %file.name, "Upload succeeded");
            }
            TransferOutcome::Failed { reason } => {
                tracing::warn!(batch = batch_id, slot, file = %file.name, reason = %reason, "Upload failed");
            }
        }
        unit.finish(outcome.clone());

        sink.emit(UploadEvent::UnitFinished {
            slot,
            name: file.name.clone(),
            outcome,
        });

        completed += 1;
        sink.emit(UploadEvent::BatchProgress { completed, total });
    }

    let summary = match BatchSummary::from_units(&units) {
        Some(summary) => summary,
        None => {
            tracing::error!(batch = batch_id, "Batch ended with a unit not terminal");
            settle_unfinished(&mut units);
            BatchSummary::from_units(&units).unwrap_or_default()
        }
    };

    tracing::info!(
        batch = batch_id,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Upload batch complete"
    );

    // Release the orchestrator before announcing completion so a listener
    // reacting to the summary can start the next batch straight away.
    drop(guard);
    sink.emit(UploadEvent::BatchCompleted { summary });
}

/// Fail every unit that has no outcome yet.
fn settle_unfinished(units: &mut [TransferUnit]) {
    for unit in units.iter_mut().filter(|u| u.outcome().is_none()) {
        unit.begin();
        unit.finish(TransferOutcome::Failed {
            reason: "Upload did not complete".to_string(),
        });
    }
}
