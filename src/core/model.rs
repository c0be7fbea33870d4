// ZipDrop - core/model.rs
//
// Core data model types shared by every layer: candidate files and the
// event vocabulary the orchestrator streams to presentation adapters.
// Pure data definitions with no I/O.

use crate::core::summary::BatchSummary;
use crate::core::unit::TransferOutcome;
use std::path::PathBuf;
use std::sync::Arc;

// =============================================================================
// Candidate File
// =============================================================================

/// Where a candidate's bytes come from.
///
/// Native drag-and-drop and the file picker hand over paths; some drop
/// hosts deliver the bytes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Read from disk when the transfer starts.
    Path(PathBuf),

    /// Already in memory.
    Memory(Arc<[u8]>),
}

/// A file offered by the user for upload. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// File name sent to the server (final path component only).
    pub name: String,

    /// Payload size in bytes.
    pub size: u64,

    /// Payload location.
    pub source: FileSource,
}

impl CandidateFile {
    /// A candidate backed by a file on disk whose size is already known.
    pub fn from_path(name: impl Into<String>, size: u64, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            size,
            source: FileSource::Path(path),
        }
    }

    /// A candidate whose payload is held in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }
}

// =============================================================================
// Upload Events (for presentation updates)
// =============================================================================

/// Events sent from the batch worker thread to the presentation layer.
///
/// Ordering contract, for slot k:
///   `UnitStarted` < every `UnitProgress` < `UnitFinished` < `BatchProgress`,
/// and nothing for slot k+1 is sent before slot k's `UnitFinished`.
/// `BatchCompleted` is always the last event of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// The batch was accepted and its units created, in slot order.
    BatchStarted {
        batch_id: u64,
        names: Vec<String>,
    },

    /// The unit in `slot` is now in flight.
    UnitStarted { slot: usize, name: String, size: u64 },

    /// Byte-level progress of the in-flight unit, as a fraction in [0, 1].
    UnitProgress { slot: usize, fraction: f64 },

    /// The unit in `slot` reached its terminal state.
    UnitFinished {
        slot: usize,
        name: String,
        outcome: TransferOutcome,
    },

    /// Aggregate progress: terminal units over total units.
    BatchProgress { completed: usize, total: usize },

    /// Every unit is terminal. Carries the immutable batch summary.
    BatchCompleted { summary: BatchSummary },
}
