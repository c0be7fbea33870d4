// ZipDrop - headless.rs
//
// Console adapter: upload the paths given on the command line without a
// window, print per-file lines and the summary, and map the result to a
// process exit code.

use crate::app::orchestrator::UploadOrchestrator;
use crate::core::model::UploadEvent;
use crate::core::unit::TransferOutcome;
use crate::platform;
use std::io::Write;
use std::path::PathBuf;

/// Every file uploaded.
pub const EXIT_OK: i32 = 0;
/// At least one file failed.
pub const EXIT_FAILURES: i32 = 1;
/// Nothing to upload, or the batch could not be started.
pub const EXIT_USAGE: i32 = 2;

/// Run one batch over `paths` and report to `out`. Returns the exit code.
pub fn run(
    orchestrator: &mut UploadOrchestrator,
    paths: &[PathBuf],
    recursive: bool,
    json: bool,
    out: &mut dyn Write,
) -> i32 {
    let (files, warnings) = platform::fs::collect_candidates(paths, recursive);
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Candidate collection warning");
        eprintln!("warning: {warning}");
    }

    let handle = match orchestrator.start_batch(files) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Batch not started");
            eprintln!("Error: {e}");
            return EXIT_USAGE;
        }
    };
    let total = handle.total();

    let result = handle.wait(|event| {
        if json {
            return;
        }
        if let Some(line) = progress_line(event, total) {
            // A closed stdout must not stop the batch.
            let _ = writeln!(out, "{line}");
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Batch ended without a summary");
            eprintln!("Error: {e}");
            return EXIT_FAILURES;
        }
    };

    let report = if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialise summary");
                summary.message()
            }
        }
    } else {
        summary.message()
    };
    let _ = writeln!(out, "{report}");

    if summary.failed == 0 {
        EXIT_OK
    } else {
        EXIT_FAILURES
    }
}

/// One console line per unit start and finish; progress ticks are silent.
fn progress_line(event: &UploadEvent, total: usize) -> Option<String> {
    match event {
        UploadEvent::BatchStarted { names, .. } => {
            Some(format!("Uploading {} file(s)...", names.len()))
        }
        UploadEvent::UnitStarted { slot, name, size } => {
            Some(format!("[{}/{total}] {name} ({size} bytes)", slot + 1))
        }
        UploadEvent::UnitFinished { outcome, .. } => Some(match outcome {
            TransferOutcome::Succeeded => "  ok".to_string(),
            TransferOutcome::Failed { reason } => format!("  failed: {reason}"),
        }),
        UploadEvent::UnitProgress { .. }
        | UploadEvent::BatchProgress { .. }
        | UploadEvent::BatchCompleted { .. } => None,
    }
}
