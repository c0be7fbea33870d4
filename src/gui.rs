// ZipDrop - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels, window-level drag-and-drop, and the
// upload batch lifecycle.

use crate::app::orchestrator::{BatchHandle, UploadOrchestrator};
use crate::app::state::{StatusKind, UploadState};
use crate::core::model::{CandidateFile, UploadEvent};
use crate::platform;
use crate::ui;
use crate::util::constants;
use crate::util::error::UploadError;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// The ZipDrop window.
pub struct ZipDropApp {
    pub state: UploadState,
    orchestrator: UploadOrchestrator,
    batch: Option<BatchHandle>,
}

impl ZipDropApp {
    pub fn new(state: UploadState, orchestrator: UploadOrchestrator) -> Self {
        Self {
            state,
            orchestrator,
            batch: None,
        }
    }

    /// Fold pending batch events into state. Returns true if anything arrived.
    fn poll_batch(&mut self) -> bool {
        let Some(handle) = self.batch.as_ref() else {
            return false;
        };
        let events = handle.poll(constants::MAX_UPLOAD_EVENTS_PER_FRAME);
        let had_events = !events.is_empty();
        let mut completed = false;
        for event in events {
            completed |= matches!(event, UploadEvent::BatchCompleted { .. });
            self.state.apply_event(event);
        }

        if completed {
            self.batch = None;
        } else if handle.is_disconnected() {
            tracing::error!(batch = handle.batch_id(), "Upload worker disconnected");
            self.state.uploading = false;
            self.state
                .set_status(UploadError::WorkerDisconnected.to_string(), StatusKind::Error);
            self.batch = None;
        }
        had_events
    }

    /// Expand paths (from a drop or the picker) and offer them together
    /// with any files that arrived as bytes.
    fn offer_paths(&mut self, paths: Vec<PathBuf>, in_memory: Vec<CandidateFile>) {
        let (mut files, warnings) = platform::fs::collect_candidates(&paths, false);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Candidate collection warning");
        }
        files.extend(in_memory);
        if files.is_empty() && !warnings.is_empty() {
            self.state.set_status(warnings.join("; "), StatusKind::Error);
            return;
        }
        self.offer(files);
    }

    fn offer(&mut self, files: Vec<CandidateFile>) {
        let offered = files.len();
        match self.orchestrator.provide_candidates(files) {
            Ok(accepted) => {
                self.state.sync_pending(self.orchestrator.pending());
                let skipped = offered - accepted;
                let text = if skipped > 0 {
                    format!("Added {accepted} file(s); skipped {skipped} other file(s)")
                } else {
                    format!("Added {accepted} file(s)")
                };
                self.state.set_status(text, StatusKind::Info);
            }
            Err(e) => {
                tracing::info!(error = %e, offered, "Selection rejected");
                self.state.set_status(e.to_string(), StatusKind::Error);
            }
        }
    }

    /// Window-level drag-and-drop: hover highlight and dropped files.
    fn handle_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.state.drop_hovering = hovering && !self.state.uploading;
        if dropped.is_empty() {
            return;
        }
        if self.state.uploading {
            self.state.set_status(
                UploadError::InvalidState {
                    operation: "add files",
                }
                .to_string(),
                StatusKind::Error,
            );
            return;
        }

        let mut paths = Vec::new();
        let mut in_memory = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                in_memory.push(CandidateFile::from_bytes(file.name, bytes));
            } else {
                tracing::debug!(name = %file.name, "Dropped item has neither path nor bytes");
            }
        }
        tracing::debug!(paths = paths.len(), in_memory = in_memory.len(), "Files dropped");
        self.offer_paths(paths, in_memory);
    }

    /// Consume the intent flags written by the panels.
    fn handle_requests(&mut self) {
        if let Some(paths) = self.state.pending_paths.take() {
            self.offer_paths(paths, Vec::new());
        }

        if let Some(slot) = self.state.request_remove.take() {
            match self.orchestrator.remove_pending(slot) {
                Ok(_) => self.state.sync_pending(self.orchestrator.pending()),
                Err(e) => self.state.set_status(e.to_string(), StatusKind::Error),
            }
        }

        if self.state.request_clear {
            self.state.request_clear = false;
            match self.orchestrator.clear_pending() {
                Ok(()) => {
                    self.state.sync_pending(self.orchestrator.pending());
                    self.state.clear_results();
                }
                Err(e) => self.state.set_status(e.to_string(), StatusKind::Error),
            }
        }

        if self.state.request_upload {
            self.state.request_upload = false;
            match self.orchestrator.start_upload() {
                Ok(handle) => {
                    self.state.uploading = true;
                    self.batch = Some(handle);
                }
                Err(e) => {
                    self.state.sync_pending(self.orchestrator.pending());
                    self.state.set_status(e.to_string(), StatusKind::Error);
                }
            }
        }
    }
}

impl eframe::App for ZipDropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_events = self.poll_batch();
        if had_events || self.state.uploading {
            ctx.request_repaint();
        }

        self.handle_drops(ctx);
        self.handle_requests();

        // Wake up when a success message is due to disappear.
        let now = Instant::now();
        if let Some(status) = self.state.visible_status(now) {
            if status.kind == StatusKind::Success {
                let ttl = Duration::from_millis(constants::SUCCESS_STATUS_VISIBLE_MS);
                let remaining = ttl.saturating_sub(now.duration_since(status.shown_at));
                ctx.request_repaint_after(remaining);
            }
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(ui::theme::STATUS_BG))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(status) = self.state.visible_status(now) {
                        ui.colored_label(ui::theme::status_colour(status.kind), &status.text);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.state.debug_mode {
                            ui.label(egui::RichText::new("DEBUG").small().weak());
                        }
                        if self.state.summary.is_some() && ui.small_button("Summary").clicked() {
                            self.state.show_summary = true;
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(constants::APP_NAME);
            ui.label(
                egui::RichText::new(format!("Uploading to {}", self.state.listing_url))
                    .weak()
                    .size(11.5),
            );
            ui.add_space(8.0);

            ui::panels::drop_zone::render(ui, &mut self.state);
            ui::panels::pending::render(ui, &mut self.state);
            ui::panels::progress::render(ui, &mut self.state);

            if self.state.reload_prompt() {
                ui.add_space(6.0);
                ui.hyperlink_to(
                    "Reload the listing to see changes",
                    &self.state.listing_url,
                );
            }
        });

        ui::panels::summary::render(ctx, &mut self.state);
    }
}
