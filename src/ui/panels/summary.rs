// ZipDrop - ui/panels/summary.rs
//
// Batch summary window.
// Shown after a batch with failures (or on demand from the status bar).
// Lists every failed file with its reason and links to the server listing,
// which is stale until reloaded.

use crate::app::state::UploadState;
use crate::ui::theme;

/// Render the summary dialog (if state.show_summary is true).
pub fn render(ctx: &egui::Context, state: &mut UploadState) {
    if !state.show_summary {
        return;
    }

    let mut open = true;
    egui::Window::new("Upload Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref summary) = state.summary {
                ui.strong(summary.headline());
                egui::Grid::new("summary_overview")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Succeeded:");
                        ui.label(summary.succeeded.to_string());
                        ui.end_row();

                        ui.label("Failed:");
                        let colour = if summary.failed > 0 {
                            theme::FAILURE
                        } else {
                            ui.style().visuals.text_color()
                        };
                        ui.colored_label(colour, summary.failed.to_string());
                        ui.end_row();
                    });

                if !summary.failures.is_empty() {
                    ui.add_space(8.0);
                    ui.separator();
                    ui.strong("Failures");
                    egui::ScrollArea::vertical()
                        .id_salt("summary_failures")
                        .max_height(theme::LIST_MAX_HEIGHT)
                        .show(ui, |ui| {
                            egui::Grid::new("summary_failure_table")
                                .num_columns(2)
                                .striped(true)
                                .spacing([12.0, 3.0])
                                .show(ui, |ui| {
                                    for failure in &summary.failures {
                                        ui.label(
                                            egui::RichText::new(&failure.name)
                                                .monospace()
                                                .size(11.5),
                                        );
                                        ui.colored_label(theme::FAILURE, &failure.reason);
                                        ui.end_row();
                                    }
                                });
                        });
                }
            } else {
                ui.label("No upload has completed yet.");
            }

            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                if state.reload_prompt() {
                    ui.hyperlink_to("Reload the listing to see changes", &state.listing_url);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        state.show_summary = false;
                    }
                });
            });
        });

    if !open {
        state.show_summary = false;
    }
}
