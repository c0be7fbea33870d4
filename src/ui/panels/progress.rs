// ZipDrop - ui/panels/progress.rs
//
// Per-file progress rows and the overall bar for the current (or last)
// batch. Once the batch is over, "Clear" writes `request_clear`.

use crate::app::state::UploadState;
use crate::core::unit::TransferOutcome;
use crate::ui::theme;

/// Render the batch rows (nothing before the first batch).
pub fn render(ui: &mut egui::Ui, state: &mut UploadState) {
    if state.rows.is_empty() {
        return;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.horizontal(|ui| {
        ui.strong("Overall");
        ui.add(
            egui::ProgressBar::new(state.overall_fraction())
                .desired_width(theme::PROGRESS_BAR_WIDTH)
                .text(format!("{}/{}", state.completed, state.rows.len())),
        );
        if !state.uploading && ui.small_button("Clear").clicked() {
            state.request_clear = true;
        }
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_salt("upload_rows")
        .max_height(theme::LIST_MAX_HEIGHT)
        .show(ui, |ui| {
            egui::Grid::new("upload_table")
                .num_columns(4)
                .striped(true)
                .spacing([12.0, 3.0])
                .min_row_height(theme::ROW_HEIGHT)
                .show(ui, |ui| {
                    for row in &state.rows {
                        match &row.outcome {
                            Some(outcome) => {
                                let (glyph, colour) = theme::outcome_badge(outcome);
                                ui.colored_label(colour, glyph);
                            }
                            None if row.in_flight => {
                                ui.spinner();
                            }
                            None => {
                                ui.label(egui::RichText::new("\u{2022}").weak());
                            }
                        }
                        ui.label(egui::RichText::new(&row.name).monospace().size(11.5));
                        ui.add(
                            egui::ProgressBar::new(row.progress)
                                .desired_width(theme::PROGRESS_BAR_WIDTH)
                                .show_percentage(),
                        );
                        match &row.outcome {
                            Some(TransferOutcome::Failed { reason }) => {
                                ui.colored_label(theme::FAILURE, reason);
                            }
                            _ => {
                                ui.label(theme::format_size(row.size));
                            }
                        }
                        ui.end_row();
                    }
                });
        });
}
