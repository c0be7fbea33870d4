// ZipDrop - ui/panels/pending.rs
//
// Pending list: files accepted so far, each removable, plus the Clear and
// Upload buttons. Writes `request_remove`, `request_clear` and
// `request_upload`; gui.rs hands them to the orchestrator.

use crate::app::state::UploadState;
use crate::ui::theme;

/// Render the pending list (nothing when it is empty).
pub fn render(ui: &mut egui::Ui, state: &mut UploadState) {
    if state.pending.is_empty() {
        return;
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.strong(format!("Ready to upload ({})", state.pending.len()));
        ui.label(
            egui::RichText::new(theme::format_size(state.pending_bytes()))
                .weak()
                .size(11.5),
        );
    });

    let enabled = !state.uploading;
    egui::ScrollArea::vertical()
        .id_salt("pending_files")
        .max_height(theme::LIST_MAX_HEIGHT)
        .show(ui, |ui| {
            egui::Grid::new("pending_table")
                .num_columns(3)
                .striped(true)
                .spacing([12.0, 3.0])
                .min_row_height(theme::ROW_HEIGHT)
                .show(ui, |ui| {
                    for (slot, row) in state.pending.iter().enumerate() {
                        ui.label(egui::RichText::new(&row.name).monospace().size(11.5));
                        ui.label(theme::format_size(row.size));
                        if ui
                            .add_enabled(enabled, egui::Button::new("\u{2716}").small())
                            .on_hover_text("Remove from the list")
                            .clicked()
                        {
                            state.request_remove = Some(slot);
                        }
                        ui.end_row();
                    }
                });
        });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let count = state.pending.len();
        if ui
            .add_enabled(enabled, egui::Button::new(format!("Upload {count} file(s)")))
            .clicked()
        {
            state.request_upload = true;
        }
        if ui.add_enabled(enabled, egui::Button::new("Clear")).clicked() {
            state.request_clear = true;
        }
    });
}
