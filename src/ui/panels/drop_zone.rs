// ZipDrop - ui/panels/drop_zone.rs
//
// Drop target and file picker.
//
// The window-level drop itself is read from egui input in gui.rs; this
// panel only draws the zone (highlighted while files hover over the
// window) and writes `state.pending_paths` when the picker is used.

use crate::app::state::UploadState;
use crate::ui::theme;

/// Render the drop zone.
pub fn render(ui: &mut egui::Ui, state: &mut UploadState) {
    let (stroke_colour, fill) = if state.drop_hovering {
        (theme::DROP_ZONE_HOVER, theme::DROP_ZONE_HOVER_BG)
    } else {
        (theme::DROP_ZONE_BORDER, egui::Color32::TRANSPARENT)
    };
    let label = suffix_label(&state.accepted_suffix);

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, stroke_colour))
        .fill(fill)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.set_min_height(theme::DROP_ZONE_HEIGHT);
            ui.vertical_centered(|ui| {
                ui.add_space(theme::DROP_ZONE_HEIGHT / 4.0);
                let headline = if state.drop_hovering {
                    "Release to add files".to_string()
                } else {
                    format!("Drop {label} files here")
                };
                ui.label(egui::RichText::new(headline).size(18.0).strong());
                ui.add_space(8.0);

                let picker = egui::Button::new("Add files\u{2026}");
                if ui
                    .add_enabled(!state.uploading, picker)
                    .on_hover_text(format!("Choose {label} files to upload"))
                    .clicked()
                {
                    let extension = state.accepted_suffix.trim_start_matches('.').to_string();
                    if let Some(files) = rfd::FileDialog::new()
                        .add_filter(format!("{label} archives"), &[extension.as_str()])
                        .pick_files()
                    {
                        state.pending_paths = Some(files);
                    }
                }
            });
        });
}

/// "ZIP" for ".zip".
fn suffix_label(suffix: &str) -> String {
    suffix.trim_start_matches('.').to_uppercase()
}
