// ZipDrop - ui/theme.rs
//
// Colour scheme, status/outcome colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::app::state::StatusKind;
use crate::core::unit::TransferOutcome;
use egui::Color32;

/// Text colour for a status-line message.
pub fn status_colour(kind: StatusKind) -> Color32 {
    match kind {
        StatusKind::Info => Color32::from_rgb(209, 213, 219),    // Gray 300
        StatusKind::Success => SUCCESS,
        StatusKind::Error => FAILURE,
    }
}

/// Glyph and colour for a finished transfer row.
pub fn outcome_badge(outcome: &TransferOutcome) -> (&'static str, Color32) {
    match outcome {
        TransferOutcome::Succeeded => ("\u{2714}", SUCCESS),
        TransferOutcome::Failed { .. } => ("\u{2716}", FAILURE),
    }
}

pub const SUCCESS: Color32 = Color32::from_rgb(74, 222, 128);  // Green 400
pub const FAILURE: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Drop zone colours.
pub const DROP_ZONE_BORDER: Color32 = Color32::from_rgb(107, 114, 128);   // Gray 500
pub const DROP_ZONE_HOVER: Color32 = Color32::from_rgb(59, 130, 246);     // Blue 500
pub const DROP_ZONE_HOVER_BG: Color32 = Color32::from_rgba_premultiplied(59, 130, 246, 25);

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55);      // Gray 800

/// Layout constants.
pub const DROP_ZONE_HEIGHT: f32 = 140.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const PROGRESS_BAR_WIDTH: f32 = 220.0;
pub const LIST_MAX_HEIGHT: f32 = 260.0;

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.1} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{bytes} B")
    }
}
