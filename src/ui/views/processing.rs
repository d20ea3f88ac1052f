//! Processing view - preview, status line and progress bar

use egui::RichText;

use crate::session::SessionState;
use crate::ui::theme::Palette;

/// Render the processing view
pub fn render_processing_view(ui: &mut egui::Ui, session: &SessionState) {
    let palette = Palette::current(ui.ctx());

    ui.vertical_centered(|ui| {
        if let Some(preview) = &session.preview {
            ui.add(
                egui::Image::new(preview.preview_uri())
                    .max_size(egui::vec2(480.0, 320.0))
                    .rounding(8.0)
            );
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("{} ({}x{})", preview.name, preview.width, preview.height))
                    .size(12.0)
                    .color(palette.text_muted)
            );
        }

        ui.add_space(24.0);

        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                RichText::new(&session.status_line)
                    .size(16.0)
                    .color(palette.text_primary)
            );
        });

        ui.add_space(12.0);

        ui.add(
            egui::ProgressBar::new(session.progress_percent as f32 / 100.0)
                .desired_width(420.0)
                .fill(palette.accent)
        );
    });
}
