//! Drop target for image files

use egui::{Align, Layout, RichText, Rounding, Sense, Stroke};

use crate::ui::theme::{color_with_alpha, Palette};

/// Large clickable area that highlights while files hover over the window
pub struct DropZone {
    /// Files are currently being dragged over the window
    pub hovering: bool,
}

impl DropZone {
    pub fn new(hovering: bool) -> Self {
        Self { hovering }
    }

    /// Draw the zone; returns the click response
    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let palette = Palette::current(ui.ctx());
        let (fill, stroke) = if self.hovering {
            (
                color_with_alpha(palette.accent, 40),
                Stroke::new(2.0, palette.accent),
            )
        } else {
            (palette.bg_card, Stroke::new(1.5, palette.border))
        };

        let frame = egui::Frame::none()
            .fill(fill)
            .stroke(stroke)
            .rounding(Rounding::same(12.0))
            .inner_margin(32.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(ui.available_width(), 180.0));
                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    ui.add_space(24.0);
                    ui.label(
                        RichText::new("Drop an image here")
                            .size(20.0)
                            .color(palette.text_primary)
                            .strong()
                    );
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new("or paste one from the clipboard (Ctrl+V)")
                            .size(14.0)
                            .color(palette.text_secondary)
                    );
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new("PNG, JPEG, BMP, GIF, TIFF and WebP are supported")
                            .size(12.0)
                            .color(palette.text_muted)
                    );
                });
            });

        frame.response.interact(Sense::click())
    }
}
