//! Stat card component for the result counts

use egui::{RichText, Rounding};

use crate::ui::theme::Palette;

/// A small card showing one statistic line
pub struct StatCard {
    pub text: String,
}

impl StatCard {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let palette = Palette::current(ui.ctx());

        egui::Frame::none()
            .fill(palette.bg_card)
            .stroke(egui::Stroke::new(1.0, palette.border))
            .rounding(Rounding::same(8.0))
            .inner_margin(egui::Margin::symmetric(14.0, 10.0))
            .show(ui, |ui| {
                ui.label(
                    RichText::new(&self.text)
                        .size(15.0)
                        .color(palette.text_primary)
                        .strong()
                );
            });
    }
}
