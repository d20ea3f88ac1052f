//! Result view - recognized text, counts and translation

use egui::RichText;
use std::time::Instant;

use crate::session::SessionState;
use crate::ui::components::StatCard;
use crate::ui::state::{ResultViewState, UiAction};
use crate::ui::theme::{color_with_alpha, Palette};

/// Render the result view
pub fn render_result_view(
    ui: &mut egui::Ui,
    session: &mut SessionState,
    view_state: &ResultViewState,
) -> Option<UiAction> {
    let palette = Palette::current(ui.ctx());
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Recognized text").size(18.0));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let now = Instant::now();
            let copied = view_state.show_copied(now);
            let label = if copied {
                RichText::new("✓ Copied!").color(palette.success)
            } else {
                RichText::new("Copy")
            };
            let button = ui
                .add_enabled(!copied, egui::Button::new(label))
                .on_hover_text("Copy to Clipboard");
            if button.clicked() {
                action = Some(UiAction::CopyText);
            }
            // Repaint once the confirmation should revert
            if let Some(remaining) = view_state.feedback_remaining(now) {
                ui.ctx().request_repaint_after(remaining);
            }
        });
    });

    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .max_height(280.0)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut session.output_text)
                    .desired_width(f32::INFINITY)
                    .desired_rows(10)
            );
        });

    ui.add_space(12.0);

    if let Some(result) = &session.result {
        ui.horizontal(|ui| {
            StatCard::new(result.stats.characters_label()).show(ui);
            ui.add_space(12.0);
            StatCard::new(result.stats.words_label()).show(ui);
        });
    }

    if let Some(translation) = session.translation() {
        ui.add_space(16.0);
        egui::Frame::none()
            .fill(color_with_alpha(palette.accent, 26))
            .stroke(egui::Stroke::new(1.0, palette.accent))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("Translation").color(palette.accent).strong());
                ui.add_space(4.0);
                ui.label(RichText::new(translation).color(palette.text_primary));
            });
    }

    ui.add_space(20.0);

    if ui
        .add(
            egui::Button::new(RichText::new("Start Over").color(egui::Color32::WHITE))
                .fill(palette.accent)
                .min_size(egui::vec2(120.0, 36.0))
        )
        .clicked()
    {
        action = Some(UiAction::StartOver);
    }

    action
}
