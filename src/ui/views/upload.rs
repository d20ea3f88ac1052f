//! Upload view - language choice and image intake

use egui::RichText;
use std::path::PathBuf;

use crate::config::LanguageOption;
use crate::session::SessionState;
use crate::ui::components::DropZone;
use crate::ui::state::{UiAction, UploadViewState};
use crate::ui::theme::Palette;

const PATH_FIELD_ID: &str = "image_path_field";

/// Render the upload view
pub fn render_upload_view(
    ui: &mut egui::Ui,
    session: &mut SessionState,
    view_state: &mut UploadViewState,
    languages: &[LanguageOption],
) -> Option<UiAction> {
    let palette = Palette::current(ui.ctx());
    let mut action = None;

    ui.label(
        RichText::new("Extract text from any image")
            .size(14.0)
            .color(palette.text_secondary)
    );
    ui.add_space(16.0);

    // Language selector
    ui.horizontal(|ui| {
        ui.label("Language:");
        let selected = languages
            .iter()
            .find(|l| l.code == session.language)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| session.language.clone());

        egui::ComboBox::from_id_salt("recognition_language")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for language in languages {
                    ui.selectable_value(&mut session.language, language.code.clone(), &language.name);
                }
            });
    });

    ui.add_space(16.0);

    if DropZone::new(view_state.hovering_files).show(ui).clicked() {
        view_state.focus_path_field = true;
    }

    ui.add_space(16.0);

    // Open from path
    ui.horizontal(|ui| {
        let field = ui.add(
            egui::TextEdit::singleline(&mut session.staged_path)
                .id_salt(PATH_FIELD_ID)
                .hint_text("Path to an image file")
                .desired_width(ui.available_width() - 220.0)
        );
        if view_state.focus_path_field {
            field.request_focus();
            view_state.focus_path_field = false;
        }

        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let path = session.staged_path.trim();
        let open = ui.add_enabled(!path.is_empty(), egui::Button::new("Open"));
        if (open.clicked() || submitted) && !path.is_empty() {
            action = Some(UiAction::OpenPath(PathBuf::from(path)));
        }

        if ui.button("Paste image").clicked() {
            action = Some(UiAction::PasteImage { explicit: true });
        }
    });

    action
}
