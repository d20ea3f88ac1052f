//! TextLens window

use egui::RichText;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::app::TextLensApp;
use crate::config::LanguageOption;
use crate::session::{SessionState, SubmitError, UiView};
use crate::storage::{PreferenceStore, Theme};
use crate::ui::state::{UiAction, ViewStates};
use crate::ui::theme::{self, Palette};
use crate::ui::views::{render_processing_view, render_result_view, render_upload_view};
use crate::vision::{ImageInput, InputError};

/// The main window
pub struct TextLensUi {
    coordinator: TextLensApp,
    session: SessionState,
    views: ViewStates,
    preferences: PreferenceStore,
    theme: Theme,
    /// Theme currently installed on the egui context
    applied_theme: Option<Theme>,
    languages: Vec<LanguageOption>,
    /// URI of the preview image registered with egui
    loaded_preview: Option<String>,
    clipboard: Option<arboard::Clipboard>,
    /// Image named on the command line, submitted on the first frame
    startup_image: Option<PathBuf>,
}

impl TextLensUi {
    pub fn new(
        coordinator: TextLensApp,
        preferences: PreferenceStore,
        language: Option<String>,
        startup_image: Option<PathBuf>,
    ) -> Self {
        let (languages, default_language) = {
            let state = coordinator.shared_state.read();
            (
                state.config.general.languages.clone(),
                state.config.general.default_language.clone(),
            )
        };
        let theme = preferences.load_theme();
        info!("Theme: {}", theme.name());

        Self {
            coordinator,
            session: SessionState::new(language.unwrap_or(default_language)),
            views: ViewStates::default(),
            preferences,
            theme,
            applied_theme: None,
            languages,
            loaded_preview: None,
            clipboard: None,
            startup_image,
        }
    }

    /// Create eframe options for the window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([760.0, 720.0])
                .with_min_inner_size([520.0, 480.0])
                .with_drag_and_drop(true)
                .with_title("TextLens"),
            ..Default::default()
        }
    }

    fn submit(&mut self, input: ImageInput) {
        let language = self.session.language.clone();
        match self.coordinator.submit(&mut self.session, input, &language) {
            Ok(job_id) => debug!(job_id = %job_id, "Job started"),
            Err(SubmitError::Invalid(e)) => {
                warn!("Rejected input: {}", e);
                self.session.notify(InputError::USER_MESSAGE);
            }
            Err(e @ SubmitError::Busy) => {
                warn!("{}", e);
                self.session.notify(e.user_message());
            }
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Submit(input) => self.submit(input),
            UiAction::OpenPath(path) => match ImageInput::from_path(&path) {
                Ok(input) => self.submit(input),
                Err(e) => {
                    warn!("Could not open {:?}: {}", path, e);
                    self.session.notify(InputError::USER_MESSAGE);
                }
            },
            UiAction::PasteImage { explicit } => self.paste_from_clipboard(explicit),
            UiAction::CopyText => {
                ctx.copy_text(self.session.output_text.clone());
                self.views.result.mark_copied(Instant::now());
            }
            UiAction::StartOver => {
                self.session.reset();
                self.views.result.reset();
            }
            UiAction::ToggleTheme(dark) => {
                self.theme = Theme::from_dark(dark);
                if let Err(e) = self.preferences.save_theme(self.theme) {
                    warn!("Failed to save theme preference: {}", e);
                }
            }
            UiAction::DismissNotice => self.session.dismiss_notice(),
        }
    }

    /// Submit the clipboard image. A paste shortcut without an image in the
    /// clipboard is ignored; the paste button reports it.
    fn paste_from_clipboard(&mut self, explicit: bool) {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!("Clipboard unavailable: {}", e);
                    if explicit {
                        self.session.notify(InputError::USER_MESSAGE);
                    }
                    return;
                }
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return;
        };

        match clipboard.get_image() {
            Ok(image) => {
                let input = ImageInput::from_rgba(
                    "clipboard.png",
                    image.width as u32,
                    image.height as u32,
                    image.bytes.into_owned(),
                );
                match input {
                    Ok(input) => self.submit(input),
                    Err(e) => {
                        warn!("Clipboard image rejected: {}", e);
                        self.session.notify(InputError::USER_MESSAGE);
                    }
                }
            }
            Err(e) => {
                debug!("No image in clipboard: {}", e);
                if explicit {
                    self.session.notify(InputError::USER_MESSAGE);
                }
            }
        }
    }

    /// Turn files dropped on the window and paste shortcuts into actions
    fn collect_input(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let (hovering, dropped, paste) = ctx.input(|i| {
            let paste = i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)))
                || (i.modifiers.command && i.key_pressed(egui::Key::V));
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.first().cloned(), paste)
        });
        self.views.upload.hovering_files = hovering;

        let accepting = self.session.is_visible(UiView::Uploading) && self.session.notice.is_none();
        if !accepting {
            return None;
        }

        if let Some(file) = dropped {
            return match (file.bytes, file.path) {
                (Some(bytes), path) => {
                    let name = path
                        .as_deref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or(file.name);
                    Some(UiAction::Submit(ImageInput::from_bytes(name, Some(file.mime), bytes.to_vec())))
                }
                (None, Some(path)) => Some(UiAction::OpenPath(path)),
                (None, None) => {
                    warn!("Dropped item carried no data");
                    None
                }
            };
        }

        // Text pasted into the path field is not an image request
        if paste && !ctx.wants_keyboard_input() {
            return Some(UiAction::PasteImage { explicit: false });
        }

        None
    }

    /// Register the current preview image with egui, dropping the old one
    fn sync_preview(&mut self, ctx: &egui::Context) {
        let current = self.session.preview.as_ref().map(|p| p.preview_uri());
        if current == self.loaded_preview {
            return;
        }

        if let Some(old) = self.loaded_preview.take() {
            ctx.forget_image(&old);
        }
        if let (Some(uri), Some(preview)) = (&current, &self.session.preview) {
            ctx.include_bytes(uri.clone(), preview.bytes.clone());
        }
        self.loaded_preview = current;
    }

    fn render_header(&self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading(RichText::new("TextLens").size(24.0).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut dark = self.theme.is_dark();
                if ui.checkbox(&mut dark, "Dark mode").changed() {
                    action = Some(UiAction::ToggleTheme(dark));
                }
            });
        });
        action
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        let palette = Palette::current(ui.ctx());
        let state = self.coordinator.shared_state.read();
        ui.horizontal(|ui| {
            let summary = ui.label(
                RichText::new(format!(
                    "Language: {}  |  Completed: {}  |  Failed: {}",
                    state.config.general.language_name(&self.session.language),
                    state.runtime.jobs_completed,
                    state.runtime.jobs_failed
                ))
                .size(12.0)
                .color(palette.text_muted)
            );
            if let Some(error) = &state.runtime.last_error {
                summary.on_hover_text(format!("Last error: {}", error));
            }
        });
    }

    fn render_notice(&self, ctx: &egui::Context) -> Option<UiAction> {
        let message = self.session.notice.as_ref()?;
        let palette = Palette::current(ctx);
        let mut action = None;

        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(message).color(palette.error));
                ui.add_space(12.0);
                let ok = ui.button("OK");
                if ok.clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    action = Some(UiAction::DismissNotice);
                }
            });

        action
    }
}

impl eframe::App for TextLensUi {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.applied_theme != Some(self.theme) {
            theme::apply_theme(ctx, self.theme);
            self.applied_theme = Some(self.theme);
        }

        self.coordinator.poll_events(&mut self.session);

        let mut actions = Vec::new();
        if let Some(path) = self.startup_image.take() {
            actions.push(UiAction::OpenPath(path));
        }
        actions.extend(self.collect_input(ctx));

        self.sync_preview(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            egui::Frame::none()
                .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                .show(ui, |ui| {
                    actions.extend(self.render_header(ui));
                });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.render_footer(ui);
        });

        let blocked = self.session.notice.is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(24.0).show(ui, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| match self.session.view() {
                        UiView::Uploading => {
                            actions.extend(render_upload_view(
                                ui,
                                &mut self.session,
                                &mut self.views.upload,
                                &self.languages,
                            ));
                        }
                        UiView::Processing => render_processing_view(ui, &self.session),
                        UiView::Result => {
                            actions.extend(render_result_view(
                                ui,
                                &mut self.session,
                                &self.views.result,
                            ));
                        }
                    });
                });
            });
        });

        actions.extend(self.render_notice(ctx));

        for action in actions {
            self.handle_action(ctx, action);
        }

        // Job events arrive from other threads
        if self.session.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl Drop for TextLensUi {
    fn drop(&mut self) {
        self.session.cancel_active();
    }
}

/// Run the window until it is closed
pub fn run(app: TextLensUi) -> Result<(), eframe::Error> {
    eframe::run_native(
        "TextLens",
        TextLensUi::options(),
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
