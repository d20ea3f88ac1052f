//! Light and dark themes

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

use crate::storage::Theme;

/// Colors used by the views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    // Background colors
    pub bg_base: Color32,
    pub bg_card: Color32,
    pub bg_input: Color32,
    pub bg_hover: Color32,

    // Accent colors
    pub accent: Color32,
    pub success: Color32,
    pub error: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub border: Color32,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        bg_base: Color32::from_rgb(244, 246, 250),
        bg_card: Color32::from_rgb(255, 255, 255),
        bg_input: Color32::from_rgb(236, 239, 244),
        bg_hover: Color32::from_rgb(226, 231, 240),
        accent: Color32::from_rgb(52, 120, 246),
        success: Color32::from_rgb(39, 174, 96),
        error: Color32::from_rgb(214, 64, 52),
        text_primary: Color32::from_rgb(28, 32, 40),
        text_secondary: Color32::from_rgb(88, 96, 110),
        text_muted: Color32::from_rgb(140, 148, 160),
        border: Color32::from_rgb(210, 216, 226),
    };

    pub const DARK: Palette = Palette {
        bg_base: Color32::from_rgb(18, 18, 24),
        bg_card: Color32::from_rgb(28, 28, 36),
        bg_input: Color32::from_rgb(38, 38, 48),
        bg_hover: Color32::from_rgb(48, 48, 60),
        accent: Color32::from_rgb(88, 166, 255),
        success: Color32::from_rgb(46, 204, 113),
        error: Color32::from_rgb(231, 76, 60),
        text_primary: Color32::from_rgb(240, 240, 245),
        text_secondary: Color32::from_rgb(160, 160, 175),
        text_muted: Color32::from_rgb(100, 100, 115),
        border: Color32::from_rgb(50, 50, 65),
    };

    pub fn for_theme(theme: Theme) -> &'static Palette {
        if theme.is_dark() {
            &Self::DARK
        } else {
            &Self::LIGHT
        }
    }

    /// Palette matching the visuals currently installed on `ctx`
    pub fn current(ctx: &egui::Context) -> &'static Palette {
        Self::for_theme(Theme::from_dark(ctx.style().visuals.dark_mode))
    }
}

/// Install `theme` on the egui context
pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let palette = Palette::for_theme(theme);
    let mut style = (*ctx.style()).clone();

    let mut visuals = if theme.is_dark() {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    // Window and panel backgrounds
    visuals.window_fill = palette.bg_card;
    visuals.panel_fill = palette.bg_base;
    visuals.faint_bg_color = palette.bg_input;
    visuals.extreme_bg_color = palette.bg_input;

    // Widget colors
    visuals.widgets.noninteractive.bg_fill = palette.bg_card;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_secondary);
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);

    visuals.widgets.inactive.bg_fill = palette.bg_input;
    visuals.widgets.inactive.weak_bg_fill = palette.bg_input;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);

    visuals.widgets.hovered.bg_fill = palette.bg_hover;
    visuals.widgets.hovered.weak_bg_fill = palette.bg_hover;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);

    visuals.widgets.active.bg_fill = palette.accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.active.rounding = Rounding::same(6.0);

    visuals.selection.bg_fill = color_with_alpha(palette.accent, 77);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.hyperlink_color = palette.accent;

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_shadow.blur = 8.0;
    visuals.window_stroke = Stroke::new(1.0, palette.border);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
