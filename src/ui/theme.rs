use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(22, 24, 31);
pub const BG_PANEL: Color32 = Color32::from_rgb(29, 31, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(35, 38, 49);
pub const BG_CARD: Color32 = Color32::from_rgb(38, 41, 53);
pub const BG_FIELD: Color32 = Color32::from_rgb(18, 19, 26);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(60, 110, 190, 50);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(52, 55, 68);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 231, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 156, 175);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 104, 122);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(20, 22, 28);

pub const ACCENT: Color32 = Color32::from_rgb(13, 110, 253);
pub const DANGER: Color32 = Color32::from_rgb(220, 53, 69);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 47, 59);
pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 70);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 44.0;
/// Width of the project-name column left of the Gantt bars.
pub const LABEL_WIDTH: f32 = 200.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 4.0;
pub const CARD_ROUNDING: f32 = 6.0;
pub const KANBAN_COLUMN_WIDTH: f32 = 300.0;
pub const DIALOG_WIDTH: f32 = 420.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

/// Small rounded label in the phase color, used on cards and rows.
pub fn phase_badge(ui: &mut egui::Ui, phase: crate::model::Phase) {
    let text = egui::RichText::new(format!("{} {}", phase.icon(), phase.label()))
        .size(10.5)
        .color(TEXT_ON_BAR);
    egui::Frame::none()
        .fill(phase.color())
        .rounding(Rounding::same(8.0))
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| ui.label(text));
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_CARD;
    visuals.striped = false;

    let rounding = Rounding::same(4.0);
    let widgets = &mut visuals.widgets;
    for (w, fill, border) in [
        (&mut widgets.noninteractive, BG_PANEL, BORDER_SUBTLE),
        (&mut widgets.inactive, Color32::from_rgb(42, 45, 58), BORDER_SUBTLE),
        (&mut widgets.hovered, Color32::from_rgb(52, 56, 71), ACCENT),
        (&mut widgets.active, Color32::from_rgb(60, 64, 80), ACCENT),
        (&mut widgets.open, Color32::from_rgb(50, 54, 68), ACCENT),
    ] {
        w.bg_fill = fill;
        w.weak_bg_fill = fill;
        w.bg_stroke = Stroke::new(1.0, border);
        w.rounding = rounding;
    }
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}
