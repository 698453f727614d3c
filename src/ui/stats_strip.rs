use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::model::{Phase, Stats};
use crate::ui::theme;

fn stat(ui: &mut Ui, icon: &str, value: usize, label: &str, color: Color32) {
    egui::Frame::none()
        .fill(theme::BG_CARD)
        .rounding(egui::Rounding::same(theme::CARD_ROUNDING))
        .inner_margin(egui::Margin::symmetric(12.0, 6.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(18.0).color(color));
                ui.vertical(|ui| {
                    ui.label(RichText::new(value.to_string()).size(17.0).strong());
                    ui.label(RichText::new(label).font(theme::font_small()).color(theme::TEXT_DIM));
                });
            });
        });
}

/// Dashboard counters over the whole collection.
pub fn show_stats_strip(stats: &Stats, ui: &mut Ui) {
    ui.horizontal(|ui| {
        stat(ui, icons::FOLDERS, stats.total, "Total Projects", theme::ACCENT);
        stat(ui, Phase::InProgress.icon(), stats.in_progress, "In Progress", Phase::InProgress.color());
        stat(ui, Phase::Completed.icon(), stats.completed, "Completed", Phase::Completed.color());
        stat(ui, icons::USERS, stats.members, "Team Members", theme::TEXT_SECONDARY);
    });
}
