use chrono::NaiveDate;
use egui::{Color32, Pos2, RichText, Sense, Stroke, Ui};

use crate::format;
use crate::model::filter::{sort_by_date, DateKey, SortOrder};
use crate::model::{calculate_health, Project};
use crate::ui::{theme, ProjectAction};

const CARD_WIDTH: f32 = 340.0;
const SPINE_GAP: f32 = 28.0;

/// Vertical timeline: cards ordered by start date, alternating either side of a spine.
pub fn show_timeline(projects: &[Project], today: NaiveDate, ui: &mut Ui) -> ProjectAction {
    let mut action = ProjectAction::None;
    let mut ordered = projects.to_vec();
    sort_by_date(&mut ordered, DateKey::Start, SortOrder::Ascending);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let full_width = ui.available_width();
            let spine_x = ui.min_rect().left() + full_width / 2.0;
            let top = ui.cursor().top();
            // Reserved so the spine is painted beneath the cards.
            let spine = ui.painter().add(egui::Shape::Noop);

            for (i, project) in ordered.iter().enumerate() {
                let left_side = i % 2 == 0;
                ui.horizontal(|ui| {
                    let offset = if left_side {
                        (full_width / 2.0 - SPINE_GAP - CARD_WIDTH).max(0.0)
                    } else {
                        full_width / 2.0 + SPINE_GAP
                    };
                    ui.add_space(offset);
                    let response = show_card(project, today, ui);
                    if response.clicked() {
                        action = ProjectAction::Select(project.id);
                    }

                    // Dot on the spine, level with the card's title
                    let y = response.rect.top() + 18.0;
                    ui.painter()
                        .circle_filled(Pos2::new(spine_x, y), 6.0, project.phase.color());
                    ui.painter().circle_stroke(
                        Pos2::new(spine_x, y),
                        6.0,
                        Stroke::new(2.0, theme::BG_DARK),
                    );
                });
                ui.add_space(12.0);
            }

            let bottom = ui.cursor().top();
            ui.painter().set(
                spine,
                egui::Shape::line_segment(
                    [Pos2::new(spine_x, top), Pos2::new(spine_x, bottom)],
                    Stroke::new(2.0, theme::BORDER_SUBTLE),
                ),
            );
        });

    action
}

fn show_card(project: &Project, today: NaiveDate, ui: &mut Ui) -> egui::Response {
    let health = calculate_health(project, today);
    let frame = egui::Frame::none()
        .fill(theme::BG_CARD)
        .rounding(egui::Rounding::same(theme::CARD_ROUNDING))
        .stroke(Stroke::new(1.0, theme::BORDER_SUBTLE))
        .inner_margin(egui::Margin::same(10.0));

    let inner = frame.show(ui, |ui| {
        ui.set_width(CARD_WIDTH - 20.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(&project.name).strong().size(14.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                theme::phase_badge(ui, project.phase);
            });
        });
        ui.label(
            RichText::new(format!(
                "{} {} – {}  ({})",
                egui_phosphor::regular::CALENDAR,
                format::format_date(project.start_date),
                format::format_date(project.end_date),
                format::format_duration(project.duration_days()),
            ))
            .size(11.0)
            .color(theme::TEXT_SECONDARY),
        );
        if !project.description.is_empty() {
            ui.label(
                RichText::new(format::truncate_text(&project.description, 90))
                    .size(11.5)
                    .color(theme::TEXT_SECONDARY),
            );
        }
        ui.add_space(4.0);
        ui.add(
            egui::ProgressBar::new(f32::from(project.progress) / 100.0)
                .desired_width(ui.available_width())
                .fill(format::progress_color(project.progress))
                .text(format!(
                    "{}% · {}",
                    project.progress,
                    format::progress_label(project.progress)
                )),
        );
        ui.horizontal(|ui| {
            for member in &project.team {
                member_chip(ui, member);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} {}", health.icon(), health.label()))
                        .size(11.0)
                        .color(health.color()),
                );
            });
        });
    });

    inner.response.interact(Sense::click())
}

/// Round avatar with a member's initials; full name on hover.
pub fn member_chip(ui: &mut Ui, name: &str) {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(22.0, 22.0), Sense::hover());
    ui.painter()
        .circle_filled(rect.center(), 11.0, Color32::from_rgb(73, 80, 99));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        format::initials(name),
        theme::font_small(),
        theme::TEXT_PRIMARY,
    );
    response.on_hover_text(name);
}
