use egui::{RichText, Sense, Stroke, Ui};
use egui_phosphor::regular as icons;

use crate::format;
use crate::model::filter::{sort_by_date, DateKey, SortOrder};
use crate::model::{Phase, Project};
use crate::ui::timeline_view::member_chip;
use crate::ui::{theme, ProjectAction};

const COLUMNS: [Phase; 3] = [Phase::Planning, Phase::InProgress, Phase::Completed];

/// Board with one column per sequenced phase, soonest deadline first.
/// Side-state projects are counted, not shown.
pub fn show_kanban(projects: &[Project], ui: &mut Ui) -> ProjectAction {
    let mut action = ProjectAction::None;

    let off_board = projects.iter().filter(|p| !p.phase.is_sequenced()).count();
    if off_board > 0 {
        ui.label(
            RichText::new(format!(
                "{} {off_board} on-hold or cancelled project(s) are not shown on the board",
                icons::INFO
            ))
            .size(11.0)
            .color(theme::TEXT_DIM),
        );
        ui.add_space(4.0);
    }

    let mut by_deadline = projects.to_vec();
    sort_by_date(&mut by_deadline, DateKey::End, SortOrder::Ascending);

    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for phase in COLUMNS {
                    let cards: Vec<&Project> =
                        by_deadline.iter().filter(|p| p.phase == phase).collect();
                    show_column(phase, &cards, &mut action, ui);
                }
            });
        });

    action
}

fn show_column(phase: Phase, cards: &[&Project], action: &mut ProjectAction, ui: &mut Ui) {
    egui::Frame::none()
        .fill(theme::BG_PANEL)
        .rounding(egui::Rounding::same(theme::CARD_ROUNDING))
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.set_width(theme::KANBAN_COLUMN_WIDTH);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("{} {}", phase.icon(), phase.label()))
                        .strong()
                        .color(phase.color()),
                );
                ui.label(RichText::new(format!("({})", cards.len())).color(theme::TEXT_DIM));
            });
            ui.add_space(6.0);

            egui::ScrollArea::vertical()
                .id_salt(("kanban", phase.code()))
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if cards.is_empty() {
                        ui.label(RichText::new("Nothing here").italics().color(theme::TEXT_DIM));
                    }
                    for project in cards {
                        show_card(project, action, ui);
                        ui.add_space(6.0);
                    }
                });
        });
}

fn show_card(project: &Project, action: &mut ProjectAction, ui: &mut Ui) {
    let inner = egui::Frame::none()
        .fill(theme::BG_CARD)
        .rounding(egui::Rounding::same(theme::CARD_ROUNDING))
        .stroke(Stroke::new(1.0, theme::BORDER_SUBTLE))
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&project.name).strong());
            ui.label(
                RichText::new(format!(
                    "{} → {}",
                    format::format_date(project.start_date),
                    format::format_date(project.end_date)
                ))
                .size(10.5)
                .color(theme::TEXT_SECONDARY),
            );
            ui.add(
                egui::ProgressBar::new(f32::from(project.progress) / 100.0)
                    .desired_height(6.0)
                    .fill(project.phase.color()),
            );
            if !project.child_tasks.is_empty() {
                ui.label(
                    RichText::new(format!(
                        "{} {}/{} tasks",
                        icons::LIST_CHECKS,
                        project.completed_child_tasks(),
                        project.child_tasks.len()
                    ))
                    .size(10.5)
                    .color(theme::TEXT_DIM),
                );
            }
            ui.horizontal(|ui| {
                for member in &project.team {
                    member_chip(ui, member);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let next = project.phase.next();
                    if ui
                        .add_enabled(next != project.phase, egui::Button::new(icons::ARROW_RIGHT).small())
                        .on_hover_text(format!("Move to {}", next.label()))
                        .clicked()
                    {
                        *action = ProjectAction::Advance(project.id);
                    }
                    let previous = project.phase.previous();
                    if ui
                        .add_enabled(
                            previous != project.phase,
                            egui::Button::new(icons::ARROW_LEFT).small(),
                        )
                        .on_hover_text(format!("Move back to {}", previous.label()))
                        .clicked()
                    {
                        *action = ProjectAction::Retreat(project.id);
                    }
                });
            });
        });

    let card = inner.response.interact(Sense::click());
    if card.clicked() && *action == ProjectAction::None {
        *action = ProjectAction::Select(project.id);
    }
}
