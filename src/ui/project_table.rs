use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::format;
use crate::model::filter::{sort_by_key, SortKey, SortOrder};
use crate::model::{Project, ProjectId};
use crate::ui::{theme, ProjectAction};

const NAME_WIDTH: f32 = 200.0;
const PHASE_WIDTH: f32 = 110.0;
const DATE_WIDTH: f32 = 90.0;
const PROGRESS_WIDTH: f32 = 110.0;

/// Clicking the active column flips the order; clicking another starts ascending.
fn next_sort(current: (SortKey, SortOrder), clicked: SortKey) -> (SortKey, SortOrder) {
    match current {
        (key, SortOrder::Ascending) if key == clicked => (key, SortOrder::Descending),
        (key, SortOrder::Descending) if key == clicked => (key, SortOrder::Ascending),
        _ => (clicked, SortOrder::Ascending),
    }
}

fn header_cell(ui: &mut Ui, key: SortKey, width: f32, sort: &mut (SortKey, SortOrder)) {
    let arrow = match *sort {
        (active, SortOrder::Ascending) if active == key => icons::CARET_UP,
        (active, SortOrder::Descending) if active == key => icons::CARET_DOWN,
        _ => "",
    };
    let text = RichText::new(format!("{} {arrow}", key.label().to_uppercase()))
        .size(10.0)
        .strong()
        .color(theme::TEXT_DIM);
    let clicked = ui
        .add_sized([width, 18.0], egui::Button::new(text).frame(false))
        .clicked();
    if clicked {
        *sort = next_sort(*sort, key);
    }
}

/// Sortable list of projects. Rows select, the trailing button deletes.
pub fn show_project_table(
    projects: &[Project],
    sort: &mut (SortKey, SortOrder),
    selected: Option<ProjectId>,
    ui: &mut Ui,
) -> ProjectAction {
    let mut action = ProjectAction::None;

    // Column headers
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;
        header_cell(ui, SortKey::Id, 36.0, sort);
        header_cell(ui, SortKey::Name, NAME_WIDTH, sort);
        header_cell(ui, SortKey::Phase, PHASE_WIDTH, sort);
        header_cell(ui, SortKey::StartDate, DATE_WIDTH, sort);
        header_cell(ui, SortKey::EndDate, DATE_WIDTH, sort);
        header_cell(ui, SortKey::Progress, PROGRESS_WIDTH, sort);
        ui.label(RichText::new("TEAM").size(10.0).strong().color(theme::TEXT_DIM));
    });
    ui.separator();

    let mut rows = projects.to_vec();
    sort_by_key(&mut rows, sort.0, sort.1);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, project) in rows.iter().enumerate() {
                let is_selected = selected == Some(project.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame::none()
                    .fill(row_bg)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(6.0, 4.0));

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;
                        cell(ui, 36.0, |ui| {
                            ui.label(
                                RichText::new(format!("#{}", project.id))
                                    .size(11.0)
                                    .color(theme::TEXT_DIM),
                            );
                        });
                        cell(ui, NAME_WIDTH, |ui| {
                            let color = if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            };
                            ui.add(
                                egui::Label::new(RichText::new(&project.name).size(12.0).color(color))
                                    .truncate(),
                            );
                        });
                        cell(ui, PHASE_WIDTH, |ui| theme::phase_badge(ui, project.phase));
                        cell(ui, DATE_WIDTH, |ui| {
                            ui.label(date_text(format::format_date(project.start_date)));
                        });
                        cell(ui, DATE_WIDTH, |ui| {
                            ui.label(date_text(format::format_date(project.end_date)));
                        });
                        cell(ui, PROGRESS_WIDTH, |ui| {
                            ui.add(
                                egui::ProgressBar::new(f32::from(project.progress) / 100.0)
                                    .desired_width(PROGRESS_WIDTH - 8.0)
                                    .fill(format::progress_color(project.progress))
                                    .text(format!("{}%", project.progress)),
                            );
                        });

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let delete = ui.add(
                                egui::Button::new(
                                    RichText::new(icons::TRASH).size(12.0).color(theme::TEXT_DIM),
                                )
                                .frame(false),
                            );
                            if delete.on_hover_text("Delete project").clicked() {
                                action = ProjectAction::Delete(project.id);
                            }
                            ui.add(
                                egui::Label::new(
                                    RichText::new(project.team.join(", "))
                                        .size(11.0)
                                        .color(theme::TEXT_SECONDARY),
                                )
                                .truncate(),
                            );
                        });
                    });
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("project-row", project.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() && action == ProjectAction::None {
                    action = ProjectAction::Select(project.id);
                }

                ui.add_space(1.0);
            }
        });

    action
}

fn cell(ui: &mut Ui, width: f32, add_contents: impl FnOnce(&mut Ui)) {
    ui.allocate_ui_with_layout(
        egui::vec2(width, 18.0),
        egui::Layout::left_to_right(egui::Align::Center),
        |ui| {
            ui.set_width(width);
            add_contents(ui);
        },
    );
}

fn date_text(text: String) -> RichText {
    RichText::new(text).size(11.0).color(theme::TEXT_SECONDARY)
}
