use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Ui, Window};
use egui_phosphor::regular as icons;

use crate::app::TrackerApp;
use crate::format;
use crate::model::{calculate_health, Project, ProjectId, Workload};
use crate::ui::timeline_view::member_chip;
use crate::ui::{project_form, theme};

/// What the detail window asked for this frame. Applied after the window closes over `app`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailAction {
    None,
    Save,
    Delete,
    Close,
    Advance,
    Retreat,
    ToggleTask(usize),
}

/// Detail and edit window for the selected project.
pub fn show_project_detail(app: &mut TrackerApp, ctx: &Context, today: NaiveDate) {
    let Some(id) = app.selected else {
        return;
    };
    let Some(project) = app.store.get(id).cloned() else {
        app.close_detail();
        return;
    };
    let workloads: Vec<(String, Workload)> = project
        .team
        .iter()
        .map(|m| (m.clone(), app.store.member_workload(m)))
        .collect();

    let mut action = DetailAction::None;
    let mut open = true;

    Window::new(RichText::new(&project.name).strong().size(14.0))
        .id(egui::Id::new("project_detail"))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .default_pos(ctx.screen_rect().right_top() + egui::vec2(-480.0, 80.0))
        .fixed_size([theme::DIALOG_WIDTH + 20.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

            show_summary(&project, today, &mut action, ui);
            ui.add_space(6.0);
            ui.separator();

            if let Some(form) = app.detail_form.as_mut() {
                project_form::show_form_fields(
                    form,
                    &format!("detail_{id}"),
                    project.has_derived_progress(),
                    ui,
                );
            }

            if !project.child_tasks.is_empty() {
                ui.add_space(6.0);
                show_child_tasks(&project, &mut action, ui);
            }

            if !workloads.is_empty() {
                ui.add_space(6.0);
                show_team(&workloads, ui);
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let save = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save).clicked() {
                    action = DetailAction::Save;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                    action = DetailAction::Close;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let delete = egui::Button::new(
                        RichText::new(format!("{} Delete", icons::TRASH)).color(Color32::WHITE),
                    )
                    .fill(theme::DANGER)
                    .rounding(egui::Rounding::same(4.0));
                    if ui.add_sized([90.0, 28.0], delete).clicked() {
                        action = DetailAction::Delete;
                    }
                });
            });
            ui.add_space(2.0);
        });

    if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = DetailAction::Close;
    }
    apply(app, id, action);
}

fn apply(app: &mut TrackerApp, id: ProjectId, action: DetailAction) {
    match action {
        DetailAction::None => {}
        DetailAction::Save => app.save_detail(),
        DetailAction::Delete => app.delete_project(id),
        DetailAction::Close => app.close_detail(),
        DetailAction::Advance => app.advance_phase(id),
        DetailAction::Retreat => app.retreat_phase(id),
        DetailAction::ToggleTask(index) => app.toggle_child_task(id, index),
    }
}

fn show_summary(project: &Project, today: NaiveDate, action: &mut DetailAction, ui: &mut Ui) {
    let health = calculate_health(project, today);
    ui.horizontal(|ui| {
        theme::phase_badge(ui, project.phase);
        ui.label(
            RichText::new(format!("{} {}", health.icon(), health.label()))
                .size(11.5)
                .color(health.color()),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let next = project.phase.next();
            if ui
                .add_enabled(next != project.phase, egui::Button::new(icons::ARROW_RIGHT))
                .on_hover_text(format!("Move to {}", next.label()))
                .clicked()
            {
                *action = DetailAction::Advance;
            }
            let previous = project.phase.previous();
            if ui
                .add_enabled(previous != project.phase, egui::Button::new(icons::ARROW_LEFT))
                .on_hover_text(format!("Move back to {}", previous.label()))
                .clicked()
            {
                *action = DetailAction::Retreat;
            }
        });
    });

    ui.add_space(4.0);
    ui.label(
        RichText::new(format!(
            "{} {}  →  {}",
            icons::CALENDAR,
            format::format_date_long(project.start_date),
            format::format_date_long(project.end_date)
        ))
        .size(11.0)
        .color(theme::TEXT_SECONDARY),
    );
    ui.label(deadline_text(project, today));
}

fn deadline_text(project: &Project, today: NaiveDate) -> RichText {
    let days = format::days_until(project.end_date, today);
    let text = if project.phase == crate::model::Phase::Completed {
        format!("Finished · {}", format::format_duration(project.duration_days()))
    } else if format::is_overdue(project.end_date, today) {
        format!("Overdue by {}", format::format_duration(-days))
    } else if days == 0 {
        "Due today".to_string()
    } else {
        format!("Due in {}", format::format_duration(days))
    };
    let color = if format::is_overdue(project.end_date, today)
        && project.phase != crate::model::Phase::Completed
    {
        theme::DANGER
    } else {
        theme::TEXT_DIM
    };
    RichText::new(text).size(11.0).color(color)
}

fn show_child_tasks(project: &Project, action: &mut DetailAction, ui: &mut Ui) {
    ui.label(
        RichText::new(format!(
            "{} Child tasks ({}/{})",
            icons::LIST_CHECKS,
            project.completed_child_tasks(),
            project.child_tasks.len()
        ))
        .strong(),
    );
    for (index, task) in project.child_tasks.iter().enumerate() {
        let mut done = task.completed;
        if ui.checkbox(&mut done, &task.task).changed() {
            *action = DetailAction::ToggleTask(index);
        }
    }
    ui.label(
        RichText::new("Progress follows the checked tasks.")
            .size(10.5)
            .color(theme::TEXT_DIM),
    );
}

fn show_team(workloads: &[(String, Workload)], ui: &mut Ui) {
    ui.label(RichText::new(format!("{} Team", icons::USERS)).strong());
    ui.horizontal_wrapped(|ui| {
        for (member, load) in workloads {
            member_chip(ui, member);
            ui.label(RichText::new(member).size(11.5))
                .on_hover_text(format!(
                    "{} project(s): {} planning, {} in progress, {} completed",
                    load.total, load.planning, load.in_progress, load.completed
                ));
            ui.add_space(6.0);
        }
    });
}
