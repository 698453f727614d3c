use egui::{RichText, Ui};

use crate::model::{AssigneeFilter, Phase, ProjectFilter, StatusFilter};
use crate::ui::theme;

fn status_text(status: StatusFilter) -> String {
    match status {
        StatusFilter::All => "All phases".to_string(),
        StatusFilter::Phase(phase) => format!("{} {}", phase.icon(), phase.label()),
    }
}

fn assignee_text(assignee: &AssigneeFilter) -> &str {
    match assignee {
        AssigneeFilter::All => "All members",
        AssigneeFilter::Member(name) => name,
    }
}

/// Status, assignee and search controls. Returns the new filter when it changed.
pub fn show_filter_bar(
    current: &ProjectFilter,
    members: &[String],
    ui: &mut Ui,
) -> Option<ProjectFilter> {
    let mut filter = current.clone();

    ui.horizontal(|ui| {
        ui.label(RichText::new(egui_phosphor::regular::FUNNEL).color(theme::TEXT_SECONDARY));

        egui::ComboBox::from_id_salt("status_filter")
            .width(150.0)
            .selected_text(status_text(filter.status))
            .show_ui(ui, |ui| {
                let all = StatusFilter::All;
                ui.selectable_value(&mut filter.status, all, status_text(all));
                for phase in Phase::all() {
                    let status = StatusFilter::Phase(*phase);
                    ui.selectable_value(&mut filter.status, status, status_text(status));
                }
            });

        egui::ComboBox::from_id_salt("assignee_filter")
            .width(160.0)
            .selected_text(assignee_text(&filter.assignee).to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.assignee, AssigneeFilter::All, "All members");
                for member in members {
                    ui.selectable_value(
                        &mut filter.assignee,
                        AssigneeFilter::Member(member.clone()),
                        member.as_str(),
                    );
                }
            });

        ui.add(
            egui::TextEdit::singleline(&mut filter.search)
                .hint_text(format!(
                    "{} Search name or description",
                    egui_phosphor::regular::MAGNIFYING_GLASS
                ))
                .desired_width(240.0),
        );

        if ui
            .add_enabled(filter.is_active(), egui::Button::new("Reset"))
            .clicked()
        {
            filter = ProjectFilter::default();
        }
    });

    (filter != *current).then_some(filter)
}
