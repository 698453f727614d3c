pub mod dialogs;
pub mod filter_bar;
pub mod gantt_chart;
pub mod kanban;
pub mod project_detail;
pub mod project_form;
pub mod project_table;
pub mod stats_strip;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;

use egui::{Color32, RichText, Ui};

use crate::model::ProjectId;

/// Requests a view makes of the app; applied after the frame's panels are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    None,
    Select(ProjectId),
    Delete(ProjectId),
    Advance(ProjectId),
    Retreat(ProjectId),
    Add,
    ResetFilter,
}

/// Shown instead of a view when there is nothing to draw.
pub fn show_empty_state(collection_empty: bool, ui: &mut Ui) -> ProjectAction {
    let mut action = ProjectAction::None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(
            RichText::new(egui_phosphor::regular::FOLDER_OPEN)
                .size(40.0)
                .color(theme::TEXT_DIM),
        );
        ui.add_space(8.0);
        if collection_empty {
            ui.label(RichText::new("No projects yet").size(16.0).strong());
            ui.label(
                RichText::new("Add a project, import a Google Sheet, or load the sample data from the File menu.")
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(10.0);
            let btn = egui::Button::new(
                RichText::new(format!("{}  Add Project", egui_phosphor::regular::PLUS))
                    .color(Color32::WHITE),
            )
            .fill(theme::ACCENT);
            if ui.add_sized([140.0, 30.0], btn).clicked() {
                action = ProjectAction::Add;
            }
        } else {
            ui.label(RichText::new("No projects match the current filters").size(16.0).strong());
            ui.add_space(10.0);
            if ui.add_sized([140.0, 30.0], egui::Button::new("Reset Filters")).clicked() {
                action = ProjectAction::ResetFilter;
            }
        }
    });
    action
}
