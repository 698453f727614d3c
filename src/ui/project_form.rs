use chrono::NaiveDate;
use egui::{RichText, Ui};

use crate::model::project::{child_tasks_from_lines, split_list};
use crate::model::{ChildTask, Phase, Project, ProjectDraft};
use crate::ui::theme;

/// Editable text state behind the add and edit forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub phase: Phase,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u8,
    pub description: String,
    /// Comma-separated.
    pub team: String,
    /// One task per line.
    pub child_tasks: String,
    /// Validation messages from the last submit.
    pub errors: Vec<String>,
}

impl ProjectForm {
    /// Blank form starting today and ending a month out.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            phase: Phase::Planning,
            start_date: today,
            end_date: today + chrono::Duration::days(30),
            progress: 0,
            description: String::new(),
            team: String::new(),
            child_tasks: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            phase: project.phase,
            start_date: project.start_date,
            end_date: project.end_date,
            progress: project.progress,
            description: project.description.clone(),
            team: project.team.join(", "),
            child_tasks: project
                .child_tasks
                .iter()
                .map(|t| t.task.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            errors: Vec::new(),
        }
    }

    /// Draft for a new project.
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            phase: self.phase.code().to_string(),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            progress: i32::from(self.progress),
            description: self.description.clone(),
            team: split_list(&self.team, ','),
            child_tasks: child_tasks_from_lines(&self.child_tasks),
        }
    }

    /// Draft for an edit of `existing`. Tasks whose text is unchanged keep
    /// their completion; progress follows the record while it is derived.
    pub fn to_update_draft(&self, existing: &Project) -> ProjectDraft {
        let mut draft = self.to_draft();
        draft.child_tasks = merge_child_tasks(&existing.child_tasks, draft.child_tasks);
        if existing.has_derived_progress() {
            draft.progress = i32::from(existing.progress);
        }
        draft
    }
}

/// Each old task lends its completion to at most one edited task: the one at
/// the same position if the text matches, otherwise the first unclaimed match.
fn merge_child_tasks(existing: &[ChildTask], edited: Vec<ChildTask>) -> Vec<ChildTask> {
    let mut claimed = vec![false; existing.len()];
    edited
        .into_iter()
        .enumerate()
        .map(|(i, mut task)| {
            let same_slot = existing
                .get(i)
                .filter(|old| old.task == task.task && !claimed[i])
                .map(|_| i);
            let source = same_slot.or_else(|| {
                existing
                    .iter()
                    .enumerate()
                    .position(|(j, old)| old.task == task.task && !claimed[j])
            });
            task.completed = match source {
                Some(j) => {
                    claimed[j] = true;
                    existing[j].completed
                }
                None => false,
            };
            task
        })
        .collect()
}

/// Render the form fields. `progress_locked` disables the progress slider.
pub fn show_form_fields(form: &mut ProjectForm, id_salt: &str, progress_locked: bool, ui: &mut Ui) {
    egui::Grid::new((id_salt, "grid"))
        .num_columns(2)
        .striped(false)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            let label = |ui: &mut Ui, text: &str| {
                ui.label(RichText::new(text).color(theme::TEXT_SECONDARY));
            };

            label(ui, "Name");
            ui.add_sized(
                [260.0, 24.0],
                egui::TextEdit::singleline(&mut form.name).hint_text("Project name..."),
            );
            ui.end_row();

            label(ui, "Phase");
            egui::ComboBox::from_id_salt((id_salt, "phase"))
                .selected_text(format!("{} {}", form.phase.icon(), form.phase.label()))
                .show_ui(ui, |ui| {
                    for phase in Phase::all() {
                        ui.selectable_value(
                            &mut form.phase,
                            *phase,
                            format!("{} {}", phase.icon(), phase.label()),
                        );
                    }
                });
            ui.end_row();

            label(ui, "Start");
            ui.add(
                egui_extras::DatePickerButton::new(&mut form.start_date)
                    .id_salt(&format!("{id_salt}_start")),
            );
            ui.end_row();

            label(ui, "End");
            ui.add(
                egui_extras::DatePickerButton::new(&mut form.end_date)
                    .id_salt(&format!("{id_salt}_end")),
            );
            ui.end_row();

            label(ui, "Progress");
            ui.add_enabled(
                !progress_locked,
                egui::Slider::new(&mut form.progress, 0..=100).suffix("%"),
            )
            .on_disabled_hover_text("Derived from child tasks");
            ui.end_row();

            label(ui, "Team");
            ui.add_sized(
                [260.0, 24.0],
                egui::TextEdit::singleline(&mut form.team).hint_text("Alice, Bob"),
            );
            ui.end_row();

            label(ui, "Description");
            ui.add_sized(
                [260.0, 54.0],
                egui::TextEdit::multiline(&mut form.description),
            );
            ui.end_row();

            label(ui, "Child tasks");
            ui.add_sized(
                [260.0, 72.0],
                egui::TextEdit::multiline(&mut form.child_tasks).hint_text("One task per line"),
            );
            ui.end_row();
        });

    if !form.errors.is_empty() {
        ui.add_space(6.0);
        for error in &form.errors {
            ui.label(
                RichText::new(format!("{} {error}", egui_phosphor::regular::WARNING))
                    .color(theme::DANGER)
                    .size(11.5),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_import::parse_projects;
    use crate::io::storage::{MemoryStore, Persistence};
    use crate::model::ProjectStore;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn draft_splits_team_and_tasks() {
        let mut form = ProjectForm::blank(date(2025, 1, 1));
        form.name = "Launch".into();
        form.team = "Ann, , Bo ".into();
        form.child_tasks = "Plan\n\nShip\n".into();
        let draft = form.to_draft();
        assert_eq!(draft.phase, "planning");
        assert_eq!(draft.end_date, Some(date(2025, 1, 31)));
        assert_eq!(draft.team, vec!["Ann", "Bo"]);
        assert_eq!(draft.child_tasks, vec![ChildTask::new("Plan"), ChildTask::new("Ship")]);
    }

    #[test]
    fn update_keeps_completion_and_derived_progress() {
        let mut project = Project::new(1, "Site", date(2025, 1, 1), date(2025, 2, 1));
        project.child_tasks = vec![ChildTask::new("Design"), ChildTask::new("Build")];
        project.child_tasks[0].completed = true;
        project.recompute_progress();

        let mut form = ProjectForm::from_project(&project);
        assert_eq!(form.child_tasks, "Design\nBuild");
        form.progress = 10;
        form.child_tasks = "Design\nBuild\nTest".into();

        let draft = form.to_update_draft(&project);
        assert_eq!(draft.progress, 50);
        let done: Vec<bool> = draft.child_tasks.iter().map(|t| t.completed).collect();
        assert_eq!(done, vec![true, false, false]);
    }

    #[test]
    fn renaming_an_imported_project_keeps_its_progress() {
        let csv = "Project Name,Progress,Child Tasks\nSite,65,x; y\n";
        let imported = parse_projects(csv, date(2025, 1, 1)).unwrap();
        let (mut store, _) = ProjectStore::open(Persistence::new(MemoryStore::default()));
        let ticket = store.begin_import().unwrap();
        let _ = store.complete_import(ticket, Ok(imported)).unwrap();
        assert_eq!(store.get(1).unwrap().progress, 65);

        let mut form = ProjectForm::from_project(store.get(1).unwrap());
        form.name = "Site v2".into();
        let draft = form.to_update_draft(store.get(1).unwrap());
        let _ = store.update(1, draft).unwrap();
        let project = store.get(1).unwrap();
        assert_eq!((project.name.as_str(), project.progress), ("Site v2", 65));

        // Changing the task list re-derives.
        let mut form = ProjectForm::from_project(project);
        form.child_tasks = "x\ny\nz".into();
        let draft = form.to_update_draft(store.get(1).unwrap());
        let _ = store.update(1, draft).unwrap();
        assert_eq!(store.get(1).unwrap().progress, 0);
    }

    #[test]
    fn duplicate_task_texts_keep_their_own_completion() {
        let mut project = Project::new(1, "Site", date(2025, 1, 1), date(2025, 2, 1));
        project.child_tasks = vec![ChildTask::new("Review"), ChildTask::new("Review")];
        project.child_tasks[1].completed = true;
        project.recompute_progress();

        let mut form = ProjectForm::from_project(&project);
        form.name = "Site v2".into();
        let draft = form.to_update_draft(&project);
        let done: Vec<bool> = draft.child_tasks.iter().map(|t| t.completed).collect();
        assert_eq!(done, vec![false, true]);
        assert_eq!(draft.progress, 50);
    }
}
