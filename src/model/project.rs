use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::phase::Phase;

pub type ProjectId = u32;

/// A named sub-item of a project. Completion drives the project's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTask {
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChildTask {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            completed: false,
        }
    }
}

/// A tracked project. Field names match the persisted/exported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub phase: Phase,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Percent complete, 0–100. Derived from `child_tasks` once they exist.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub child_tasks: Vec<ChildTask>,
}

impl Project {
    /// Create a project with sensible defaults.
    #[cfg(test)]
    pub fn new(id: ProjectId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            phase: Phase::Planning,
            start_date: start,
            end_date: end,
            progress: 0,
            description: String::new(),
            team: Vec::new(),
            child_tasks: Vec::new(),
        }
    }

    /// Whether progress is derived from child tasks rather than entered by hand.
    pub fn has_derived_progress(&self) -> bool {
        !self.child_tasks.is_empty()
    }

    /// Re-derive progress from child tasks. Leaves manual progress alone when there are none.
    pub fn recompute_progress(&mut self) {
        if let Some(progress) = progress_from_child_tasks(&self.child_tasks) {
            self.progress = progress;
        }
    }

    pub fn completed_child_tasks(&self) -> usize {
        self.child_tasks.iter().filter(|t| t.completed).count()
    }

    /// Days from start to end.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// A draft pre-filled with this project's values, for editing.
    #[cfg(test)]
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            phase: self.phase.code().to_string(),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            progress: i32::from(self.progress),
            description: self.description.clone(),
            team: self.team.clone(),
            child_tasks: self.child_tasks.clone(),
        }
    }
}

/// A candidate record from manual entry, loose enough to hold invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    /// Raw phase code, checked by the validator.
    pub phase: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: i32,
    pub description: String,
    pub team: Vec<String>,
    pub child_tasks: Vec<ChildTask>,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            phase: Phase::Planning.code().to_string(),
            start_date: None,
            end_date: None,
            progress: 0,
            description: String::new(),
            team: Vec::new(),
            child_tasks: Vec::new(),
        }
    }
}

impl ProjectDraft {
    /// Convert a draft that has passed validation into a record, progress as given.
    /// Returns `None` if a required field is still missing.
    pub(crate) fn into_project(self, id: ProjectId) -> Option<Project> {
        let phase = Phase::from_code(&self.phase)?;
        let progress = u8::try_from(self.progress).ok().filter(|p| *p <= 100)?;
        Some(Project {
            id,
            name: self.name.trim().to_string(),
            phase,
            start_date: self.start_date?,
            end_date: self.end_date?,
            progress,
            description: self.description.trim().to_string(),
            team: self.team,
            child_tasks: self.child_tasks,
        })
    }
}

/// `round(100 * completed / total)`, or `None` for an empty list.
pub fn progress_from_child_tasks(tasks: &[ChildTask]) -> Option<u8> {
    if tasks.is_empty() {
        return None;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    Some(calculate_progress(completed, tasks.len()))
}

/// Percentage of `completed` over `total`, rounded half away from zero. Zero when `total` is zero.
pub fn calculate_progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed.min(total) as f64 / total as f64 * 100.0).round();
    pct as u8
}

/// Split a delimited list, trimming each piece and dropping empty ones.
pub fn split_list(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse child tasks from user input, one task per line.
pub fn child_tasks_from_lines(raw: &str) -> Vec<ChildTask> {
    split_list(raw, '\n').into_iter().map(ChildTask::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(calculate_progress(1, 3), 33);
        assert_eq!(calculate_progress(2, 3), 67);
        assert_eq!(calculate_progress(1, 8), 13);
        assert_eq!(calculate_progress(3, 3), 100);
        assert_eq!(calculate_progress(0, 0), 0);
    }

    #[test]
    fn recompute_leaves_manual_progress_without_child_tasks() {
        let mut project = Project::new(1, "Manual", date(2025, 1, 1), date(2025, 2, 1));
        project.progress = 42;
        project.recompute_progress();
        assert_eq!(project.progress, 42);

        project.child_tasks = vec![ChildTask::new("a"), ChildTask::new("b")];
        project.child_tasks[0].completed = true;
        project.recompute_progress();
        assert_eq!(project.progress, 50);
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let mut project = Project::new(7, "Site", date(2025, 1, 1), date(2025, 3, 31));
        project.phase = Phase::InProgress;
        project.child_tasks.push(ChildTask::new("Design"));
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["startDate"], "2025-01-01");
        assert_eq!(value["endDate"], "2025-03-31");
        assert_eq!(value["phase"], "in-progress");
        assert_eq!(value["childTasks"][0]["task"], "Design");
        assert_eq!(value["childTasks"][0]["completed"], false);
    }

    #[test]
    fn missing_optional_fields_default_on_load() {
        let json = r#"{"id":3,"name":"Bare","startDate":"2025-01-01","endDate":"2025-01-02"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.phase, Phase::Planning);
        assert_eq!(project.progress, 0);
        assert!(project.description.is_empty());
        assert!(project.team.is_empty());
        assert!(project.child_tasks.is_empty());
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list("A, B ,, C", ','), vec!["A", "B", "C"]);
        assert!(split_list("   ", ',').is_empty());
        let tasks = child_tasks_from_lines("one\n\n two \n");
        assert_eq!(tasks, vec![ChildTask::new("one"), ChildTask::new("two")]);
    }

    #[test]
    fn draft_conversion_trims_and_keeps_progress() {
        let draft = ProjectDraft {
            name: "  Launch ".into(),
            phase: "completed".into(),
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 1, 10)),
            progress: 80,
            child_tasks: vec![ChildTask::new("x")],
            ..Default::default()
        };
        let mut project = draft.into_project(4).unwrap();
        assert_eq!(project.name, "Launch");
        assert_eq!(project.phase, Phase::Completed);
        assert_eq!(project.progress, 80);
        project.recompute_progress();
        assert_eq!(project.progress, 0);
    }
}
