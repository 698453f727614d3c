use super::phase::Phase;
use super::project::{Project, ProjectDraft};

pub const NAME_REQUIRED: &str = "Project name is required";
pub const START_REQUIRED: &str = "Start date is required";
pub const END_REQUIRED: &str = "End date is required";
pub const END_BEFORE_START: &str = "End date must be after start date";
pub const PROGRESS_RANGE: &str = "Progress must be between 0 and 100";
pub const INVALID_PHASE: &str = "Invalid project phase";
pub const PROGRESS_DERIVED: &str = "Progress is derived from child tasks and cannot be edited";

/// Outcome of checking a draft: every violation found, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Check a manually entered project. All rules run; nothing short-circuits.
pub fn validate_project(draft: &ProjectDraft) -> Validation {
    let mut v = Validation::default();

    if draft.name.trim().is_empty() {
        v.push(NAME_REQUIRED);
    }
    if draft.start_date.is_none() {
        v.push(START_REQUIRED);
    }
    if draft.end_date.is_none() {
        v.push(END_REQUIRED);
    }
    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if end < start {
            v.push(END_BEFORE_START);
        }
    }
    if !(0..=100).contains(&draft.progress) {
        v.push(PROGRESS_RANGE);
    }
    if Phase::from_code(&draft.phase).is_none() {
        v.push(INVALID_PHASE);
    }

    v
}

/// Check an edit to `existing`. Progress is read-only while child tasks exist.
pub fn validate_update(existing: &Project, draft: &ProjectDraft) -> Validation {
    let mut v = validate_project(draft);
    if existing.has_derived_progress() && draft.progress != i32::from(existing.progress) {
        v.push(PROGRESS_DERIVED);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::ChildTask;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn valid_draft() -> ProjectDraft {
        ProjectDraft {
            name: "Website".into(),
            phase: "planning".into(),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 3, 1),
            progress: 10,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_valid_draft() {
        assert!(validate_project(&valid_draft()).is_valid());
    }

    #[test]
    fn collects_four_violations_in_order() {
        let draft = ProjectDraft {
            name: String::new(),
            phase: "bogus".into(),
            start_date: date(2025, 1, 1),
            end_date: date(2024, 1, 1),
            progress: 150,
            ..Default::default()
        };
        let v = validate_project(&draft);
        assert_eq!(
            v.errors,
            vec![NAME_REQUIRED, END_BEFORE_START, PROGRESS_RANGE, INVALID_PHASE]
        );
    }

    #[test]
    fn missing_dates_skip_ordering_check() {
        let draft = ProjectDraft {
            start_date: None,
            end_date: None,
            ..valid_draft()
        };
        assert_eq!(validate_project(&draft).errors, vec![START_REQUIRED, END_REQUIRED]);
    }

    #[test]
    fn whitespace_name_and_negative_progress_are_rejected() {
        let draft = ProjectDraft {
            name: "   ".into(),
            progress: -1,
            ..valid_draft()
        };
        assert_eq!(validate_project(&draft).errors, vec![NAME_REQUIRED, PROGRESS_RANGE]);
    }

    #[test]
    fn same_day_span_is_valid() {
        let draft = ProjectDraft {
            end_date: date(2025, 1, 1),
            ..valid_draft()
        };
        assert!(validate_project(&draft).is_valid());
    }

    #[test]
    fn progress_edit_rejected_when_child_tasks_exist() {
        let mut existing = Project::new(1, "Website", date(2025, 1, 1).unwrap(), date(2025, 3, 1).unwrap());
        existing.child_tasks = vec![ChildTask::new("a")];
        existing.progress = 0;

        let mut draft = existing.to_draft();
        assert!(validate_update(&existing, &draft).is_valid());

        draft.progress = 55;
        assert_eq!(validate_update(&existing, &draft).errors, vec![PROGRESS_DERIVED]);

        existing.child_tasks.clear();
        assert!(validate_update(&existing, &draft).is_valid());
    }
}
