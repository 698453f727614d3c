use std::cmp::Ordering;

use super::phase::Phase;
use super::project::Project;

/// Which phase a project must be in to pass the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Phase(Phase),
}

/// Which team member a project must include to pass the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssigneeFilter {
    #[default]
    All,
    Member(String),
}

/// The active status/assignee/search predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: StatusFilter,
    pub assignee: AssigneeFilter,
    pub search: String,
}

impl ProjectFilter {
    pub fn is_active(&self) -> bool {
        *self != ProjectFilter::default()
    }

    pub fn matches(&self, project: &Project) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Phase(phase) => project.phase == phase,
        };
        let assignee_ok = match &self.assignee {
            AssigneeFilter::All => true,
            AssigneeFilter::Member(name) => project.team.iter().any(|m| m == name),
        };
        let search_ok = if self.search.is_empty() {
            true
        } else {
            let needle = self.search.to_lowercase();
            project.name.to_lowercase().contains(&needle)
                || project.description.to_lowercase().contains(&needle)
        };
        status_ok && assignee_ok && search_ok
    }
}

/// Projects that pass `filter`, in input order.
pub fn filter_projects(all: &[Project], filter: &ProjectFilter) -> Vec<Project> {
    all.iter().filter(|p| filter.matches(p)).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKey {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Phase,
    StartDate,
    EndDate,
    Progress,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
            SortKey::Phase => "Phase",
            SortKey::StartDate => "Start",
            SortKey::EndDate => "End",
            SortKey::Progress => "Progress",
        }
    }

    fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Phase => a.phase.code().cmp(b.phase.code()),
            SortKey::StartDate => a.start_date.cmp(&b.start_date),
            SortKey::EndDate => a.end_date.cmp(&b.end_date),
            SortKey::Progress => a.progress.cmp(&b.progress),
        }
    }
}

/// Stable sort on a date field; ties keep their original order in either direction.
pub fn sort_by_date(projects: &mut [Project], key: DateKey, order: SortOrder) {
    let key = match key {
        DateKey::Start => SortKey::StartDate,
        DateKey::End => SortKey::EndDate,
    };
    sort_by_key(projects, key, order);
}

/// Stable sort on any field; ties keep their original order in either direction.
pub fn sort_by_key(projects: &mut [Project], key: SortKey, order: SortOrder) {
    projects.sort_by(|a, b| order.apply(key.compare(a, b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Project> {
        let mut a = Project::new(1, "Website Redesign", date(2025, 1, 1), date(2025, 3, 31));
        a.phase = Phase::InProgress;
        a.description = "Modern UI/UX".into();
        a.team = vec!["John Doe".into(), "Jane Smith".into()];

        let mut b = Project::new(2, "Mobile App", date(2025, 2, 1), date(2025, 6, 30));
        b.description = "iOS and Android website companion".into();
        b.team = vec!["Alice Brown".into()];

        let mut c = Project::new(3, "Security Audit", date(2025, 1, 1), date(2025, 5, 1));
        c.team = vec!["Jane Smith".into()];

        vec![a, b, c]
    }

    fn ids(projects: &[Project]) -> Vec<u32> {
        projects.iter().map(|p| p.id).collect()
    }

    #[test]
    fn default_filter_passes_everything() {
        let all = sample();
        assert!(!ProjectFilter::default().is_active());
        assert_eq!(filter_projects(&all, &ProjectFilter::default()), all);
    }

    #[test]
    fn status_assignee_and_search_combine() {
        let all = sample();
        let by_status = ProjectFilter {
            status: StatusFilter::Phase(Phase::Planning),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&all, &by_status)), vec![2, 3]);

        let by_member = ProjectFilter {
            assignee: AssigneeFilter::Member("Jane Smith".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&all, &by_member)), vec![1, 3]);

        let both = ProjectFilter {
            status: StatusFilter::Phase(Phase::Planning),
            assignee: AssigneeFilter::Member("Jane Smith".into()),
            search: String::new(),
        };
        assert_eq!(ids(&filter_projects(&all, &both)), vec![3]);
    }

    #[test]
    fn assignee_match_is_case_sensitive() {
        let filter = ProjectFilter {
            assignee: AssigneeFilter::Member("jane smith".into()),
            ..Default::default()
        };
        assert!(filter_projects(&sample(), &filter).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let filter = ProjectFilter {
            search: "WEBSITE".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&sample(), &filter)), vec![1, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = sample();
        let filters = [
            ProjectFilter::default(),
            ProjectFilter {
                search: "a".into(),
                ..Default::default()
            },
            ProjectFilter {
                status: StatusFilter::Phase(Phase::InProgress),
                assignee: AssigneeFilter::Member("John Doe".into()),
                search: "web".into(),
            },
        ];
        for filter in &filters {
            let once = filter_projects(&all, filter);
            let twice = filter_projects(&once, filter);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn date_sort_is_stable_in_both_directions() {
        let mut projects = sample();
        sort_by_date(&mut projects, DateKey::Start, SortOrder::Ascending);
        assert_eq!(ids(&projects), vec![1, 3, 2]);

        let mut projects = sample();
        sort_by_date(&mut projects, DateKey::Start, SortOrder::Descending);
        assert_eq!(ids(&projects), vec![2, 1, 3]);

        let mut projects = sample();
        sort_by_date(&mut projects, DateKey::End, SortOrder::Ascending);
        assert_eq!(ids(&projects), vec![1, 3, 2]);
    }

    #[test]
    fn key_sort_orders_by_field() {
        let mut projects = sample();
        sort_by_key(&mut projects, SortKey::Name, SortOrder::Ascending);
        assert_eq!(ids(&projects), vec![2, 3, 1]);

        sort_by_key(&mut projects, SortKey::EndDate, SortOrder::Descending);
        assert_eq!(ids(&projects), vec![2, 3, 1]);
    }
}
