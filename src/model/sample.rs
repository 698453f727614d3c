use chrono::NaiveDate;

use super::phase::Phase;
use super::project::{ChildTask, Project, ProjectId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn tasks(items: &[(&str, bool)]) -> Vec<ChildTask> {
    items
        .iter()
        .map(|(task, completed)| ChildTask {
            task: task.to_string(),
            completed: *completed,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: ProjectId,
    name: &str,
    phase: Phase,
    start: NaiveDate,
    end: NaiveDate,
    progress: u8,
    description: &str,
    team: &[&str],
    child_tasks: Vec<ChildTask>,
) -> Project {
    Project {
        id,
        name: name.to_string(),
        phase,
        start_date: start,
        end_date: end,
        progress,
        description: description.to_string(),
        team: team.iter().map(|m| m.to_string()).collect(),
        child_tasks,
    }
}

/// A small demo portfolio for first-run exploration.
pub fn sample_projects() -> Vec<Project> {
    vec![
        project(
            1,
            "Website Redesign",
            Phase::InProgress,
            date(2025, 1, 1),
            date(2025, 3, 31),
            65,
            "Complete redesign of company website with modern UI/UX",
            &["John Doe", "Jane Smith", "Bob Johnson"],
            tasks(&[
                ("Design mockups", true),
                ("Develop frontend", false),
                ("Testing & QA", false),
            ]),
        ),
        project(
            2,
            "Mobile App Development",
            Phase::Planning,
            date(2025, 2, 1),
            date(2025, 6, 30),
            15,
            "New mobile application for iOS and Android",
            &["Alice Brown", "Charlie Wilson"],
            tasks(&[
                ("Market research", true),
                ("Create wireframes", false),
                ("Build prototype", false),
            ]),
        ),
        project(
            3,
            "CRM System Integration",
            Phase::Completed,
            date(2024, 10, 1),
            date(2024, 12, 31),
            100,
            "Integration with Salesforce CRM",
            &["David Lee", "Emma Davis"],
            tasks(&[
                ("API setup", true),
                ("Data migration", true),
                ("User training", true),
            ]),
        ),
        project(
            4,
            "Marketing Campaign Q1",
            Phase::InProgress,
            date(2025, 1, 15),
            date(2025, 4, 15),
            45,
            "Digital marketing campaign for Q1 2025",
            &["Fiona Green", "George Harris"],
            tasks(&[
                ("Content creation", true),
                ("Social media ads", false),
                ("Performance analysis", false),
            ]),
        ),
        project(
            5,
            "Security Audit",
            Phase::Planning,
            date(2025, 3, 1),
            date(2025, 5, 1),
            5,
            "Comprehensive security audit of all systems",
            &["Henry Jackson", "Iris Martinez"],
            tasks(&[
                ("Vulnerability scanning", false),
                ("Penetration testing", false),
                ("Report generation", false),
            ]),
        ),
    ]
}
