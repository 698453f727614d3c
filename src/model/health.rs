use chrono::NaiveDate;
use egui::Color32;

use super::project::Project;

/// How a project is doing against the time elapsed. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    NotStarted,
    Completed,
    Overdue,
    Excellent,
    OnTrack,
    AtRisk,
    Critical,
}

impl Health {
    pub fn label(self) -> &'static str {
        match self {
            Health::NotStarted => "Not Started",
            Health::Completed => "Completed",
            Health::Overdue => "Overdue",
            Health::Excellent => "Excellent",
            Health::OnTrack => "On Track",
            Health::AtRisk => "At Risk",
            Health::Critical => "Critical",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Health::NotStarted => egui_phosphor::regular::HOURGLASS_HIGH,
            Health::Completed => egui_phosphor::regular::FLAG_CHECKERED,
            Health::Overdue => egui_phosphor::regular::CLOCK,
            Health::Excellent => egui_phosphor::regular::STAR,
            Health::OnTrack => egui_phosphor::regular::CHECK_CIRCLE,
            Health::AtRisk => egui_phosphor::regular::WARNING,
            Health::Critical => egui_phosphor::regular::X_CIRCLE,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Health::Excellent | Health::Completed => Color32::from_rgb(25, 135, 84),
            Health::OnTrack => Color32::from_rgb(13, 202, 240),
            Health::AtRisk => Color32::from_rgb(255, 193, 7),
            Health::Critical | Health::Overdue => Color32::from_rgb(220, 53, 69),
            Health::NotStarted => Color32::from_rgb(108, 117, 125),
        }
    }
}

/// Percent of the `[start, end]` span that has passed by `today`.
/// A zero-length span counts as fully elapsed.
pub fn expected_progress(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> f64 {
    let total = (end - start).num_days();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (today - start).num_days().clamp(0, total);
    elapsed as f64 / total as f64 * 100.0
}

/// Classify a project's health as of `today`.
pub fn calculate_health(project: &Project, today: NaiveDate) -> Health {
    if today < project.start_date {
        return Health::NotStarted;
    }
    if today > project.end_date {
        return if project.progress >= 100 {
            Health::Completed
        } else {
            Health::Overdue
        };
    }

    let expected = expected_progress(project.start_date, project.end_date, today);
    let diff = f64::from(project.progress) - expected;

    if diff >= 10.0 {
        Health::Excellent
    } else if diff >= 0.0 {
        Health::OnTrack
    } else if diff >= -10.0 {
        Health::AtRisk
    } else {
        Health::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(progress: u8) -> Project {
        let mut p = Project::new(1, "Health", date(2025, 1, 1), date(2025, 2, 1));
        p.progress = progress;
        p
    }

    #[test]
    fn ahead_of_schedule_is_excellent() {
        assert_eq!(calculate_health(&project(60), date(2025, 1, 16)), Health::Excellent);
    }

    #[test]
    fn classifies_by_progress_difference() {
        let mid = date(2025, 1, 16); // 15 of 31 days, expected ≈ 48.4
        assert_eq!(calculate_health(&project(50), mid), Health::OnTrack);
        assert_eq!(calculate_health(&project(40), mid), Health::AtRisk);
        assert_eq!(calculate_health(&project(20), mid), Health::Critical);
    }

    #[test]
    fn outside_the_span() {
        assert_eq!(calculate_health(&project(0), date(2024, 12, 31)), Health::NotStarted);
        assert_eq!(calculate_health(&project(100), date(2025, 2, 2)), Health::Completed);
        assert_eq!(calculate_health(&project(99), date(2025, 2, 2)), Health::Overdue);
    }

    #[test]
    fn boundary_days_are_inside_the_span() {
        assert_eq!(calculate_health(&project(0), date(2025, 1, 1)), Health::OnTrack);
        assert_eq!(calculate_health(&project(100), date(2025, 2, 1)), Health::OnTrack);
        assert_eq!(calculate_health(&project(80), date(2025, 2, 1)), Health::Critical);
    }

    #[test]
    fn zero_length_span_is_fully_elapsed() {
        let mut p = Project::new(1, "Day", date(2025, 1, 1), date(2025, 1, 1));
        p.progress = 100;
        assert_eq!(calculate_health(&p, date(2025, 1, 1)), Health::OnTrack);
        p.progress = 95;
        assert_eq!(calculate_health(&p, date(2025, 1, 1)), Health::AtRisk);
    }
}
