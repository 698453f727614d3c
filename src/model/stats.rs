use std::collections::BTreeSet;

use super::phase::Phase;
use super::project::Project;

/// Dashboard counters over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub members: usize,
}

/// How many projects a team member is on, broken down by phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Workload {
    pub total: usize,
    pub planning: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn stats(projects: &[Project]) -> Stats {
    Stats {
        total: projects.len(),
        in_progress: count_in_phase(projects, Phase::InProgress),
        completed: count_in_phase(projects, Phase::Completed),
        members: team_members(projects).len(),
    }
}

pub fn count_in_phase(projects: &[Project], phase: Phase) -> usize {
    projects.iter().filter(|p| p.phase == phase).count()
}

/// Every distinct team member, sorted.
pub fn team_members(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.team.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn projects_for_member<'a>(projects: &'a [Project], member: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| p.team.iter().any(|m| m == member))
        .collect()
}

pub fn member_workload(projects: &[Project], member: &str) -> Workload {
    let mine = projects_for_member(projects, member);
    Workload {
        total: mine.len(),
        planning: mine.iter().filter(|p| p.phase == Phase::Planning).count(),
        in_progress: mine.iter().filter(|p| p.phase == Phase::InProgress).count(),
        completed: mine.iter().filter(|p| p.phase == Phase::Completed).count(),
    }
}
