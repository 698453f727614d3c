use egui::Color32;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a project.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

/// The linear part of the lifecycle. `OnHold` and `Cancelled` sit outside it.
const SEQUENCE: [Phase; 3] = [Phase::Planning, Phase::InProgress, Phase::Completed];

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Planning,
            Phase::InProgress,
            Phase::Completed,
            Phase::OnHold,
            Phase::Cancelled,
        ]
    }

    /// The kebab-case code used in storage and CSV.
    pub fn code(self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::InProgress => "in-progress",
            Phase::Completed => "completed",
            Phase::OnHold => "on-hold",
            Phase::Cancelled => "cancelled",
        }
    }

    /// Parse an exact phase code.
    pub fn from_code(code: &str) -> Option<Phase> {
        Phase::all().iter().copied().find(|p| p.code() == code)
    }

    /// Normalize free text ("In Progress", " ON   hold ") into a phase code and parse it.
    pub fn parse_loose(raw: &str) -> Option<Phase> {
        let code = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        Phase::from_code(&code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Planning => "Planning",
            Phase::InProgress => "In Progress",
            Phase::Completed => "Completed",
            Phase::OnHold => "On Hold",
            Phase::Cancelled => "Cancelled",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Phase::Planning => egui_phosphor::regular::LIGHTBULB,
            Phase::InProgress => egui_phosphor::regular::SPINNER,
            Phase::Completed => egui_phosphor::regular::CHECK_CIRCLE,
            Phase::OnHold => egui_phosphor::regular::PAUSE_CIRCLE,
            Phase::Cancelled => egui_phosphor::regular::X_CIRCLE,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Phase::Planning => Color32::from_rgb(255, 193, 7),
            Phase::InProgress => Color32::from_rgb(13, 202, 240),
            Phase::Completed => Color32::from_rgb(25, 135, 84),
            Phase::OnHold => Color32::from_rgb(108, 117, 125),
            Phase::Cancelled => Color32::from_rgb(220, 53, 69),
        }
    }

    /// Next stage in planning → in-progress → completed. Side states and the last stage stay put.
    pub fn next(self) -> Phase {
        match SEQUENCE.iter().position(|p| *p == self) {
            Some(i) if i + 1 < SEQUENCE.len() => SEQUENCE[i + 1],
            _ => self,
        }
    }

    /// Previous stage in the sequence. Side states and the first stage stay put.
    pub fn previous(self) -> Phase {
        match SEQUENCE.iter().position(|p| *p == self) {
            Some(i) if i > 0 => SEQUENCE[i - 1],
            _ => self,
        }
    }

    /// True for the three stages that have a defined next/previous.
    pub fn is_sequenced(self) -> bool {
        SEQUENCE.contains(&self)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_parsing_collapses_whitespace() {
        assert_eq!(Phase::parse_loose("In Progress"), Some(Phase::InProgress));
        assert_eq!(Phase::parse_loose("  on   HOLD "), Some(Phase::OnHold));
        assert_eq!(Phase::parse_loose("in-progress"), Some(Phase::InProgress));
        assert_eq!(Phase::parse_loose("bogus"), None);
        assert_eq!(Phase::parse_loose(""), None);
    }

    #[test]
    fn sequence_steps_and_stops_at_ends() {
        assert_eq!(Phase::Planning.next(), Phase::InProgress);
        assert_eq!(Phase::InProgress.next(), Phase::Completed);
        assert_eq!(Phase::Completed.next(), Phase::Completed);
        assert_eq!(Phase::Completed.previous(), Phase::InProgress);
        assert_eq!(Phase::Planning.previous(), Phase::Planning);
    }

    #[test]
    fn side_states_have_no_neighbours() {
        for phase in [Phase::OnHold, Phase::Cancelled] {
            assert_eq!(phase.next(), phase);
            assert_eq!(phase.previous(), phase);
            assert!(!phase.is_sequenced());
        }
    }

    #[test]
    fn serializes_as_kebab_case() {
        let json = serde_json::to_string(&Phase::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: Phase = serde_json::from_str("\"on-hold\"").unwrap();
        assert_eq!(back, Phase::OnHold);
    }
}
