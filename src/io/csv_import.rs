use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::project::split_list;
use crate::model::{ChildTask, Phase, Project, ProjectId};

pub const UNTITLED_PROJECT: &str = "Untitled Project";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import URL must start with http:// or https:// (got '{0}')")]
    InvalidUrl(String),
    #[error("could not download the sheet: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("the sheet server answered HTTP {0}")]
    Status(u16),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("not a project JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data found; row 1 must hold the headers and row 2 onward the projects")]
    Empty,
}

/// Record fields a CSV column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phase,
    StartDate,
    EndDate,
    Progress,
    Description,
    Team,
    ChildTasks,
}

struct Column {
    field: Field,
    /// Canonical header, as written on export.
    header: &'static str,
    /// Extra accepted headers, already normalized.
    aliases: &'static [&'static str],
}

/// Header → field mapping, in export column order.
const COLUMNS: &[Column] = &[
    Column {
        field: Field::Name,
        header: "Project Name",
        aliases: &["name", "project", "title"],
    },
    Column {
        field: Field::Phase,
        header: "Phase",
        aliases: &["status", "stage", "state"],
    },
    Column {
        field: Field::StartDate,
        header: "Start Date",
        aliases: &["start", "from", "begin", "begindate"],
    },
    Column {
        field: Field::EndDate,
        header: "End Date",
        aliases: &["end", "to", "finish", "finishdate", "due", "duedate", "deadline"],
    },
    Column {
        field: Field::Progress,
        header: "Progress",
        aliases: &["percentcomplete", "complete", "done"],
    },
    Column {
        field: Field::Description,
        header: "Description",
        aliases: &["notes", "note", "details", "summary"],
    },
    Column {
        field: Field::Team,
        header: "Team Members",
        aliases: &["team", "members", "assignees", "owners"],
    },
    Column {
        field: Field::ChildTasks,
        header: "Child Tasks",
        aliases: &["tasks", "subtasks", "childtask"],
    },
];

/// The exported header row.
pub fn canonical_headers() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|c| c.header)
}

/// Each canonical header with the aliases it also accepts.
pub fn accepted_headers() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    COLUMNS.iter().map(|c| (c.header, c.aliases))
}

/// Formats tried, in order, by [`parse_date`].
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d",
];

/// Lower-case and drop spaces, hyphens and underscores.
fn normalize_header(h: &str) -> String {
    h.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace([' ', '-', '_'], "")
}

fn header_to_field(header: &str) -> Option<Field> {
    let normalized = normalize_header(header);
    COLUMNS
        .iter()
        .find(|c| normalize_header(c.header) == normalized || c.aliases.contains(&normalized.as_str()))
        .map(|c| c.field)
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    let tabs = first_line.matches('\t').count();

    if commas >= semicolons && commas >= tabs {
        b','
    } else if semicolons >= tabs {
        b';'
    } else {
        b'\t'
    }
}

// ── Per-field coercion. Every field degrades to a default, never an error. ──

/// Missing or blank → "Untitled Project".
fn coerce_name(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNTITLED_PROJECT.to_string(),
    }
}

/// "In Progress" → in-progress. Missing or unknown → planning.
fn coerce_phase(raw: Option<&str>) -> Phase {
    raw.and_then(Phase::parse_loose).unwrap_or_default()
}

/// Years a record's dates may fall in; anything outside is treated as unreadable.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    YEAR_RANGE.contains(&date.year()).then_some(date)
}

/// Missing, unparsable or implausible → `today`.
fn coerce_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(parse_date).and_then(plausible).unwrap_or(today)
}

/// Leading integer, clamped to 0–100. Missing or non-numeric → 0.
fn coerce_progress(raw: Option<&str>) -> u8 {
    raw.and_then(parse_leading_int)
        .map(|n| n.clamp(0, 100) as u8)
        .unwrap_or(0)
}

/// Missing → empty.
fn coerce_description(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_string()
}

/// Comma-separated names. Missing → empty list.
fn coerce_team(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| split_list(s, ',')).unwrap_or_default()
}

/// Semicolon-separated tasks, all incomplete. Missing → empty list.
fn coerce_child_tasks(raw: Option<&str>) -> Vec<ChildTask> {
    raw.map(|s| split_list(s, ';').into_iter().map(ChildTask::new).collect())
        .unwrap_or_default()
}

/// Try parsing a date string with several common formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Integer prefix of `s`, the way spreadsheet exports are usually read: "45%" → 45.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs instead of failing.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Bring a deserialized record (e.g. from a JSON export) within the record
/// invariants, degrading bad fields the same way CSV cells do. Progress is
/// clamped but kept, as for a CSV row, until the first toggle re-derives it.
pub fn normalize_project(mut project: Project, today: NaiveDate) -> Project {
    let id = project.id;
    project.name = coerce_name(Some(project.name.trim()));
    let start_date = plausible(project.start_date).unwrap_or(today);
    let end_date = plausible(project.end_date).unwrap_or(today);
    if end_date < start_date {
        debug!(id, %start_date, %end_date, "end date before start; clamping");
    }
    project.start_date = start_date;
    project.end_date = end_date.max(start_date);
    project.progress = project.progress.min(100);
    project
}

/// Raw cell values of one row, keyed by field.
#[derive(Debug, Default)]
struct RawRow<'a> {
    cells: Vec<(Field, &'a str)>,
}

impl<'a> RawRow<'a> {
    fn get(&self, field: Field) -> Option<&'a str> {
        self.cells.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }

    fn to_project(&self, id: ProjectId, today: NaiveDate) -> Project {
        let start_date = coerce_date(self.get(Field::StartDate), today);
        let end_date = coerce_date(self.get(Field::EndDate), today);
        if end_date < start_date {
            debug!(id, %start_date, %end_date, "end date before start; clamping");
        }
        Project {
            id,
            name: coerce_name(self.get(Field::Name)),
            phase: coerce_phase(self.get(Field::Phase)),
            start_date,
            end_date: end_date.max(start_date),
            progress: coerce_progress(self.get(Field::Progress)),
            description: coerce_description(self.get(Field::Description)),
            team: coerce_team(self.get(Field::Team)),
            child_tasks: coerce_child_tasks(self.get(Field::ChildTasks)),
        }
    }
}

/// Parse CSV text with a header row into projects, ids 1..n in row order.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches headers
/// case-insensitively. Rows whose cells are all blank are skipped.
/// Fails on malformed CSV or when no data rows remain.
pub fn parse_projects(content: &str, today: NaiveDate) -> Result<Vec<Project>, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let fields: Vec<Option<Field>> = headers.iter().map(header_to_field).collect();
    let unmatched: Vec<&str> = headers
        .iter()
        .zip(&fields)
        .filter(|(_, f)| f.is_none())
        .map(|(h, _)| h)
        .collect();
    if !unmatched.is_empty() {
        debug!(?unmatched, "ignoring unrecognized columns");
    }

    let mut projects = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = RawRow {
            cells: record
                .iter()
                .zip(&fields)
                .filter_map(|(value, field)| field.map(|f| (f, value)))
                .collect(),
        };
        let id = projects.len() as ProjectId + 1;
        projects.push(row.to_project(id, today));
    }

    if projects.is_empty() {
        return Err(ImportError::Empty);
    }
    info!(count = projects.len(), "parsed projects from CSV");
    Ok(projects)
}

/// Import projects from a CSV file on disk.
pub fn import_csv(path: &Path, today: NaiveDate) -> Result<Vec<Project>, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_projects(&content, today)
}
