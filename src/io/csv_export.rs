use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::csv_import::canonical_headers;
use crate::model::Project;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write projects as CSV in the import column order.
///
/// Every field is quoted; embedded quotes are doubled.
/// Team members are joined with ", " and child tasks with "; ".
/// Returns the number of projects written.
pub fn write_csv<W: Write>(projects: &[Project], writer: W) -> Result<usize, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .double_quote(true)
        .from_writer(writer);

    wtr.write_record(canonical_headers())?;

    for project in projects {
        let start = project.start_date.format("%Y-%m-%d").to_string();
        let end = project.end_date.format("%Y-%m-%d").to_string();
        let progress = project.progress.to_string();
        let team = project.team.join(", ");
        let tasks: Vec<&str> = project.child_tasks.iter().map(|t| t.task.as_str()).collect();
        let tasks = tasks.join("; ");
        wtr.write_record([
            project.name.as_str(),
            project.phase.code(),
            start.as_str(),
            end.as_str(),
            progress.as_str(),
            project.description.as_str(),
            team.as_str(),
            tasks.as_str(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(projects.len())
}

/// Export projects to a CSV file at `path`.
pub fn export_csv(projects: &[Project], path: &Path) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let count = write_csv(projects, file)?;
    info!(count, path = %path.display(), "exported CSV");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_import::parse_projects;
    use crate::model::sample::sample_projects;
    use crate::model::{ChildTask, Phase};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn export_to_string(projects: &[Project]) -> String {
        let mut buf = Vec::new();
        write_csv(projects, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn quotes_every_field_and_doubles_embedded_quotes() {
        let mut project = Project::new(1, "The \"Big\" One", date(2025, 1, 1), date(2025, 2, 1));
        project.phase = Phase::OnHold;
        project.progress = 30;
        project.description = "Line, with comma".into();
        project.team = vec!["A".into(), "B".into()];
        project.child_tasks = vec![ChildTask::new("x"), ChildTask::new("y")];

        let out = export_to_string(&[project]);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some(
                "\"Project Name\",\"Phase\",\"Start Date\",\"End Date\",\"Progress\",\
                 \"Description\",\"Team Members\",\"Child Tasks\""
            )
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"The \"\"Big\"\" One\",\"on-hold\",\"2025-01-01\",\"2025-02-01\",\"30\",\
                 \"Line, with comma\",\"A, B\",\"x; y\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn exported_csv_imports_back() {
        let projects = sample_projects();
        let out = export_to_string(&projects);
        let imported = parse_projects(&out, date(2025, 6, 1)).unwrap();

        assert_eq!(imported.len(), projects.len());
        for (original, back) in projects.iter().zip(&imported) {
            assert_eq!(back.name, original.name);
            assert_eq!(back.phase, original.phase);
            assert_eq!(back.start_date, original.start_date);
            assert_eq!(back.end_date, original.end_date);
            assert_eq!(back.progress, original.progress);
            assert_eq!(back.team, original.team);
            // Completion state is not part of the CSV format.
            let names: Vec<_> = original.child_tasks.iter().map(|t| t.task.clone()).collect();
            let back_names: Vec<_> = back.child_tasks.iter().map(|t| t.task.clone()).collect();
            assert_eq!(back_names, names);
            assert!(back.child_tasks.iter().all(|t| !t.completed));
        }
    }

    #[test]
    fn writes_file_and_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        assert_eq!(export_csv(&sample_projects(), &path).unwrap(), 5);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 6);

        let bad = dir.path().join("missing").join("projects.csv");
        assert!(matches!(export_csv(&[], &bad), Err(ExportError::Io { .. })));
    }
}
