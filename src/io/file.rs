use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use super::csv_export::ExportError;
use super::csv_import::{normalize_project, ImportError};
use crate::model::Project;

/// Save projects to a pretty-printed JSON file.
pub fn export_json(projects: &[Project], path: &Path) -> Result<usize, ExportError> {
    let json = serde_json::to_string_pretty(projects)?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(count = projects.len(), path = %path.display(), "exported JSON");
    Ok(projects.len())
}

/// Load projects from a JSON export. Out-of-range fields degrade as in a CSV
/// import. Ids are left as stored; the store reassigns them when the
/// collection is replaced.
pub fn load_projects(path: &Path, today: NaiveDate) -> Result<Vec<Project>, ImportError> {
    let json = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let projects: Vec<Project> = serde_json::from_str::<Vec<Project>>(&json)?
        .into_iter()
        .map(|p| normalize_project(p, today))
        .collect();
    if projects.is_empty() {
        return Err(ImportError::Empty);
    }
    info!(count = projects.len(), path = %path.display(), "loaded JSON export");
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{MemoryStore, Persistence};
    use crate::model::sample::sample_projects;
    use crate::io::csv_import::UNTITLED_PROJECT;
    use crate::model::ProjectStore;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn json_export_reimports_with_row_order_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let (mut store, _) = ProjectStore::open(Persistence::new(MemoryStore::default()));
        let _ = store.load_sample_data().unwrap();
        let gone = store.all()[1].id;
        let _ = store.delete(gone).unwrap();
        let before = store.all().to_vec();
        assert_eq!(export_json(&before, &path).unwrap(), 4);

        let ticket = store.begin_import().unwrap();
        let _ = store.complete_import(ticket, load_projects(&path, today())).unwrap();

        let after = store.all();
        assert_eq!(after.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        for (a, b) in before.iter().zip(after) {
            assert_eq!(Project { id: b.id, ..a.clone() }, *b);
        }

        // A second export is identical apart from the ids.
        let again = dir.path().join("again.json");
        export_json(store.all(), &again).unwrap();
        let reloaded = load_projects(&again, today()).unwrap();
        assert_eq!(reloaded, store.all());
    }

    #[test]
    fn rejects_non_project_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"tasks": []}"#).unwrap();
        assert!(matches!(load_projects(&path, today()), Err(ImportError::Json(_))));

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(load_projects(&path, today()), Err(ImportError::Empty)));
    }

    #[test]
    fn out_of_range_fields_are_coerced_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 9, "name": "  ", "startDate": "2025-03-01", "endDate": "2025-01-01",
                 "progress": 200,
                 "childTasks": [{"task": "a", "completed": true}, {"task": "b"}]},
                {"id": 10, "name": "Far", "startDate": "0001-01-01", "endDate": "9999-12-31",
                 "progress": 250}
            ]"#,
        )
        .unwrap();

        let projects = load_projects(&path, today()).unwrap();
        let first = &projects[0];
        assert_eq!(first.name, UNTITLED_PROJECT);
        assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(first.end_date, first.start_date);
        assert_eq!(first.progress, 100);
        assert_eq!(first.completed_child_tasks(), 1);

        let second = &projects[1];
        assert_eq!((second.start_date, second.end_date), (today(), today()));
        assert_eq!(second.progress, 100);

        // The result passes the edit rules untouched.
        let (mut store, _) = ProjectStore::open(Persistence::new(MemoryStore::default()));
        let ticket = store.begin_import().unwrap();
        let _ = store.complete_import(ticket, Ok(projects)).unwrap();
        for project in store.all().to_vec() {
            assert!(store.update(project.id, project.to_draft()).is_ok());
        }
    }

    #[test]
    fn output_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pretty.json");
        export_json(&sample_projects()[..1], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"name\": \"Website Redesign\""));
        assert!(text.contains("\"childTasks\""));
    }
}
