//! Key-value persistence for the project collection.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::model::Project;

/// The single key the whole collection is saved under.
pub const STORAGE_KEY: &str = "projectTrackerData";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored data is not valid project JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque string store addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.path_for(key);
        // Readers only ever see a complete file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path)(e)),
        }
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Saves and restores the whole collection under [`STORAGE_KEY`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, projects: &[Project]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(projects)?;
        self.store.set(STORAGE_KEY, &json)?;
        debug!(count = projects.len(), "saved projects");
        Ok(())
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Vec<Project>>, PersistenceError> {
        let Some(json) = self.store.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let projects: Vec<Project> = serde_json::from_str(&json)?;
        info!(count = projects.len(), "loaded saved projects");
        Ok(Some(projects))
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(STORAGE_KEY)
    }

    /// Whether anything is currently saved.
    #[cfg(test)]
    pub fn has_data(&self) -> bool {
        matches!(self.store.get(STORAGE_KEY), Ok(Some(_)))
    }
}
