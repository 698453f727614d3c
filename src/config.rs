//! User settings and on-disk locations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Overrides where the project collection is stored.
pub const DATA_DIR_ENV: &str = "PROJECT_TRACKER_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not write settings to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four dashboard views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Timeline,
    Kanban,
    Gantt,
    List,
}

impl ViewMode {
    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Timeline, ViewMode::Kanban, ViewMode::Gantt, ViewMode::List]
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Timeline => "Timeline",
            ViewMode::Kanban => "Kanban",
            ViewMode::Gantt => "Gantt",
            ViewMode::List => "List",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ViewMode::Timeline => egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE,
            ViewMode::Kanban => egui_phosphor::regular::KANBAN,
            ViewMode::Gantt => egui_phosphor::regular::CHART_BAR_HORIZONTAL,
            ViewMode::List => egui_phosphor::regular::LIST_BULLETS,
        }
    }
}

/// Persisted user settings (lives in the OS config directory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// View shown at startup; follows the last one used.
    pub default_view: ViewMode,
    /// Last sheet URL imported from.
    pub sheet_url: String,
    pub fetch_timeout_secs: u64,
    /// Where the project collection lives, if not the OS data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_view: ViewMode::Timeline,
            sheet_url: String::new(),
            fetch_timeout_secs: 30,
            data_dir: None,
        }
    }
}

impl AppSettings {
    /// Read settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no settings file; using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// Settings plus the resolved paths they were loaded from.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: AppSettings,
    settings_path: PathBuf,
    data_dir: PathBuf,
}

impl Config {
    /// Locate the OS directories, load settings and resolve the data directory.
    pub fn load() -> Self {
        let (settings_path, default_data_dir) = config_paths();
        let settings = AppSettings::load(&settings_path);
        let data_dir = resolve_data_dir(std::env::var_os(DATA_DIR_ENV), &settings, default_data_dir);
        info!(
            settings = %settings_path.display(),
            data = %data_dir.display(),
            "configuration loaded"
        );
        Self {
            settings,
            settings_path,
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.settings.save(&self.settings_path)
    }
}

/// Environment override, then the settings file, then the OS default.
pub fn resolve_data_dir(env: Option<OsString>, settings: &AppSettings, default: PathBuf) -> PathBuf {
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    settings.data_dir.clone().unwrap_or(default)
}

fn config_paths() -> (PathBuf, PathBuf) {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "ProjectTracker") {
        let settings = proj_dirs.config_dir().join("settings.json");
        let data = proj_dirs.data_dir().to_path_buf();
        (settings, data)
    } else {
        // Fallback
        let dir = PathBuf::from(".");
        (dir.join("settings.json"), dir)
    }
}
