use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::{Config, ViewMode};
use crate::format;
use crate::io::csv_import::ImportError;
use crate::io::storage::{FileStore, Persistence};
use crate::io::{csv_export, csv_import, export_file_name, fetch, file};
use crate::model::filter::{SortKey, SortOrder};
use crate::model::timeline::DateRange;
use crate::model::{
    Committed, ImportTicket, Project, ProjectId, ProjectStore, StoreError, TimelineViewport,
};
use crate::ui;
use crate::ui::project_form::ProjectForm;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A URL import running on a worker thread.
struct PendingImport {
    ticket: ImportTicket,
    rx: Receiver<Result<Vec<Project>, ImportError>>,
}

/// Main application state.
pub struct TrackerApp {
    pub store: ProjectStore<FileStore>,
    pub config: Config,
    pub view: ViewMode,
    pub viewport: TimelineViewport,

    // Selection / detail editing
    pub selected: Option<ProjectId>,
    pub detail_form: Option<ProjectForm>,

    // Dialog state
    pub add_form: Option<ProjectForm>,
    pub show_import_url: bool,
    pub show_csv_help: bool,
    pub show_about: bool,
    pub import_url: String,

    // List view ordering
    pub list_sort: (SortKey, SortOrder),

    pub status_message: String,

    pending_import: Option<PendingImport>,
}

impl TrackerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config = Config::load();
        let persistence = Persistence::new(FileStore::new(config.data_dir()));
        let (store, load_warning) = ProjectStore::open(persistence);

        let status_message = match load_warning {
            Some(e) => format!("Could not load saved projects: {e}"),
            None if store.all().is_empty() => {
                "No projects yet. Add one, import a sheet, or load sample data.".to_string()
            }
            None => format!("Loaded {} projects", store.all().len()),
        };

        let today = today();
        let mut app = Self {
            view: config.settings.default_view,
            import_url: config.settings.sheet_url.clone(),
            store,
            config,
            viewport: TimelineViewport::new(today, today + chrono::Duration::days(30)),
            selected: None,
            detail_form: None,
            add_form: None,
            show_import_url: false,
            show_csv_help: false,
            show_about: false,
            list_sort: (SortKey::Id, SortOrder::Ascending),
            status_message,
            pending_import: None,
        };
        app.fit_viewport();
        app
    }

    // --- Store plumbing ---

    /// Turn a store result into a status message. Returns the value on success.
    fn report<T>(
        &mut self,
        result: Result<Committed<T>, StoreError>,
        describe: impl FnOnce(&T) -> String,
    ) -> Option<T> {
        match result {
            Ok(Committed { value, warning }) => {
                let message = describe(&value);
                self.status_message = match warning {
                    Some(e) => format!("{message} (not saved: {e})"),
                    None => message,
                };
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, "operation rejected");
                self.status_message = format::capitalize_first(&e.to_string());
                None
            }
        }
    }

    fn confirm(title: &str, description: &str) -> bool {
        rfd::MessageDialog::new()
            .set_title(title)
            .set_description(description)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    fn confirm_replace(&self) -> bool {
        self.store.all().is_empty()
            || Self::confirm(
                "Replace projects",
                "Importing replaces all current projects. Continue?",
            )
    }

    fn after_replace(&mut self) {
        self.selected = None;
        self.detail_form = None;
        self.fit_viewport();
    }

    pub fn fit_viewport(&mut self) {
        if let Some(range) = DateRange::covering(self.store.all()) {
            self.viewport.fit(DateRange {
                start: range.start - chrono::Duration::days(7),
                end: range.end + chrono::Duration::days(14),
            });
        }
    }

    // --- Project operations ---

    pub fn open_add_dialog(&mut self) {
        self.add_form = Some(ProjectForm::blank(today()));
    }

    pub fn submit_add(&mut self) {
        let Some(form) = self.add_form.as_mut() else {
            return;
        };
        match self.store.create(form.to_draft()) {
            Err(StoreError::Invalid(validation)) => {
                form.errors = validation.errors;
            }
            result => {
                let name = form.name.trim().to_string();
                if self.report(result, |id| format!("Added '{name}' (#{id})")).is_some() {
                    self.add_form = None;
                    self.fit_viewport();
                }
            }
        }
    }

    pub fn select(&mut self, id: ProjectId) {
        self.selected = Some(id);
        self.detail_form = self.store.get(id).map(ProjectForm::from_project);
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
        self.detail_form = None;
    }

    pub fn save_detail(&mut self) {
        let (Some(id), Some(form)) = (self.selected, self.detail_form.as_mut()) else {
            return;
        };
        let Some(existing) = self.store.get(id) else {
            self.close_detail();
            return;
        };
        let draft = form.to_update_draft(existing);
        match self.store.update(id, draft) {
            Err(StoreError::Invalid(validation)) => {
                form.errors = validation.errors;
            }
            result => {
                if self.report(result, |_| "Project updated".to_string()).is_some() {
                    self.select(id);
                    self.fit_viewport();
                }
            }
        }
    }

    pub fn delete_project(&mut self, id: ProjectId) {
        let name = match self.store.get(id) {
            Some(p) => p.name.clone(),
            None => return,
        };
        if !Self::confirm("Delete project", &format!("Delete '{name}'? This cannot be undone.")) {
            return;
        }
        let result = self.store.delete(id);
        if self.report(result, |p| format!("Deleted '{}'", p.name)).is_some()
            && self.selected == Some(id)
        {
            self.close_detail();
        }
    }

    pub fn toggle_child_task(&mut self, id: ProjectId, index: usize) {
        let result = self.store.toggle_child_task(id, index);
        if self.report(result, |progress| format!("Progress now {progress}%")).is_some() {
            self.refresh_detail_progress(id);
        }
    }

    pub fn advance_phase(&mut self, id: ProjectId) {
        let result = self.store.advance_phase(id);
        self.report(result, |phase| format!("Moved to {}", phase.label()));
        self.refresh_detail_phase(id);
    }

    pub fn retreat_phase(&mut self, id: ProjectId) {
        let result = self.store.retreat_phase(id);
        self.report(result, |phase| format!("Moved back to {}", phase.label()));
        self.refresh_detail_phase(id);
    }

    /// Keep the open form in step with changes made outside it.
    fn refresh_detail_progress(&mut self, id: ProjectId) {
        if self.selected != Some(id) {
            return;
        }
        if let (Some(form), Some(project)) = (self.detail_form.as_mut(), self.store.get(id)) {
            form.progress = project.progress;
        }
    }

    fn refresh_detail_phase(&mut self, id: ProjectId) {
        if self.selected != Some(id) {
            return;
        }
        if let (Some(form), Some(project)) = (self.detail_form.as_mut(), self.store.get(id)) {
            form.phase = project.phase;
        }
    }

    pub fn handle_action(&mut self, action: ui::ProjectAction) {
        match action {
            ui::ProjectAction::None => {}
            ui::ProjectAction::Select(id) => self.select(id),
            ui::ProjectAction::Delete(id) => self.delete_project(id),
            ui::ProjectAction::Advance(id) => self.advance_phase(id),
            ui::ProjectAction::Retreat(id) => self.retreat_phase(id),
            ui::ProjectAction::Add => self.open_add_dialog(),
            ui::ProjectAction::ResetFilter => self.store.reset_filter(),
        }
    }

    pub fn load_sample_data(&mut self) {
        if !self.confirm_replace() {
            return;
        }
        let result = self.store.load_sample_data();
        if self.report(result, |n| format!("Loaded {n} sample projects")).is_some() {
            self.after_replace();
        }
    }

    pub fn clear_all(&mut self) {
        if !Self::confirm("Clear all data", "Delete every project? This cannot be undone.") {
            return;
        }
        let result = self.store.clear();
        if self.report(result, |_| "All projects cleared".to_string()).is_some() {
            self.after_replace();
        }
    }

    // --- Import / export ---

    pub fn is_importing(&self) -> bool {
        self.pending_import.is_some()
    }

    /// Start fetching the sheet at `import_url` on a worker thread.
    pub fn start_url_import(&mut self, ctx: &egui::Context) {
        let url = self.import_url.trim().to_string();
        if let Err(e) = fetch::classify_url(&url) {
            self.status_message = e.to_string();
            return;
        }
        if !self.confirm_replace() {
            return;
        }
        let ticket = match self.store.begin_import() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };

        if self.config.settings.sheet_url != url {
            self.config.settings.sheet_url = url.clone();
            self.save_settings();
        }

        info!(url = %url, "starting sheet import");
        let (tx, rx) = mpsc::channel();
        let timeout = self.config.settings.fetch_timeout();
        let today = today();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = fetch::import_url(&url, timeout, today);
            // The receiver is gone only if the app is shutting down.
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        self.pending_import = Some(PendingImport { ticket, rx });
        self.show_import_url = false;
        self.status_message = "Importing from Google Sheets...".to_string();
    }

    /// Pick up a finished URL import, if any.
    pub fn poll_import(&mut self) {
        let Some(pending) = self.pending_import.take() else {
            return;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                self.pending_import = Some(pending);
                return;
            }
            Err(TryRecvError::Disconnected) => {
                error!("import worker exited without a result");
                if let Err(e) = self.store.cancel_import(pending.ticket) {
                    warn!(error = %e, "could not cancel import");
                }
                self.status_message = "Import failed unexpectedly".to_string();
                return;
            }
        };
        self.finish_import(pending.ticket, result, "Google Sheets");
    }

    fn finish_import(
        &mut self,
        ticket: ImportTicket,
        result: Result<Vec<Project>, ImportError>,
        source: &str,
    ) {
        let result = self.store.complete_import(ticket, result);
        if self
            .report(result, |n| format!("Imported {n} projects from {source}"))
            .is_some()
        {
            self.after_replace();
        } else {
            self.status_message = format!("Import failed: {}", self.status_message);
        }
    }

    /// Import a local CSV or JSON export chosen with the file dialog.
    pub fn import_file(&mut self) {
        if self.store.is_importing() {
            self.status_message = StoreError::ImportInProgress.to_string();
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Projects", &["csv", "json", "txt"])
            .pick_file()
        else {
            return;
        };
        if !self.confirm_replace() {
            return;
        }
        let ticket = match self.store.begin_import() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };
        let result = if is_json(&path) {
            file::load_projects(&path, today())
        } else {
            csv_import::import_csv(&path, today())
        };
        let source = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        self.finish_import(ticket, result, &source);
    }

    pub fn export_json(&mut self) {
        if let Some(path) = self.pick_export_path("JSON", "json") {
            match file::export_json(self.store.all(), &path) {
                Ok(n) => self.status_message = format!("Exported {n} projects to JSON"),
                Err(e) => {
                    error!(error = %e, "JSON export failed");
                    self.status_message = format!("JSON export failed: {e}");
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if let Some(path) = self.pick_export_path("CSV", "csv") {
            match csv_export::export_csv(self.store.all(), &path) {
                Ok(n) => self.status_message = format!("Exported {n} projects to CSV"),
                Err(e) => {
                    error!(error = %e, "CSV export failed");
                    self.status_message = format!("CSV export failed: {e}");
                }
            }
        }
    }

    fn pick_export_path(&mut self, label: &str, ext: &str) -> Option<PathBuf> {
        if self.store.all().is_empty() {
            self.status_message = "Nothing to export: there are no projects".to_string();
            return None;
        }
        rfd::FileDialog::new()
            .add_filter(label, &[ext])
            .set_file_name(export_file_name(today(), ext))
            .save_file()
    }

    pub fn open_data_folder(&mut self) {
        let dir = self.config.data_dir().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|()| open::that(&dir)) {
            warn!(error = %e, dir = %dir.display(), "could not open data folder");
            self.status_message = format!("Could not open {}: {e}", dir.display());
        }
    }

    // --- Settings ---

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.config.settings.default_view = view;
        self.save_settings();
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.config.save() {
            warn!(error = %e, "could not save settings");
            self.status_message = e.to_string();
        }
    }
}

fn is_json(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_import();

        let add_shortcut = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::N));
        if add_shortcut && self.add_form.is_none() {
            self.open_add_dialog();
        }

        // Top panel: toolbar, filters, counters
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });
        egui::TopBottomPanel::top("filters")
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 6.0)),
            )
            .show(ctx, |ui| {
                ui::stats_strip::show_stats_strip(&self.store.stats(), ui);
                ui.add_space(4.0);
                let members = self.store.team_members();
                let filter = ui::filter_bar::show_filter_bar(self.store.filter(), &members, ui);
                if let Some(filter) = filter {
                    self.store.set_filter(filter);
                }
            });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_DARK)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.is_importing() {
                        ui.spinner();
                    }
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Showing {} of {}",
                                self.store.filtered().len(),
                                self.store.all().len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Central panel: active view
        let today = today();
        let mut action = ui::ProjectAction::None;
        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_DARK)
                    .inner_margin(egui::Margin::same(10.0)),
            )
            .show(ctx, |ui| {
                if self.store.filtered().is_empty() {
                    action = ui::show_empty_state(self.store.all().is_empty(), ui);
                    return;
                }
                action = match self.view {
                    ViewMode::Timeline => {
                        ui::timeline_view::show_timeline(self.store.filtered(), today, ui)
                    }
                    ViewMode::Kanban => ui::kanban::show_kanban(self.store.filtered(), ui),
                    ViewMode::Gantt => ui::gantt_chart::show_gantt_chart(
                        self.store.filtered(),
                        &mut self.viewport,
                        self.selected,
                        today,
                        ui,
                    ),
                    ViewMode::List => ui::project_table::show_project_table(
                        self.store.filtered(),
                        &mut self.list_sort,
                        self.selected,
                        ui,
                    ),
                };
            });
        self.handle_action(action);

        // Dialogs
        if self.add_form.is_some() {
            ui::dialogs::show_add_project_dialog(self, ctx);
        }
        if self.selected.is_some() {
            ui::project_detail::show_project_detail(self, ctx, today);
        }
        if self.show_import_url {
            ui::dialogs::show_import_url_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
