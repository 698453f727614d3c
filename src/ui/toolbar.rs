use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::app::TrackerApp;
use crate::config::ViewMode;
use crate::model::TimelineScale;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TrackerApp, ui: &mut Ui) {
    let importing = app.is_importing();
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  New Project      Ctrl+N", icons::PLUS)).clicked() {
                app.open_add_dialog();
                ui.close_menu();
            }
            ui.separator();
            ui.add_enabled_ui(!importing, |ui| {
                if ui.button(format!("{}  Import Google Sheet...", icons::CLOUD_ARROW_DOWN)).clicked() {
                    app.show_import_url = true;
                    ui.close_menu();
                }
                if ui.button(format!("{}  Import CSV / JSON...", icons::FILE_ARROW_UP)).clicked() {
                    app.import_file();
                    ui.close_menu();
                }
            });
            if ui.button(format!("{}  Export JSON...", icons::FILE_ARROW_DOWN)).clicked() {
                app.export_json();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::FILE_CSV)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
            ui.separator();
            ui.add_enabled_ui(!importing, |ui| {
                if ui.button(format!("{}  Load Sample Data", icons::SPARKLE)).clicked() {
                    app.load_sample_data();
                    ui.close_menu();
                }
                if ui.button(format!("{}  Clear All Data...", icons::TRASH)).clicked() {
                    app.clear_all();
                    ui.close_menu();
                }
            });
            ui.separator();
            if ui.button(format!("{}  Open Data Folder", icons::FOLDER_OPEN)).clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            for view in ViewMode::all() {
                if ui
                    .radio(app.view == *view, format!("{}  {}", view.icon(), view.label()))
                    .clicked()
                {
                    app.set_view(*view);
                    ui.close_menu();
                }
            }
            ui.separator();
            ui.label(RichText::new("Gantt Scale").small().weak());
            for (scale, label) in [
                (TimelineScale::Days, "Days"),
                (TimelineScale::Weeks, "Weeks"),
                (TimelineScale::Months, "Months"),
            ] {
                if ui.radio_value(&mut app.viewport.scale, scale, label).clicked() {
                    ui.close_menu();
                }
            }
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            ui.label(
                RichText::new(format!("Zoom {:.0}%", app.viewport.zoom_percent()))
                    .small()
                    .weak(),
            );
            if ui.button("  Fit to Projects").clicked() {
                app.fit_viewport();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Import Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        // View switcher
        for view in ViewMode::all() {
            let selected = app.view == *view;
            let text = RichText::new(format!("{} {}", view.icon(), view.label())).size(12.5);
            if ui.selectable_label(selected, text).clicked() {
                app.set_view(*view);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let add = egui::Button::new(
                RichText::new(format!("{}  Add Project", icons::PLUS)).color(egui::Color32::WHITE),
            )
            .fill(theme::ACCENT);
            if ui.add_enabled(!importing, add).clicked() {
                app.open_add_dialog();
            }
        });
    });
}
