use egui::{Color32, Context, RichText, Window};

use crate::app::TrackerApp;
use crate::io::csv_import::{accepted_headers, DATE_FORMATS};
use crate::ui::{project_form, theme};

fn accent_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

fn escape_pressed(ctx: &Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

/// Render the "Add Project" dialog.
pub fn show_add_project_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut submit = false;
    let mut should_close = false;

    Window::new(RichText::new("Add Project").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            // Force dark backgrounds inside this dialog
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.visuals_mut().faint_bg_color = Color32::TRANSPARENT;

            let Some(form) = app.add_form.as_mut() else {
                return;
            };
            ui.add_space(4.0);
            project_form::show_form_fields(form, "add", false, ui);

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], accent_button("Create")).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    // Validation failures keep the dialog open with the messages shown.
    if submit {
        app.submit_add();
    }
    if should_close || escape_pressed(ctx) {
        app.add_form = None;
    }
}

/// Render the Google Sheets URL prompt.
pub fn show_import_url_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut start = false;
    let mut should_close = false;

    Window::new(RichText::new("Import from Google Sheets").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH + 80.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);
            ui.label("Paste the CSV link of a sheet published to the web");
            ui.label(
                RichText::new("File > Share > Publish to web > Comma-separated values (.csv)")
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
            ui.add_space(6.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.import_url)
                    .hint_text("https://docs.google.com/spreadsheets/d/e/.../pub?output=csv")
                    .desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                start = true;
            }
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "{} Importing replaces every current project.",
                    egui_phosphor::regular::WARNING
                ))
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
            );

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let can_start = !app.import_url.trim().is_empty() && !app.is_importing();
                if ui
                    .add_enabled_ui(can_start, |ui| {
                        ui.add_sized([80.0, 28.0], accent_button("Import"))
                    })
                    .inner
                    .clicked()
                {
                    start = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if start {
        app.start_url_import(ctx);
    }
    if should_close || escape_pressed(ctx) {
        app.show_import_url = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Project Tracker").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Track projects on a timeline, board, Gantt chart or list.");
                ui.label(
                    RichText::new(format!("Data folder: {}", app.config.data_dir().display()))
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || escape_pressed(ctx) {
        app.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 500.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                ui.label(RichText::new("Layout").strong());
                ui.label("Row 1 holds the headers; every following row is one project.");
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Also accepted (case-insensitive)").underline());
                        ui.end_row();
                        for (header, aliases) in accepted_headers() {
                            ui.label(RichText::new(header).strong());
                            ui.label(aliases.join(", "));
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Supported Date Formats").strong());
                ui.add_space(2.0);
                for fmt in DATE_FORMATS {
                    ui.label(RichText::new(*fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                let notes = [
                    "• Team Members are comma-separated; Child Tasks are semicolon-separated.",
                    "• Phase accepts planning, in progress, completed, on hold or cancelled.",
                    "• Progress reads the leading number (\"45%\" is 45) and is kept within 0-100.",
                    "• Missing or unreadable values fall back to defaults instead of failing.",
                    "• An unreadable date becomes today; an end before the start moves to the start.",
                    "• Rows with every cell blank are skipped.",
                ];
                for note in &notes {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                ui.label(RichText::new("Example").strong());
                ui.add_space(2.0);
                let example = "Project Name,Phase,Start Date,End Date,Progress,Team Members,Child Tasks\n\
                               Website Redesign,In Progress,2025-01-15,2025-04-30,45,\"Ana, Ben\",Wireframes;Build\n\
                               Security Audit,Planning,2025-03-01,2025-03-31,0,Kim,";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || escape_pressed(ctx) {
        app.show_csv_help = false;
    }
}
