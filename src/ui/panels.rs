use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::supported_years;
use crate::state::{AppState, MAX_COMPARISON};

// ---------------------------------------------------------------------------
// Left side panel – year / neighborhood selectors
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the names so we can mutate state inside the widgets.
    let names: Vec<String> = dataset.names().map(str::to_string).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year selector ----
            ui.strong("Year");
            egui::ComboBox::from_id_salt("year_select")
                .selected_text(state.selected_year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in supported_years() {
                        ui.selectable_value(&mut state.selected_year, year, year.to_string());
                    }
                });
            ui.separator();

            // ---- Neighborhood selector ----
            ui.strong("Neighborhood");
            let current = state.selected_name.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("neighborhood_select")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &names {
                        if ui.selectable_label(current == *name, name).clicked() {
                            state.selected_name = Some(name.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Comparison set ----
            ui.strong(format!(
                "Compare  ({}/{MAX_COMPARISON})",
                state.comparison_names.len()
            ));
            for name in &names {
                let mut checked = state.is_compared(name);
                if ui.checkbox(&mut checked, name).changed() {
                    state.toggle_comparison(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} neighborhoods loaded", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open neighborhood metrics")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} neighborhoods from {}",
                    dataset.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
