use std::path::{Path, PathBuf};

use eframe::egui::{self, RichText, ScrollArea, Ui};

use rusty_seiras::waveform::{WaveformPreset, WaveformSpec};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – processing steps
// ---------------------------------------------------------------------------

/// Render the left panel with the three processing steps.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("FTIR Data Processing");
    ui.label("Combine, label and background-correct ATR-SEIRAS series.");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Step 1: Combine CSV files").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| combine_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Step 2: Rename columns").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| rename_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Step 3: Reprocess background").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| background_section(ui, state));
        });
}

fn combine_section(ui: &mut Ui, state: &mut AppState) {
    ui.label("a) Series collection");
    if ui.button("Combine series collection CSV files…").clicked() {
        if let Some(folder) = pick_folder("Select folder with CSV files") {
            let result = state.combine_series(&folder);
            if state.report("Combine", result).is_some() {
                save_after_combine(state, &folder);
            }
        }
    }

    let has_table = state.table.is_some();
    if ui
        .add_enabled(has_table, egui::Button::new("Sort spectral columns"))
        .clicked()
    {
        if let Some(output) = output_path(state, "_sorted") {
            let result = state.sort_columns(&output);
            state.report("Sort", result);
        }
    }

    ui.add_space(4.0);
    ui.label("b) Time-resolved collection");
    if ui.button("Combine time-resolved CSV files…").clicked() {
        if let Some(folder) = pick_folder("Select folder with time-resolved CSV files") {
            let result = state.combine_time_resolved(&folder);
            if state.report("Combine time-resolved", result).is_some() {
                save_after_combine(state, &folder);
            }
        }
    }
}

fn rename_section(ui: &mut Ui, state: &mut AppState) {
    let has_table = state.table.is_some();

    // ---- CV ----
    ui.label("a) Headers with CV potentials");
    egui::Grid::new("cv_form").num_columns(2).show(ui, |ui: &mut Ui| {
        form_row(ui, "T equilibrium (s):", &mut state.cv_form.t_eq);
        form_row(ui, "E begin (V):", &mut state.cv_form.e_begin);
        form_row(ui, "E vertex1 (V):", &mut state.cv_form.e_vertex1);
        form_row(ui, "E vertex2 (V):", &mut state.cv_form.e_vertex2);
        form_row(ui, "Scan rate (V/s):", &mut state.cv_form.scan_rate);
    });
    let cv = state.cv_form.parse().map(WaveformSpec::from);
    waveform_hint(ui, state, &cv);
    if ui
        .add_enabled(has_table, egui::Button::new("Rename headers to CV potentials"))
        .clicked()
    {
        rename_with(state, cv, "_renamed_cv");
    }

    ui.add_space(4.0);

    // ---- LV ----
    ui.label("b) Headers with LV potentials");
    egui::Grid::new("lv_form").num_columns(2).show(ui, |ui: &mut Ui| {
        form_row(ui, "T equilibrium (s):", &mut state.lv_form.t_eq);
        form_row(ui, "E begin (V):", &mut state.lv_form.e_begin);
        form_row(ui, "E end (V):", &mut state.lv_form.e_end);
        form_row(ui, "Scan rate (V/s):", &mut state.lv_form.scan_rate);
    });
    let lv = state.lv_form.parse().map(WaveformSpec::from);
    waveform_hint(ui, state, &lv);
    if ui
        .add_enabled(has_table, egui::Button::new("Rename headers to LV potentials"))
        .clicked()
    {
        rename_with(state, lv, "_renamed_lv");
    }

    ui.add_space(4.0);

    // ---- Elapsed time ----
    ui.label("c) Headers with elapsed time");
    egui::Grid::new("time_form").num_columns(2).show(ui, |ui: &mut Ui| {
        form_row(ui, "Total time collected (s):", &mut state.total_time);
    });
    if ui
        .add_enabled(has_table, egui::Button::new("Rename headers to time intervals"))
        .clicked()
    {
        if let Some(output) = output_path(state, "_renamed") {
            let result = state.rename_by_time(&output);
            state.report("Rename by time", result);
        }
    }
}

fn background_section(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = &state.table else {
        ui.label("No table loaded.");
        return;
    };
    let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();

    let selected = state.reference_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("reference_column")
        .selected_text(&selected)
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            for name in &names {
                if ui.selectable_label(selected == *name, name).clicked() {
                    state.reference_column = Some(name.clone());
                }
            }
        });

    let enabled = state.reference_column.is_some();
    if ui
        .add_enabled(enabled, egui::Button::new("Reprocess background"))
        .clicked()
    {
        let suffix = format!("_{}", state.reference_column.as_deref().unwrap_or_default());
        if let Some(output) = output_path(state, &suffix) {
            let result = state.subtract_background(&output);
            state.report("Reprocess background", result);
        }
    }
}

fn form_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(90.0));
    ui.end_row();
}

/// Potential change per spectrum for a valid waveform, or why it is invalid.
fn waveform_hint(ui: &mut Ui, state: &AppState, spec: &rusty_seiras::CoreResult<WaveformSpec>) {
    match spec {
        Ok(spec) => {
            let change = state.potential_change(*spec).unwrap_or(0.0);
            ui.label(
                RichText::new(format!("Potential change per spectrum: {change:.6} V"))
                    .background_color(egui::Color32::from_rgb(255, 250, 205))
                    .color(egui::Color32::BLACK),
            );
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(egui::Color32::RED));
        }
    }
}

fn rename_with(state: &mut AppState, spec: rusty_seiras::CoreResult<WaveformSpec>, suffix: &str) {
    let spec = match spec {
        Ok(spec) => spec,
        Err(e) => {
            state.report::<()>("Rename", Err(e.into()));
            return;
        }
    };
    if let Some(output) = output_path(state, suffix) {
        let result = state.rename_by_waveform(spec, &output);
        state.report("Rename", result);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open table…").clicked() {
                open_table_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Save table as…"))
                .clicked()
            {
                if let Some(path) = save_dialog("Save data", state.table_path.as_deref(), "combined.csv") {
                    let result = state.save_table(&path);
                    state.report("Save", result);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Load waveform preset…").clicked() {
                load_preset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save waveform preset…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Save waveform preset")
                    .set_file_name("waveform.json")
                    .add_filter("JSON", &["json"])
                    .save_file()
                {
                    let result = state.preset().save(&path);
                    state.report("Save preset", result);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(table.to_string());
        }

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Table view")
            .clicked()
        {
            state.show_table = !state.show_table;
        }

        ui.separator();
        ui.label(RichText::new(state.status.text()).color(state.status.color()));
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_folder(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new().set_title(title).pick_folder()
}

fn save_dialog(title: &str, near: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(default_name)
        .add_filter("CSV files", &["csv"]);
    if let Some(dir) = near.and_then(Path::parent) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}

/// Ask where to keep a freshly combined table; cancelling keeps it in memory.
fn save_after_combine(state: &mut AppState, folder: &Path) {
    let dialog = rfd::FileDialog::new()
        .set_title("Save data")
        .set_directory(folder)
        .set_file_name("combined.csv")
        .add_filter("CSV files", &["csv"]);
    if let Some(path) = dialog.save_file() {
        let result = state.save_table(&path);
        if state.report("Save", result).is_some() {
            log::info!("Data saved as {}", path.display());
        }
    }
}

/// Beside the working table when it has a path, otherwise ask.
fn output_path(state: &AppState, suffix: &str) -> Option<PathBuf> {
    state
        .derived_path(suffix)
        .or_else(|| save_dialog("Save data", None, &format!("combined{suffix}.csv")))
}

pub fn open_table_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open combined table")
        .add_filter("Supported files", &["csv", "tsv", "txt"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        let result = state.open_table(&path);
        if state.report("Open", result).is_some() {
            log::info!("Opened {}", path.display());
        }
    }
}

fn load_preset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load waveform preset")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        let result = WaveformPreset::load(&path);
        if let Some(preset) = state.report("Load preset", result) {
            state.apply_preset(&preset);
        }
    }
}
