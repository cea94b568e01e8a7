use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::Color32;

use rusty_seiras::data::model::SpectrumTable;
use rusty_seiras::data::{labeling, loader, merge};
use rusty_seiras::waveform::{
    assign_elapsed, parse_parameter, CyclicSweep, LinearSweep, WaveformPreset, WaveformSpec,
};
use rusty_seiras::CoreResult;

// ---------------------------------------------------------------------------
// Waveform forms – raw text as typed by the user
// ---------------------------------------------------------------------------

/// Cyclic voltammetry parameters.
#[derive(Debug, Clone)]
pub struct CvForm {
    pub t_eq: String,
    pub e_begin: String,
    pub e_vertex1: String,
    pub e_vertex2: String,
    pub scan_rate: String,
}

impl Default for CvForm {
    fn default() -> Self {
        Self {
            t_eq: "0".into(),
            e_begin: "0".into(),
            e_vertex1: "1".into(),
            e_vertex2: "-1".into(),
            scan_rate: "0.01".into(),
        }
    }
}

impl CvForm {
    pub fn parse(&self) -> CoreResult<CyclicSweep> {
        CyclicSweep::new(
            parse_parameter("T equilibrium", &self.t_eq)?,
            parse_parameter("E begin", &self.e_begin)?,
            parse_parameter("E vertex1", &self.e_vertex1)?,
            parse_parameter("E vertex2", &self.e_vertex2)?,
            parse_parameter("Scan rate", &self.scan_rate)?,
        )
    }

    fn fill(&mut self, sweep: &CyclicSweep) {
        self.t_eq = sweep.t_eq.to_string();
        self.e_begin = sweep.e_begin.to_string();
        self.e_vertex1 = sweep.e_vertex1.to_string();
        self.e_vertex2 = sweep.e_vertex2.to_string();
        self.scan_rate = sweep.scan_rate.to_string();
    }
}

/// Linear voltammetry parameters.
#[derive(Debug, Clone)]
pub struct LvForm {
    pub t_eq: String,
    pub e_begin: String,
    pub e_end: String,
    pub scan_rate: String,
}

impl Default for LvForm {
    fn default() -> Self {
        Self {
            t_eq: "0".into(),
            e_begin: "0".into(),
            e_end: "1".into(),
            scan_rate: "0.01".into(),
        }
    }
}

impl LvForm {
    pub fn parse(&self) -> CoreResult<LinearSweep> {
        LinearSweep::new(
            parse_parameter("T equilibrium", &self.t_eq)?,
            parse_parameter("E begin", &self.e_begin)?,
            parse_parameter("E end", &self.e_end)?,
            parse_parameter("Scan rate", &self.scan_rate)?,
        )
    }

    fn fill(&mut self, sweep: &LinearSweep) {
        self.t_eq = sweep.t_eq.to_string();
        self.e_begin = sweep.e_begin.to_string();
        self.e_end = sweep.e_end.to_string();
        self.scan_rate = sweep.scan_rate.to_string();
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub enum Status {
    #[default]
    Idle,
    Completed(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Idle => "Idle",
            Status::Completed(msg) | Status::Error(msg) => msg,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Status::Idle | Status::Completed(_) => Color32::from_rgb(40, 160, 60),
            Status::Error(_) => Color32::RED,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Working table (None until the user combines or opens one).
    pub table: Option<SpectrumTable>,

    /// Where the working table lives on disk; derived outputs go beside it.
    pub table_path: Option<PathBuf>,

    pub cv_form: CvForm,
    pub lv_form: LvForm,

    /// Total collection time for elapsed-time labels, seconds.
    pub total_time: String,

    /// Column chosen as background for subtraction.
    pub reference_column: Option<String>,

    /// Show the table preview instead of the plot.
    pub show_table: bool,

    pub status: Status,
}

impl AppState {
    /// Ingest a new working table.
    pub fn set_table(&mut self, table: SpectrumTable, path: Option<PathBuf>) {
        self.reference_column = None;
        self.table = Some(table);
        self.table_path = path;
    }

    /// Record the outcome of an action in the status line and the log.
    pub fn report<T>(&mut self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.status = Status::Completed(format!("{action}: completed"));
                Some(value)
            }
            Err(e) => {
                log::error!("{action} failed: {e:#}");
                self.status = Status::Error(format!("{action}: {e:#}"));
                None
            }
        }
    }

    fn table(&self) -> Result<&SpectrumTable> {
        self.table.as_ref().context("No table loaded")
    }

    // -- Step 1: assembly --

    /// Merge every `.csv` spectrum in `folder` on truncated wavenumbers.
    pub fn combine_series(&mut self, folder: &Path) -> Result<()> {
        let files = loader::list_spectrum_files(folder)?;
        let spectra = loader::read_series(&files)?;
        let table = merge::merge(&spectra)
            .with_context(|| format!("No CSV files found in {}", folder.display()))?;
        self.set_table(table, None);
        Ok(())
    }

    /// Assemble time-resolved spectra from `folder`, skipping static scans.
    pub fn combine_time_resolved(&mut self, folder: &Path) -> Result<()> {
        let files = loader::list_time_resolved_files(folder)?;
        let spectra = loader::read_series(&files)?;
        let table = merge::assemble_time_resolved(&spectra)
            .with_context(|| format!("No suitable CSV files found in {}", folder.display()))?;
        self.set_table(table, None);
        Ok(())
    }

    pub fn open_table(&mut self, path: &Path) -> Result<()> {
        let table = loader::load_table(path)?;
        self.set_table(table, Some(path.to_path_buf()));
        Ok(())
    }

    pub fn save_table(&mut self, path: &Path) -> Result<()> {
        loader::write_table_csv(self.table()?, path)?;
        self.table_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Output path for a derived table, if the working table has a home.
    pub fn derived_path(&self, suffix: &str) -> Option<PathBuf> {
        self.table_path
            .as_deref()
            .map(|p| loader::derived_path(p, suffix))
    }

    /// Replace the working table by `f(table)` and write it to `output`.
    fn transform<F>(&mut self, output: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&SpectrumTable) -> CoreResult<SpectrumTable>,
    {
        let next = f(self.table()?)?;
        loader::write_table_csv(&next, output)?;
        self.table = Some(next);
        self.table_path = Some(output.to_path_buf());
        Ok(())
    }

    pub fn sort_columns(&mut self, output: &Path) -> Result<()> {
        self.transform(output, |t| Ok(labeling::reorder_by_label(t.clone())))
    }

    // -- Step 2: relabeling --

    /// Potential swept per spectrum for `spec` over the working table.
    pub fn potential_change(&self, spec: WaveformSpec) -> Option<f64> {
        let n = self.table.as_ref()?.data_column_count();
        spec.potential_increment(n).ok()
    }

    pub fn rename_by_waveform(&mut self, spec: WaveformSpec, output: &Path) -> Result<()> {
        self.transform(output, |t| {
            let labels = spec.assign(t.data_column_count())?;
            labeling::apply_labels(t.clone(), &labels)
        })
    }

    pub fn rename_by_time(&mut self, output: &Path) -> Result<()> {
        let total_time = parse_parameter("Total time", &self.total_time)?;
        self.transform(output, |t| {
            let labels = assign_elapsed(total_time, t.data_column_count())?;
            labeling::apply_labels(t.clone(), &labels)
        })
    }

    // -- Step 3: background --

    pub fn subtract_background(&mut self, output: &Path) -> Result<()> {
        let reference = self
            .reference_column
            .clone()
            .context("No column selected")?;
        self.transform(output, |t| labeling::subtract_reference(t, &reference))
    }

    // -- Presets --

    /// Snapshot of every form that currently parses.
    pub fn preset(&self) -> WaveformPreset {
        WaveformPreset {
            cyclic: self.cv_form.parse().ok(),
            linear: self.lv_form.parse().ok(),
            total_time: parse_parameter("Total time", &self.total_time).ok(),
        }
    }

    pub fn apply_preset(&mut self, preset: &WaveformPreset) {
        if let Some(cv) = &preset.cyclic {
            self.cv_form.fill(cv);
        }
        if let Some(lv) = &preset.linear {
            self.lv_form.fill(lv);
        }
        if let Some(t) = preset.total_time {
            self.total_time = t.to_string();
        }
    }
}
