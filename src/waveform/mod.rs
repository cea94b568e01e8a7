//! Waveform layer: excitation descriptions and per-spectrum labels.
//!
//! ```text
//!   scalar parameters (form / preset)
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ WaveformSpec  │  Linear | Cyclic, validated once
//!   └──────────────┘
//!        │  num_spectra
//!        ▼
//!   ┌──────────────┐
//!   │ stage walk    │  pure transition per spectrum index
//!   └──────────────┘
//!        │
//!        ▼
//!   Vec<SpectrumLabel>  "0.35 V" / "12.00s"
//! ```

pub mod cyclic;
pub mod linear;
pub mod preset;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use cyclic::{assign_cyclic, CvStage, CyclicSweep};
pub use linear::{assign_linear, LinearSweep, LvStage};
pub use preset::WaveformPreset;

// ---------------------------------------------------------------------------
// SpectrumLabel – header assigned to one spectrum column
// ---------------------------------------------------------------------------

/// Label for one spectrum, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectrumLabel {
    /// Midpoint potential over the acquisition window, volts.
    Potential(f64),
    /// Elapsed time at acquisition start, seconds.
    Elapsed(f64),
}

impl SpectrumLabel {
    /// Potential label for a window that started at `start` and ended at `end`.
    pub fn midpoint(start: f64, end: f64) -> Self {
        SpectrumLabel::Potential((start + end) / 2.0)
    }

    pub fn value(&self) -> f64 {
        match *self {
            SpectrumLabel::Potential(v) | SpectrumLabel::Elapsed(v) => v,
        }
    }
}

impl fmt::Display for SpectrumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumLabel::Potential(v) => write!(f, "{v:.2} V"),
            SpectrumLabel::Elapsed(t) => write!(f, "{t:.2}s"),
        }
    }
}

/// One transition of a sweep state machine: the stage to use for the next
/// spectrum plus the potential window covered by this one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStep<S> {
    pub stage: S,
    pub start: f64,
    pub end: f64,
}

// ---------------------------------------------------------------------------
// WaveformSpec
// ---------------------------------------------------------------------------

/// Excitation waveform of one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WaveformSpec {
    Linear(LinearSweep),
    Cyclic(CyclicSweep),
}

impl WaveformSpec {
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            WaveformSpec::Linear(sweep) => sweep.validate(),
            WaveformSpec::Cyclic(sweep) => sweep.validate(),
        }
    }

    /// Equilibration hold, seconds.
    pub fn t_eq(&self) -> f64 {
        match self {
            WaveformSpec::Linear(sweep) => sweep.t_eq,
            WaveformSpec::Cyclic(sweep) => sweep.t_eq,
        }
    }

    /// Scan rate, V/s.
    pub fn scan_rate(&self) -> f64 {
        match self {
            WaveformSpec::Linear(sweep) => sweep.scan_rate,
            WaveformSpec::Cyclic(sweep) => sweep.scan_rate,
        }
    }

    /// Total potential travelled by the ramps, volts.
    pub fn excursion(&self) -> f64 {
        match self {
            WaveformSpec::Linear(sweep) => sweep.excursion(),
            WaveformSpec::Cyclic(sweep) => sweep.excursion(),
        }
    }

    /// Hold plus ramp time, seconds.
    pub fn total_duration(&self) -> f64 {
        self.t_eq() + self.excursion() / self.scan_rate()
    }

    /// Acquisition window of one spectrum when `num_spectra` cover the run.
    pub fn time_interval(&self, num_spectra: usize) -> CoreResult<f64> {
        time_interval(self.total_duration(), num_spectra)
    }

    /// Potential swept during one acquisition window.
    pub fn potential_increment(&self, num_spectra: usize) -> CoreResult<f64> {
        Ok(self.scan_rate() * self.time_interval(num_spectra)?)
    }

    /// Midpoint potential label for each of `num_spectra` spectra.
    pub fn assign(&self, num_spectra: usize) -> CoreResult<Vec<SpectrumLabel>> {
        match self {
            WaveformSpec::Linear(sweep) => assign_linear(sweep, num_spectra),
            WaveformSpec::Cyclic(sweep) => assign_cyclic(sweep, num_spectra),
        }
    }
}

impl From<LinearSweep> for WaveformSpec {
    fn from(sweep: LinearSweep) -> Self {
        WaveformSpec::Linear(sweep)
    }
}

impl From<CyclicSweep> for WaveformSpec {
    fn from(sweep: CyclicSweep) -> Self {
        WaveformSpec::Cyclic(sweep)
    }
}

// ---------------------------------------------------------------------------
// Elapsed-time labels
// ---------------------------------------------------------------------------

/// Evenly spaced acquisition start times over `total_time` seconds.
pub fn assign_elapsed(total_time: f64, num_spectra: usize) -> CoreResult<Vec<SpectrumLabel>> {
    if !total_time.is_finite() || total_time <= 0.0 {
        return Err(CoreError::InvalidWaveformParameter(format!(
            "total collection time must be positive, got {total_time}"
        )));
    }
    let interval = time_interval(total_time, num_spectra)?;
    Ok((0..num_spectra)
        .map(|i| SpectrumLabel::Elapsed(i as f64 * interval))
        .collect())
}

// ---------------------------------------------------------------------------
// Parameter checks shared by both sweeps
// ---------------------------------------------------------------------------

pub(crate) fn time_interval(total_duration: f64, num_spectra: usize) -> CoreResult<f64> {
    if num_spectra == 0 {
        return Err(CoreError::InvalidWaveformParameter(
            "at least one spectrum is required".into(),
        ));
    }
    Ok(total_duration / num_spectra as f64)
}

pub(crate) fn check_common(t_eq: f64, scan_rate: f64, potentials: &[(&str, f64)]) -> CoreResult<()> {
    if !t_eq.is_finite() || t_eq < 0.0 {
        return Err(CoreError::InvalidWaveformParameter(format!(
            "T equilibrium must be zero or positive, got {t_eq}"
        )));
    }
    if !scan_rate.is_finite() || scan_rate <= 0.0 {
        return Err(CoreError::InvalidWaveformParameter(format!(
            "scan rate must be positive, got {scan_rate}"
        )));
    }
    if let Some((name, value)) = potentials.iter().find(|(_, v)| !v.is_finite()) {
        return Err(CoreError::InvalidWaveformParameter(format!(
            "{name} must be a finite potential, got {value}"
        )));
    }
    Ok(())
}

/// Parse one form field as a number.
pub fn parse_parameter(name: &str, text: &str) -> CoreResult<f64> {
    let value: f64 = text.trim().parse().map_err(|_| {
        CoreError::InvalidWaveformParameter(format!("{name}: '{}' is not a number", text.trim()))
    })?;
    if !value.is_finite() {
        return Err(CoreError::InvalidWaveformParameter(format!(
            "{name}: '{}' is not a finite number",
            text.trim()
        )));
    }
    Ok(value)
}
