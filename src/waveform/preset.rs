use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::{CyclicSweep, LinearSweep};

/// Saved waveform settings, so a series of experiments with the same
/// excitation can be relabeled without retyping the parameters.
///
/// ```json
/// {
///   "cyclic": { "t_eq": 10.0, "e_begin": 0.0, "e_vertex1": 1.0, "e_vertex2": -0.5, "scan_rate": 0.01 },
///   "linear": null,
///   "total_time": 300.0
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformPreset {
    #[serde(default)]
    pub cyclic: Option<CyclicSweep>,
    #[serde(default)]
    pub linear: Option<LinearSweep>,
    /// Total collection time for elapsed-time labels, seconds.
    #[serde(default)]
    pub total_time: Option<f64>,
}

impl WaveformPreset {
    /// Check every waveform the preset carries.
    pub fn validate(&self) -> Result<()> {
        if let Some(cv) = &self.cyclic {
            cv.validate().context("cyclic waveform")?;
        }
        if let Some(lv) = &self.linear {
            lv.validate().context("linear waveform")?;
        }
        if let Some(t) = self.total_time {
            if !t.is_finite() || t <= 0.0 {
                bail!("total collection time must be positive, got {t}");
            }
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let preset: Self = serde_json::from_str(text).context("parsing waveform preset")?;
        preset.validate()?;
        Ok(preset)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing waveform preset")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display()))?;
        let preset = Self::from_json(&text).with_context(|| format!("loading {}", path.display()))?;
        log::info!("Loaded waveform preset from {}", path.display());
        Ok(preset)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing preset {}", path.display()))?;
        log::info!("Saved waveform preset to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_none() {
        let preset = WaveformPreset::from_json(r#"{ "total_time": 12.5 }"#).unwrap();
        assert_eq!(preset.total_time, Some(12.5));
        assert!(preset.cyclic.is_none());
        assert!(preset.linear.is_none());
    }

    #[test]
    fn invalid_waveform_is_rejected_on_load() {
        let text = r#"{ "cyclic": { "t_eq": 0.0, "e_begin": 2.0, "e_vertex1": 1.0, "e_vertex2": -1.0, "scan_rate": 0.1 } }"#;
        let err = WaveformPreset::from_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("E_begin"));
    }

    #[test]
    fn json_round_trip() {
        let preset = WaveformPreset {
            cyclic: None,
            linear: Some(LinearSweep::new(5.0, -0.2, 0.8, 0.05).unwrap()),
            total_time: None,
        };
        let back = WaveformPreset::from_json(&preset.to_json().unwrap()).unwrap();
        assert_eq!(back, preset);
    }
}
