use serde::{Deserialize, Serialize};

use super::{check_common, time_interval, SpectrumLabel, SweepStep};
use crate::error::{CoreError, CoreResult};

/// Linear sweep: hold at `e_begin` for `t_eq`, then one ramp to `e_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSweep {
    /// Equilibration hold, seconds.
    pub t_eq: f64,
    /// Start potential, volts.
    pub e_begin: f64,
    /// End potential, volts.
    pub e_end: f64,
    /// Scan rate, V/s.
    pub scan_rate: f64,
}

/// Stage of a linear sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LvStage {
    /// Holding at `e_begin`; `elapsed` seconds of hold acquired so far.
    Equilibrating { elapsed: f64 },
    Ramping,
}

impl LinearSweep {
    pub fn new(t_eq: f64, e_begin: f64, e_end: f64, scan_rate: f64) -> CoreResult<Self> {
        let sweep = Self {
            t_eq,
            e_begin,
            e_end,
            scan_rate,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_common(
            self.t_eq,
            self.scan_rate,
            &[("E begin", self.e_begin), ("E end", self.e_end)],
        )?;
        if self.e_begin == self.e_end {
            return Err(CoreError::InvalidWaveformParameter(
                "E_begin must not be equal to E_end".into(),
            ));
        }
        Ok(())
    }

    pub fn excursion(&self) -> f64 {
        (self.e_end - self.e_begin).abs()
    }

    pub fn total_duration(&self) -> f64 {
        self.t_eq + self.excursion() / self.scan_rate
    }

    /// One spectrum's worth of the sweep starting from `current`.
    ///
    /// Once the hold is over the potential moves by `increment` toward
    /// `e_end` without clamping; the increment is sized so the last spectrum
    /// ends on `e_end`.
    pub fn advance(&self, stage: LvStage, current: f64, increment: f64, interval: f64) -> SweepStep<LvStage> {
        match stage {
            LvStage::Equilibrating { elapsed } if elapsed < self.t_eq => SweepStep {
                stage: LvStage::Equilibrating {
                    elapsed: elapsed + interval,
                },
                start: self.e_begin,
                end: self.e_begin,
            },
            _ => {
                let end = if self.e_begin < self.e_end {
                    current + increment
                } else {
                    current - increment
                };
                SweepStep {
                    stage: LvStage::Ramping,
                    start: current,
                    end,
                }
            }
        }
    }
}

/// Midpoint potential for each of `num_spectra` spectra of a linear sweep.
pub fn assign_linear(sweep: &LinearSweep, num_spectra: usize) -> CoreResult<Vec<SpectrumLabel>> {
    sweep.validate()?;
    let interval = time_interval(sweep.total_duration(), num_spectra)?;
    let increment = sweep.scan_rate * interval;
    log::debug!("LV: {num_spectra} spectra, {interval:.6} s and {increment:.6} V per spectrum");

    let mut stage = LvStage::Equilibrating { elapsed: 0.0 };
    let mut current = sweep.e_begin;
    let labels = (0..num_spectra)
        .map(|_| {
            let step = sweep.advance(stage, current, increment, interval);
            stage = step.stage;
            current = step.end;
            SpectrumLabel::midpoint(step.start, step.end)
        })
        .collect();
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(labels: &[SpectrumLabel]) -> Vec<String> {
        labels.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn ramp_without_hold() {
        let sweep = LinearSweep::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let labels = assign_linear(&sweep, 10).unwrap();

        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0].to_string(), "0.05 V");
        assert_eq!(labels[9].to_string(), "0.95 V");
        assert!(labels.windows(2).all(|w| w[0].value() < w[1].value()));
    }

    #[test]
    fn hold_then_descending_ramp() {
        let sweep = LinearSweep::new(1.0, 1.0, 0.0, 0.5).unwrap();
        let labels = assign_linear(&sweep, 3).unwrap();
        assert_eq!(names(&labels), vec!["1.00 V", "0.75 V", "0.25 V"]);
    }

    #[test]
    fn hold_lasts_while_elapsed_is_below_t_eq() {
        let sweep = LinearSweep {
            t_eq: 1.5,
            e_begin: 0.0,
            e_end: 1.0,
            scan_rate: 1.0,
        };
        let first = sweep.advance(LvStage::Equilibrating { elapsed: 0.0 }, 0.0, 0.5, 1.0);
        assert_eq!(first.stage, LvStage::Equilibrating { elapsed: 1.0 });
        assert_eq!((first.start, first.end), (0.0, 0.0));

        let second = sweep.advance(first.stage, 0.0, 0.5, 1.0);
        assert_eq!(second.stage, LvStage::Equilibrating { elapsed: 2.0 });

        let third = sweep.advance(second.stage, 0.0, 0.5, 1.0);
        assert_eq!(third.stage, LvStage::Ramping);
        assert_eq!((third.start, third.end), (0.0, 0.5));
    }

    #[test]
    fn degenerate_parameters_rejected() {
        assert!(matches!(
            LinearSweep::new(0.0, 0.5, 0.5, 1.0),
            Err(CoreError::InvalidWaveformParameter(_))
        ));
        assert!(LinearSweep::new(0.0, 0.0, 1.0, 0.0).is_err());
        assert!(LinearSweep::new(0.0, 0.0, 1.0, -0.1).is_err());
        assert!(LinearSweep::new(-1.0, 0.0, 1.0, 0.1).is_err());
    }

    #[test]
    fn zero_spectra_rejected() {
        let sweep = LinearSweep::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(assign_linear(&sweep, 0).is_err());
    }
}
