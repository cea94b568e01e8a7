use serde::{Deserialize, Serialize};

use super::{check_common, time_interval, SpectrumLabel, SweepStep};
use crate::error::{CoreError, CoreResult};

/// Cyclic sweep: hold at `e_begin`, ramp to `e_vertex1`, then to `e_vertex2`,
/// then back to `e_begin`.
///
/// When `e_begin == e_vertex2` the cycle is a single round trip to
/// `e_vertex1` and back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclicSweep {
    /// Equilibration hold, seconds.
    pub t_eq: f64,
    /// Start potential, volts. Must lie between the vertices.
    pub e_begin: f64,
    pub e_vertex1: f64,
    pub e_vertex2: f64,
    /// Scan rate, V/s.
    pub scan_rate: f64,
}

/// Stage of a cyclic sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CvStage {
    /// Holding at `e_begin`; `elapsed` seconds of hold acquired so far.
    Equilibrating { elapsed: f64 },
    TowardVertex1,
    /// Toward `e_vertex2`, or straight back to `e_begin` for a round trip.
    TowardVertex2,
    TowardBegin,
}

impl CyclicSweep {
    pub fn new(t_eq: f64, e_begin: f64, e_vertex1: f64, e_vertex2: f64, scan_rate: f64) -> CoreResult<Self> {
        let sweep = Self {
            t_eq,
            e_begin,
            e_vertex1,
            e_vertex2,
            scan_rate,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_common(
            self.t_eq,
            self.scan_rate,
            &[
                ("E begin", self.e_begin),
                ("E vertex1", self.e_vertex1),
                ("E vertex2", self.e_vertex2),
            ],
        )?;
        let low = self.e_vertex1.min(self.e_vertex2);
        let high = self.e_vertex1.max(self.e_vertex2);
        if !(low..=high).contains(&self.e_begin) {
            return Err(CoreError::InvalidBeginPotential {
                e_begin: self.e_begin,
                e_vertex1: self.e_vertex1,
                e_vertex2: self.e_vertex2,
            });
        }
        Ok(())
    }

    /// Whether the sweep is a round trip to `e_vertex1` only.
    pub fn is_round_trip(&self) -> bool {
        self.e_begin == self.e_vertex2
    }

    pub fn excursion(&self) -> f64 {
        if self.is_round_trip() {
            (self.e_vertex1 - self.e_begin).abs() + (self.e_begin - self.e_vertex1).abs()
        } else {
            (self.e_vertex1 - self.e_begin).abs()
                + (self.e_vertex2 - self.e_vertex1).abs()
                + (self.e_begin - self.e_vertex2).abs()
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.t_eq + self.excursion() / self.scan_rate
    }

    /// Potential a ramping stage heads for.
    pub fn target(&self, stage: CvStage) -> f64 {
        match stage {
            CvStage::TowardVertex1 => self.e_vertex1,
            CvStage::TowardVertex2 if !self.is_round_trip() => self.e_vertex2,
            CvStage::TowardVertex2 | CvStage::TowardBegin | CvStage::Equilibrating { .. } => self.e_begin,
        }
    }

    /// Stage entered once `stage` reaches its target.
    pub fn next_stage(&self, stage: CvStage) -> CvStage {
        match stage {
            CvStage::Equilibrating { .. } | CvStage::TowardBegin => CvStage::TowardVertex1,
            CvStage::TowardVertex1 => CvStage::TowardVertex2,
            CvStage::TowardVertex2 if self.is_round_trip() => CvStage::TowardVertex1,
            CvStage::TowardVertex2 => CvStage::TowardBegin,
        }
    }

    /// One spectrum's worth of the sweep starting from `current`.
    ///
    /// The potential never overshoots the stage target. Reaching it switches
    /// the returned stage; this step still reports the window that ended on
    /// the target. The cycle repeats for as long as it is driven.
    pub fn advance(&self, stage: CvStage, current: f64, increment: f64, interval: f64) -> SweepStep<CvStage> {
        match stage {
            CvStage::Equilibrating { elapsed } if elapsed < self.t_eq => SweepStep {
                stage: CvStage::Equilibrating {
                    elapsed: elapsed + interval,
                },
                start: self.e_begin,
                end: self.e_begin,
            },
            CvStage::Equilibrating { .. } => {
                self.advance(CvStage::TowardVertex1, current, increment, interval)
            }
            ramp => {
                let target = self.target(ramp);
                let end = approach(current, target, increment);
                let stage = if end == target {
                    self.next_stage(ramp)
                } else {
                    ramp
                };
                SweepStep {
                    stage,
                    start: current,
                    end,
                }
            }
        }
    }
}

/// Move `current` toward `target` by `change`, stopping on the target.
fn approach(current: f64, target: f64, change: f64) -> f64 {
    if current < target {
        (current + change).min(target)
    } else {
        (current - change).max(target)
    }
}

/// Midpoint potential for each of `num_spectra` spectra of a cyclic sweep.
pub fn assign_cyclic(sweep: &CyclicSweep, num_spectra: usize) -> CoreResult<Vec<SpectrumLabel>> {
    sweep.validate()?;
    let interval = time_interval(sweep.total_duration(), num_spectra)?;
    let increment = sweep.scan_rate * interval;
    log::debug!("CV: {num_spectra} spectra, {interval:.6} s and {increment:.6} V per spectrum");

    let mut stage = CvStage::Equilibrating { elapsed: 0.0 };
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

    fn triangle() -> CyclicSweep {
        CyclicSweep::new(0.0, 0.0, 1.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn full_cycle_through_both_vertices() {
        let labels = assign_cyclic(&triangle(), 8).unwrap();
        assert_eq!(
            names(&labels),
            vec!["0.25 V", "0.75 V", "0.75 V", "0.25 V", "-0.25 V", "-0.75 V", "-0.75 V", "-0.25 V"]
        );
    }

    #[test]
    fn round_trip_when_begin_is_vertex2() {
        let sweep = CyclicSweep::new(0.0, 0.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(sweep.excursion(), 2.0);
        let labels = assign_cyclic(&sweep, 4).unwrap();
        assert_eq!(names(&labels), vec!["0.25 V", "0.75 V", "0.75 V", "0.25 V"]);
    }

    #[test]
    fn hold_precedes_the_ramp() {
        let sweep = CyclicSweep::new(2.0, 0.0, 1.0, -1.0, 1.0).unwrap();
        let labels = assign_cyclic(&sweep, 6).unwrap();
        assert_eq!(
            names(&labels),
            vec!["0.00 V", "0.00 V", "0.50 V", "0.50 V", "-0.50 V", "-0.50 V"]
        );
    }

    #[test]
    fn ramp_clamps_at_the_vertex() {
        let step = triangle().advance(CvStage::TowardVertex1, 0.8, 0.5, 0.5);
        assert_eq!(step.end, 1.0);
        assert_eq!(step.stage, CvStage::TowardVertex2);
    }

    #[test]
    fn stage_kept_until_target_reached() {
        let step = triangle().advance(CvStage::TowardVertex2, 1.0, 0.5, 0.5);
        assert_eq!(step.end, 0.5);
        assert_eq!(step.stage, CvStage::TowardVertex2);
    }

    #[test]
    fn return_to_begin_loops_to_vertex1() {
        let step = triangle().advance(CvStage::TowardBegin, -0.5, 0.5, 0.5);
        assert_eq!(step.end, 0.0);
        assert_eq!(step.stage, CvStage::TowardVertex1);

        let round_trip = CyclicSweep::new(0.0, 0.0, 1.0, 0.0, 1.0).unwrap();
        let step = round_trip.advance(CvStage::TowardVertex2, 0.5, 0.5, 0.5);
        assert_eq!(step.end, 0.0);
        assert_eq!(step.stage, CvStage::TowardVertex1);
    }

    #[test]
    fn sweep_passes_begin_on_the_way_to_vertex2() {
        let step = triangle().advance(CvStage::TowardVertex2, 0.5, 0.5, 0.5);
        assert_eq!(step.end, 0.0);
        assert_eq!(step.stage, CvStage::TowardVertex2);
    }

    #[test]
    fn begin_outside_vertices_rejected() {
        let err = CyclicSweep::new(0.0, 2.0, 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBeginPotential { .. }));

        let unchecked = CyclicSweep {
            t_eq: 0.0,
            e_begin: 2.0,
            e_vertex1: 1.0,
            e_vertex2: -1.0,
            scan_rate: 1.0,
        };
        assert!(matches!(
            assign_cyclic(&unchecked, 10),
            Err(CoreError::InvalidBeginPotential { .. })
        ));
    }

    #[test]
    fn begin_on_a_vertex_is_accepted() {
        assert!(CyclicSweep::new(0.0, 1.0, 1.0, -1.0, 1.0).is_ok());
        assert!(CyclicSweep::new(0.0, -1.0, 1.0, -1.0, 1.0).is_ok());
    }
}
