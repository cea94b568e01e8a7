use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rusty_seiras::waveform::{CvStage, CyclicSweep};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One acquisition at `potential`: a CO-like band whose position tunes with
/// potential, a potential-independent water band, and noise. The axis starts
/// at a small random offset, the way consecutive interferometer scans do.
fn write_spectrum(path: &Path, potential: f64, rng: &mut SimpleRng) -> Result<()> {
    let offset = rng.next_f64() * 0.09;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for i in 0..1500 {
        let wn = 4000.0 - i as f64 * 1.928 + offset;
        let band = gaussian(wn, 2050.0 + 30.0 * potential, 12.0, 0.02 * (1.0 + potential));
        let water = gaussian(wn, 1640.0, 40.0, 0.01);
        let y = band + water + rng.gauss(0.0, 2e-4);
        writer.write_record(&[format!("{wn:.4}"), format!("{y:.6}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let series_dir = root.join("cv_series");
    let time_dir = root.join("time_resolved");
    std::fs::create_dir_all(&series_dir).context("creating series folder")?;
    std::fs::create_dir_all(&time_dir).context("creating time-resolved folder")?;

    let mut rng = SimpleRng::new(42);

    // CV series: drive the same stage walk the labeler uses, so the band
    // shifts in step with the potential labels the app will assign.
    let sweep = CyclicSweep::new(10.0, 0.0, 0.8, -0.4, 0.02)?;
    let n_spectra = 60;
    let interval = sweep.total_duration() / n_spectra as f64;
    let increment = sweep.scan_rate * interval;
    let mut stage = CvStage::Equilibrating { elapsed: 0.0 };
    let mut potential = sweep.e_begin;

    for i in 1..=n_spectra {
        let step = sweep.advance(stage, potential, increment, interval);
        stage = step.stage;
        potential = step.end;
        let mid = (step.start + step.end) / 2.0;
        write_spectrum(&series_dir.join(format!("spectrum_{i}.csv")), mid, &mut rng)?;
    }

    // Time-resolved set with a static reference scan that assembly skips.
    write_spectrum(&time_dir.join("static_reference.csv"), 0.0, &mut rng)?;
    for i in 0..20 {
        let t = i as f64 * 1.5;
        let name = format!("series t = {t:.2} s.csv");
        write_spectrum(&time_dir.join(name), 0.03 * i as f64, &mut rng)?;
    }

    println!(
        "Wrote {n_spectra} CV spectra to {} and 21 time-resolved spectra to {}",
        series_dir.display(),
        time_dir.display()
    );
    Ok(())
}
