//! Assembly and potential labeling of time-resolved electrochemical
//! FTIR spectra.
//!
//! A run produces one headerless `wavenumber,intensity` file per spectrum.
//! [`data::merge::merge`] joins them into one table on a one-decimal
//! wavenumber key, a [`waveform::WaveformSpec`] turns the spectrum count into
//! per-column potential labels, and [`data::labeling::apply_labels`] puts
//! the two together.
//!
//! ```
//! use rusty_seiras::data::{labeling, merge, model::SourceSpectrum};
//! use rusty_seiras::waveform::{CyclicSweep, WaveformSpec};
//!
//! let spectra = vec![
//!     SourceSpectrum::from_pairs("s1.csv", &[(1000.02, 0.1), (1001.07, 0.2)]),
//!     SourceSpectrum::from_pairs("s2.csv", &[(1000.05, 0.3), (1001.01, 0.4)]),
//! ];
//! let table = merge::merge(&spectra)?;
//!
//! let cv = WaveformSpec::from(CyclicSweep::new(0.0, 0.0, 0.5, 0.0, 0.1)?);
//! let labels = cv.assign(table.data_column_count())?;
//! let labeled = labeling::apply_labels(table, &labels)?;
//!
//! assert_eq!(labeled.header(), vec!["Wavenumber", "0.25 V", "0.25 V"]);
//! # Ok::<(), rusty_seiras::error::CoreError>(())
//! ```

pub mod data;
pub mod error;
pub mod waveform;

pub use error::{CoreError, CoreResult};
