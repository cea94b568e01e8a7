/// Data layer: spectral tables, assembly, and relabeling.
///
/// Architecture:
/// ```text
///  folder of headerless .csv spectra
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  natural-order listing, parse → SourceSpectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  truncated-key full outer join → SpectrumTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ labeling  │  waveform labels, reorder, background subtraction
///   └──────────┘
///        │
///        ▼
///  loader::write_table_csv
/// ```

pub mod labeling;
pub mod loader;
pub mod merge;
pub mod model;
