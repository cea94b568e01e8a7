use std::fmt;

/// Header of the shared spectral axis. Always the first column of a table.
pub const WAVENUMBER: &str = "Wavenumber";

// ---------------------------------------------------------------------------
// TruncatedKey – the exact-bucket join key for wavenumber axes
// ---------------------------------------------------------------------------

/// Integer bucket of a wavenumber at 0.1 resolution: `floor(value * 10)`.
///
/// Two readings land in the same row of a merged table iff their buckets are
/// equal. This is deliberately not a tolerance match: 99.96 and 100.04 are
/// 0.08 apart yet fall into buckets 999 and 1000.
pub fn key_bucket(value: f64) -> i64 {
    (value * 10.0).floor() as i64
}

/// Wavenumber truncated to one decimal place, e.g. `100.18 → 100.1`.
pub fn truncate_key(value: f64) -> f64 {
    bucket_value(key_bucket(value))
}

/// Inverse of [`key_bucket`]: the representative wavenumber of a bucket.
pub fn bucket_value(bucket: i64) -> f64 {
    bucket as f64 / 10.0
}

// ---------------------------------------------------------------------------
// SourceSpectrum – one headerless (wavenumber, intensity) file
// ---------------------------------------------------------------------------

/// A single acquired spectrum as read from disk, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpectrum {
    /// Opaque source identifier, normally the file name.
    pub name: String,
    /// Wavenumber axis (x).
    pub wavenumber: Vec<f64>,
    /// Intensity axis (y) – same length as `wavenumber`.
    pub intensity: Vec<f64>,
}

impl SourceSpectrum {
    pub fn new(name: impl Into<String>, wavenumber: Vec<f64>, intensity: Vec<f64>) -> Self {
        debug_assert_eq!(wavenumber.len(), intensity.len());
        Self {
            name: name.into(),
            wavenumber,
            intensity,
        }
    }

    /// Build from `(wavenumber, intensity)` pairs.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        let (wavenumber, intensity) = pairs.iter().copied().unzip();
        Self::new(name, wavenumber, intensity)
    }

    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SpectrumTable – wide matrix: Wavenumber + one column per spectrum
// ---------------------------------------------------------------------------

/// One intensity column. `None` marks a row for which this spectrum has no
/// reading (never zero-filled).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The assembled spectral matrix.
///
/// Invariant: every column holds exactly `wavenumber.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumTable {
    /// Shared axis; the "Wavenumber" column.
    pub wavenumber: Vec<f64>,
    /// Data columns in acquisition (or caller) order.
    pub columns: Vec<SpectrumColumn>,
}

impl SpectrumTable {
    /// A table with only its axis.
    pub fn new(wavenumber: Vec<f64>) -> Self {
        Self {
            wavenumber,
            columns: Vec::new(),
        }
    }

    /// Append a data column. Values are aligned by row position: extra cells
    /// are dropped and missing ones become absent.
    pub fn push_column(&mut self, name: impl Into<String>, mut values: Vec<Option<f64>>) {
        values.resize(self.wavenumber.len(), None);
        self.columns.push(SpectrumColumn {
            name: name.into(),
            values,
        });
    }

    /// Builder-style [`push_column`](Self::push_column).
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.push_column(name, values);
        self
    }

    /// Number of rows (distinct wavenumber keys after a merge).
    pub fn n_rows(&self) -> usize {
        self.wavenumber.len()
    }

    /// Number of columns including "Wavenumber".
    pub fn column_count(&self) -> usize {
        self.columns.len() + 1
    }

    /// Number of spectrum columns (excludes "Wavenumber").
    pub fn data_column_count(&self) -> usize {
        self.columns.len()
    }

    /// Header row: "Wavenumber" followed by the data column names.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(WAVENUMBER)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Look up a data column by name.
    pub fn column(&self, name: &str) -> Option<&SpectrumColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the table has no data columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for SpectrumTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows × {} spectra",
            self.n_rows(),
            self.data_column_count()
        )
    }
}
