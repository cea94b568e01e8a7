/// Errors raised by the pure table and waveform operations.
///
/// Every variant is produced before any output exists, so a failed call
/// never leaves a half-built table behind. File-level failures are reported
/// through `anyhow` by the loader instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// No source tables were handed to an assembly step.
    #[error("No spectrum files to combine")]
    EmptyInput,

    /// Cyclic waveform whose begin potential lies outside its vertices.
    #[error("E_begin ({e_begin} V) must be equal to or between E_vertex1 ({e_vertex1} V) and E_vertex2 ({e_vertex2} V)")]
    InvalidBeginPotential {
        e_begin: f64,
        e_vertex1: f64,
        e_vertex2: f64,
    },

    /// Label sequence does not cover the data columns one-to-one.
    #[error("Got {labels} labels for {columns} spectrum columns")]
    LabelCountMismatch { labels: usize, columns: usize },

    /// Non-finite or degenerate scalar parameter.
    #[error("Invalid waveform parameter: {0}")]
    InvalidWaveformParameter(String),

    /// Requested column does not exist in the table.
    #[error("No column named '{0}'")]
    UnknownColumn(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
