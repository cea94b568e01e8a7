use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::model::{bucket_value, key_bucket, SourceSpectrum, SpectrumColumn, SpectrumTable};
use crate::error::{CoreError, CoreResult};

/// Column label used for time-resolved files whose name carries no `t = x.y`.
pub const FALLBACK_TIME_LABEL: &str = "Time";

// ---------------------------------------------------------------------------
// Series merge: truncated-key full outer join
// ---------------------------------------------------------------------------

/// Merge spectra into one wavenumber-aligned table.
///
/// Each axis is truncated to one decimal and the files are full-outer-joined
/// on that key in the order given. Rows appear in first-seen order: the first
/// file's rows, then keys introduced by later files in their own order. A
/// spectrum without a reading for some key gets an absent cell there.
///
/// Every file, the first included, contributes one cell per key: when two
/// readings of one file truncate to the same key, the later reading wins.
///
/// Only the accumulated key column survives as the axis; later files' raw
/// wavenumbers are discarded.
pub fn merge(sources: &[SourceSpectrum]) -> CoreResult<SpectrumTable> {
    if sources.is_empty() {
        return Err(CoreError::EmptyInput);
    }

    let mut table = SpectrumTable::default();
    let mut rows: HashMap<i64, usize> = HashMap::new();
    for (i, source) in sources.iter().enumerate() {
        log::debug!("Joining file {}/{}: {}", i + 1, sources.len(), source.name);
        join_source(&mut table, &mut rows, source);
    }

    log::info!("Merged {} files into {table}", sources.len());
    Ok(table)
}

/// Full outer join of one spectrum into the accumulated table.
fn join_source(table: &mut SpectrumTable, rows: &mut HashMap<i64, usize>, source: &SourceSpectrum) {
    let mut values: Vec<Option<f64>> = vec![None; table.n_rows()];
    let mut seen = HashSet::with_capacity(source.len());
    let mut collisions = 0usize;

    for (&w, &y) in source.wavenumber.iter().zip(&source.intensity) {
        let bucket = key_bucket(w);
        if !seen.insert(bucket) {
            collisions += 1;
        }
        let row = *rows.entry(bucket).or_insert_with(|| {
            // Key only this file has: open a new row, absent everywhere else.
            table.wavenumber.push(bucket_value(bucket));
            for column in &mut table.columns {
                column.values.push(None);
            }
            values.push(None);
            table.wavenumber.len() - 1
        });
        values[row] = Some(y);
    }

    if collisions > 0 {
        log::warn!(
            "{}: {collisions} readings share a truncated wavenumber, keeping the last",
            source.name
        );
    }

    table.columns.push(SpectrumColumn {
        name: source.name.clone(),
        values,
    });
}

// ---------------------------------------------------------------------------
// Time-resolved assembly: positional alignment, time-stamped headers
// ---------------------------------------------------------------------------

/// Pull the `x.y` out of a `t = x.y` marker in a file name.
///
/// ```
/// use rusty_seiras::data::merge::extract_time_value;
/// assert_eq!(extract_time_value("run3 t = 12.50 s.csv").as_deref(), Some("12.50"));
/// assert_eq!(extract_time_value("background.csv"), None);
/// ```
pub fn extract_time_value(name: &str) -> Option<String> {
    static TIME_MARKER: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"t = (\d+\.\d+)").ok());
    let caps = TIME_MARKER.as_ref()?.captures(name)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

/// Assemble time-resolved spectra that share one acquisition axis.
///
/// Files are aligned by row position against the first file's wavenumbers
/// (no truncation, no join). Each column is labeled with the time found in
/// its source name, or [`FALLBACK_TIME_LABEL`], and columns are ordered by
/// ascending time with unlabeled ones last.
pub fn assemble_time_resolved(sources: &[SourceSpectrum]) -> CoreResult<SpectrumTable> {
    let first = sources.first().ok_or(CoreError::EmptyInput)?;

    let mut stamped: Vec<(Option<f64>, String, &SourceSpectrum)> = sources
        .iter()
        .map(|source| match extract_time_value(&source.name) {
            Some(label) => (label.parse::<f64>().ok(), label, source),
            None => {
                log::warn!("{}: no 't = ' marker in file name", source.name);
                (None, FALLBACK_TIME_LABEL.to_string(), source)
            }
        })
        .collect();

    stamped.sort_by(|(a, _, _), (b, _, _)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut table = SpectrumTable::new(first.wavenumber.clone());
    for (_, label, source) in stamped {
        if source.len() != table.n_rows() {
            log::warn!(
                "{}: {} rows against {} on the shared axis",
                source.name,
                source.len(),
                table.n_rows()
            );
        }
        table.push_column(label, source.intensity.iter().copied().map(Some).collect());
    }

    log::info!("Assembled {} time-resolved files into {table}", sources.len());
    Ok(table)
}
