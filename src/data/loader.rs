use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::model::{SourceSpectrum, SpectrumTable, WAVENUMBER};

// ---------------------------------------------------------------------------
// Folder listing
// ---------------------------------------------------------------------------

/// `.csv` files in `folder` (extension matched case-insensitively), in
/// natural order so `spec2.csv` precedes `spec10.csv`.
pub fn list_spectrum_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)
        .with_context(|| format!("listing folder {}", folder.display()))?
    {
        let path = entry.context("reading folder entry")?.path();
        if path.is_file() && has_extension(&path, "csv") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    log::debug!("Found {} CSV files in {}", files.len(), folder.display());
    Ok(files)
}

/// Like [`list_spectrum_files`] but skips static reference scans (any file
/// whose name contains "static", case-insensitively).
pub fn list_time_resolved_files(folder: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_spectrum_files(folder)?
        .into_iter()
        .filter(|p| !file_name(p).to_ascii_lowercase().contains("static"))
        .collect())
}

/// Compare names the way a person would: runs of digits by numeric value,
/// everything else character by character.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                let (ta, tb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let ord = ta
                    .len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| da.len().cmp(&db.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = ra;
                b = rb;
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                a = &a[ca.len_utf8()..];
                b = &b[cb.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// File name as text, used as the source identifier of a spectrum.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Headerless two-column spectra
// ---------------------------------------------------------------------------

/// Read one headerless `wavenumber,intensity` file. The spectrum is named
/// after the file.
pub fn read_two_column_csv(path: &Path) -> Result<SourceSpectrum> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_two_column(file, file_name(path)).with_context(|| format!("reading {}", path.display()))
}

/// Read a headerless two-column table from any reader.
pub fn read_two_column<R: io::Read>(reader: R, name: String) -> Result<SourceSpectrum> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut wavenumber = Vec::new();
    let mut intensity = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        if record.len() < 2 {
            bail!("row {row_no}: expected 2 columns, found {}", record.len());
        }
        wavenumber.push(parse_number(&record[0], row_no, "wavenumber")?);
        intensity.push(parse_number(&record[1], row_no, "intensity")?);
    }

    Ok(SourceSpectrum::new(name, wavenumber, intensity))
}

/// Read every file of a series, keeping the given order.
pub fn read_series(paths: &[PathBuf]) -> Result<Vec<SourceSpectrum>> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            log::info!("Processing file {}/{}: {}", i + 1, paths.len(), file_name(path));
            read_two_column_csv(path)
        })
        .collect()
}

fn parse_number(s: &str, row: usize, col: &str) -> Result<f64> {
    let value: f64 = s
        .parse()
        .with_context(|| format!("row {row}, {col}: '{s}' is not a number"))?;
    if !value.is_finite() {
        bail!("row {row}, {col}: '{s}' is not a finite number");
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Labeled wide tables
// ---------------------------------------------------------------------------

/// Load an assembled table. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma separated
/// * `.tsv` / `.txt` – tab separated
pub fn load_table(path: &Path) -> Result<SpectrumTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" | "txt" => b'\t',
        other => bail!("Unsupported file extension: .{other}"),
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let table = read_table(file, delimiter).with_context(|| format!("reading {}", path.display()))?;
    log::info!("Loaded {table} from {}", path.display());
    Ok(table)
}

/// Read a table whose header is "Wavenumber" followed by spectrum labels.
/// Empty cells are absent readings.
pub fn read_table<R: io::Read>(reader: R, delimiter: u8) -> Result<SpectrumTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    match headers.first() {
        Some(first) if first == WAVENUMBER => {}
        Some(first) => bail!("first column must be '{WAVENUMBER}', found '{first}'"),
        None => bail!("missing header row"),
    }

    let mut wavenumber = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len() - 1];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        wavenumber.push(parse_number(&record[0], row_no, WAVENUMBER)?);
        for (col, cells) in columns.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or("");
            let value = if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(parse_number(cell, row_no, &headers[col + 1])?)
            };
            cells.push(value);
        }
    }

    let mut table = SpectrumTable::new(wavenumber);
    for (name, values) in headers.into_iter().skip(1).zip(columns) {
        table.push_column(name, values);
    }
    Ok(table)
}

/// Write a table as CSV: header row, then one row per wavenumber with absent
/// readings as empty fields.
pub fn write_table_csv(table: &SpectrumTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_table(table, file).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {table} to {}", path.display());
    Ok(())
}

pub fn write_table<W: io::Write>(table: &SpectrumTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.header())?;

    let mut record: Vec<String> = Vec::with_capacity(table.column_count());
    for (row, w) in table.wavenumber.iter().enumerate() {
        record.clear();
        record.push(w.to_string());
        record.extend(
            table
                .columns
                .iter()
                .map(|c| {
                    c.values
                        .get(row)
                        .copied()
                        .flatten()
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                }),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Sibling output path: `dir/stem.csv` → `dir/stem{suffix}.csv`.
pub fn derived_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}.csv"))
}
