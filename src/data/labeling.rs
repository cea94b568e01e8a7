use std::fmt::Display;

use super::model::{SpectrumColumn, SpectrumTable};
use crate::error::{CoreError, CoreResult};

// ---------------------------------------------------------------------------
// Relabeling
// ---------------------------------------------------------------------------

/// Rename the data columns of `table`, in order, with `labels`.
///
/// "Wavenumber" is never relabeled, so exactly one label per data column is
/// required. Cell values and column order are untouched.
pub fn apply_labels<L: Display>(table: SpectrumTable, labels: &[L]) -> CoreResult<SpectrumTable> {
    if labels.len() != table.data_column_count() {
        return Err(CoreError::LabelCountMismatch {
            labels: labels.len(),
            columns: table.data_column_count(),
        });
    }

    let SpectrumTable {
        wavenumber,
        columns,
    } = table;
    let columns = columns
        .into_iter()
        .zip(labels)
        .map(|(column, label)| SpectrumColumn {
            name: label.to_string(),
            values: column.values,
        })
        .collect();

    Ok(SpectrumTable {
        wavenumber,
        columns,
    })
}

/// Sort data columns by their label as plain text, "Wavenumber" stays first.
///
/// The comparison is lexicographic on the stored label, so `"10.00 V"` sorts
/// before `"2.00 V"`. Equal labels keep their relative order.
pub fn reorder_by_label(mut table: SpectrumTable) -> SpectrumTable {
    table.columns.sort_by(|a, b| a.name.cmp(&b.name));
    table
}

// ---------------------------------------------------------------------------
// Background subtraction
// ---------------------------------------------------------------------------

/// Subtract the `reference` column from every data column.
///
/// The reference column itself becomes all zeros. A difference is absent when
/// either operand is absent.
pub fn subtract_reference(table: &SpectrumTable, reference: &str) -> CoreResult<SpectrumTable> {
    let background = table
        .column(reference)
        .ok_or_else(|| CoreError::UnknownColumn(reference.to_string()))?;

    let columns = table
        .columns
        .iter()
        .map(|column| {
            let values = if column.name == reference {
                vec![Some(0.0); table.n_rows()]
            } else {
                column
                    .values
                    .iter()
                    .zip(&background.values)
                    .map(|(v, bg)| Some((*v)? - (*bg)?))
                    .collect()
            };
            SpectrumColumn {
                name: column.name.clone(),
                values,
            }
        })
        .collect();

    log::info!("Subtracted reference column '{reference}' from {table}");
    Ok(SpectrumTable {
        wavenumber: table.wavenumber.clone(),
        columns,
    })
}
