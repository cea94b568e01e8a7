//! Property-based checks for truncation, merging and the sweep labelers.

use std::collections::HashSet;

use proptest::prelude::*;

use rusty_seiras::data::labeling::reorder_by_label;
use rusty_seiras::data::merge::merge;
use rusty_seiras::data::model::{key_bucket, truncate_key, SourceSpectrum, SpectrumTable};
use rusty_seiras::waveform::{assign_cyclic, assign_linear, CyclicSweep, LinearSweep};

fn spectra() -> impl Strategy<Value = Vec<SourceSpectrum>> {
    prop::collection::vec(
        prop::collection::hash_map(0i64..50_000, -1.0f64..1.0, 1..40),
        1..6,
    )
    .prop_map(|files| {
        files
            .into_iter()
            .enumerate()
            .map(|(i, readings)| {
                // centi-wavenumber grid: distinct readings may still share a key
                let pairs: Vec<(f64, f64)> = readings
                    .into_iter()
                    .map(|(cw, y)| (cw as f64 / 100.0 + 400.0, y))
                    .collect();
                SourceSpectrum::from_pairs(format!("file{i}.csv"), &pairs)
            })
            .collect()
    })
}

/// Drop readings that collide on a key within one file; the merge leaves
/// that case to the caller.
fn one_reading_per_key(mut sources: Vec<SourceSpectrum>) -> Vec<SourceSpectrum> {
    for source in &mut sources {
        let mut seen = HashSet::new();
        let (w, y): (Vec<f64>, Vec<f64>) = source
            .wavenumber
            .iter()
            .zip(&source.intensity)
            .filter(|(w, _)| seen.insert(key_bucket(**w)))
            .map(|(w, y)| (*w, *y))
            .unzip();
        source.wavenumber = w;
        source.intensity = y;
    }
    sources
}

proptest! {
    #[test]
    fn truncation_never_exceeds_and_is_monotonic(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0) {
        prop_assert!(truncate_key(a) <= a);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(truncate_key(lo) <= truncate_key(hi));
    }

    #[test]
    fn truncation_stays_within_one_tenth(w in 0.0f64..10_000.0) {
        prop_assert!(w - truncate_key(w) < 0.1 + 1e-9);
    }

    #[test]
    fn truncation_is_idempotent(w in 0.0f64..10_000.0) {
        prop_assert_eq!(truncate_key(truncate_key(w)), truncate_key(w));
    }

    #[test]
    fn merged_rows_equal_distinct_keys(sources in spectra().prop_map(one_reading_per_key)) {
        let keys: HashSet<i64> = sources
            .iter()
            .flat_map(|s| s.wavenumber.iter().map(|w| key_bucket(*w)))
            .collect();
        let table = merge(&sources).unwrap();

        prop_assert_eq!(table.n_rows(), keys.len());
        prop_assert_eq!(table.data_column_count(), sources.len());
        for column in &table.columns {
            prop_assert_eq!(column.values.len(), table.n_rows());
        }
        // every reading is findable under its key
        for (source, column) in sources.iter().zip(&table.columns) {
            let present = column.values.iter().filter(|v| v.is_some()).count();
            prop_assert_eq!(present, source.len());
        }
    }

    #[test]
    fn linear_label_count_matches(n in 1usize..300, t_eq in 0.0f64..30.0, rate in 0.001f64..1.0) {
        let sweep = LinearSweep::new(t_eq, -0.2, 0.9, rate).unwrap();
        prop_assert_eq!(assign_linear(&sweep, n).unwrap().len(), n);
    }

    #[test]
    fn cyclic_labels_stay_between_vertices(n in 1usize..400, t_eq in 0.0f64..30.0, rate in 0.001f64..1.0) {
        let sweep = CyclicSweep::new(t_eq, 0.0, 1.0, -1.0, rate).unwrap();
        let labels = assign_cyclic(&sweep, n).unwrap();
        prop_assert_eq!(labels.len(), n);
        for label in &labels {
            prop_assert!((-1.0..=1.0).contains(&label.value()));
        }
    }

    #[test]
    fn cyclic_begin_outside_vertices_always_fails(begin in 1.0001f64..10.0) {
        prop_assert!(CyclicSweep::new(0.0, begin, 1.0, -1.0, 0.1).is_err());
        prop_assert!(CyclicSweep::new(0.0, -begin, 1.0, -1.0, 0.1).is_err());
    }

    #[test]
    fn reorder_is_idempotent(names in prop::collection::vec("[-0-9. Vs]{0,8}", 0..20)) {
        let table = names.iter().fold(SpectrumTable::new(vec![1.0]), |t, name| {
            t.with_column(name.clone(), vec![Some(name.len() as f64)])
        });
        let once = reorder_by_label(table);
        prop_assert_eq!(reorder_by_label(once.clone()), once);
    }
}
