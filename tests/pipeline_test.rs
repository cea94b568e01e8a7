//! End-to-end runs over real files: list → read → merge → label → write.

use std::fs;
use std::path::Path;

use rusty_seiras::data::model::SpectrumTable;
use rusty_seiras::data::{labeling, loader, merge};
use rusty_seiras::waveform::{assign_elapsed, CyclicSweep, LinearSweep, WaveformSpec};
use rusty_seiras::CoreError;

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn three_offset_files_merge_into_three_rows() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "s1.csv", "100.04,1.0\n100.12,2.0\n");
    write(dir.path(), "s2.csv", "100.06,3.0\n100.18,4.0\n");
    write(dir.path(), "s3.csv", "100.09,5.0\n100.25,6.0\n");

    let files = loader::list_spectrum_files(dir.path()).unwrap();
    let spectra = loader::read_series(&files).unwrap();
    let table = merge::merge(&spectra).unwrap();

    assert_eq!(table.wavenumber, vec![100.0, 100.1, 100.2]);
    assert_eq!(table.header(), vec!["Wavenumber", "s1.csv", "s2.csv", "s3.csv"]);
    let third = table.column("s3.csv").unwrap();
    assert_eq!(third.values, vec![Some(5.0), None, Some(6.0)]);

    let out = dir.path().join("combined.csv");
    loader::write_table_csv(&table, &out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "Wavenumber,s1.csv,s2.csv,s3.csv\n100,1,3,5\n100.1,2,4,\n100.2,,,6\n"
    );
}

#[test]
fn files_are_merged_in_natural_order() {
    let dir = tempfile::tempdir().unwrap();
    for i in [10, 2, 1] {
        write(dir.path(), &format!("spec{i}.csv"), "500.0,1.0\n");
    }
    write(dir.path(), "notes.txt", "not a spectrum");
    write(dir.path(), "UPPER.CSV", "500.0,2.0\n");

    let files = loader::list_spectrum_files(dir.path()).unwrap();
    let names: Vec<String> = files.iter().map(|p| loader::file_name(p)).collect();
    assert_eq!(names, vec!["UPPER.CSV", "spec1.csv", "spec2.csv", "spec10.csv"]);
}

#[test]
fn empty_folder_cannot_be_merged() {
    let dir = tempfile::tempdir().unwrap();
    let files = loader::list_spectrum_files(dir.path()).unwrap();
    let spectra = loader::read_series(&files).unwrap();
    assert_eq!(merge::merge(&spectra), Err(CoreError::EmptyInput));
}

#[test]
fn cv_labels_applied_to_merged_table() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=8 {
        write(dir.path(), &format!("cv_{i}.csv"), &format!("2000.0{i},{i}.0\n1999.0{i},0.5\n"));
    }
    let files = loader::list_spectrum_files(dir.path()).unwrap();
    let table = merge::merge(&loader::read_series(&files).unwrap()).unwrap();
    assert_eq!(table.n_rows(), 2);

    let spec = WaveformSpec::from(CyclicSweep::new(0.0, 0.0, 1.0, -1.0, 1.0).unwrap());
    let labels = spec.assign(table.data_column_count()).unwrap();
    let labeled = labeling::apply_labels(table, &labels).unwrap();

    assert_eq!(
        labeled.header(),
        vec![
            "Wavenumber", "0.25 V", "0.75 V", "0.75 V", "0.25 V", "-0.25 V", "-0.75 V", "-0.75 V",
            "-0.25 V"
        ]
    );
    // data is untouched by relabeling
    assert_eq!(labeled.columns[4].values, vec![Some(5.0), Some(0.5)]);

    let sorted = labeling::reorder_by_label(labeled);
    assert_eq!(sorted.columns[0].name, "-0.25 V");
    assert_eq!(sorted.columns[7].name, "0.75 V");
}

#[test]
fn lv_labels_need_one_per_column() {
    let table = SpectrumTable::new(vec![1.0])
        .with_column("a", vec![Some(1.0)])
        .with_column("b", vec![Some(2.0)]);
    let lv = LinearSweep::new(0.0, 0.0, 1.0, 0.1).unwrap();
    let labels = rusty_seiras::waveform::assign_linear(&lv, 3).unwrap();

    assert_eq!(
        labeling::apply_labels(table, &labels),
        Err(CoreError::LabelCountMismatch {
            labels: 3,
            columns: 2
        })
    );
}

#[test]
fn time_resolved_folder_skips_static_scans() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "run t = 3.00 s.csv", "1000.0,3.0\n999.0,3.5\n");
    write(dir.path(), "run t = 0.50 s.csv", "1000.0,0.5\n999.0,1.0\n");
    write(dir.path(), "Static_bg.csv", "1000.0,9.0\n999.0,9.0\n");

    let files = loader::list_time_resolved_files(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    let table = merge::assemble_time_resolved(&loader::read_series(&files).unwrap()).unwrap();

    assert_eq!(table.header(), vec!["Wavenumber", "0.50", "3.00"]);
    assert_eq!(table.columns[1].values, vec![Some(3.0), Some(3.5)]);
}

#[test]
fn background_subtraction_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labeled.csv");
    write(
        dir.path(),
        "labeled.csv",
        "Wavenumber,0.00s,5.00s\n1000.1,1.0,4.0\n1000.2,,2.5\n",
    );

    let table = loader::load_table(&path).unwrap();
    let labels = assign_elapsed(10.0, table.data_column_count()).unwrap();
    let table = labeling::apply_labels(table, &labels).unwrap();
    let corrected = labeling::subtract_reference(&table, "0.00s").unwrap();

    let out = loader::derived_path(&path, "_0.00s");
    loader::write_table_csv(&corrected, &out).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Wavenumber,0.00s,5.00s\n1000.1,0,3\n1000.2,0,\n"
    );
}

#[test]
fn unsupported_table_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "table.xlsx", "");
    let err = loader::load_table(&dir.path().join("table.xlsx")).unwrap_err();
    assert!(err.to_string().contains(".xlsx"));
}
