//! Batch runs isolate per-unit failures and classify them.

use std::fs;

use qnm_evidence::app::pipeline::run_batch;
use qnm_evidence::data::{CsvDirSource, InjectionParams, SeriesSource, SyntheticSource};
use qnm_evidence::domain::{AnalysisConfig, AnalysisUnit, NestedConfig, RemnantState};
use qnm_evidence::error::ErrorKind;
use qnm_evidence::io::{UnitStatus, read_result_json, read_summary_csv, write_series_csv};

fn unit(event: &str) -> AnalysisUnit {
    AnalysisUnit::new(event, "H1", RemnantState::new(60.0, 0.7).unwrap())
}

#[test]
fn failures_are_recorded_and_batch_continues() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // good: a short synthetic series
    let synthetic = SyntheticSource::new(InjectionParams {
        duration: 0.05,
        ..InjectionParams::default()
    })
    .with_remnant(RemnantState::new(60.0, 0.7).unwrap());
    let series = synthetic.load("GOOD", "H1").unwrap();
    write_series_csv(&data.path().join("GOOD_H1.csv"), &series).unwrap();

    // malformed
    fs::write(data.path().join("BROKEN_H1.csv"), "time,strain\n0.0,oops\n").unwrap();

    // too short for the window
    fs::write(
        data.path().join("TINY_H1.csv"),
        "time,strain\n0.0,0.1\n0.001,0.2\n0.002,0.3\n",
    )
    .unwrap();

    let units = vec![unit("GOOD"), unit("MISSING"), unit("BROKEN"), unit("TINY")];
    let config = AnalysisConfig {
        nested: NestedConfig {
            live_points: 30,
            walk_steps: 10,
            dlogz: 0.5,
            max_iterations: 20_000,
            seed: 1,
        },
        out_dir: out.path().to_path_buf(),
        ..AnalysisConfig::default()
    };

    let source = CsvDirSource::new(data.path());
    let output = run_batch(&units, &source, &config).unwrap();

    assert_eq!(output.rows.len(), 4);
    assert_eq!(output.records.len(), 1);

    let kinds: Vec<Option<ErrorKind>> = output.rows.iter().map(|r| r.error_kind).collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some(ErrorKind::DataUnavailable),
            Some(ErrorKind::DataUnavailable),
            Some(ErrorKind::WindowTooShort),
        ]
    );
    assert_eq!(output.rows[0].status, UnitStatus::Ok);

    let record = read_result_json(&out.path().join("GOOD_H1_bayes.json")).unwrap();
    assert_eq!(record.event, "GOOD");
    assert!(!out.path().join("MISSING_H1_bayes.json").exists());

    let summary = read_summary_csv(&output.summary_path).unwrap();
    assert_eq!(summary, output.rows);
}
