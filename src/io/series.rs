//! Series CSV read/write.
//!
//! Schema: header `time,strain`, one sample per row, time in seconds.
//! Anything that prevents building a valid [`ObservedSeries`] is reported as
//! data unavailable (exit code 3), not as an I/O failure of the tool.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::ObservedSeries;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SeriesRow {
    time: f64,
    strain: f64,
}

/// Read a `time,strain` CSV file.
pub fn read_series_csv(path: &Path) -> Result<ObservedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            AppError::data_unavailable(format!("failed to open series CSV '{}': {e}", path.display()))
        })?;

    let mut time = Vec::new();
    let mut strain = Vec::new();
    for (i, row) in reader.deserialize::<SeriesRow>().enumerate() {
        // +2: one-based, after the header line.
        let row = row.map_err(|e| {
            AppError::data_unavailable(format!("'{}' line {}: {e}", path.display(), i + 2))
        })?;
        time.push(row.time);
        strain.push(row.strain);
    }

    ObservedSeries::new(time, strain)
        .map_err(|e| AppError::data_unavailable(format!("'{}': {e}", path.display())))
}

/// Write a series as `time,strain` CSV.
pub fn write_series_csv(path: &Path, series: &ObservedSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::io(format!("failed to create series CSV '{}': {e}", path.display()))
    })?;
    for (&time, &strain) in series.time().iter().zip(series.strain()) {
        writer
            .serialize(SeriesRow { time, strain })
            .map_err(|e| AppError::io(format!("failed to write series CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("failed to flush series CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn csv_round_trip_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let t: Vec<f64> = (0..32).map(|i| 1126259462.0 + i as f64 / 4096.0).collect();
        let h: Vec<f64> = (0..32).map(|i| 0.1 * i as f64 - 1.3).collect();
        let series = ObservedSeries::new(t, h).unwrap();

        write_series_csv(&path, &series).unwrap();
        let back = read_series_csv(&path).unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn malformed_rows_are_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "time,strain\n0.0,1.0\n0.001,abc\n").unwrap();
        let err = read_series_csv(&path).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
        assert!(err.to_string().contains("line 3"), "{err}");

        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            read_series_csv(&missing),
            Err(AppError::DataUnavailable(_))
        ));
    }
}
