//! Batch summary CSV.
//!
//! One row per analysis unit, successes and failures alike, so a batch can be
//! tabulated without opening every JSON record. Failures carry the error kind,
//! keeping "data unavailable" and "integration failed" apart.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisUnit, Favored};
use crate::error::{AppError, ErrorKind};
use crate::io::record::ResultRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub event: String,
    pub detector: String,
    pub status: UnitStatus,
    pub remnant_mass: f64,
    pub spin: f64,
    pub log_z_baseline: Option<f64>,
    pub log_z_extended: Option<f64>,
    pub delta_log_z: Option<f64>,
    pub bayes_factor: Option<f64>,
    pub favored: Option<Favored>,
    pub error_kind: Option<ErrorKind>,
    pub message: Option<String>,
}

impl SummaryRow {
    pub fn success(record: &ResultRecord) -> Self {
        Self {
            event: record.event.clone(),
            detector: record.detector.clone(),
            status: UnitStatus::Ok,
            remnant_mass: record.remnant_mass,
            spin: record.spin,
            log_z_baseline: Some(record.log_z_baseline),
            log_z_extended: Some(record.log_z_extended),
            delta_log_z: Some(record.delta_log_z),
            bayes_factor: record.bayes_factor,
            favored: Some(record.favored),
            error_kind: None,
            message: None,
        }
    }

    pub fn failure(unit: &AnalysisUnit, error: &AppError) -> Self {
        Self {
            event: unit.event.clone(),
            detector: unit.detector.clone(),
            status: UnitStatus::Failed,
            remnant_mass: unit.remnant.mass(),
            spin: unit.remnant.spin(),
            log_z_baseline: None,
            log_z_extended: None,
            delta_log_z: None,
            bayes_factor: None,
            favored: None,
            error_kind: Some(error.kind()),
            message: Some(error.to_string()),
        }
    }
}

/// Write summary rows to a CSV file (header included).
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::io(format!("failed to create summary CSV '{}': {e}", path.display()))
    })?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("failed to write summary CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("failed to flush summary CSV: {e}")))?;
    Ok(())
}

/// Read a summary CSV back (for downstream tabulation and tests).
pub fn read_summary_csv(path: &Path) -> Result<Vec<SummaryRow>, AppError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        AppError::io(format!("failed to open summary CSV '{}': {e}", path.display()))
    })?;
    reader
        .deserialize()
        .collect::<Result<Vec<SummaryRow>, _>>()
        .map_err(|e| AppError::io(format!("invalid summary CSV '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemnantState;

    #[test]
    fn failures_keep_their_kind() {
        let unit = AnalysisUnit::new("GW170814", "L1", RemnantState::new(54.5, 0.74).unwrap());
        let rows = vec![
            SummaryRow::failure(&unit, &AppError::data_unavailable("no file")),
            SummaryRow::failure(&unit, &AppError::integration("iteration cap")),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("event,detector,status"));
        assert!(text.contains("data_unavailable"));
        assert!(text.contains("integration"));

        let back = read_summary_csv(&path).unwrap();
        assert_eq!(back, rows);
    }
}
