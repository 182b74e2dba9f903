//! Read/write result record JSON files.
//!
//! A result record is the persisted form of one (event, detector) comparison:
//! - remnant used for the priors
//! - both evidences, ΔlogZ, Bayes factor, favored label
//! - sampler settings and per-variant run diagnostics
//!
//! Field names are stable; batch tabulation relies on them.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ComparisonRecord, Favored, NestedConfig};
use crate::error::AppError;
use crate::fit::NestedRun;

pub const TOOL_NAME: &str = "qnm";

/// Diagnostics of one variant's evidence run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub iterations: usize,
    pub likelihood_calls: usize,
    pub information: f64,
    pub max_log_likelihood: f64,
    /// Names of `best_fit`, in vector order.
    pub parameters: Vec<String>,
    pub best_fit: Vec<f64>,
}

impl RunSummary {
    pub fn new(run: &NestedRun, names: &[&str]) -> Self {
        Self {
            iterations: run.iterations,
            likelihood_calls: run.likelihood_calls,
            information: run.information,
            max_log_likelihood: run.max_log_likelihood,
            parameters: names.iter().map(|s| s.to_string()).collect(),
            best_fit: run.best_theta.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub tool: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub event: String,
    pub detector: String,
    pub remnant_mass: f64,
    pub spin: f64,
    pub live_points: usize,
    pub seed: u64,
    pub log_z_baseline: f64,
    pub log_z_baseline_err: f64,
    pub log_z_extended: f64,
    pub log_z_extended_err: f64,
    pub delta_log_z: f64,
    /// `None` when `exp(delta_log_z)` is not finite.
    pub bayes_factor: Option<f64>,
    pub favored: Favored,
    pub baseline_run: RunSummary,
    pub extended_run: RunSummary,
}

impl ResultRecord {
    pub fn new(
        record: &ComparisonRecord,
        nested: &NestedConfig,
        baseline_run: RunSummary,
        extended_run: RunSummary,
    ) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            event: record.unit.event.clone(),
            detector: record.unit.detector.clone(),
            remnant_mass: record.unit.remnant.mass(),
            spin: record.unit.remnant.spin(),
            live_points: nested.live_points,
            seed: nested.seed,
            log_z_baseline: record.baseline.log_evidence,
            log_z_baseline_err: record.baseline.log_evidence_err,
            log_z_extended: record.extended.log_evidence,
            log_z_extended_err: record.extended.log_evidence_err,
            delta_log_z: record.delta_log_z,
            bayes_factor: Some(record.bayes_factor).filter(|bf| bf.is_finite()),
            favored: record.favored,
            baseline_run,
            extended_run,
        }
    }
}

/// `<out_dir>/<event>_<detector>_bayes.json`.
pub fn result_path(out_dir: &Path, event: &str, detector: &str) -> PathBuf {
    out_dir.join(format!("{event}_{detector}_bayes.json"))
}

/// Write a result record as pretty JSON, creating parent directories.
pub fn write_result_json(path: &Path, record: &ResultRecord) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::io(format!("failed to create output dir '{}': {e}", parent.display()))
        })?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("failed to create result JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, record)
        .map_err(|e| AppError::io(format!("failed to write result JSON: {e}")))?;
    Ok(())
}

/// Read a result record JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultRecord, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("failed to open result JSON '{}': {e}", path.display())))?;
    let record: ResultRecord = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("invalid result JSON '{}': {e}", path.display())))?;
    Ok(record)
}
