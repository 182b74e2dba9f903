//! Export a point fit to CSV.
//!
//! Columns: `time,observed,model,residual`, meant for plotting elsewhere.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::ObservedSeries;
use crate::error::AppError;
use crate::fit::FitOutcome;

/// Write the observed series next to the fitted template and residual.
pub fn write_fit_csv(path: &Path, series: &ObservedSeries, fit: &FitOutcome) -> Result<(), AppError> {
    if fit.model.len() != series.len() || fit.residual.len() != series.len() {
        return Err(AppError::invalid_input(format!(
            "fit has {} samples but series has {}",
            fit.model.len(),
            series.len()
        )));
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("failed to create fit CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "time,observed,model,residual")
        .map_err(|e| AppError::io(format!("failed to write fit CSV header: {e}")))?;

    for i in 0..series.len() {
        writeln!(
            file,
            "{:.10},{:.10e},{:.10e},{:.10e}",
            series.time()[i],
            series.strain()[i],
            fit.model[i],
            fit.residual[i],
        )
        .map_err(|e| AppError::io(format!("failed to write fit CSV row: {e}")))?;
    }
    file.flush()
        .map_err(|e| AppError::io(format!("failed to flush fit CSV: {e}")))?;

    Ok(())
}
