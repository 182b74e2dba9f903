//! Shared analysis pipeline used by `analyze`, `batch` and `fit`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load series -> select window -> (baseline ‖ extended) evidence -> compare -> record
//!
//! Every function takes the analysis unit, its data and the configuration
//! explicitly; nothing is shared between units except read-only inputs.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::SeriesSource;
use crate::domain::{AnalysisConfig, AnalysisUnit, ComparisonRecord, ModelVariant, ObservedSeries};
use crate::error::AppError;
use crate::fit::{
    FitOptions, FitOutcome, LikelihoodEvaluator, NestedRun, NestedSampler, PointEstimateFitter,
    PriorTransform, comparison_record, initial_baseline_guess, initial_extended_guess,
};
use crate::io::{
    ResultRecord, RunSummary, SummaryRow, result_path, select_window, write_result_json,
    write_summary_csv,
};
use crate::models::{RingdownModel, VariantModel};

/// Outputs of one analysis unit.
#[derive(Debug, Clone)]
pub struct UnitResult {
    pub comparison: ComparisonRecord,
    pub record: ResultRecord,
}

/// Outputs of a batch: one summary row per unit plus every successful record.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub rows: Vec<SummaryRow>,
    pub records: Vec<ResultRecord>,
    pub summary_path: PathBuf,
}

/// Best-fit point of one variant on the windowed series.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub series: ObservedSeries,
    pub names: &'static [&'static str],
    pub outcome: FitOutcome,
}

/// Compare both variants on an already-loaded series.
pub fn analyze_series(
    unit: &AnalysisUnit,
    series: &ObservedSeries,
    config: &AnalysisConfig,
) -> Result<UnitResult, AppError> {
    config.validate()?;
    let window = select_window(
        series,
        config.window.start,
        config.window.end,
        config.window.min_samples,
    )?;
    let sampler = NestedSampler::new(config.nested.clone());

    let (baseline, extended) = rayon::join(
        || evidence_for(ModelVariant::Baseline, unit, &window, config, &sampler),
        || evidence_for(ModelVariant::Extended, unit, &window, config, &sampler),
    );
    let (baseline, baseline_names) = baseline?;
    let (extended, extended_names) = extended?;

    let comparison = comparison_record(unit.clone(), baseline.evidence, extended.evidence);
    info!(
        event = %unit.event,
        detector = %unit.detector,
        delta_log_z = comparison.delta_log_z,
        favored = comparison.favored.label(),
        "model comparison finished"
    );

    let record = ResultRecord::new(
        &comparison,
        &config.nested,
        RunSummary::new(&baseline, baseline_names),
        RunSummary::new(&extended, extended_names),
    );
    Ok(UnitResult { comparison, record })
}

fn evidence_for(
    variant: ModelVariant,
    unit: &AnalysisUnit,
    series: &ObservedSeries,
    config: &AnalysisConfig,
    sampler: &NestedSampler,
) -> Result<(NestedRun, &'static [&'static str]), AppError> {
    let model = VariantModel::build(variant, &unit.remnant, config);
    let prior = PriorTransform::for_variant(variant, &unit.remnant, &config.priors);
    let like = LikelihoodEvaluator::new(&model, series);

    debug!(
        event = %unit.event,
        detector = %unit.detector,
        variant = variant.label(),
        dim = model.dim(),
        samples = series.len(),
        "starting nested sampling"
    );
    let run = sampler.run(&prior, &like).map_err(|e| match e {
        AppError::Integration(msg) => {
            AppError::integration(format!("{} {}: {msg}", unit.tag(), variant.label()))
        }
        other => other,
    })?;
    info!(
        event = %unit.event,
        detector = %unit.detector,
        variant = variant.label(),
        log_z = run.evidence.log_evidence,
        log_z_err = run.evidence.log_evidence_err,
        iterations = run.iterations,
        "evidence computed"
    );
    Ok((run, model.param_names()))
}

/// Load the unit's series from `source` and compare both variants.
pub fn run_unit(
    unit: &AnalysisUnit,
    source: &dyn SeriesSource,
    config: &AnalysisConfig,
) -> Result<UnitResult, AppError> {
    let series = source.load(&unit.event, &unit.detector)?;
    debug!(
        event = %unit.event,
        detector = %unit.detector,
        source = source.name(),
        samples = series.len(),
        "series loaded"
    );
    analyze_series(unit, &series, config)
}

/// Run every unit, writing one JSON record per success and a summary CSV.
///
/// A failing unit is logged and recorded in the summary; it never aborts the
/// batch. Only configuration problems and failure to write the summary are
/// returned as errors.
pub fn run_batch(
    units: &[AnalysisUnit],
    source: &dyn SeriesSource,
    config: &AnalysisConfig,
) -> Result<BatchOutput, AppError> {
    config.validate()?;
    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::io(format!(
            "failed to create output dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let outcomes: Vec<Result<ResultRecord, AppError>> = units
        .par_iter()
        .map(|unit| -> Result<ResultRecord, AppError> {
            let result = run_unit(unit, source, config)?;
            let path = result_path(&config.out_dir, &unit.event, &unit.detector);
            write_result_json(&path, &result.record)?;
            Ok(result.record)
        })
        .collect();

    let mut rows = Vec::with_capacity(units.len());
    let mut records = Vec::new();
    for (unit, outcome) in units.iter().zip(outcomes) {
        match outcome {
            Ok(record) => {
                rows.push(SummaryRow::success(&record));
                records.push(record);
            }
            Err(err) => {
                warn!(
                    event = %unit.event,
                    detector = %unit.detector,
                    kind = err.kind().as_str(),
                    error = %err,
                    "analysis unit failed; continuing"
                );
                rows.push(SummaryRow::failure(unit, &err));
            }
        }
    }

    let summary_path = config.out_dir.join("summary.csv");
    write_summary_csv(&summary_path, &rows)?;
    info!(
        units = units.len(),
        succeeded = records.len(),
        summary = %summary_path.display(),
        "batch finished"
    );

    Ok(BatchOutput {
        rows,
        records,
        summary_path,
    })
}

/// Bounded best fit of `variant` on an already-loaded series.
pub fn fit_series(
    unit: &AnalysisUnit,
    series: &ObservedSeries,
    config: &AnalysisConfig,
    variant: ModelVariant,
    options: FitOptions,
) -> Result<FitRun, AppError> {
    config.validate()?;
    let window = select_window(
        series,
        config.window.start,
        config.window.end,
        config.window.min_samples,
    )?;

    let model = VariantModel::build(variant, &unit.remnant, config);
    let prior = PriorTransform::for_variant(variant, &unit.remnant, &config.priors);
    let initial = match variant {
        ModelVariant::Baseline => initial_baseline_guess(&window, &unit.remnant, &config.priors),
        ModelVariant::Extended => initial_extended_guess(&window, &config.priors),
    };

    let like = LikelihoodEvaluator::new(&model, &window);
    let outcome = PointEstimateFitter::new(options).fit(&like, &initial, prior.bounds())?;
    if outcome.converged {
        info!(
            event = %unit.event,
            detector = %unit.detector,
            variant = variant.label(),
            cost = outcome.cost,
            iterations = outcome.iterations,
            "point fit converged"
        );
    }

    Ok(FitRun {
        names: model.param_names(),
        series: window,
        outcome,
    })
}

/// Load the unit's series from `source` and fit `variant`.
pub fn run_point_fit(
    unit: &AnalysisUnit,
    source: &dyn SeriesSource,
    config: &AnalysisConfig,
    variant: ModelVariant,
    options: FitOptions,
) -> Result<FitRun, AppError> {
    let series = source.load(&unit.event, &unit.detector)?;
    fit_series(unit, &series, config, variant, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InjectionParams, SyntheticSource};
    use crate::domain::{NestedConfig, RemnantState};

    fn quick_config(out_dir: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            nested: NestedConfig {
                live_points: 40,
                walk_steps: 10,
                dlogz: 0.5,
                max_iterations: 20_000,
                seed: 5,
            },
            out_dir,
            ..AnalysisConfig::default()
        }
    }

    fn unit() -> AnalysisUnit {
        AnalysisUnit::new("GW150914", "H1", RemnantState::new(68.0, 0.67).unwrap())
    }

    #[test]
    fn short_window_fails_before_sampling() {
        let t: Vec<f64> = (0..5).map(|i| i as f64 / 4096.0).collect();
        let series = ObservedSeries::new(t, vec![0.0; 5]).unwrap();
        let err = analyze_series(&unit(), &series, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::WindowTooShort { samples: 5, required: 10 }));
    }

    #[test]
    fn analyze_produces_consistent_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path().to_path_buf());
        let params = InjectionParams {
            duration: 0.05,
            ..InjectionParams::default()
        };
        let source = SyntheticSource::new(params);

        let result = run_unit(&unit(), &source, &config).unwrap();
        let rec = &result.record;
        assert_eq!(rec.event, "GW150914");
        assert_eq!(rec.live_points, 40);
        assert!((rec.delta_log_z - (rec.log_z_extended - rec.log_z_baseline)).abs() < 1e-12);
        assert_eq!(rec.baseline_run.best_fit.len(), 5);
        assert_eq!(rec.extended_run.best_fit.len(), 13);
        assert_eq!(rec.extended_run.parameters[12], "onset");
    }

    #[test]
    fn baseline_fit_on_clean_injection() {
        let params = InjectionParams {
            noise_sigma: 0.0,
            duration: 0.1,
            ..InjectionParams::default()
        };
        let series = SyntheticSource::new(params).load("GW150914", "H1").unwrap();
        let run = fit_series(
            &unit(),
            &series,
            &AnalysisConfig::default(),
            ModelVariant::Baseline,
            FitOptions::default(),
        )
        .unwrap();
        assert_eq!(run.names.len(), 5);
        let base = crate::models::frequency_and_decay(&unit().remnant, crate::domain::Mode::L2M2);
        assert!((run.outcome.params[1] - base.frequency).abs() / base.frequency < 0.01);
    }
}
