//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves the analysis unit(s) and the series source
//! - runs evidence comparison / point fitting via `pipeline`
//! - prints reports and writes result records

use clap::Parser;
use tracing::info;

use crate::cli::{
    AnalyzeArgs, BatchArgs, Command, FitArgs, ModelArgs, SamplerArgs, SourceArgs, SpectrumArgs,
    UnitArgs,
};
use crate::data::{CsvDirSource, InjectionParams, SeriesSource, SyntheticSource, catalog_units, lookup};
use crate::domain::{AnalysisConfig, AnalysisUnit, Mode, NestedConfig, PriorConfig, RemnantState, WindowConfig};
use crate::error::AppError;
use crate::fit::FitOptions;
use crate::io::{result_path, write_fit_csv, write_result_json};
use crate::models::frequency_and_decay;

pub mod pipeline;

/// Entry point for the `qnm` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Batch(args) => handle_batch(args),
        Command::Fit(args) => handle_fit(args),
        Command::Spectrum(args) => handle_spectrum(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let unit = resolve_unit(&args.unit)?;
    let config = analysis_config_from_args(&args.model, Some(&args.sampler));
    let source = source_from_args(&args.source, Some(unit.remnant));

    let result = pipeline::run_unit(&unit, source.as_ref(), &config)?;
    println!("{}", crate::report::format_comparison(&result.record));

    if !args.no_write {
        let path = result_path(&config.out_dir, &unit.event, &unit.detector);
        write_result_json(&path, &result.record)?;
        info!(path = %path.display(), "result record written");
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.model, Some(&args.sampler));
    let source = source_from_args(&args.source, None);

    let units: Vec<AnalysisUnit> = catalog_units()?
        .into_iter()
        .filter(|u| {
            args.events.is_empty() || args.events.iter().any(|e| e.eq_ignore_ascii_case(&u.event))
        })
        .filter(|u| {
            args.detectors.is_empty()
                || args.detectors.iter().any(|d| d.eq_ignore_ascii_case(&u.detector))
        })
        .collect();
    if units.is_empty() {
        return Err(AppError::invalid_input(
            "no catalog units match the requested events/detectors",
        ));
    }
    info!(units = units.len(), source = source.name(), "starting batch");

    let out = pipeline::run_batch(&units, source.as_ref(), &config)?;
    println!("{}", crate::report::format_batch(&out.rows));
    println!("Summary: {}", out.summary_path.display());
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let unit = resolve_unit(&args.unit)?;
    let config = analysis_config_from_args(&args.model, None);
    let source = source_from_args(&args.source, Some(unit.remnant));
    let options = FitOptions {
        max_iterations: args.max_iterations,
        ..FitOptions::default()
    };

    let run = pipeline::run_point_fit(&unit, source.as_ref(), &config, args.variant, options)?;
    println!("{}", crate::report::format_fit(&unit, run.names, &run.outcome));

    if let Some(path) = &args.export {
        write_fit_csv(path, &run.series, &run.outcome)?;
        info!(path = %path.display(), "fit exported");
    }
    Ok(())
}

fn handle_spectrum(args: SpectrumArgs) -> Result<(), AppError> {
    let remnant = RemnantState::new(args.mass, args.spin)?;
    let rows: Vec<_> = Mode::ALL
        .iter()
        .map(|&m| (m, frequency_and_decay(&remnant, m)))
        .collect();
    print!("{}", crate::report::format_spectrum(&remnant, &rows));
    Ok(())
}

/// Event/detector plus remnant; missing mass/spin fall back to the catalog.
pub fn resolve_unit(args: &UnitArgs) -> Result<AnalysisUnit, AppError> {
    let entry = lookup(&args.event);
    let mass = args.mass.or(entry.map(|e| e.mass));
    let spin = args.spin.or(entry.map(|e| e.spin));
    let (Some(mass), Some(spin)) = (mass, spin) else {
        return Err(AppError::invalid_input(format!(
            "'{}' is not in the catalog; pass --mass and --spin",
            args.event
        )));
    };
    let remnant = RemnantState::new(mass, spin)?;
    Ok(AnalysisUnit::new(args.event.trim(), args.detector.trim(), remnant))
}

/// Series source selected by flags.
///
/// A synthetic source injects at `remnant` when given, else at the catalog
/// remnant of each event.
pub fn source_from_args(args: &SourceArgs, remnant: Option<RemnantState>) -> Box<dyn SeriesSource> {
    if args.synthetic {
        let params = InjectionParams {
            amplitude: args.inject_amplitude,
            onset: args.inject_onset,
            sample_rate: args.sample_rate,
            duration: args.duration,
            noise_sigma: args.noise_sigma,
            seed: args.inject_seed,
            ..InjectionParams::default()
        };
        let source = SyntheticSource::new(params);
        match remnant {
            Some(r) => Box::new(source.with_remnant(r)),
            None => Box::new(source),
        }
    } else {
        Box::new(CsvDirSource::new(args.data_dir.clone()))
    }
}

pub fn analysis_config_from_args(model: &ModelArgs, sampler: Option<&SamplerArgs>) -> AnalysisConfig {
    let defaults = AnalysisConfig::default();

    let mut extended_modes = [false; 3];
    for mode in &model.modes {
        extended_modes[mode.index()] = true;
    }

    let priors = PriorConfig {
        onset: (0.0, model.onset_max),
        deviation: (-model.deviation_max, model.deviation_max),
        ..PriorConfig::default()
    };

    let nested = match sampler {
        Some(s) => NestedConfig {
            live_points: s.live_points,
            walk_steps: s.walk_steps,
            dlogz: s.dlogz,
            max_iterations: s.max_iterations,
            seed: s.seed,
        },
        None => defaults.nested.clone(),
    };

    AnalysisConfig {
        priors,
        nested,
        window: WindowConfig {
            start: model.window_start,
            end: model.window_end,
            min_samples: model.min_samples,
        },
        taper_width: model.taper_width,
        extended_modes,
        out_dir: sampler.map(|s| s.out_dir.clone()).unwrap_or(defaults.out_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn catalog_event_needs_no_remnant_flags() {
        let Command::Analyze(args) = parse(&["qnm", "analyze", "-e", "GW150914", "-d", "L1"]) else {
            panic!("expected analyze");
        };
        let unit = resolve_unit(&args.unit).unwrap();
        assert_eq!(unit.remnant.mass(), 68.0);
        assert_eq!(unit.tag(), "GW150914/L1");
    }

    #[test]
    fn unknown_event_without_remnant_is_invalid_input() {
        let Command::Analyze(args) = parse(&["qnm", "analyze", "-e", "S230529", "-d", "L1"]) else {
            panic!("expected analyze");
        };
        assert!(matches!(resolve_unit(&args.unit), Err(AppError::InvalidInput(_))));

        let Command::Analyze(args) = parse(&[
            "qnm", "analyze", "-e", "S230529", "-d", "L1", "--mass", "60", "--spin", "1.2",
        ]) else {
            panic!("expected analyze");
        };
        assert!(matches!(resolve_unit(&args.unit), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn flags_map_onto_config() {
        let Command::Batch(args) = parse(&[
            "qnm",
            "batch",
            "--modes",
            "22,21",
            "--live-points",
            "100",
            "--onset-max",
            "0.03",
        ]) else {
            panic!("expected batch");
        };
        let config = analysis_config_from_args(&args.model, Some(&args.sampler));
        assert_eq!(config.extended_modes, [true, false, true]);
        assert_eq!(config.nested.live_points, 100);
        assert_eq!(config.priors.onset, (0.0, 0.03));
        config.validate().unwrap();
    }
}
