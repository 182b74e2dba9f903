//! Command-line parsing for the ringdown evidence tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! **command dispatch** (`app`) and from the sampling/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Mode, ModelVariant};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "qnm", version, about = "Ringdown quasi-normal-mode model comparison")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare baseline and extended evidences for one event/detector.
    Analyze(AnalyzeArgs),
    /// Run `analyze` over the fixed event catalog, continuing past failures.
    Batch(BatchArgs),
    /// Bounded best-fit point of one model variant.
    Fit(FitArgs),
    /// Print the fitted mode spectrum for a remnant.
    Spectrum(SpectrumArgs),
}

/// Identifies one analysis unit.
#[derive(Debug, Args, Clone)]
pub struct UnitArgs {
    /// Event name, e.g. GW150914.
    #[arg(short = 'e', long)]
    pub event: String,

    /// Detector name, e.g. H1.
    #[arg(short = 'd', long)]
    pub detector: String,

    /// Remnant mass in solar masses (defaults to the catalog value).
    #[arg(long)]
    pub mass: Option<f64>,

    /// Remnant dimensionless spin in [0, 1) (defaults to the catalog value).
    #[arg(long)]
    pub spin: Option<f64>,
}

/// Where observed series come from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Directory of `<event>_<detector>.csv` files (`time,strain`).
    #[arg(long, env = "QNM_DATA_DIR", default_value = "data/whitened")]
    pub data_dir: PathBuf,

    /// Use a synthetic baseline-mode injection instead of files.
    #[arg(long)]
    pub synthetic: bool,

    /// Injection amplitude (0 gives pure noise).
    #[arg(long, default_value_t = 1.0)]
    pub inject_amplitude: f64,

    /// Injection onset, seconds after the start of the series.
    #[arg(long, default_value_t = 0.01)]
    pub inject_onset: f64,

    /// Noise standard deviation of the synthetic series.
    #[arg(long, default_value_t = 1.0)]
    pub noise_sigma: f64,

    /// Sample rate of the synthetic series (Hz).
    #[arg(long, default_value_t = 4096.0)]
    pub sample_rate: f64,

    /// Duration of the synthetic series (s).
    #[arg(long, default_value_t = 0.2)]
    pub duration: f64,

    /// Noise seed of the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub inject_seed: u64,
}

/// Model and window settings shared by every analysis command.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Window start on the input time axis (s).
    #[arg(long)]
    pub window_start: Option<f64>,

    /// Window end on the input time axis (s).
    #[arg(long)]
    pub window_end: Option<f64>,

    /// Minimum number of samples in the window.
    #[arg(long, default_value_t = 10)]
    pub min_samples: usize,

    /// Onset taper width (s).
    #[arg(long, default_value_t = 0.002)]
    pub taper_width: f64,

    /// Modes included in the extended model (comma separated).
    #[arg(long, value_delimiter = ',', default_values_t = Mode::ALL.to_vec())]
    pub modes: Vec<Mode>,

    /// Upper bound of the onset prior (s).
    #[arg(long, default_value_t = 0.05)]
    pub onset_max: f64,

    /// Half-width of the fractional deviation prior.
    #[arg(long, default_value_t = 0.5)]
    pub deviation_max: f64,
}

/// Nested sampling settings.
#[derive(Debug, Args, Clone)]
pub struct SamplerArgs {
    /// Number of live points.
    #[arg(long, default_value_t = 400)]
    pub live_points: usize,

    /// Random-walk proposals per replacement.
    #[arg(long, default_value_t = 25)]
    pub walk_steps: usize,

    /// Termination tolerance on the remaining ln Z.
    #[arg(long, default_value_t = 0.1)]
    pub dlogz: f64,

    /// Iteration cap (exceeding it is an integration failure).
    #[arg(long, default_value_t = 200_000)]
    pub max_iterations: usize,

    /// Sampler seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output directory for result records.
    #[arg(long, env = "QNM_OUT_DIR", default_value = "results/bayes_compare")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub unit: UnitArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub sampler: SamplerArgs,

    /// Print the comparison without writing the JSON record.
    #[arg(long)]
    pub no_write: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub sampler: SamplerArgs,

    /// Restrict the batch to these events (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub events: Vec<String>,

    /// Restrict the batch to these detectors (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub detectors: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub unit: UnitArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Which model to fit.
    #[arg(long, value_enum, default_value_t = ModelVariant::Baseline)]
    pub variant: ModelVariant,

    /// Maximum optimizer iterations.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Export `time,observed,model,residual` to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SpectrumArgs {
    /// Remnant mass in solar masses.
    #[arg(long)]
    pub mass: f64,

    /// Remnant dimensionless spin in [0, 1).
    #[arg(long)]
    pub spin: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_modes_and_defaults() {
        let cli = Cli::try_parse_from([
            "qnm", "analyze", "-e", "GW150914", "-d", "H1", "--modes", "22,330",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.model.modes, vec![Mode::L2M2, Mode::L3M3]);
        assert_eq!(args.sampler.live_points, 400);
        assert!(args.unit.mass.is_none());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let res = Cli::try_parse_from(["qnm", "batch", "--modes", "22,44"]);
        assert!(res.is_err());
    }
}
