//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed explicitly into every pure function of an analysis unit
//! - exported to JSON/CSV
//! - reloaded later for tabulation across a batch

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A quasi-normal mode label `(l, m)` with overtone `n = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "22")]
    L2M2,
    #[serde(rename = "33")]
    L3M3,
    #[serde(rename = "21")]
    L2M1,
}

impl Mode {
    /// Catalog order; also the per-mode order of the extended parameter vector.
    pub const ALL: [Mode; 3] = [Mode::L2M2, Mode::L3M3, Mode::L2M1];

    pub fn label(self) -> &'static str {
        match self {
            Mode::L2M2 => "22",
            Mode::L3M3 => "33",
            Mode::L2M1 => "21",
        }
    }

    /// Position of the mode inside [`Mode::ALL`].
    pub fn index(self) -> usize {
        match self {
            Mode::L2M2 => 0,
            Mode::L3M3 => 1,
            Mode::L2M1 => 2,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    /// Accepts `"22"` as well as the overtone-qualified `"220"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lm = match s.len() {
            3 if s.ends_with('0') => &s[..2],
            _ => s,
        };
        match lm {
            "22" => Ok(Mode::L2M2),
            "33" => Ok(Mode::L3M3),
            "21" => Ok(Mode::L2M1),
            _ => Err(AppError::invalid_input(format!(
                "unsupported mode label '{s}' (expected one of 22, 33, 21)"
            ))),
        }
    }
}

/// Remnant mass (solar masses) and dimensionless spin.
///
/// Invariant: `mass > 0` and `0 <= spin < 1`. Construct through [`RemnantState::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemnantState {
    mass: f64,
    spin: f64,
}

impl RemnantState {
    pub fn new(mass: f64, spin: f64) -> Result<Self, AppError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(AppError::invalid_input(format!(
                "remnant mass must be finite and > 0, got {mass}"
            )));
        }
        if !(spin.is_finite() && (0.0..1.0).contains(&spin)) {
            return Err(AppError::invalid_input(format!(
                "remnant spin must lie in [0, 1), got {spin}"
            )));
        }
        Ok(Self { mass, spin })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }
}

/// Baseline (unperturbed) frequency and e-fold decay time of one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineModeParams {
    /// Hz.
    pub frequency: f64,
    /// Seconds.
    pub decay_time: f64,
}

/// Fractional offsets applied multiplicatively: `shifted = baseline * (1 + shift)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeDeviation {
    pub d_freq: f64,
    pub d_tau: f64,
}

impl ModeDeviation {
    pub const ZERO: ModeDeviation = ModeDeviation {
        d_freq: 0.0,
        d_tau: 0.0,
    };
}

/// Resolved waveform parameters for one mode of a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeParams {
    /// Excluded modes contribute nothing and are never evaluated.
    pub included: bool,
    pub amplitude: f64,
    /// Radians.
    pub phase: f64,
    /// Hz.
    pub frequency: f64,
    /// Seconds.
    pub decay_time: f64,
}

impl ModeParams {
    pub fn excluded() -> Self {
        Self {
            included: false,
            amplitude: 0.0,
            phase: 0.0,
            frequency: 0.0,
            decay_time: 0.0,
        }
    }
}

/// A superposition of modes sharing one onset time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParams {
    /// Seconds, on the analysis time axis.
    pub onset: f64,
    pub modes: Vec<ModeParams>,
}

/// Which hypothesis a parameter vector / evidence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Single (2,2) damped sinusoid with free frequency and decay time.
    Baseline,
    /// Three modes with fractional deviations from the fitted spectrum.
    Extended,
}

impl ModelVariant {
    pub fn label(self) -> &'static str {
        match self {
            ModelVariant::Baseline => "baseline",
            ModelVariant::Extended => "extended",
        }
    }
}

/// Log-evidence of one model against one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidenceResult {
    pub log_evidence: f64,
    pub log_evidence_err: f64,
}

/// Outcome label of a model comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favored {
    Baseline,
    Extended,
}

impl Favored {
    pub fn label(self) -> &'static str {
        match self {
            Favored::Baseline => "baseline",
            Favored::Extended => "extended",
        }
    }
}

/// One (event, detector) analysis: identifiers plus the remnant used for priors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUnit {
    pub event: String,
    pub detector: String,
    pub remnant: RemnantState,
}

impl AnalysisUnit {
    pub fn new(event: impl Into<String>, detector: impl Into<String>, remnant: RemnantState) -> Self {
        Self {
            event: event.into(),
            detector: detector.into(),
            remnant,
        }
    }

    /// `"<event>/<detector>"`, used in log lines and error messages.
    pub fn tag(&self) -> String {
        format!("{}/{}", self.event, self.detector)
    }
}

/// Terminal artifact of one analysis unit. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub unit: AnalysisUnit,
    pub baseline: EvidenceResult,
    pub extended: EvidenceResult,
    /// `logZ_extended - logZ_baseline`.
    pub delta_log_z: f64,
    /// `exp(delta_log_z)`; may be infinite for very large `delta_log_z`.
    pub bayes_factor: f64,
    pub favored: Favored,
}

/// A whitened, uniformly sampled strain series (time axis in seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedSeries {
    time: Vec<f64>,
    strain: Vec<f64>,
}

/// Relative tolerance on sample spacing when checking uniform sampling.
const SPACING_RTOL: f64 = 1e-3;

impl ObservedSeries {
    /// Validate and wrap two parallel arrays.
    ///
    /// Fails with [`AppError::DataUnavailable`] on length mismatch, fewer than two
    /// samples, non-finite values, or non-uniform / non-increasing time stamps.
    pub fn new(time: Vec<f64>, strain: Vec<f64>) -> Result<Self, AppError> {
        if time.len() != strain.len() {
            return Err(AppError::data_unavailable(format!(
                "time axis has {} samples but strain has {}",
                time.len(),
                strain.len()
            )));
        }
        if time.len() < 2 {
            return Err(AppError::data_unavailable(format!(
                "series has {} samples; need at least 2",
                time.len()
            )));
        }
        if let Some(i) = time
            .iter()
            .zip(strain.iter())
            .position(|(t, h)| !(t.is_finite() && h.is_finite()))
        {
            return Err(AppError::data_unavailable(format!(
                "non-finite sample at index {i}"
            )));
        }

        let dt = time[1] - time[0];
        if dt <= 0.0 {
            return Err(AppError::data_unavailable("time axis is not increasing"));
        }
        for (i, w) in time.windows(2).enumerate() {
            let step = w[1] - w[0];
            // Absolute time stamps (GPS seconds) lose precision; allow a few ulps.
            let tol = SPACING_RTOL * dt + 4.0 * f64::EPSILON * w[1].abs();
            if (step - dt).abs() > tol {
                return Err(AppError::data_unavailable(format!(
                    "non-uniform sampling at index {}: step {step} vs {dt}",
                    i + 1
                )));
            }
        }

        Ok(Self { time, strain })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn strain(&self) -> &[f64] {
        &self.strain
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sampling interval in seconds.
    pub fn dt(&self) -> f64 {
        self.time[1] - self.time[0]
    }

    pub fn sample_rate(&self) -> f64 {
        1.0 / self.dt()
    }
}

/// Prior ranges that do not depend on the remnant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorConfig {
    /// Amplitude range of the baseline single-mode model.
    pub baseline_amplitude: (f64, f64),
    /// Amplitude range of each extended-model mode.
    pub extended_amplitude: (f64, f64),
    /// Frequency / decay-time range of the baseline model, as factors of the
    /// fitted (2,2) values.
    pub baseline_scale: (f64, f64),
    /// Fractional deviation range (`d_freq`, `d_tau`) of the extended model.
    pub deviation: (f64, f64),
    /// Onset range (seconds, window-relative).
    pub onset: (f64, f64),
    pub phase: (f64, f64),
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            baseline_amplitude: (0.0, 2.0),
            extended_amplitude: (0.0, 1.0),
            baseline_scale: (0.5, 1.5),
            deviation: (-0.5, 0.5),
            onset: (0.0, 0.05),
            phase: (-std::f64::consts::PI, std::f64::consts::PI),
        }
    }
}

/// Nested-sampling settings (shared by both variants of a unit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedConfig {
    pub live_points: usize,
    /// Random-walk proposals per replacement.
    pub walk_steps: usize,
    /// Stop when the remaining evidence would change `ln Z` by less than this.
    pub dlogz: f64,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for NestedConfig {
    fn default() -> Self {
        Self {
            live_points: 400,
            walk_steps: 25,
            dlogz: 0.1,
            max_iterations: 200_000,
            seed: 42,
        }
    }
}

/// Optional ringdown window (seconds, on the input time axis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub min_samples: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            min_samples: 10,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub priors: PriorConfig,
    pub nested: NestedConfig,
    pub window: WindowConfig,
    /// Onset ramp width (seconds).
    pub taper_width: f64,
    /// Per-mode inclusion mask of the extended model, in [`Mode::ALL`] order.
    pub extended_modes: [bool; 3],
    pub out_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            priors: PriorConfig::default(),
            nested: NestedConfig::default(),
            window: WindowConfig::default(),
            taper_width: 0.002,
            extended_modes: [true; 3],
            out_dir: PathBuf::from("results/bayes_compare"),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        let ranges = [
            ("baseline amplitude", self.priors.baseline_amplitude),
            ("extended amplitude", self.priors.extended_amplitude),
            ("baseline scale", self.priors.baseline_scale),
            ("deviation", self.priors.deviation),
            ("onset", self.priors.onset),
            ("phase", self.priors.phase),
        ];
        for (name, (lo, hi)) in ranges {
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(AppError::config(format!(
                    "{name} prior must be a finite range with max > min, got [{lo}, {hi}]"
                )));
            }
        }
        if self.priors.baseline_scale.0 <= 0.0 {
            return Err(AppError::config("baseline scale factors must be > 0"));
        }
        if self.priors.deviation.0 <= -1.0 {
            return Err(AppError::config(
                "deviation prior must stay above -1 (shifted values must remain positive)",
            ));
        }
        if self.nested.live_points < 2 {
            return Err(AppError::config("live points must be >= 2"));
        }
        if self.nested.walk_steps == 0 {
            return Err(AppError::config("walk steps must be >= 1"));
        }
        if !(self.nested.dlogz.is_finite() && self.nested.dlogz > 0.0) {
            return Err(AppError::config("dlogz tolerance must be finite and > 0"));
        }
        if !(self.taper_width.is_finite() && self.taper_width > 0.0) {
            return Err(AppError::config("taper width must be finite and > 0"));
        }
        if let (Some(start), Some(end)) = (self.window.start, self.window.end) {
            if end <= start {
                return Err(AppError::config(format!(
                    "window end ({end}) must be after window start ({start})"
                )));
            }
        }
        if !self.extended_modes.iter().any(|&m| m) {
            return Err(AppError::config("extended model needs at least one included mode"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels_parse_with_and_without_overtone() {
        assert_eq!("22".parse::<Mode>().unwrap(), Mode::L2M2);
        assert_eq!("330".parse::<Mode>().unwrap(), Mode::L3M3);
        assert_eq!(" 21 ".parse::<Mode>().unwrap(), Mode::L2M1);
        let err = "44".parse::<Mode>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn remnant_rejects_unphysical_values() {
        assert!(RemnantState::new(68.0, 0.67).is_ok());
        assert!(RemnantState::new(68.0, 0.0).is_ok());
        for (m, s) in [(68.0, 1.0), (68.0, -0.1), (0.0, 0.5), (-3.0, 0.5), (f64::NAN, 0.5)] {
            assert!(
                matches!(RemnantState::new(m, s), Err(AppError::InvalidInput(_))),
                "({m}, {s}) should be rejected"
            );
        }
    }

    #[test]
    fn observed_series_validation() {
        let t: Vec<f64> = (0..8).map(|i| i as f64 / 4096.0).collect();
        let h = vec![0.0; 8];
        let s = ObservedSeries::new(t.clone(), h.clone()).unwrap();
        assert_eq!(s.len(), 8);
        assert!((s.sample_rate() - 4096.0).abs() < 1e-6);

        assert!(matches!(
            ObservedSeries::new(t.clone(), vec![0.0; 7]),
            Err(AppError::DataUnavailable(_))
        ));

        let mut gappy = t.clone();
        gappy[5] += 0.5 / 4096.0;
        assert!(matches!(
            ObservedSeries::new(gappy, h.clone()),
            Err(AppError::DataUnavailable(_))
        ));

        let mut bad = h;
        bad[2] = f64::NAN;
        assert!(matches!(
            ObservedSeries::new(t, bad),
            Err(AppError::DataUnavailable(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        AnalysisConfig::default().validate().unwrap();

        let mut cfg = AnalysisConfig::default();
        cfg.extended_modes = [false; 3];
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }
}
