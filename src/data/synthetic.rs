//! Synthetic ringdown injections.
//!
//! A baseline (2,2) damped sinusoid at the fitted spectrum of the remnant,
//! plus white Gaussian noise of standard deviation `noise_sigma` (1 for a
//! whitened series). The remnant comes from the event catalog unless one is
//! set explicitly. Noise is reproducible: the RNG seed mixes the configured
//! seed with the event and detector names.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::data::SeriesSource;
use crate::data::catalog::lookup;
use crate::domain::{Mode, ObservedSeries, RemnantState};
use crate::error::AppError;
use crate::models::spectrum::frequency_and_decay;
use crate::models::{BaselineModel, RingdownModel, TemplateBuilder, time_axis};

#[derive(Debug, Clone, PartialEq)]
pub struct InjectionParams {
    /// Zero yields a pure-noise series.
    pub amplitude: f64,
    pub phase: f64,
    /// Seconds after the start of the series.
    pub onset: f64,
    pub sample_rate: f64,
    pub duration: f64,
    pub noise_sigma: f64,
    pub taper_width: f64,
    pub seed: u64,
}

impl Default for InjectionParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            phase: 0.0,
            onset: 0.01,
            sample_rate: 4096.0,
            duration: 0.2,
            noise_sigma: 1.0,
            taper_width: 0.002,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    params: InjectionParams,
    remnant: Option<RemnantState>,
}

impl SyntheticSource {
    pub fn new(params: InjectionParams) -> Self {
        Self {
            params,
            remnant: None,
        }
    }

    /// Inject at this remnant regardless of the event name.
    pub fn with_remnant(mut self, remnant: RemnantState) -> Self {
        self.remnant = Some(remnant);
        self
    }

    pub fn params(&self) -> &InjectionParams {
        &self.params
    }

    fn validate(&self) -> Result<(), AppError> {
        let p = &self.params;
        if !(p.sample_rate.is_finite() && p.sample_rate > 0.0) {
            return Err(AppError::config("injection sample rate must be > 0"));
        }
        if !(p.duration.is_finite() && p.duration > 0.0) {
            return Err(AppError::config("injection duration must be > 0"));
        }
        if !(p.noise_sigma.is_finite() && p.noise_sigma >= 0.0) {
            return Err(AppError::config("injection noise sigma must be >= 0"));
        }
        if !(p.amplitude.is_finite() && p.phase.is_finite() && p.onset.is_finite()) {
            return Err(AppError::config("injection parameters must be finite"));
        }
        Ok(())
    }

    fn seed_for(&self, event: &str, detector: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.params.seed.hash(&mut hasher);
        event.hash(&mut hasher);
        detector.hash(&mut hasher);
        hasher.finish()
    }
}

impl SeriesSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn load(&self, event: &str, detector: &str) -> Result<ObservedSeries, AppError> {
        self.validate()?;
        let remnant = match self.remnant {
            Some(r) => r,
            None => lookup(event)
                .ok_or_else(|| {
                    AppError::data_unavailable(format!(
                        "no remnant known for '{event}'; cannot synthesise a series"
                    ))
                })?
                .remnant()?,
        };

        let p = &self.params;
        let base = frequency_and_decay(&remnant, Mode::L2M2);
        let t = time_axis(p.sample_rate, p.duration);
        let model = BaselineModel::new(TemplateBuilder::new(p.taper_width));
        let mut h = model.waveform(
            &t,
            &[p.amplitude, base.frequency, base.decay_time, p.phase, p.onset],
        );

        if p.noise_sigma > 0.0 {
            let mut rng = StdRng::seed_from_u64(self.seed_for(event, detector));
            let normal = Normal::new(0.0, p.noise_sigma)
                .map_err(|e| AppError::config(format!("noise distribution error: {e}")))?;
            for x in h.iter_mut() {
                *x += normal.sample(&mut rng);
            }
        }

        ObservedSeries::new(t, h)
    }
}
