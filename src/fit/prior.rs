//! Unit-hypercube prior transforms.
//!
//! Every parameter has an independent uniform prior on `[min, max]`, so the
//! transform is componentwise linear. Bounds are resolved once per analysis
//! unit; `transform` itself only reads them.

use crate::domain::{Mode, ModelVariant, PriorConfig, RemnantState};
use crate::error::AppError;
use crate::models::spectrum::frequency_and_decay;
use crate::models::{BaselineParams, ExtendedParams};

/// A map from the unit cube to a prior-bounded parameter vector.
pub trait UnitCubePrior: Sync {
    fn dim(&self) -> usize;

    /// Write the physical parameters for `u` into `theta`.
    ///
    /// Both slices have length [`UnitCubePrior::dim`].
    fn transform_into(&self, u: &[f64], theta: &mut [f64]);

    fn transform(&self, u: &[f64]) -> Vec<f64> {
        let mut theta = vec![0.0; self.dim()];
        self.transform_into(u, &mut theta);
        theta
    }
}

/// Uniform box prior in named-parameter order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorTransform {
    variant: ModelVariant,
    names: &'static [&'static str],
    bounds: Vec<(f64, f64)>,
}

impl PriorTransform {
    /// Baseline bounds: frequency and decay time scale with the fitted (2,2) values.
    pub fn baseline(remnant: &RemnantState, priors: &PriorConfig) -> Self {
        let base = frequency_and_decay(remnant, Mode::L2M2);
        let (lo, hi) = priors.baseline_scale;
        Self {
            variant: ModelVariant::Baseline,
            names: &BaselineParams::NAMES,
            bounds: vec![
                priors.baseline_amplitude,
                (lo * base.frequency, hi * base.frequency),
                (lo * base.decay_time, hi * base.decay_time),
                priors.phase,
                priors.onset,
            ],
        }
    }

    /// Extended bounds are remnant independent: the remnant enters through the
    /// model's fitted spectrum, not through the prior.
    pub fn extended(priors: &PriorConfig) -> Self {
        let mut bounds = vec![(0.0, 0.0); ExtendedParams::DIM];
        for k in 0..3 {
            bounds[ExtendedParams::amplitude_index(k)] = priors.extended_amplitude;
            bounds[ExtendedParams::d_freq_index(k)] = priors.deviation;
            bounds[ExtendedParams::d_tau_index(k)] = priors.deviation;
            bounds[ExtendedParams::phase_index(k)] = priors.phase;
        }
        bounds[ExtendedParams::ONSET_INDEX] = priors.onset;
        Self {
            variant: ModelVariant::Extended,
            names: &ExtendedParams::NAMES,
            bounds,
        }
    }

    pub fn for_variant(variant: ModelVariant, remnant: &RemnantState, priors: &PriorConfig) -> Self {
        match variant {
            ModelVariant::Baseline => Self::baseline(remnant, priors),
            ModelVariant::Extended => Self::extended(priors),
        }
    }

    /// Explicit bounds, e.g. for a custom fit.
    pub fn from_bounds(
        variant: ModelVariant,
        names: &'static [&'static str],
        bounds: Vec<(f64, f64)>,
    ) -> Result<Self, AppError> {
        if bounds.len() != names.len() {
            return Err(AppError::invalid_input(format!(
                "{} bounds for {} parameters",
                bounds.len(),
                names.len()
            )));
        }
        for (name, &(lo, hi)) in names.iter().zip(&bounds) {
            if !(lo.is_finite() && hi.is_finite() && hi >= lo) {
                return Err(AppError::invalid_input(format!(
                    "bad bounds for {name}: [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self {
            variant,
            names,
            bounds,
        })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Whether `theta` lies inside the box (inclusive).
    pub fn contains(&self, theta: &[f64]) -> bool {
        theta.len() == self.bounds.len()
            && theta
                .iter()
                .zip(&self.bounds)
                .all(|(&x, &(lo, hi))| x >= lo && x <= hi)
    }

}

impl UnitCubePrior for PriorTransform {
    fn dim(&self) -> usize {
        self.bounds.len()
    }

    /// # Panics
    /// Panics if either slice length differs from the prior dimension.
    fn transform_into(&self, u: &[f64], theta: &mut [f64]) {
        assert_eq!(u.len(), self.bounds.len(), "unit-cube vector length");
        assert_eq!(theta.len(), self.bounds.len(), "parameter vector length");
        for ((out, &ui), &(lo, hi)) in theta.iter_mut().zip(u).zip(&self.bounds) {
            // (1-u)*lo + u*hi hits both endpoints exactly.
            *out = (1.0 - ui) * lo + ui * hi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn remnant() -> RemnantState {
        RemnantState::new(68.0, 0.67).unwrap()
    }

    #[test]
    fn baseline_cube_corners_hit_bounds() {
        let prior = PriorTransform::baseline(&remnant(), &PriorConfig::default());
        let base = frequency_and_decay(&remnant(), Mode::L2M2);

        let lo = prior.transform(&[0.0; 5]);
        let hi = prior.transform(&[1.0; 5]);
        assert_eq!(lo, vec![0.0, 0.5 * base.frequency, 0.5 * base.decay_time, -PI, 0.0]);
        assert_eq!(hi, vec![2.0, 1.5 * base.frequency, 1.5 * base.decay_time, PI, 0.05]);

        let mid = prior.transform(&[0.5; 5]);
        assert!((mid[1] - base.frequency).abs() < 1e-9);
        assert!(mid[3].abs() < 1e-12);
    }

    #[test]
    fn extended_layout_matches_names() {
        let prior = PriorTransform::extended(&PriorConfig::default());
        assert_eq!(prior.names().len(), prior.dim());
        let lo = prior.transform(&[0.0; 13]);
        assert_eq!(&lo[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&lo[3..9], &[-0.5; 6]);
        assert_eq!(&lo[9..12], &[-PI; 3]);
        assert_eq!(lo[12], 0.0);
        let hi = prior.transform(&[1.0; 13]);
        assert_eq!(&hi[0..3], &[1.0; 3]);
        assert_eq!(hi[12], 0.05);
    }

    #[test]
    fn transform_is_monotone_per_component() {
        let prior = PriorTransform::baseline(&remnant(), &PriorConfig::default());
        let a = prior.transform(&[0.2, 0.2, 0.2, 0.2, 0.2]);
        let b = prior.transform(&[0.3, 0.3, 0.3, 0.3, 0.3]);
        assert!(a.iter().zip(&b).all(|(x, y)| x < y));
        assert!(prior.contains(&a));
    }

    #[test]
    fn from_bounds_checks_lengths() {
        let err = PriorTransform::from_bounds(
            ModelVariant::Baseline,
            &BaselineParams::NAMES,
            vec![(0.0, 1.0); 4],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
