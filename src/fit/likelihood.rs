//! Whitened-Gaussian log-likelihood.
//!
//! `ln L(θ) = -½ Σ (d_i - h_i(θ))²` with unit noise variance. The additive
//! normalisation constant is dropped; it cancels in every evidence ratio and
//! optimizer comparison for a fixed dataset.

use crate::domain::ObservedSeries;
use crate::models::RingdownModel;

/// Anything that scores a parameter vector.
pub trait LogLikelihood: Sync {
    fn dim(&self) -> usize;

    fn log_likelihood(&self, theta: &[f64]) -> f64;
}

/// Likelihood of one model against one observed series.
///
/// Holds shared references only; evaluation takes `&self` and is safe to call
/// from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct LikelihoodEvaluator<'a, M> {
    model: &'a M,
    series: &'a ObservedSeries,
}

impl<'a, M: RingdownModel> LikelihoodEvaluator<'a, M> {
    pub fn new(model: &'a M, series: &'a ObservedSeries) -> Self {
        Self { model, series }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn series(&self) -> &'a ObservedSeries {
        self.series
    }

    /// Template for `theta` on the series' time axis.
    pub fn model_signal(&self, theta: &[f64]) -> Vec<f64> {
        self.model.waveform(self.series.time(), theta)
    }

    /// `observed - model`.
    pub fn residual(&self, theta: &[f64]) -> Vec<f64> {
        let h = self.model_signal(theta);
        self.series
            .strain()
            .iter()
            .zip(&h)
            .map(|(d, m)| d - m)
            .collect()
    }
}

impl<M: RingdownModel> LogLikelihood for LikelihoodEvaluator<'_, M> {
    fn dim(&self) -> usize {
        self.model.dim()
    }

    fn log_likelihood(&self, theta: &[f64]) -> f64 {
        let h = self.model_signal(theta);
        let chi2: f64 = self
            .series
            .strain()
            .iter()
            .zip(&h)
            .map(|(d, m)| {
                let r = d - m;
                r * r
            })
            .sum();
        -0.5 * chi2
    }
}
