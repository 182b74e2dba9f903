//! Bounded point-estimate fitting.
//!
//! Given:
//! - an observed series and a ringdown model (via [`LikelihoodEvaluator`])
//! - an initial guess
//! - per-parameter `(min, max)` bounds
//!
//! we minimise `cost = ½ Σ (d - h(θ))²` (the negative log-likelihood) with a
//! projected Levenberg–Marquardt iteration:
//! - forward-difference Jacobian of the template (columns in parallel)
//! - damped normal equations solved by SVD
//! - trial points clamped back into the box
//!
//! Non-convergence is not an error: the best point found is returned with
//! `converged = false` and a diagnostic message.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::warn;

use crate::domain::{Mode, ObservedSeries, PriorConfig, RemnantState};
use crate::error::AppError;
use crate::fit::likelihood::LikelihoodEvaluator;
use crate::math::{peak_frequency, solve_damped_normal};
use crate::models::{ExtendedParams, RingdownModel};
use crate::models::spectrum::frequency_and_decay;

/// Iteration limits and tolerances.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub max_iterations: usize,
    /// Relative cost decrease below which the fit is considered converged.
    pub cost_tolerance: f64,
    /// Relative step size below which the fit is considered converged.
    pub step_tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            cost_tolerance: 1e-12,
            step_tolerance: 1e-10,
        }
    }
}

/// Best-available point of a bounded fit.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub params: Vec<f64>,
    /// Template at `params`.
    pub model: Vec<f64>,
    /// `observed - model`.
    pub residual: Vec<f64>,
    /// `½ Σ residual²`.
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
    pub message: String,
}

const LAMBDA_START: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e12;

#[derive(Debug, Clone, Default)]
pub struct PointEstimateFitter {
    options: FitOptions,
}

impl PointEstimateFitter {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    pub fn fit<M: RingdownModel>(
        &self,
        like: &LikelihoodEvaluator<'_, M>,
        initial: &[f64],
        bounds: &[(f64, f64)],
    ) -> Result<FitOutcome, AppError> {
        let p = like.model().dim();
        if initial.len() != p || bounds.len() != p {
            return Err(AppError::invalid_input(format!(
                "model has {p} parameters; got {} initial values and {} bounds",
                initial.len(),
                bounds.len()
            )));
        }
        if let Some(i) = bounds
            .iter()
            .position(|&(lo, hi)| !(lo.is_finite() && hi.is_finite() && hi >= lo))
        {
            return Err(AppError::invalid_input(format!(
                "bounds for {} are not a finite range",
                like.model().param_names()[i]
            )));
        }
        if initial.iter().any(|x| !x.is_finite()) {
            return Err(AppError::invalid_input("initial guess contains non-finite values"));
        }

        let observed = like.series().strain();
        let mut x: Vec<f64> = initial
            .iter()
            .zip(bounds)
            .map(|(&v, &(lo, hi))| v.clamp(lo, hi))
            .collect();
        let mut h = like.model_signal(&x);
        let mut cost = half_sse(observed, &h);
        if !cost.is_finite() {
            return Err(AppError::Fit(format!("cost is not finite at the initial guess ({cost})")));
        }

        let mut lambda = LAMBDA_START;
        let mut iterations = 0;
        let mut converged = false;
        let mut message = format!(
            "maximum number of iterations ({}) reached",
            self.options.max_iterations
        );

        while iterations < self.options.max_iterations {
            iterations += 1;

            let jac = jacobian(like, &x, &h, bounds);
            let r = DVector::from_iterator(observed.len(), observed.iter().zip(&h).map(|(d, m)| d - m));
            let jtj = jac.transpose() * &jac;
            let jtr = jac.transpose() * &r;

            let mut improved = None;
            while lambda <= LAMBDA_MAX {
                let Some(delta) = solve_damped_normal(&jtj, &jtr, lambda) else {
                    lambda *= 10.0;
                    continue;
                };
                let trial: Vec<f64> = x
                    .iter()
                    .zip(delta.iter())
                    .zip(bounds)
                    .map(|((&xi, &di), &(lo, hi))| (xi + di).clamp(lo, hi))
                    .collect();
                let h_trial = like.model_signal(&trial);
                let cost_trial = half_sse(observed, &h_trial);
                if cost_trial.is_finite() && cost_trial < cost {
                    improved = Some((trial, h_trial, cost_trial));
                    lambda = (lambda / 10.0).max(LAMBDA_MIN);
                    break;
                }
                lambda *= 10.0;
            }

            let Some((trial, h_trial, cost_trial)) = improved else {
                converged = true;
                message = "no further decrease possible (step below tolerance)".to_string();
                break;
            };

            let rel_cost = (cost - cost_trial) / cost.max(f64::MIN_POSITIVE);
            let step_norm = trial
                .iter()
                .zip(&x)
                .map(|(a, b)| ((a - b) / b.abs().max(1e-12)).powi(2))
                .sum::<f64>()
                .sqrt();

            x = trial;
            h = h_trial;
            cost = cost_trial;

            if cost_trial <= f64::EPSILON * f64::EPSILON {
                converged = true;
                message = "cost is numerically zero".to_string();
                break;
            }
            if rel_cost < self.options.cost_tolerance {
                converged = true;
                message = "relative reduction of the cost below tolerance".to_string();
                break;
            }
            if step_norm < self.options.step_tolerance {
                converged = true;
                message = "relative step size below tolerance".to_string();
                break;
            }
        }

        if !converged {
            warn!(iterations, cost, message = %message, "point fit did not converge");
        }

        let residual = observed.iter().zip(&h).map(|(d, m)| d - m).collect();
        Ok(FitOutcome {
            params: x,
            model: h,
            residual,
            cost,
            iterations,
            converged,
            message,
        })
    }
}

fn half_sse(observed: &[f64], model: &[f64]) -> f64 {
    0.5 * observed
        .iter()
        .zip(model)
        .map(|(d, m)| (d - m) * (d - m))
        .sum::<f64>()
}

/// `∂h/∂θ_j` by forward differences; steps point inward at an upper bound.
fn jacobian<M: RingdownModel>(
    like: &LikelihoodEvaluator<'_, M>,
    x: &[f64],
    h: &[f64],
    bounds: &[(f64, f64)],
) -> DMatrix<f64> {
    let n = h.len();
    let p = x.len();
    let columns: Vec<Vec<f64>> = (0..p)
        .into_par_iter()
        .map(|j| {
            let (lo, hi) = bounds[j];
            let scale = x[j].abs().max(1e-3 * (hi - lo)).max(1e-12);
            let mut step = f64::EPSILON.sqrt() * scale;
            if x[j] + step > hi {
                step = -step;
            }
            let mut xp = x.to_vec();
            xp[j] += step;
            let hp = like.model_signal(&xp);
            hp.iter().zip(h).map(|(a, b)| (a - b) / step).collect()
        })
        .collect();
    DMatrix::from_fn(n, p, |i, j| columns[j][i])
}

/// Starting point for a baseline fit.
///
/// Frequency comes from the FFT peak of the data within the baseline prior
/// band when one exists, else from the fitted (2,2) spectrum; the decay time is
/// the fitted value, the amplitude the peak absolute strain (clamped to the
/// prior).
pub fn initial_baseline_guess(
    series: &ObservedSeries,
    remnant: &RemnantState,
    priors: &PriorConfig,
) -> Vec<f64> {
    let base = frequency_and_decay(remnant, Mode::L2M2);
    let (lo, hi) = priors.baseline_scale;
    let frequency = peak_frequency(
        series.strain(),
        series.sample_rate(),
        lo * base.frequency,
        hi * base.frequency,
    )
    .unwrap_or(base.frequency);

    let peak = series.strain().iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    let (a_lo, a_hi) = priors.baseline_amplitude;
    let (t_lo, t_hi) = priors.onset;
    vec![
        peak.clamp(a_lo, a_hi),
        frequency,
        base.decay_time,
        0.0_f64.clamp(priors.phase.0, priors.phase.1),
        t_lo + 0.2 * (t_hi - t_lo),
    ]
}

/// Starting point for an extended fit: zero deviations and phases, the
/// (2,2) amplitude from the peak strain, subdominant modes at a tenth of it.
pub fn initial_extended_guess(series: &ObservedSeries, priors: &PriorConfig) -> Vec<f64> {
    let peak = series.strain().iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    let (a_lo, a_hi) = priors.extended_amplitude;
    let (t_lo, t_hi) = priors.onset;
    let mut theta = vec![0.0; ExtendedParams::DIM];
    for k in 0..3 {
        let share = if k == 0 { 1.0 } else { 0.1 };
        theta[ExtendedParams::amplitude_index(k)] = (share * peak).clamp(a_lo, a_hi);
        theta[ExtendedParams::d_freq_index(k)] = 0.0_f64.clamp(priors.deviation.0, priors.deviation.1);
        theta[ExtendedParams::d_tau_index(k)] = 0.0_f64.clamp(priors.deviation.0, priors.deviation.1);
        theta[ExtendedParams::phase_index(k)] = 0.0_f64.clamp(priors.phase.0, priors.phase.1);
    }
    theta[ExtendedParams::ONSET_INDEX] = t_lo + 0.2 * (t_hi - t_lo);
    theta
}
