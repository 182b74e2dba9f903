//! Nested sampling evidence integrator.
//!
//! Classic Skilling scheme over the unit hypercube:
//!
//! - draw `N` live points from the prior and score them (in parallel)
//! - repeatedly remove the lowest-likelihood point, crediting it with the
//!   prior-volume shell `X_{i-1} - X_i` where `X_i = exp(-i/N)`
//! - replace it by a constrained random walk started from another live point
//! - stop once the live set could raise `ln Z` by less than `dlogz`, then add
//!   the remaining live points with equal shares of the final volume
//!
//! All random draws happen on the calling thread from one seeded `StdRng`, so a
//! run is reproducible for a fixed seed. The uncertainty follows Skilling's
//! `sqrt(H / N)` with `H` the information (KL divergence prior → posterior).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{EvidenceResult, NestedConfig};
use crate::error::AppError;
use crate::fit::likelihood::LogLikelihood;
use crate::fit::prior::UnitCubePrior;
use crate::math::{log1m_exp_neg, log_add_exp};

/// Step-size factor limits for the random walk (in units of the live-set spread).
const MIN_STEP: f64 = 1e-4;
const MAX_STEP: f64 = 4.0;

/// A walk with no accepted move keeps proposing up to this many times `walk_steps`.
const STALL_FACTOR: usize = 10;

/// Diagnostics of one finished integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedRun {
    pub evidence: EvidenceResult,
    pub iterations: usize,
    pub likelihood_calls: usize,
    /// Information `H` in nats.
    pub information: f64,
    pub max_log_likelihood: f64,
    /// Parameter vector of the highest-likelihood live point.
    pub best_theta: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct NestedSampler {
    config: NestedConfig,
}

/// Running evidence and information sums.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    log_z: f64,
    information: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            log_z: f64::NEG_INFINITY,
            information: 0.0,
        }
    }

    /// Add a sample with likelihood `log_l` carrying prior mass `exp(log_width)`.
    fn add(&mut self, log_width: f64, log_l: f64) {
        let log_wt = log_width + log_l;
        if log_wt == f64::NEG_INFINITY {
            return;
        }
        let log_z_new = log_add_exp(self.log_z, log_wt);
        let carried = if self.log_z == f64::NEG_INFINITY {
            0.0
        } else {
            (self.log_z - log_z_new).exp() * (self.information + self.log_z)
        };
        self.information = (log_wt - log_z_new).exp() * log_l + carried - log_z_new;
        self.log_z = log_z_new;
    }
}

impl NestedSampler {
    pub fn new(config: NestedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NestedConfig {
        &self.config
    }

    /// Integrate `like` over `prior`.
    ///
    /// Fails with `InvalidInput` when the two disagree on dimensionality and
    /// with `Integration` on a NaN likelihood or when the iteration cap is hit
    /// before the termination criterion.
    pub fn run<P, L>(&self, prior: &P, like: &L) -> Result<NestedRun, AppError>
    where
        P: UnitCubePrior,
        L: LogLikelihood,
    {
        let dim = prior.dim();
        if dim == 0 || like.dim() != dim {
            return Err(AppError::invalid_input(format!(
                "prior has {} parameters but likelihood expects {}",
                dim,
                like.dim()
            )));
        }
        let n = self.config.live_points;
        if n < 2 {
            return Err(AppError::config("nested sampling needs at least 2 live points"));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let score = |u: &[f64]| like.log_likelihood(&prior.transform(u));

        let mut live_u: Vec<Vec<f64>> = (0..n)
            .map(|_| (0..dim).map(|_| rng.gen_range(0.0..1.0)).collect())
            .collect();
        let mut live_logl: Vec<f64> = live_u.par_iter().map(|u| score(u.as_slice())).collect();
        if live_logl.iter().any(|l| l.is_nan()) {
            return Err(AppError::integration("likelihood returned NaN for an initial live point"));
        }
        let mut calls = n;

        let n_f = n as f64;
        let mut acc = Accumulator::new();
        let mut log_width = log1m_exp_neg(1.0 / n_f);
        let mut step = 1.0_f64;
        let mut iterations = 0usize;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let log_x = -(iterations as f64) / n_f;
            let log_l_max = live_logl.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if acc.log_z.is_finite() {
                let remaining = log_add_exp(acc.log_z, log_l_max + log_x) - acc.log_z;
                if remaining < self.config.dlogz {
                    converged = true;
                    break;
                }
            }

            let worst = argmin(&live_logl);
            let threshold = live_logl[worst];
            acc.add(log_width, threshold);

            let spread = live_spread(&live_u);
            let mut start = rng.gen_range(0..n - 1);
            if start >= worst {
                start += 1;
            }
            let mut current = live_u[start].clone();
            let mut current_logl = live_logl[start];
            let (mut accepted, mut rejected) = (0usize, 0usize);
            let mut proposal = vec![0.0; dim];

            let mut proposals = 0;
            while proposals < self.config.walk_steps
                || (accepted == 0 && proposals < STALL_FACTOR * self.config.walk_steps)
            {
                proposals += 1;
                for ((p, &x), &s) in proposal.iter_mut().zip(&current).zip(&spread) {
                    let z: f64 = rng.sample(StandardNormal);
                    *p = reflect_unit(x + step * s * z);
                }
                let logl = score(proposal.as_slice());
                calls += 1;
                if logl.is_nan() {
                    return Err(AppError::integration(format!(
                        "likelihood returned NaN at iteration {iterations}"
                    )));
                }
                if logl > threshold {
                    current.copy_from_slice(&proposal);
                    current_logl = logl;
                    accepted += 1;
                } else {
                    rejected += 1;
                }
            }

            if accepted > rejected {
                step *= (1.0 / accepted as f64).exp();
            } else if rejected > accepted {
                step /= (1.0 / rejected as f64).exp();
            }
            step = step.clamp(MIN_STEP, MAX_STEP);

            live_u[worst] = current;
            live_logl[worst] = current_logl;
            log_width -= 1.0 / n_f;
            iterations += 1;
        }

        if !converged {
            return Err(AppError::integration(format!(
                "no convergence within {} iterations (ln Z so far {:.3})",
                self.config.max_iterations, acc.log_z
            )));
        }

        let log_share = -(iterations as f64) / n_f - n_f.ln();
        for &logl in &live_logl {
            acc.add(log_share, logl);
        }

        let best = argmax(&live_logl);
        let best_theta = prior.transform(&live_u[best]);
        let information = acc.information.max(0.0);
        let log_evidence_err = (information / n_f).sqrt();

        debug!(
            iterations,
            likelihood_calls = calls,
            log_z = acc.log_z,
            log_z_err = log_evidence_err,
            "nested sampling finished"
        );

        Ok(NestedRun {
            evidence: EvidenceResult {
                log_evidence: acc.log_z,
                log_evidence_err,
            },
            iterations,
            likelihood_calls: calls,
            information,
            max_log_likelihood: live_logl[best],
            best_theta,
        })
    }
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Per-dimension standard deviation of the live points.
fn live_spread(live: &[Vec<f64>]) -> Vec<f64> {
    let n = live.len() as f64;
    let dim = live[0].len();
    (0..dim)
        .map(|k| {
            let mean = live.iter().map(|u| u[k]).sum::<f64>() / n;
            let var = live.iter().map(|u| (u[k] - mean).powi(2)).sum::<f64>() / n;
            var.sqrt().max(1e-9)
        })
        .collect()
}

/// Fold `x` back into `[0, 1]` by mirror reflection.
fn reflect_unit(x: f64) -> f64 {
    let y = x.rem_euclid(2.0);
    if y > 1.0 { 2.0 - y } else { y }
}
