//! Fractional deviations from the baseline spectrum.

use crate::domain::{BaselineModeParams, ModeDeviation};

/// `(f·(1 + d_freq), τ·(1 + d_tau))`. No bounds are enforced here.
pub fn shift(frequency: f64, decay_time: f64, d_freq: f64, d_tau: f64) -> (f64, f64) {
    (frequency * (1.0 + d_freq), decay_time * (1.0 + d_tau))
}

/// [`shift`] on domain types.
pub fn apply(baseline: BaselineModeParams, deviation: ModeDeviation) -> BaselineModeParams {
    let (frequency, decay_time) = shift(
        baseline.frequency,
        baseline.decay_time,
        deviation.d_freq,
        deviation.d_tau,
    );
    BaselineModeParams {
        frequency,
        decay_time,
    }
}
