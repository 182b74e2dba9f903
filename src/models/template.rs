//! Time-domain ringdown templates.
//!
//! A single mode is
//!
//! ```text
//! h(t) = A · exp(-(t - t0)/τ) · sin(2π f (t - t0) + φ) · w(t)   for t >= t0
//! h(t) = 0                                                       for t <  t0
//! ```
//!
//! where `w` is the Planck-taper onset window of [`crate::math::taper`].
//! Multi-mode templates are elementwise sums of single modes sharing `t0`.

use std::f64::consts::PI;

use crate::domain::{ModeParams, TemplateParams};
use crate::math::planck_taper;

/// Builds templates on an explicit time axis. Holds only the taper width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateBuilder {
    taper_width: f64,
}

impl TemplateBuilder {
    pub fn new(taper_width: f64) -> Self {
        Self { taper_width }
    }

    pub fn taper_width(&self) -> f64 {
        self.taper_width
    }

    /// One damped sinusoid sampled on `t`.
    ///
    /// A non-positive or non-finite `decay_time` yields an all-zero signal.
    pub fn single_mode(
        &self,
        t: &[f64],
        amplitude: f64,
        frequency: f64,
        decay_time: f64,
        phase: f64,
        onset: f64,
    ) -> Vec<f64> {
        let mut out = vec![0.0; t.len()];
        self.add_mode(t, amplitude, frequency, decay_time, phase, onset, &mut out);
        out
    }

    /// Superpose the included modes of `modes`, all starting at `onset`.
    ///
    /// Excluded modes are skipped entirely.
    pub fn multi_mode(&self, t: &[f64], onset: f64, modes: &[ModeParams]) -> Vec<f64> {
        let mut out = vec![0.0; t.len()];
        for m in modes.iter().filter(|m| m.included) {
            self.add_mode(t, m.amplitude, m.frequency, m.decay_time, m.phase, onset, &mut out);
        }
        out
    }

    pub fn template(&self, t: &[f64], params: &TemplateParams) -> Vec<f64> {
        self.multi_mode(t, params.onset, &params.modes)
    }

    /// Accumulate one mode into `out` (same length as `t`).
    fn add_mode(
        &self,
        t: &[f64],
        amplitude: f64,
        frequency: f64,
        decay_time: f64,
        phase: f64,
        onset: f64,
        out: &mut [f64],
    ) {
        if !(decay_time.is_finite() && decay_time > 0.0) {
            return;
        }
        let omega = 2.0 * PI * frequency;
        for (h, &ti) in out.iter_mut().zip(t.iter()) {
            if ti < onset {
                continue;
            }
            let x = ti - onset;
            let w = planck_taper(ti, onset, self.taper_width);
            if w == 0.0 {
                continue;
            }
            *h += amplitude * (-x / decay_time).exp() * (omega * x + phase).sin() * w;
        }
    }
}

/// Uniform time axis `[0, duration)` at `sample_rate`.
pub fn time_axis(sample_rate: f64, duration: f64) -> Vec<f64> {
    let n = (duration * sample_rate).round() as usize;
    (0..n).map(|i| i as f64 / sample_rate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mode(amplitude: f64, frequency: f64, decay_time: f64, phase: f64) -> ModeParams {
        ModeParams {
            included: true,
            amplitude,
            phase,
            frequency,
            decay_time,
        }
    }

    #[test]
    fn zero_before_onset() {
        let builder = TemplateBuilder::new(0.002);
        let t = time_axis(4096.0, 0.1);
        let onset = 0.03;
        let h = builder.single_mode(&t, 1.0, 250.0, 0.02, 0.7, onset);
        for (ti, hi) in t.iter().zip(h.iter()) {
            if *ti < onset {
                assert_eq!(*hi, 0.0);
            }
        }
        assert!(h.iter().any(|v| v.abs() > 0.1));
    }

    #[test]
    fn all_zero_when_onset_after_data() {
        let builder = TemplateBuilder::new(0.002);
        let t = time_axis(1024.0, 0.05);
        let h = builder.single_mode(&t, 1.0, 250.0, 0.02, 0.0, 1.0);
        assert_eq!(h.len(), t.len());
        assert!(h.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn multi_mode_with_single_mode_matches_exactly() {
        let builder = TemplateBuilder::new(0.002);
        let t = time_axis(4096.0, 0.2);
        let single = builder.single_mode(&t, 0.8, 180.0, 0.01, -1.2, 0.005);

        let modes = [
            mode(0.8, 180.0, 0.01, -1.2),
            ModeParams::excluded(),
            ModeParams {
                included: false,
                ..mode(5.0, 300.0, 0.01, 0.0)
            },
        ];
        let multi = builder.multi_mode(&t, 0.005, &modes);
        assert_eq!(single, multi);
    }

    #[test]
    fn multi_mode_is_sum_of_modes() {
        let builder = TemplateBuilder::new(0.002);
        let t = time_axis(2048.0, 0.1);
        let a = builder.single_mode(&t, 1.0, 200.0, 0.01, 0.3, 0.01);
        let b = builder.single_mode(&t, 0.4, 320.0, 0.008, -0.5, 0.01);
        let sum = builder.multi_mode(&t, 0.01, &[mode(1.0, 200.0, 0.01, 0.3), mode(0.4, 320.0, 0.008, -0.5)]);
        for i in 0..t.len() {
            assert!((sum[i] - (a[i] + b[i])).abs() < 1e-15);
        }
    }

    #[test]
    fn invalid_decay_time_contributes_nothing() {
        let builder = TemplateBuilder::new(0.002);
        let t = time_axis(1024.0, 0.05);
        let h = builder.single_mode(&t, 1.0, 100.0, 0.0, 0.0, 0.0);
        assert!(h.iter().all(|&v| v == 0.0));
    }

    proptest! {
        #[test]
        fn never_nonzero_before_onset(
            onset in 0.0f64..0.08,
            amplitude in 0.0f64..3.0,
            frequency in 50.0f64..800.0,
            decay_time in 1e-3f64..0.05,
            phase in -3.2f64..3.2,
        ) {
            let builder = TemplateBuilder::new(0.002);
            let t = time_axis(2048.0, 0.1);
            let h = builder.single_mode(&t, amplitude, frequency, decay_time, phase, onset);
            for (ti, hi) in t.iter().zip(h.iter()) {
                if *ti < onset {
                    prop_assert_eq!(*hi, 0.0);
                }
                prop_assert!(hi.is_finite());
            }
        }
    }
}
