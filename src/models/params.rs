//! Named parameter vectors.
//!
//! Samplers and optimizers work on flat `&[f64]` slices; these structs give the
//! slots names. The field order below is the only ordering used anywhere
//! (prior bounds, likelihood, fitter, serialized best-fit vectors).

use serde::{Deserialize, Serialize};

use crate::domain::{Mode, ModeDeviation};

/// Baseline single-mode parameters.
///
/// Order: `amplitude, frequency, decay_time, phase, onset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineParams {
    pub amplitude: f64,
    /// Hz.
    pub frequency: f64,
    /// Seconds.
    pub decay_time: f64,
    pub phase: f64,
    /// Seconds.
    pub onset: f64,
}

impl BaselineParams {
    pub const DIM: usize = 5;
    pub const NAMES: [&'static str; Self::DIM] =
        ["amplitude", "frequency", "decay_time", "phase", "onset"];

    /// # Panics
    /// Panics if `theta.len() != BaselineParams::DIM`.
    pub fn from_slice(theta: &[f64]) -> Self {
        assert_eq!(theta.len(), Self::DIM, "baseline parameter vector length");
        Self {
            amplitude: theta[0],
            frequency: theta[1],
            decay_time: theta[2],
            phase: theta[3],
            onset: theta[4],
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.amplitude,
            self.frequency,
            self.decay_time,
            self.phase,
            self.onset,
        ]
    }
}

/// Per-mode free parameters of the extended model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeShift {
    pub amplitude: f64,
    pub deviation: ModeDeviation,
    pub phase: f64,
}

/// Extended three-mode parameters, modes in [`Mode::ALL`] order (22, 33, 21).
///
/// Order: three amplitudes, three `(d_freq, d_tau)` pairs, three phases, onset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedParams {
    pub modes: [ModeShift; 3],
    pub onset: f64,
}

impl ExtendedParams {
    pub const DIM: usize = 13;
    pub const NAMES: [&'static str; Self::DIM] = [
        "amplitude_22",
        "amplitude_33",
        "amplitude_21",
        "d_freq_22",
        "d_tau_22",
        "d_freq_33",
        "d_tau_33",
        "d_freq_21",
        "d_tau_21",
        "phase_22",
        "phase_33",
        "phase_21",
        "onset",
    ];

    pub const fn amplitude_index(mode: usize) -> usize {
        mode
    }

    pub const fn d_freq_index(mode: usize) -> usize {
        3 + 2 * mode
    }

    pub const fn d_tau_index(mode: usize) -> usize {
        4 + 2 * mode
    }

    pub const fn phase_index(mode: usize) -> usize {
        9 + mode
    }

    pub const ONSET_INDEX: usize = 12;

    /// # Panics
    /// Panics if `theta.len() != ExtendedParams::DIM`.
    pub fn from_slice(theta: &[f64]) -> Self {
        assert_eq!(theta.len(), Self::DIM, "extended parameter vector length");
        let mode_at = |k: usize| ModeShift {
            amplitude: theta[Self::amplitude_index(k)],
            deviation: ModeDeviation {
                d_freq: theta[Self::d_freq_index(k)],
                d_tau: theta[Self::d_tau_index(k)],
            },
            phase: theta[Self::phase_index(k)],
        };
        Self {
            modes: [mode_at(0), mode_at(1), mode_at(2)],
            onset: theta[Self::ONSET_INDEX],
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = vec![0.0; Self::DIM];
        for (k, m) in self.modes.iter().enumerate() {
            out[Self::amplitude_index(k)] = m.amplitude;
            out[Self::d_freq_index(k)] = m.deviation.d_freq;
            out[Self::d_tau_index(k)] = m.deviation.d_tau;
            out[Self::phase_index(k)] = m.phase;
        }
        out[Self::ONSET_INDEX] = self.onset;
        out
    }

    pub fn mode(&self, mode: Mode) -> &ModeShift {
        &self.modes[mode.index()]
    }
}
