//! Fitted quasi-normal-mode spectrum.
//!
//! For each supported mode, two three-coefficient fits in `(1 - χ)` give the
//! dimensionless angular frequency and the quality factor:
//!
//! - `M·ω = f1 + f2 (1 - χ)^f3`
//! - `Q   = q1 + q2 (1 - χ)^q3`
//!
//! `M·ω` is converted to Hz with `c³ / (G M)` and the decay time follows from
//! `τ = Q / (π f)`.

use std::f64::consts::PI;

use crate::domain::{BaselineModeParams, Mode, RemnantState};
use crate::error::AppError;

/// Gravitational constant (m³ kg⁻¹ s⁻²).
pub const G_SI: f64 = 6.674_30e-11;
/// Speed of light (m/s).
pub const C_SI: f64 = 299_792_458.0;
/// Solar mass (kg).
pub const M_SUN_SI: f64 = 1.988_47e30;

/// Fit coefficients for one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeFit {
    pub f: [f64; 3],
    pub q: [f64; 3],
}

impl ModeFit {
    pub fn dimensionless_omega(&self, spin: f64) -> f64 {
        self.f[0] + self.f[1] * (1.0 - spin).powf(self.f[2])
    }

    pub fn quality_factor(&self, spin: f64) -> f64 {
        self.q[0] + self.q[1] * (1.0 - spin).powf(self.q[2])
    }
}

/// Fixed coefficient catalog.
pub fn mode_fit(mode: Mode) -> ModeFit {
    match mode {
        Mode::L2M2 => ModeFit {
            f: [1.5251, -1.1568, 0.1292],
            q: [0.7000, 1.4187, -0.4990],
        },
        Mode::L3M3 => ModeFit {
            f: [1.8956, -1.3043, 0.1818],
            q: [0.9000, 2.3430, -0.4810],
        },
        Mode::L2M1 => ModeFit {
            f: [0.6000, -0.2339, 0.4175],
            q: [-0.3000, 2.3561, -0.2277],
        },
    }
}

/// `c³ / (G M)` in s⁻¹ for a mass given in solar masses.
fn inverse_geometric_time(mass_solar: f64) -> f64 {
    C_SI.powi(3) / (G_SI * mass_solar * M_SUN_SI)
}

/// Baseline frequency (Hz) and decay time (s) of `mode` for a validated remnant.
pub fn frequency_and_decay(remnant: &RemnantState, mode: Mode) -> BaselineModeParams {
    let fit = mode_fit(mode);
    let spin = remnant.spin();
    let omega = fit.dimensionless_omega(spin) * inverse_geometric_time(remnant.mass());
    let frequency = omega / (2.0 * PI);
    let decay_time = fit.quality_factor(spin) / (PI * frequency);
    BaselineModeParams {
        frequency,
        decay_time,
    }
}

/// Raw-input entry point: validates mass, spin and mode label first.
///
/// Fails with [`AppError::InvalidInput`] for `spin ∉ [0, 1)`, non-positive mass,
/// or a label other than 22 / 33 / 21. Never clamps.
pub fn frequency_and_decay_checked(
    mass_solar: f64,
    spin: f64,
    mode_label: &str,
) -> Result<BaselineModeParams, AppError> {
    let remnant = RemnantState::new(mass_solar, spin)?;
    let mode: Mode = mode_label.parse()?;
    Ok(frequency_and_decay(&remnant, mode))
}
