//! Planck-taper onset window.
//!
//! The window rises from 0 to 1 over `[t0, t0 + width]`:
//!
//! - `w = 0` for `x <= 0`
//! - `w = 1` for `x >= 1`
//! - `w = 1 / (exp(1/x - 1/(1 - x)) + 1)` in between, with `x = (t - t0) / width`
//!
//! The exponent runs from `+inf` to `-inf` across the ramp, so `exp` may
//! overflow to `inf` (giving exactly 0) or underflow to 0 (giving exactly 1);
//! neither produces NaN.

/// Evaluate the rising taper at a single time.
pub fn planck_taper(t: f64, t0: f64, width: f64) -> f64 {
    let x = (t - t0) / width;
    planck_ramp(x)
}

/// The taper as a function of the fractional ramp position `x`.
pub fn planck_ramp(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let z = 1.0 / x - 1.0 / (1.0 - x);
    1.0 / (z.exp() + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn taper_endpoints() {
        let t0 = 0.01;
        let width = 0.002;
        assert_eq!(planck_taper(t0 - 1e-9, t0, width), 0.0);
        assert_eq!(planck_taper(t0, t0, width), 0.0);
        assert_eq!(planck_taper(t0 + width, t0, width), 1.0);
        assert_eq!(planck_taper(t0 + 10.0 * width, t0, width), 1.0);
        assert!((planck_ramp(0.5) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn taper_approaches_edges_smoothly() {
        assert!(planck_ramp(1e-3) < 1e-100);
        assert!(1.0 - planck_ramp(1.0 - 1e-3) < 1e-100);
        for x in [0.01, 0.1, 0.3, 0.7, 0.9, 0.99] {
            let w = planck_ramp(x);
            assert!(w.is_finite() && (0.0..=1.0).contains(&w), "x={x} w={w}");
        }
    }

    proptest! {
        #[test]
        fn taper_is_monotone(a in -0.5f64..1.5, b in -0.5f64..1.5) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(planck_ramp(lo) <= planck_ramp(hi));
        }

        #[test]
        fn taper_is_symmetric(x in 0.0f64..1.0) {
            let s = planck_ramp(x) + planck_ramp(1.0 - x);
            prop_assert!((s - 1.0).abs() < 1e-12);
        }
    }
}
