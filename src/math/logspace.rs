//! Log-space accumulation helpers.

/// `ln(exp(a) + exp(b))` without overflow; `-inf` is the additive identity.
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

/// `ln(1 - exp(-x))` for `x > 0`.
pub fn log1m_exp_neg(x: f64) -> f64 {
    // Two branches keep full precision for both small and large `x`.
    if x < std::f64::consts::LN_2 {
        (-(-x).exp_m1()).ln()
    } else {
        (-(-x).exp()).ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_add_exp_matches_direct_form() {
        let a: f64 = -3.0;
        let b: f64 = -1.5;
        let direct = (a.exp() + b.exp()).ln();
        assert!((log_add_exp(a, b) - direct).abs() < 1e-14);
        assert_eq!(log_add_exp(f64::NEG_INFINITY, b), b);
        // Large magnitudes do not overflow.
        assert!((log_add_exp(1000.0, 1000.0) - (1000.0 + 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn log1m_exp_neg_small_and_large() {
        for x in [1e-4_f64, 0.01, 0.5, 3.0, 40.0] {
            let direct = (1.0 - (-x).exp()).ln();
            assert!((log1m_exp_neg(x) - direct).abs() < 1e-9 * direct.abs().max(1.0), "x={x}");
        }
    }
}
