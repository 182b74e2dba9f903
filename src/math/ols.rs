//! Least squares solves used by the point-estimate fitter.
//!
//! Each Levenberg–Marquardt iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
//! ```
//!
//! The system is tiny (5 or 13 unknowns) but can be badly conditioned when a
//! parameter barely affects the template (e.g. a mode with near-zero amplitude
//! makes its frequency unidentified). SVD handles the rank-deficient case by
//! truncating small singular values instead of failing.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve the Marquardt-damped normal equations for a step `δ`.
///
/// `jtj` is `JᵀJ`, `jtr` is `Jᵀr`. Diagonal entries are floored so that a
/// parameter with zero sensitivity still receives a finite (zero) step.
pub fn solve_damped_normal(jtj: &DMatrix<f64>, jtr: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let mut a = jtj.clone();
    for i in 0..a.nrows() {
        let d = jtj[(i, i)].max(1e-12);
        a[(i, i)] += lambda * d;
    }
    solve_least_squares(&a, jtr)
}
