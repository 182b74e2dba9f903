//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the sampling/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{AnalysisUnit, BaselineModeParams, Mode, RemnantState};
use crate::fit::FitOutcome;
use crate::io::{ResultRecord, SummaryRow, UnitStatus};

/// Both evidences, ΔlogZ, Bayes factor and the decision.
pub fn format_comparison(record: &ResultRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} {} - ringdown model comparison ===\n",
        record.event, record.detector
    ));
    out.push_str(&format!(
        "Remnant: M={:.2} Msun | chi={:.3}\n",
        record.remnant_mass, record.spin
    ));
    out.push_str(&format!(
        "Sampler: live={} | seed={}\n\n",
        record.live_points, record.seed
    ));

    out.push_str(&format!(
        "  baseline  ln Z = {:>12.3} ± {:.3}  ({} iterations)\n",
        record.log_z_baseline, record.log_z_baseline_err, record.baseline_run.iterations
    ));
    out.push_str(&format!(
        "  extended  ln Z = {:>12.3} ± {:.3}  ({} iterations)\n",
        record.log_z_extended, record.log_z_extended_err, record.extended_run.iterations
    ));
    out.push_str(&format!("\nΔlogZ (extended - baseline): {:.3}\n", record.delta_log_z));
    out.push_str(&format!("Bayes factor: {}\n", fmt_bayes_factor(record.bayes_factor)));
    out.push_str(&format!("Favored: {}\n", record.favored.label()));

    out
}

/// Best-fit point with named parameters.
pub fn format_fit(unit: &AnalysisUnit, names: &[&str], fit: &FitOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} - point fit ===\n", unit.tag()));
    for (name, value) in names.iter().zip(&fit.params) {
        out.push_str(&format!("  {name:<12} {value:>14.6e}\n"));
    }
    out.push_str(&format!(
        "cost={:.6e} | iterations={} | converged={}\n",
        fit.cost, fit.iterations, fit.converged
    ));
    out.push_str(&format!("message: {}\n", fit.message));

    out
}

/// Fitted `(f0, tau)` per catalog mode.
pub fn format_spectrum(remnant: &RemnantState, rows: &[(Mode, BaselineModeParams)]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Remnant: M={:.2} Msun | chi={:.3}\n",
        remnant.mass(),
        remnant.spin()
    ));
    out.push_str("mode      f0 [Hz]    tau [ms]\n");
    for (mode, p) in rows {
        out.push_str(&format!(
            "{:<4} {:>12.3} {:>11.4}\n",
            mode.label(),
            p.frequency,
            p.decay_time * 1e3
        ));
    }

    out
}

/// One line per batch unit.
pub fn format_batch(rows: &[SummaryRow]) -> String {
    let mut out = String::new();
    let ok = rows.iter().filter(|r| r.status == UnitStatus::Ok).count();

    out.push_str(&format!("Batch: {ok}/{} units succeeded\n", rows.len()));
    for r in rows {
        match r.status {
            UnitStatus::Ok => out.push_str(&format!(
                "  {:<10} {:<3} ΔlogZ={:>9.3} BF={:>10} -> {}\n",
                r.event,
                r.detector,
                r.delta_log_z.unwrap_or(f64::NAN),
                fmt_bayes_factor(r.bayes_factor),
                r.favored.map(|f| f.label()).unwrap_or("-"),
            )),
            UnitStatus::Failed => out.push_str(&format!(
                "  {:<10} {:<3} FAILED [{}] {}\n",
                r.event,
                r.detector,
                r.error_kind.map(|k| k.as_str()).unwrap_or("-"),
                r.message.as_deref().unwrap_or(""),
            )),
        }
    }

    out
}

fn fmt_bayes_factor(bf: Option<f64>) -> String {
    match bf {
        Some(v) if v >= 1e6 || (v > 0.0 && v < 1e-3) => format!("{v:.3e}"),
        Some(v) => format!("{v:.3}"),
        None => "overflow".to_string(),
    }
}
