//! Evidence comparison.

use crate::domain::{AnalysisUnit, ComparisonRecord, EvidenceResult, Favored};

/// `ΔlogZ`, Bayes factor and favored label of extended vs baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub delta_log_z: f64,
    /// `exp(ΔlogZ)`; `inf` when that overflows.
    pub bayes_factor: f64,
    pub favored: Favored,
}

/// Compare two evidences.
///
/// The favored label is decided on `ΔlogZ > 0` rather than on the exponentiated
/// value, so it stays correct when the Bayes factor overflows. A tie favors the
/// baseline.
pub fn compare(baseline: &EvidenceResult, extended: &EvidenceResult) -> Comparison {
    let delta_log_z = extended.log_evidence - baseline.log_evidence;
    let favored = if delta_log_z > 0.0 {
        Favored::Extended
    } else {
        Favored::Baseline
    };
    Comparison {
        delta_log_z,
        bayes_factor: delta_log_z.exp(),
        favored,
    }
}

/// Build the terminal record for one analysis unit.
pub fn comparison_record(
    unit: AnalysisUnit,
    baseline: EvidenceResult,
    extended: EvidenceResult,
) -> ComparisonRecord {
    let c = compare(&baseline, &extended);
    ComparisonRecord {
        unit,
        baseline,
        extended,
        delta_log_z: c.delta_log_z,
        bayes_factor: c.bayes_factor,
        favored: c.favored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemnantState;
    use approx::assert_relative_eq;

    fn ev(log_evidence: f64) -> EvidenceResult {
        EvidenceResult {
            log_evidence,
            log_evidence_err: 0.1,
        }
    }

    #[test]
    fn extended_wins_on_positive_delta() {
        let c = compare(&ev(-100.0), &ev(-95.0));
        assert_relative_eq!(c.delta_log_z, 5.0);
        assert_relative_eq!(c.bayes_factor, 148.413_159_102_576_6, max_relative = 1e-12);
        assert_eq!(c.favored, Favored::Extended);
    }

    #[test]
    fn tie_favors_baseline() {
        let c = compare(&ev(-42.0), &ev(-42.0));
        assert_eq!(c.delta_log_z, 0.0);
        assert_eq!(c.bayes_factor, 1.0);
        assert_eq!(c.favored, Favored::Baseline);
    }

    #[test]
    fn huge_delta_decides_without_exponent() {
        let c = compare(&ev(-5000.0), &ev(-1000.0));
        assert!(c.bayes_factor.is_infinite());
        assert_eq!(c.favored, Favored::Extended);

        let c = compare(&ev(-1000.0), &ev(-5000.0));
        assert_eq!(c.bayes_factor, 0.0);
        assert_eq!(c.favored, Favored::Baseline);
    }

    #[test]
    fn record_carries_unit_and_evidences() {
        let unit = AnalysisUnit::new("GW150914", "H1", RemnantState::new(68.0, 0.67).unwrap());
        let rec = comparison_record(unit.clone(), ev(-10.0), ev(-12.0));
        assert_eq!(rec.unit, unit);
        assert_eq!(rec.delta_log_z, -2.0);
        assert_eq!(rec.favored, Favored::Baseline);
        assert_relative_eq!(rec.bayes_factor, (-2.0_f64).exp());
    }
}
