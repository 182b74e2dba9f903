//! Ringdown window selection.

use crate::domain::ObservedSeries;
use crate::error::AppError;

/// Keep samples with `start <= t <= end` and shift time so the first kept
/// sample sits at `t = 0`.
///
/// Missing bounds are open. Fewer than `min_samples` kept samples is
/// [`AppError::WindowTooShort`].
pub fn select_window(
    series: &ObservedSeries,
    start: Option<f64>,
    end: Option<f64>,
    min_samples: usize,
) -> Result<ObservedSeries, AppError> {
    let lo = start.unwrap_or(f64::NEG_INFINITY);
    let hi = end.unwrap_or(f64::INFINITY);

    let kept: Vec<(f64, f64)> = series
        .time()
        .iter()
        .zip(series.strain())
        .filter(|(t, _)| **t >= lo && **t <= hi)
        .map(|(&t, &h)| (t, h))
        .collect();

    let required = min_samples.max(2);
    if kept.len() < required {
        return Err(AppError::WindowTooShort {
            samples: kept.len(),
            required,
        });
    }

    // Window-relative axis rebuilt from the sample index.
    let dt = series.dt();
    let time = (0..kept.len()).map(|i| i as f64 * dt).collect();
    let strain = kept.iter().map(|&(_, h)| h).collect();
    ObservedSeries::new(time, strain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize, t_start: f64) -> ObservedSeries {
        let t = (0..n).map(|i| t_start + i as f64 / 1024.0).collect();
        let h = (0..n).map(|i| i as f64).collect();
        ObservedSeries::new(t, h).unwrap()
    }

    #[test]
    fn window_recentres_time() {
        let s = series(1024, 100.0);
        let w = select_window(&s, Some(100.25), Some(100.5), 10).unwrap();
        assert_eq!(w.time()[0], 0.0);
        assert_eq!(w.strain()[0], 256.0);
        assert_eq!(w.len(), 257);
        assert!((w.sample_rate() - 1024.0).abs() < 1e-9);
    }

    #[test]
    fn open_window_keeps_everything() {
        let s = series(64, 5.0);
        let w = select_window(&s, None, None, 10).unwrap();
        assert_eq!(w.len(), 64);
        assert_eq!(w.strain(), s.strain());
    }

    #[test]
    fn too_few_samples_is_window_too_short() {
        let s = series(64, 0.0);
        let err = select_window(&s, Some(0.0), Some(4.0 / 1024.0), 10).unwrap_err();
        assert_eq!(
            err,
            AppError::WindowTooShort {
                samples: 5,
                required: 10
            }
        );

        let short = series(6, 0.0);
        assert!(matches!(
            select_window(&short, None, None, 10),
            Err(AppError::WindowTooShort { .. })
        ));
    }
}
