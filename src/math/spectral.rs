//! Dominant-frequency estimate from the magnitude spectrum.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Frequency (Hz) of the largest-magnitude FFT bin within `[fmin, fmax]`.
///
/// Returns `None` when the band contains no bins (e.g. too short a series).
pub fn peak_frequency(signal: &[f64], sample_rate: f64, fmin: f64, fmax: f64) -> Option<f64> {
    let n = signal.len();
    if n < 2 || !(sample_rate.is_finite() && sample_rate > 0.0) {
        return None;
    }

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    let df = sample_rate / n as f64;
    let mut best: Option<(f64, f64)> = None;
    // Real input: bins 0..=n/2 cover [0, Nyquist].
    for (k, c) in buffer.iter().enumerate().take(n / 2 + 1) {
        let f = k as f64 * df;
        if f < fmin || f > fmax {
            continue;
        }
        let mag = c.norm();
        if best.is_none_or(|(_, m)| mag > m) {
            best = Some((f, mag));
        }
    }
    best.map(|(f, _)| f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tone_frequency() {
        let fs = 1024.0;
        let n = 1024;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 100.0 * i as f64 / fs).sin())
            .collect();
        let f = peak_frequency(&signal, fs, 20.0, 400.0).unwrap();
        assert!((f - 100.0).abs() <= 1.0, "f={f}");
    }

    #[test]
    fn empty_band_is_none() {
        let signal = vec![0.0; 16];
        assert_eq!(peak_frequency(&signal, 16.0, 100.0, 200.0), None);
    }
}
