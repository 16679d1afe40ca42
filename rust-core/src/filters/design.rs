//! FIR kernel design using the windowing method
//!
//! Produces kernels for [`SignalSeries::fir_filter`](crate::series::SignalSeries::fir_filter).
//! Cutoffs are given in Hz and normalized against the sample rate.

use super::windows::{generate_window, WindowType};
use crate::error::{Result, SeriesError};
use std::f64::consts::PI;

/// Validate tap count and cutoff, returning the cutoff in rad/sample
fn normalized_cutoff(taps: usize, cutoff_hz: f64, sample_rate: f64) -> Result<f64> {
    if taps == 0 || taps % 2 == 0 {
        return Err(SeriesError::InvalidArgument(format!(
            "FIR tap count must be odd and non-zero, got {taps}"
        )));
    }
    let nyquist = sample_rate / 2.0;
    if !(cutoff_hz > 0.0 && cutoff_hz < nyquist) {
        return Err(SeriesError::InvalidArgument(format!(
            "cutoff {cutoff_hz} Hz must lie strictly between 0 and {nyquist} Hz"
        )));
    }
    Ok(2.0 * PI * cutoff_hz / sample_rate)
}

/// Ideal lowpass impulse response sin(wc*n)/(π*n), centered
fn ideal_lowpass(n_shifted: f64, wc: f64) -> f64 {
    if n_shifted.abs() < 1e-10 {
        wc / PI
    } else {
        (wc * n_shifted).sin() / (PI * n_shifted)
    }
}

fn windowed<F>(taps: usize, window_type: WindowType, ideal: F) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let window = generate_window(window_type, taps);
    let center = (taps - 1) as f64 / 2.0;

    window
        .iter()
        .enumerate()
        .map(|(n, w)| ideal(n as f64 - center) * w)
        .collect()
}

/// Design a lowpass FIR kernel
///
/// # Arguments
/// * `taps` - Kernel length (odd, Type I linear phase)
/// * `cutoff_hz` - -6 dB cutoff frequency
/// * `sample_rate` - Sample rate in Hz
/// * `window_type` - Window applied to the ideal response
pub fn design_lowpass(
    taps: usize,
    cutoff_hz: f64,
    sample_rate: f64,
    window_type: WindowType,
) -> Result<Vec<f64>> {
    let wc = normalized_cutoff(taps, cutoff_hz, sample_rate)?;
    Ok(windowed(taps, window_type, |n| ideal_lowpass(n, wc)))
}

/// Design a highpass FIR kernel (spectral inversion of the lowpass)
pub fn design_highpass(
    taps: usize,
    cutoff_hz: f64,
    sample_rate: f64,
    window_type: WindowType,
) -> Result<Vec<f64>> {
    let wc = normalized_cutoff(taps, cutoff_hz, sample_rate)?;
    Ok(windowed(taps, window_type, |n| {
        // δ[n] - lowpass
        let delta = if n.abs() < 1e-10 { 1.0 } else { 0.0 };
        delta - ideal_lowpass(n, wc)
    }))
}

/// Design a bandpass FIR kernel passing `low_hz..high_hz`
pub fn design_bandpass(
    taps: usize,
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
    window_type: WindowType,
) -> Result<Vec<f64>> {
    if low_hz >= high_hz {
        return Err(SeriesError::FrequencyRange {
            low: low_hz,
            high: high_hz,
        });
    }
    let wc1 = normalized_cutoff(taps, low_hz, sample_rate)?;
    let wc2 = normalized_cutoff(taps, high_hz, sample_rate)?;
    Ok(windowed(taps, window_type, |n| {
        ideal_lowpass(n, wc2) - ideal_lowpass(n, wc1)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric(h: &[f64]) {
        for i in 0..h.len() / 2 {
            assert!((h[i] - h[h.len() - 1 - i]).abs() < 1e-10, "asymmetric at {i}");
        }
    }

    #[test]
    fn test_lowpass_design() {
        let h = design_lowpass(101, 1000.0, 44100.0, WindowType::Hamming).unwrap();
        assert_eq!(h.len(), 101);
        assert_symmetric(&h);

        // DC gain close to 1
        let sum: f64 = h.iter().sum();
        assert!((sum - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_highpass_design() {
        let h = design_highpass(101, 1000.0, 44100.0, WindowType::Hamming).unwrap();
        assert_symmetric(&h);

        // DC is blocked
        let sum: f64 = h.iter().sum();
        assert!(sum.abs() < 0.05);
    }

    #[test]
    fn test_bandpass_design() {
        let h = design_bandpass(161, 1000.0, 4500.0, 44100.0, WindowType::Hamming).unwrap();
        assert_symmetric(&h);
        let sum: f64 = h.iter().sum();
        assert!(sum.abs() < 0.1, "DC gain too large: {sum}");
    }

    #[test]
    fn test_invalid_designs() {
        assert!(design_lowpass(100, 1000.0, 44100.0, WindowType::Hann).is_err());
        assert!(design_lowpass(101, 30000.0, 44100.0, WindowType::Hann).is_err());
        assert!(matches!(
            design_bandpass(101, 4000.0, 1000.0, 44100.0, WindowType::Hann),
            Err(SeriesError::FrequencyRange { .. })
        ));
    }
}
