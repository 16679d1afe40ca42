//! Gabor wavelet transform
//!
//! A bank of complex Gabor atoms, one per linearly spaced analysis frequency,
//! each convolved with the whole signal. Atoms are cropped to the region where
//! their Gaussian envelope exceeds a cutoff so that long (low-frequency) atoms
//! only cost what they contribute.
//!
//! The transform is a direct convolution: O(channels · N · support).

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SeriesError};
use crate::filters::convolve_same;

/// GWT configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GwtConfig {
    /// Number of analysis frequencies (columns of the output)
    pub channels: usize,

    /// Lower end of the frequency grid in Hz (the grid point itself is skipped)
    pub f_min: f64,

    /// Upper end of the frequency grid in Hz; `None` means Nyquist
    pub f_max: Option<f64>,

    /// Gaussian shape parameter σ
    pub sigma: f64,

    /// Envelope cutoff Vc used to truncate each atom
    pub cutoff: f64,
}

impl Default for GwtConfig {
    fn default() -> Self {
        Self {
            channels: 512,
            f_min: 0.0,
            f_max: None,
            sigma: 5.0,
            cutoff: 1e-5,
        }
    }
}

/// Output of [`gabor_wavelet_transform`]
#[derive(Debug, Clone)]
pub struct GwtResult {
    /// Complex coefficients `[N, channels]`
    pub coefficients: Array2<Complex64>,

    /// Time axis `linspace(0, N/fs, N)` in seconds
    pub times: Array1<f64>,

    /// Analysis frequencies in Hz
    pub frequencies: Array1<f64>,
}

/// Analysis frequencies: `channels + 1` points from `f_min` to `f_max`, first dropped
pub fn analysis_frequencies(channels: usize, f_min: f64, f_max: f64) -> Array1<f64> {
    let grid = Array1::linspace(f_min, f_max, channels + 1);
    grid.slice(ndarray::s![1..]).to_owned()
}

/// Gabor atom ψ(t) centered at `b` with scale `a`
fn gabor_atom(times: &Array1<f64>, a: f64, b: f64, sigma: f64) -> Vec<Complex64> {
    let norm = 1.0 / (2.0 * (PI * sigma).sqrt());
    times
        .iter()
        .map(|&t| {
            let x = (t - b) / a;
            let envelope = norm * (-(x * x) / (4.0 * sigma * sigma)).exp();
            Complex64::from_polar(envelope, 2.0 * PI * x)
        })
        .collect()
}

/// Number of samples over which an atom of scale `a` exceeds `cutoff`
fn support_samples(a: f64, sigma: f64, cutoff: f64, sample_rate: f64) -> f64 {
    (a * sigma * (-2.0 * cutoff.ln()).sqrt() * sample_rate).floor()
}

/// Crop `atom` to `support` samples centered on index `N/2`
fn truncate_atom(atom: Vec<Complex64>, support: f64) -> Vec<Complex64> {
    let n = atom.len();
    if support >= n as f64 {
        return atom;
    }
    let half = (n / 2) as f64;
    let start = (half - support / 2.0).floor().max(0.0) as usize;
    let end = ((half + support / 2.0).floor() as usize).min(n);
    if start >= end {
        return Vec::new();
    }
    atom[start..end].to_vec()
}

/// Convolve one channel's atom with the signal
fn analyze_channel(
    signal: &[f64],
    times: &Array1<f64>,
    frequency: f64,
    sample_rate: f64,
    config: &GwtConfig,
) -> Vec<Complex64> {
    let n = signal.len();
    let a = 1.0 / frequency;
    let b = n as f64 / (2.0 * sample_rate);

    let atom = gabor_atom(times, a, b, config.sigma);
    let support = support_samples(a, config.sigma, config.cutoff, sample_rate);
    let atom = truncate_atom(atom, support);

    let scale = 1.0 / a.sqrt();
    convolve_same(signal, &atom)
        .into_iter()
        .map(|c| c * scale)
        .collect()
}

fn validate(signal: &[f64], sample_rate: f64, config: &GwtConfig, f_max: f64) -> Result<()> {
    if signal.is_empty() {
        return Err(SeriesError::Shape("GWT input signal is empty".into()));
    }
    if !(sample_rate > 0.0) {
        return Err(SeriesError::InvalidArgument(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }
    if config.channels == 0 {
        return Err(SeriesError::InvalidArgument("GWT needs at least one channel".into()));
    }
    if !(config.f_min >= 0.0) || !(f_max > config.f_min) {
        return Err(SeriesError::FrequencyRange {
            low: config.f_min,
            high: f_max,
        });
    }
    if !(config.sigma > 0.0) || !(config.cutoff > 0.0 && config.cutoff < 1.0) {
        return Err(SeriesError::InvalidArgument(format!(
            "sigma must be positive and cutoff in (0, 1), got sigma={} cutoff={}",
            config.sigma, config.cutoff
        )));
    }
    Ok(())
}

/// Gabor wavelet transform of a real signal
///
/// # Arguments
/// * `signal` - Input samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Channel count, frequency range and atom shape
///
/// # Returns
/// Coefficients `[N, channels]` with the matching time and frequency axes
pub fn gabor_wavelet_transform(
    signal: &[f64],
    sample_rate: f64,
    config: &GwtConfig,
) -> Result<GwtResult> {
    let f_max = config.f_max.unwrap_or(sample_rate / 2.0);
    validate(signal, sample_rate, config, f_max)?;

    let started = Instant::now();
    let n = signal.len();
    let times = Array1::linspace(0.0, n as f64 / sample_rate, n);
    let frequencies = analysis_frequencies(config.channels, config.f_min, f_max);

    log::debug!(
        "GWT: f_min={} f_max={} channels={} Vc={} sigma={} f[0]={} f[-1]={}",
        config.f_min,
        f_max,
        config.channels,
        config.cutoff,
        config.sigma,
        frequencies[0],
        frequencies[frequencies.len() - 1]
    );

    let channel = |&f: &f64| analyze_channel(signal, &times, f, sample_rate, config);

    #[cfg(feature = "parallel")]
    let columns: Vec<Vec<Complex64>> = frequencies.to_vec().par_iter().map(channel).collect();
    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Vec<Complex64>> = frequencies.iter().map(channel).collect();

    let mut coefficients = Array2::<Complex64>::zeros((n, config.channels));
    for (col, values) in columns.iter().enumerate() {
        for (row, &value) in values.iter().take(n).enumerate() {
            coefficients[[row, col]] = value;
        }
    }

    log::debug!(
        "GWT finished: spectrum <{}, {}> in {:?}",
        n,
        config.channels,
        started.elapsed()
    );

    Ok(GwtResult {
        coefficients,
        times,
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f64 = 8000.0;

    fn tone(freq: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / FS).sin())
            .collect()
    }

    #[test]
    fn test_output_shape() {
        let config = GwtConfig {
            channels: 24,
            ..GwtConfig::default()
        };
        let result = gabor_wavelet_transform(&tone(500.0, 300), FS, &config).unwrap();

        assert_eq!(result.coefficients.dim(), (300, 24));
        assert_eq!(result.times.len(), 300);
        assert_eq!(result.frequencies.len(), 24);
    }

    #[test]
    fn test_frequency_grid_skips_first_point() {
        let freqs = analysis_frequencies(4, 0.0, 4000.0);
        assert_eq!(freqs.to_vec(), vec![1000.0, 2000.0, 3000.0, 4000.0]);
    }

    #[test]
    fn test_time_axis_spans_duration() {
        let result = gabor_wavelet_transform(
            &tone(500.0, 80),
            FS,
            &GwtConfig {
                channels: 4,
                ..GwtConfig::default()
            },
        )
        .unwrap();
        assert_eq!(result.times[0], 0.0);
        assert!((result.times[79] - 80.0 / FS).abs() < 1e-12);
    }

    #[test]
    fn test_tone_peaks_at_its_channel() {
        // 16 channels over 0..4000 Hz => 250 Hz spacing, 1000 Hz is channel 3
        let config = GwtConfig {
            channels: 16,
            ..GwtConfig::default()
        };
        let result = gabor_wavelet_transform(&tone(1000.0, 800), FS, &config).unwrap();

        let center = 400;
        let energies: Vec<f64> = (0..16)
            .map(|c| result.coefficients[[center, c]].norm())
            .collect();
        let peak = energies
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak, 3);
    }

    /// Direct evaluation of one channel: full atom, centered crop, full
    /// convolution, centered slice of length N, then the `1/√a` scale
    fn direct_channel(signal: &[f64], frequency: f64, config: &GwtConfig) -> Vec<Complex64> {
        let n = signal.len();
        let a = 1.0 / frequency;
        let b = n as f64 / (2.0 * FS);
        let dt = (n as f64 / FS) / (n - 1) as f64;
        let norm = 1.0 / (2.0 * (PI * config.sigma).sqrt());

        let atom: Vec<Complex64> = (0..n)
            .map(|k| {
                let x = (k as f64 * dt - b) / a;
                let envelope = norm * (-(x * x) / (4.0 * config.sigma * config.sigma)).exp();
                Complex64::new(envelope * (2.0 * PI * x).cos(), envelope * (2.0 * PI * x).sin())
            })
            .collect();

        let support = (a * config.sigma * (-2.0 * config.cutoff.ln()).sqrt() * FS).floor();
        let atom = if support < n as f64 {
            let start = (n as f64 / 2.0 - support / 2.0).floor() as usize;
            let end = (n as f64 / 2.0 + support / 2.0).floor() as usize;
            atom[start..end].to_vec()
        } else {
            atom
        };

        let m = atom.len();
        let mut full = vec![Complex64::new(0.0, 0.0); n + m - 1];
        for (i, &x) in signal.iter().enumerate() {
            for (j, &h) in atom.iter().enumerate() {
                full[i + j] += h * x;
            }
        }
        let offset = (n.min(m) - 1) / 2;
        full[offset..offset + n]
            .iter()
            .map(|&c| c / a.sqrt())
            .collect()
    }

    #[test]
    fn test_coefficients_match_direct_evaluation() {
        // 600 Hz atoms outlast the signal, the higher channels are cropped
        let config = GwtConfig {
            channels: 4,
            f_max: Some(2400.0),
            ..GwtConfig::default()
        };
        let signal: Vec<f64> = (0..300)
            .map(|n| {
                let t = n as f64 / FS;
                (-t * 200.0).exp() * (2.0 * PI * 1500.0 * t).sin()
                    + 0.3 * (2.0 * PI * 700.0 * t).cos()
            })
            .collect();
        let result = gabor_wavelet_transform(&signal, FS, &config).unwrap();
        assert_eq!(result.frequencies.to_vec(), vec![600.0, 1200.0, 1800.0, 2400.0]);

        for (col, &f) in result.frequencies.iter().enumerate() {
            let expected = direct_channel(&signal, f, &config);
            for (row, &want) in expected.iter().enumerate() {
                let got = result.coefficients[[row, col]];
                let err = (got - want).norm();
                assert!(
                    err <= 1e-9 * want.norm().max(1.0),
                    "channel {f} Hz, row {row}: {got} vs {want}"
                );
            }
        }
    }

    #[test]
    fn test_support_truncation() {
        // High frequencies have short atoms
        let support = support_samples(1.0 / 4000.0, 5.0, 1e-5, FS);
        assert!(support < 100.0);

        let atom = vec![Complex64::new(1.0, 0.0); 100];
        let cropped = truncate_atom(atom.clone(), 10.0);
        assert_eq!(cropped.len(), 10);
        assert_eq!(truncate_atom(atom, 500.0).len(), 100);
    }

    #[test]
    fn test_invalid_configs() {
        let signal = tone(500.0, 64);
        let bad_range = GwtConfig {
            f_min: 3000.0,
            f_max: Some(1000.0),
            ..GwtConfig::default()
        };
        assert!(matches!(
            gabor_wavelet_transform(&signal, FS, &bad_range),
            Err(SeriesError::FrequencyRange { .. })
        ));

        let no_channels = GwtConfig {
            channels: 0,
            ..GwtConfig::default()
        };
        assert!(gabor_wavelet_transform(&signal, FS, &no_channels).is_err());
        assert!(gabor_wavelet_transform(&[], FS, &GwtConfig::default()).is_err());
    }
}
