//! FFT primitives
//!
//! Real-input forward transforms go through realfft; full complex transforms
//! (cepstrum, STFT frames, iSTFT) go through rustfft. Inverse transforms are
//! scaled by 1/N so that `ifft(fft(x)) == x`.

use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::FftPlanner;
use std::sync::Arc;

use crate::error::{Result, SeriesError};
use crate::filters::WindowType;

/// Whole-signal FFT configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FftConfig {
    /// Analysis window applied over the whole signal before padding
    pub window: WindowType,

    /// Transform length; `None` uses the signal length
    pub nfft: Option<usize>,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            window: WindowType::Hann,
            nfft: None,
        }
    }
}

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        Self { fft_size, r2c }
    }

    /// Forward transform of a real signal
    ///
    /// The signal is zero-padded or truncated to `fft_size`.
    ///
    /// # Returns
    /// Complex spectrum X[k] for k = 0..=fft_size/2
    pub fn forward(&self, signal: &[f64]) -> Result<Vec<Complex64>> {
        let mut input = self.r2c.make_input_vec();
        let copy_len = signal.len().min(self.fft_size);
        input[..copy_len].copy_from_slice(&signal[..copy_len]);

        let mut output = self.r2c.make_output_vec();
        self.r2c
            .process(&mut input, &mut output)
            .map_err(|e| SeriesError::Transform(e.to_string()))?;

        Ok(output)
    }
}

/// Sample frequencies of an `n`-point DFT, in the order FFT outputs them
///
/// Non-negative frequencies first, then the negative half:
/// `[0, 1, ..., (n-1)/2, -(n/2), ..., -1] * fs / n`.
pub fn fft_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    let step = sample_rate / n as f64;
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * step
            } else {
                (k as f64 - n as f64) * step
            }
        })
        .collect()
}

/// In-place forward complex FFT
pub fn fft_in_place(buffer: &mut [Complex64]) {
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buffer.len()).process(buffer);
}

/// In-place inverse complex FFT, scaled by 1/N
pub fn ifft_in_place(buffer: &mut [Complex64]) {
    let n = buffer.len();
    if n == 0 {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(n).process(buffer);

    let scale = 1.0 / n as f64;
    for value in buffer.iter_mut() {
        *value *= scale;
    }
}

/// Forward complex FFT of a real sequence
pub fn fft_real(signal: &[f64]) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft_in_place(&mut buffer);
    buffer
}
