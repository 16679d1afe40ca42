//! Short-time Fourier transform and overlap-add inverse

use ndarray::Array2;
use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::fft::{fft_real, ifft_in_place};
use crate::error::{Result, SeriesError};
use crate::filters::WindowType;

/// STFT configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StftConfig {
    /// Window (and FFT) length in samples
    pub window_length: usize,

    /// Hop between frame starts in samples
    pub hop_size: usize,

    /// Analysis window
    pub window: WindowType,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            window_length: 256,
            hop_size: 128,
            window: WindowType::Hamming,
        }
    }
}

/// Number of frames produced for a signal of `signal_len` samples
///
/// `ceil((L - N + hop) / hop) + N - 1`. The trailing `N - 1` frames run into
/// the zero padding.
pub fn frame_count(signal_len: usize, window_len: usize, hop: usize) -> usize {
    let numer = signal_len as f64 - window_len as f64 + hop as f64;
    let hops = (numer / hop as f64).ceil() as i64;
    (hops + window_len as i64 - 1).max(1) as usize
}

fn validate(window: &[f64], hop: usize) -> Result<()> {
    if window.is_empty() {
        return Err(SeriesError::InvalidArgument("STFT window must not be empty".into()));
    }
    if hop == 0 {
        return Err(SeriesError::InvalidArgument("STFT hop size must be non-zero".into()));
    }
    Ok(())
}

/// Forward STFT
///
/// Zero-pads `signal` to `N + (M - 1) * hop` samples and transforms each
/// windowed frame.
///
/// # Returns
/// Complex matrix `[M, N]` with the full two-sided spectrum of each frame
pub fn stft(signal: &[f64], window: &[f64], hop: usize) -> Result<Array2<Complex64>> {
    validate(window, hop)?;

    let n = window.len();
    let m = frame_count(signal.len(), n, hop);

    let mut padded = vec![0.0; n + (m - 1) * hop];
    padded[..signal.len()].copy_from_slice(signal);

    let transform_frame = |frame: usize| -> Vec<Complex64> {
        let start = frame * hop;
        let windowed: Vec<f64> = padded[start..start + n]
            .iter()
            .zip(window.iter())
            .map(|(&x, &w)| x * w)
            .collect();
        fft_real(&windowed)
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<Complex64>> = (0..m).into_par_iter().map(transform_frame).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<Complex64>> = (0..m).map(transform_frame).collect();

    let flat: Vec<Complex64> = rows.into_iter().flatten().collect();
    let frames = Array2::from_shape_vec((m, n), flat)
        .map_err(|e| SeriesError::Shape(e.to_string()))?;

    log::debug!("STFT: {} frames x {} bins (hop {})", m, n, hop);
    Ok(frames)
}

/// Inverse STFT by windowed overlap-add
///
/// Each frame's real inverse transform is multiplied by `window` and summed
/// at offset `m * hop`; the sum is divided by the accumulated `window²`
/// wherever that energy is non-zero. Positions without energy are left as-is.
///
/// # Returns
/// Signal of length `(M - 1) * hop + N`
pub fn istft(frames: &Array2<Complex64>, window: &[f64], hop: usize) -> Result<Vec<f64>> {
    validate(window, hop)?;

    let (m, n) = frames.dim();
    if n != window.len() {
        return Err(SeriesError::Shape(format!(
            "frame length {n} does not match window length {}",
            window.len()
        )));
    }
    if m == 0 {
        return Ok(Vec::new());
    }

    let len = (m - 1) * hop + n;
    let mut output = vec![0.0; len];
    let mut energy = vec![0.0; len];

    for (frame_idx, row) in frames.outer_iter().enumerate() {
        let mut buffer = row.to_vec();
        ifft_in_place(&mut buffer);

        let start = frame_idx * hop;
        for (k, (value, &w)) in buffer.iter().zip(window.iter()).enumerate() {
            output[start + k] += value.re * w;
            energy[start + k] += w * w;
        }
    }

    for (sample, &e) in output.iter_mut().zip(energy.iter()) {
        if e != 0.0 {
            *sample /= e;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::generate_window;
    use std::f64::consts::PI;

    fn chirp(len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| {
                let t = n as f64 / 8000.0;
                (2.0 * PI * (200.0 + 900.0 * t) * t).sin() * 0.7
            })
            .collect()
    }

    #[test]
    fn test_frame_count_formula() {
        // ceil((1024 - 256 + 128) / 128) + 255
        assert_eq!(frame_count(1024, 256, 128), 7 + 255);
    }

    #[test]
    fn test_stft_shape() {
        let window = generate_window(WindowType::Hamming, 256);
        let frames = stft(&chirp(1024), &window, 128).unwrap();
        assert_eq!(frames.dim(), (262, 256));
    }

    #[test]
    fn test_round_trip_hamming() {
        let signal = chirp(1024);
        let window = generate_window(WindowType::Hamming, 256);

        let frames = stft(&signal, &window, 64).unwrap();
        let rebuilt = istft(&frames, &window, 64).unwrap();

        assert!(rebuilt.len() >= signal.len());
        for (i, (&x, &y)) in signal.iter().zip(rebuilt.iter()).enumerate() {
            assert!((x - y).abs() < 1e-9, "sample {i}: {x} vs {y}");
        }
    }

    #[test]
    fn test_round_trip_hann_interior() {
        let signal = chirp(2048);
        let window = generate_window(WindowType::Hann, 512);

        let frames = stft(&signal, &window, 128).unwrap();
        let rebuilt = istft(&frames, &window, 128).unwrap();

        // The very first sample only ever sees the zero-valued window edge
        for i in 1..signal.len() {
            assert!((signal[i] - rebuilt[i]).abs() < 1e-8, "sample {i}");
        }
    }

    #[test]
    fn test_istft_zero_energy_left_untouched() {
        // A window of zeros accumulates no energy anywhere
        let window = vec![0.0; 4];
        let frames = Array2::from_elem((3, 4), Complex64::new(1.0, 0.0));
        let out = istft(&frames, &window, 2).unwrap();
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(stft(&[1.0; 16], &[], 4).is_err());
        assert!(stft(&[1.0; 16], &[1.0; 4], 0).is_err());

        let frames = Array2::from_elem((2, 8), Complex64::new(0.0, 0.0));
        assert!(matches!(
            istft(&frames, &[1.0; 4], 2),
            Err(SeriesError::Shape(_))
        ));
    }
}
