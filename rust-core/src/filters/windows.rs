//! Analysis window functions
//!
//! Symmetric windows (`M - 1` in the denominator), matching the usual
//! `hanning(M)` / `hamming(M)` definitions used for spectral analysis.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SeriesError;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Rectangular ("square") window, i.e. no weighting
    Rectangular,
}

impl WindowType {
    /// Name accepted by [`FromStr`] for this window
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hanning",
            WindowType::Hamming => "hamming",
            WindowType::Rectangular => "square",
        }
    }
}

impl FromStr for WindowType {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hanning" | "hann" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "square" | "rectangular" => Ok(WindowType::Rectangular),
            other => Err(SeriesError::InvalidArgument(format!(
                "unknown window '{other}' (expected hanning, hamming or square)"
            ))),
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    // A single-point window is 1.0 for every type (M - 1 would be zero)
    if length == 1 {
        return vec![1.0];
    }

    let denom = (length as f64) - 1.0;
    let cosine = |a0: f64, a1: f64| -> Vec<f64> {
        (0..length)
            .map(|n| a0 - a1 * (2.0 * PI * n as f64 / denom).cos())
            .collect()
    };

    match window_type {
        WindowType::Hann => cosine(0.5, 0.5),
        WindowType::Hamming => cosine(0.54, 0.46),
        WindowType::Rectangular => vec![1.0; length],
    }
}

/// Multiply `signal` by a window of the same length
pub fn apply_window(signal: &[f64], window_type: WindowType) -> Vec<f64> {
    let window = generate_window(window_type, signal.len());

    signal
        .iter()
        .zip(window.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);

        assert_eq!(hann.len(), length);
        assert_eq!(hamming.len(), length);

        // Symmetric
        assert!((hann[0] - hann[length - 1]).abs() < 1e-10);
        assert!((hamming[0] - hamming[length - 1]).abs() < 1e-10);

        // Peak of 1.0 at the center for odd lengths
        let center = length / 2;
        assert!((hann[center] - 1.0).abs() < 1e-10);
        assert!((hamming[center] - 1.0).abs() < 1e-10);

        // Hann reaches zero at the edges, Hamming stays at 0.08
        assert!(hann[0].abs() < 1e-12);
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Hamming, 1), vec![1.0]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hanning".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!("Hamming".parse::<WindowType>().unwrap(), WindowType::Hamming);
        assert_eq!("square".parse::<WindowType>().unwrap(), WindowType::Rectangular);
        assert!(matches!(
            "blackman".parse::<WindowType>(),
            Err(SeriesError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_apply_window() {
        let windowed = apply_window(&vec![1.0; 101], WindowType::Hamming);
        assert!((windowed[50] - 1.0).abs() < 1e-10);
        assert!(windowed[0] < 0.1);
    }
}
