//! Cepstral liftering of one-sided magnitude spectra
//!
//! One-sided spectra have no negative-frequency half, so each row is mirrored
//! before the cepstrum is taken. After the lifter mask is applied the
//! spectrum is rebuilt and the mirror discarded again.

use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

use super::fft::{fft_in_place, ifft_in_place};
use crate::error::{Result, SeriesError};
use crate::series::AMPLITUDE_FLOOR;

/// Which part of the cepstrum the lifter keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifterMode {
    /// Keep the first and last `L` quefrencies (spectral envelope)
    Low,
    /// Zero the first and last `L` quefrencies (fine structure)
    High,
}

impl FromStr for LifterMode {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(LifterMode::Low),
            "high" => Ok(LifterMode::High),
            other => Err(SeriesError::InvalidArgument(format!(
                "unknown lifter mode '{other}' (expected low or high)"
            ))),
        }
    }
}

impl fmt::Display for LifterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifterMode::Low => f.write_str("low"),
            LifterMode::High => f.write_str("high"),
        }
    }
}

/// Lifter mask of `width` quefrency bins for order `lifter`
///
/// `Low` is 1 on the first and last `lifter` bins and 0 in between; `High` is
/// its exact complement.
pub fn lifter_mask(lifter: usize, width: usize, mode: LifterMode) -> Result<Array1<f64>> {
    if lifter > width / 2 {
        return Err(SeriesError::InvalidArgument(format!(
            "lifter order {lifter} exceeds half of {width} quefrency bins"
        )));
    }

    let (edge, middle) = match mode {
        LifterMode::Low => (1.0, 0.0),
        LifterMode::High => (0.0, 1.0),
    };

    Ok(Array1::from_shape_fn(width, |i| {
        if i < lifter || i >= width - lifter {
            edge
        } else {
            middle
        }
    }))
}

/// Lifter a single one-sided row, returning magnitudes of the same width
fn lifter_row(row: &[f64], mask: &Array1<f64>) -> Vec<f64> {
    let width = row.len();

    // Mirror fold: [x, reverse(x)]
    let folded = row.iter().chain(row.iter().rev());

    // Real cepstrum of the log magnitude
    let mut cepstrum: Vec<Complex64> = folded
        .map(|&x| Complex64::new(x.abs().max(AMPLITUDE_FLOOR).ln(), 0.0))
        .collect();
    ifft_in_place(&mut cepstrum);

    let mut liftered: Vec<Complex64> = cepstrum
        .iter()
        .zip(mask.iter())
        .map(|(c, &w)| Complex64::new(c.re * w, 0.0))
        .collect();

    // Back to a magnitude spectrum: |exp(FFT(c))|
    fft_in_place(&mut liftered);
    liftered
        .iter()
        .take(width)
        .map(|c| c.exp().norm())
        .collect()
}

/// Lifter each row of a one-sided magnitude spectrogram
///
/// # Arguments
/// * `spectra` - Magnitudes `[rows, bins]`, one spectrum per row
/// * `lifter` - Lifter order L
/// * `mode` - Keep the low (`Low`) or high (`High`) quefrencies
///
/// # Returns
/// Smoothed (or detail) magnitudes with the same shape as the input
pub fn lifter_rows(spectra: &Array2<f64>, lifter: usize, mode: LifterMode) -> Result<Array2<f64>> {
    let (rows, bins) = spectra.dim();
    if bins == 0 {
        return Err(SeriesError::Shape("cannot lifter an empty spectrum".into()));
    }
    let mask = lifter_mask(lifter, 2 * bins, mode)?;

    let mut output = Array2::<f64>::zeros((rows, bins));
    for (src, mut dst) in spectra.axis_iter(Axis(0)).zip(output.axis_iter_mut(Axis(0))) {
        let row = src.to_vec();
        for (d, v) in dst.iter_mut().zip(lifter_row(&row, &mask)) {
            *d = v;
        }
    }

    Ok(output)
}

/// Lifter a single one-sided magnitude spectrum
pub fn lifter_spectrum(spectrum: &[f64], lifter: usize, mode: LifterMode) -> Result<Vec<f64>> {
    let rows = Array2::from_shape_vec((1, spectrum.len()), spectrum.to_vec())
        .map_err(|e| SeriesError::Shape(e.to_string()))?;
    let liftered = lifter_rows(&rows, lifter, mode)?;
    Ok(liftered.row(0).to_vec())
}
