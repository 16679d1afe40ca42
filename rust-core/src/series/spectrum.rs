//! One-sided spectrum and the scalar features read off it

use ndarray::{Array1, Ix1};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

use super::windowed::{band_window, Windowed, WindowedSeries};
use crate::error::{Result, SeriesError};
use crate::filters::{box_kernel, convolve_same};
use crate::transform::{lifter_spectrum, LifterMode};

/// Weighting used by [`SpectrumSeries::spectral_centroid`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidMode {
    /// Weights are `20 * log10(amplitude)`
    Log,
    /// Weights are `amplitude²`
    Linear,
}

impl FromStr for CentroidMode {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "log" => Ok(CentroidMode::Log),
            "linear" => Ok(CentroidMode::Linear),
            other => Err(SeriesError::InvalidArgument(format!(
                "unknown centroid mode '{other}' (expected log or linear)"
            ))),
        }
    }
}

impl fmt::Display for CentroidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentroidMode::Log => f.write_str("log"),
            CentroidMode::Linear => f.write_str("linear"),
        }
    }
}

/// Least-squares line `y = slope * x + intercept`
///
/// Returns `(0.0, 0.0)` when fewer than two points are given or every `x`
/// is the same.
pub fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n < 2 {
        return (0.0, 0.0);
    }
    let count = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / count;
    let mean_y = y[..n].iter().sum::<f64>() / count;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (&xi, &yi) in x[..n].iter().zip(&y[..n]) {
        sxy += (xi - mean_x) * (yi - mean_y);
        sxx += (xi - mean_x) * (xi - mean_x);
    }
    if sxx == 0.0 {
        return (0.0, 0.0);
    }
    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

/// Frequency-domain values (DC to Nyquist) over a frequency axis in Hz
///
/// Values are stored complex; magnitude-only spectra (time averages,
/// liftered envelopes) carry a zero imaginary part.
#[derive(Debug, Clone)]
pub struct SpectrumSeries {
    series: WindowedSeries<Complex64, Ix1>,
    name: Option<String>,
}

impl SpectrumSeries {
    pub fn new(data: Array1<Complex64>, freqs: Array1<f64>, sample_rate: f64) -> Result<Self> {
        Ok(Self {
            series: WindowedSeries::new(data, freqs, sample_rate)?,
            name: None,
        })
    }

    /// Spectrum from real magnitudes
    pub fn from_magnitudes(
        data: Array1<f64>,
        freqs: Array1<f64>,
        sample_rate: f64,
    ) -> Result<Self> {
        Self::new(data.mapv(|v| Complex64::new(v, 0.0)), freqs, sample_rate)
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Restrict the view to bins with `f1 < freq <= f2` (Hz)
    ///
    /// Bounds resolve against the full frequency axis, so repeated slicing
    /// does not compound.
    pub fn slice_freq_hz(&mut self, f1: f64, f2: f64) -> Result<&mut Self> {
        let window = band_window(self.series.full_x_axis(), f1, f2)?;
        self.slice_by_sample(window.start, window.end)
    }

    /// [`slice_freq_hz`](Self::slice_freq_hz) with bounds in kHz
    pub fn slice_freq_khz(&mut self, f1: f64, f2: f64) -> Result<&mut Self> {
        self.slice_freq_hz(f1 * 1000.0, f2 * 1000.0)
    }

    /// Cepstrally lifter the amplitude inside the view
    ///
    /// # Arguments
    /// * `lifter` - Lifter order L
    /// * `mode` - `Low` keeps the envelope, `High` the fine structure
    ///
    /// # Returns
    /// A new magnitude spectrum over the view's frequency axis
    pub fn liftering(&self, lifter: usize, mode: LifterMode) -> Result<SpectrumSeries> {
        let amplitude = self.amplitude().to_vec();
        let liftered = lifter_spectrum(&amplitude, lifter, mode)?;
        Ok(
            Self::from_magnitudes(Array1::from(liftered), self.x_axis(), self.sample_rate())?
                .with_name(self.name.clone()),
        )
    }

    /// Weighted mean frequency of the view: `Σ(w · f) / Σ(w)`
    ///
    /// `Log` weights by log power, `Linear` by power. NaN if the weights
    /// sum to zero.
    pub fn spectral_centroid(&self, mode: CentroidMode) -> f64 {
        let weights = match mode {
            CentroidMode::Log => self.log_power(),
            CentroidMode::Linear => self.power(),
        };
        let freqs = self.x_axis();
        (&weights * &freqs).sum() / weights.sum()
    }

    /// Mean power of bins with `f1 < freq < f2` inside the view, in dB
    pub fn band_power(&self, f1: f64, f2: f64) -> Result<f64> {
        if !(f1 < f2) {
            return Err(SeriesError::FrequencyRange { low: f1, high: f2 });
        }
        let power = self.power();
        let in_band: Vec<f64> = self
            .x_axis()
            .iter()
            .zip(power.iter())
            .filter(|(&f, _)| f > f1 && f < f2)
            .map(|(_, &p)| p)
            .collect();
        if in_band.is_empty() {
            return Err(SeriesError::FrequencyRange { low: f1, high: f2 });
        }
        let mean = in_band.iter().sum::<f64>() / in_band.len() as f64;
        Ok(10.0 * mean.log10())
    }

    /// Box-filter the amplitude of the view with `taps` taps
    ///
    /// The first bin is zeroed first so the DC term does not bleed into
    /// the low bins.
    pub fn moving_average(&self, taps: usize) -> Result<SpectrumSeries> {
        let mut amplitude = self.amplitude().to_vec();
        if taps == 0 || taps > amplitude.len() {
            return Err(SeriesError::InvalidArgument(format!(
                "moving average of {taps} taps over {} bins",
                amplitude.len()
            )));
        }
        amplitude[0] = 0.0;

        let smoothed = convolve_same(&amplitude, &box_kernel(taps));
        Ok(
            Self::from_magnitudes(Array1::from(smoothed), self.x_axis(), self.sample_rate())?
                .with_name(self.name.clone()),
        )
    }

    /// Population variance of the amplitude inside the view
    pub fn variance(&self) -> f64 {
        let amplitude = self.amplitude();
        let mean = amplitude.mean().unwrap_or(0.0);
        amplitude.mapv(|a| (a - mean) * (a - mean)).mean().unwrap_or(0.0)
    }

    /// Least-squares fit of log power against frequency, as `(slope, intercept)`
    ///
    /// Slope is in dB per Hz; `(0.0, 0.0)` if the view has a single bin.
    pub fn spectral_slope(&self) -> (f64, f64) {
        let freqs = self.x_axis().to_vec();
        let levels = self.log_power().to_vec();
        linear_fit(&freqs, &levels)
    }
}

impl Windowed for SpectrumSeries {
    type Elem = Complex64;
    type Dim = Ix1;

    fn series(&self) -> &WindowedSeries<Complex64, Ix1> {
        &self.series
    }

    fn series_mut(&mut self) -> &mut WindowedSeries<Complex64, Ix1> {
        &mut self.series
    }
}

impl fmt::Display for SpectrumSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let freqs = self.x_axis();
        write!(
            f,
            "Spectrum {}: {} bins, {:.1}-{:.1} Hz",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.len(),
            freqs[0],
            freqs[freqs.len() - 1]
        )
    }
}
