//! Time × frequency representation

use ndarray::{Array1, Array2, Axis, Ix2};
use num_complex::Complex64;
use std::fmt;

use super::spectrum::SpectrumSeries;
use super::windowed::{band_window, Windowed, WindowedSeries};
use crate::error::{Result, SeriesError};

/// Matrix `[time, frequency]` with a time axis (X, seconds) and a frequency
/// axis (Y, Hz)
#[derive(Debug, Clone)]
pub struct SpectrogramSeries {
    series: WindowedSeries<Complex64, Ix2>,
}

impl SpectrogramSeries {
    pub fn new(
        data: Array2<Complex64>,
        times: Array1<f64>,
        freqs: Array1<f64>,
        sample_rate: f64,
    ) -> Result<Self> {
        Ok(Self {
            series: WindowedSeries::new_2d(data, times, freqs, sample_rate)?,
        })
    }

    /// Frequency axis inside the view
    pub fn y_axis(&self) -> Array1<f64> {
        self.series.y_axis()
    }

    /// Restrict the frequency view to columns `[start, end)`
    pub fn slice_y_by_sample(&mut self, start: usize, end: usize) -> Result<&mut Self> {
        self.series.set_view_y(start, end)?;
        Ok(self)
    }

    /// Restrict the frequency view to columns with `f1 < freq <= f2` (Hz)
    pub fn slice_freq_hz(&mut self, f1: f64, f2: f64) -> Result<&mut Self> {
        let window = band_window(self.series.full_y_axis(), f1, f2)?;
        self.slice_y_by_sample(window.start, window.end)
    }

    pub fn slice_freq_khz(&mut self, f1: f64, f2: f64) -> Result<&mut Self> {
        self.slice_freq_hz(f1 * 1000.0, f2 * 1000.0)
    }

    /// Mean amplitude over the rows in view
    ///
    /// # Returns
    /// A magnitude spectrum over the view's frequency axis
    pub fn time_average(&self) -> Result<SpectrumSeries> {
        let averaged = self
            .amplitude()
            .mean_axis(Axis(0))
            .ok_or_else(|| SeriesError::Shape("spectrogram view has no rows".into()))?;
        SpectrumSeries::from_magnitudes(averaged, self.y_axis(), self.sample_rate())
    }
}

impl Windowed for SpectrogramSeries {
    type Elem = Complex64;
    type Dim = Ix2;

    fn series(&self) -> &WindowedSeries<Complex64, Ix2> {
        &self.series
    }

    fn series_mut(&mut self) -> &mut WindowedSeries<Complex64, Ix2> {
        &mut self.series
    }
}

impl fmt::Display for SpectrogramSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let times = self.x_axis();
        let freqs = self.y_axis();
        write!(
            f,
            "Spectrogram <{}, {}>: {:.5}-{:.5} ms, {:.1}-{:.1} Hz",
            times.len(),
            freqs.len(),
            times[0] * 1000.0,
            times[times.len() - 1] * 1000.0,
            freqs[0],
            freqs[freqs.len() - 1]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100 rows at 1 kHz, 10 columns every 100 Hz starting at 100 Hz;
    /// the value is `row + 1` in every column
    fn ramp() -> SpectrogramSeries {
        let data = Array2::from_shape_fn((100, 10), |(r, _)| Complex64::new(r as f64 + 1.0, 0.0));
        let times = Array1::from_iter((0..100).map(|i| i as f64 / 1000.0));
        let freqs = Array1::from_iter((1..=10).map(|i| i as f64 * 100.0));
        SpectrogramSeries::new(data, times, freqs, 1000.0).unwrap()
    }

    #[test]
    fn test_slice_time_and_average() {
        let mut spec = ramp();
        spec.slice_by_time_ms(20.0, 23.0).unwrap();
        assert_eq!(spec.data().dim(), (3, 10));

        // Rows 20, 21 and 22 hold 21, 22 and 23
        let average = spec.time_average().unwrap();
        assert_eq!(average.len(), 10);
        assert!(average.amplitude().iter().all(|&a| (a - 22.0).abs() < 1e-12));
        assert_eq!(average.x_axis(), spec.y_axis());
    }

    #[test]
    fn test_slice_frequency_axis() {
        let mut spec = ramp();
        spec.slice_freq_hz(250.0, 600.0).unwrap();
        assert_eq!(spec.y_axis().to_vec(), vec![300.0, 400.0, 500.0, 600.0]);
        assert_eq!(spec.data().dim(), (100, 4));

        let average = spec.time_average().unwrap();
        assert_eq!(average.len(), 4);

        spec.reset_view();
        assert_eq!(spec.y_axis().len(), 10);
        assert!(spec.slice_freq_khz(0.6, 0.3).is_err());
    }

    #[test]
    fn test_complex_amplitude() {
        let data = Array2::from_elem((2, 2), Complex64::new(3.0, 4.0));
        let spec = SpectrogramSeries::new(
            data,
            Array1::from(vec![0.0, 1.0]),
            Array1::from(vec![1.0, 2.0]),
            1.0,
        )
        .unwrap();
        assert!(spec.amplitude().iter().all(|&a| (a - 5.0).abs() < 1e-12));
        assert!(spec.to_string().starts_with("Spectrogram <2, 2>"));
    }

    #[test]
    fn test_axis_mismatch() {
        let data = Array2::from_elem((3, 2), Complex64::new(1.0, 0.0));
        let result = SpectrogramSeries::new(
            data,
            Array1::from(vec![0.0, 1.0]),
            Array1::from(vec![1.0, 2.0]),
            1.0,
        );
        assert!(matches!(result, Err(SeriesError::Shape(_))));
    }
}
