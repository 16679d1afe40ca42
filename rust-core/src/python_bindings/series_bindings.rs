//! Python bindings for the signal, spectrum and spectrogram entities

use num_complex::Complex64;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::audio::{ChannelSelector, RawAudio};
use crate::filters::WindowType;
use crate::series::{CentroidMode, SignalSeries, SpectrogramSeries, SpectrumSeries, Windowed};
use crate::transform::{FftConfig, GwtConfig, LifterMode, StftConfig};

/// Time-domain signal exposed to Python
#[pyclass(name = "Signal")]
#[derive(Clone)]
pub struct PySignal {
    pub(crate) inner: SignalSeries,
}

#[pymethods]
impl PySignal {
    /// Wrap normalized samples
    ///
    /// Args:
    ///     samples: Samples in [-1, 1] as numpy array
    ///     sample_rate: Sample rate in Hz
    #[new]
    fn new(samples: PyReadonlyArray1<f64>, sample_rate: f64) -> PyResult<Self> {
        let samples = samples.as_array().to_vec();
        Ok(Self {
            inner: SignalSeries::from_samples(samples, sample_rate)?,
        })
    }

    /// Decode raw PCM bytes from a loader
    ///
    /// Args:
    ///     data: Interleaved little-endian sample bytes
    ///     sample_width_bits: 8, 16, 24 or 32
    ///     channels: 1 or 2
    ///     frame_rate: Frames per second
    ///     channel: "L", "R" or "M"
    ///     source_path: Optional path the bytes were read from
    #[staticmethod]
    #[pyo3(signature = (
        data,
        sample_width_bits,
        channels,
        frame_rate,
        channel = "M",
        source_path = None
    ))]
    fn from_pcm(
        data: Vec<u8>,
        sample_width_bits: u16,
        channels: u16,
        frame_rate: u32,
        channel: &str,
        source_path: Option<String>,
    ) -> PyResult<Self> {
        let raw = RawAudio {
            bytes: data,
            sample_width_bits,
            channels,
            frame_rate,
        };
        let selector: ChannelSelector = channel.parse()?;
        let mut inner = SignalSeries::from_raw(&raw, selector)?;
        if let Some(path) = source_path {
            inner = inner.with_source_path(path);
        }
        Ok(Self { inner })
    }

    fn slice_time_ms(
        mut slf: PyRefMut<'_, Self>,
        start_ms: f64,
        end_ms: f64,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_by_time_ms(start_ms, end_ms)?;
        Ok(slf)
    }

    fn slice_sample(
        mut slf: PyRefMut<'_, Self>,
        start: usize,
        end: usize,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_by_sample(start, end)?;
        Ok(slf)
    }

    fn reset_view(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.reset_view();
        slf
    }

    /// One-sided spectrum of the current view
    ///
    /// Args:
    ///     window: "hanning", "hamming" or "square"
    ///     nfft: Transform length (default: view length)
    #[pyo3(signature = (window="hanning", nfft=None))]
    fn fft(&self, window: &str, nfft: Option<usize>) -> PyResult<PySpectrum> {
        let config = FftConfig {
            window: window.parse()?,
            nfft,
        };
        Ok(PySpectrum {
            inner: self.inner.fft(&config)?,
        })
    }

    /// STFT spectrogram with a Hamming window
    #[pyo3(signature = (window_length=256, hop_size=128))]
    fn stft(&self, window_length: usize, hop_size: usize) -> PyResult<PySpectrogram> {
        let config = StftConfig {
            window_length,
            hop_size,
            window: WindowType::Hamming,
        };
        Ok(PySpectrogram {
            inner: self.inner.stft(&config)?,
        })
    }

    /// Gabor wavelet spectrogram of the current view
    ///
    /// Args:
    ///     channels: Number of analysis frequencies
    ///     f_min: Lower end of the frequency grid (Hz)
    ///     f_max: Upper end of the frequency grid (default: Nyquist)
    #[pyo3(signature = (channels=512, f_min=0.0, f_max=None))]
    fn gwt(&self, channels: usize, f_min: f64, f_max: Option<f64>) -> PyResult<PySpectrogram> {
        let config = GwtConfig {
            channels,
            f_min,
            f_max,
            ..GwtConfig::default()
        };
        Ok(PySpectrogram {
            inner: self.inner.gwt(&config)?,
        })
    }

    #[pyo3(signature = (p_max, p0=20e-6))]
    fn normalize_spl(&self, p_max: f64, p0: f64) -> PyResult<Self> {
        Ok(Self {
            inner: self.inner.normalize_spl(p_max, p0)?,
        })
    }

    fn a_weighting(&self) -> PyResult<Self> {
        Ok(Self {
            inner: self.inner.a_weighting()?,
        })
    }

    fn filter(&self, coefficients: PyReadonlyArray1<f64>) -> PyResult<Self> {
        let coefficients = coefficients.as_array().to_vec();
        Ok(Self {
            inner: self.inner.fir_filter(&coefficients)?,
        })
    }

    fn get_data<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.data().into_pyarray(py)
    }

    fn get_xdata<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.x_axis().into_pyarray(py)
    }

    fn get_fs(&self) -> f64 {
        self.inner.sample_rate()
    }

    fn get_source_path(&self) -> Option<String> {
        self.inner
            .source_path()
            .map(|p| p.to_string_lossy().into_owned())
    }

    #[getter]
    fn name(&self) -> Option<String> {
        self.inner.name()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

/// One-sided spectrum exposed to Python
#[pyclass(name = "Spectrum")]
#[derive(Clone)]
pub struct PySpectrum {
    pub(crate) inner: SpectrumSeries,
}

#[pymethods]
impl PySpectrum {
    fn slice_freq_hz(
        mut slf: PyRefMut<'_, Self>,
        f1: f64,
        f2: f64,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_freq_hz(f1, f2)?;
        Ok(slf)
    }

    fn slice_freq_khz(
        mut slf: PyRefMut<'_, Self>,
        f1: f64,
        f2: f64,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_freq_khz(f1, f2)?;
        Ok(slf)
    }

    fn reset_view(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.reset_view();
        slf
    }

    /// Cepstral liftering
    ///
    /// Args:
    ///     lifter: Lifter order
    ///     mode: "low" (envelope) or "high" (fine structure)
    fn liftering(&self, lifter: usize, mode: &str) -> PyResult<Self> {
        let mode: LifterMode = mode.parse()?;
        Ok(Self {
            inner: self.inner.liftering(lifter, mode)?,
        })
    }

    /// Spectral centroid in Hz ("log" or "linear" weighting)
    #[pyo3(signature = (mode="log"))]
    fn cof(&self, mode: &str) -> PyResult<f64> {
        let mode: CentroidMode = mode.parse()?;
        Ok(self.inner.spectral_centroid(mode))
    }

    fn band_power(&self, f1: f64, f2: f64) -> PyResult<f64> {
        Ok(self.inner.band_power(f1, f2)?)
    }

    fn moving_average(&self, taps: usize) -> PyResult<Self> {
        Ok(Self {
            inner: self.inner.moving_average(taps)?,
        })
    }

    fn variance(&self) -> f64 {
        self.inner.variance()
    }

    fn spectral_slope(&self) -> (f64, f64) {
        self.inner.spectral_slope()
    }

    fn get_data<'py>(&self, py: Python<'py>) -> &'py PyArray1<Complex64> {
        self.inner.data().into_pyarray(py)
    }

    fn get_xdata<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.x_axis().into_pyarray(py)
    }

    fn get_amp<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.amplitude().into_pyarray(py)
    }

    fn get_logpow<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.log_power().into_pyarray(py)
    }

    fn get_fs(&self) -> f64 {
        self.inner.sample_rate()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

/// Spectrogram `[time, frequency]` exposed to Python
#[pyclass(name = "Spectrogram")]
#[derive(Clone)]
pub struct PySpectrogram {
    pub(crate) inner: SpectrogramSeries,
}

#[pymethods]
impl PySpectrogram {
    fn slice_time_ms(
        mut slf: PyRefMut<'_, Self>,
        start_ms: f64,
        end_ms: f64,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_by_time_ms(start_ms, end_ms)?;
        Ok(slf)
    }

    fn slice_freq_hz(
        mut slf: PyRefMut<'_, Self>,
        f1: f64,
        f2: f64,
    ) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.slice_freq_hz(f1, f2)?;
        Ok(slf)
    }

    fn reset_view(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.reset_view();
        slf
    }

    fn time_average(&self) -> PyResult<PySpectrum> {
        Ok(PySpectrum {
            inner: self.inner.time_average()?,
        })
    }

    fn get_data<'py>(&self, py: Python<'py>) -> &'py PyArray2<Complex64> {
        self.inner.data().into_pyarray(py)
    }

    fn get_xdata<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.x_axis().into_pyarray(py)
    }

    fn get_ydata<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.inner.y_axis().into_pyarray(py)
    }

    fn get_logpow<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        self.inner.log_power().into_pyarray(py)
    }

    fn get_fs(&self) -> f64 {
        self.inner.sample_rate()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}
