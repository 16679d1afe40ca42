//! Single-channel time-domain signal
//!
//! Entry point of the analysis pipeline: built from decoded PCM (or raw
//! samples), sliced in time, then transformed into spectra and spectrograms.
//! Every transform reads only the current view and allocates a new entity.

use ndarray::{s, Array1, Array2, Ix1};
use num_complex::Complex64;
use std::fmt;
use std::path::{Path, PathBuf};

use super::spectrogram::SpectrogramSeries;
use super::spectrum::SpectrumSeries;
use super::windowed::{Windowed, WindowedSeries};
use crate::audio::pcm::{self, ChannelSelector, RawAudio};
use crate::error::{Result, SeriesError};
use crate::filters::{apply_window, convolve_same, generate_window, lfilter};
use crate::filters::{A_WEIGHTING_A, A_WEIGHTING_B};
use crate::transform::{
    fft_frequencies, gabor_wavelet_transform, istft, stft, FftConfig, FftEngine, GwtConfig,
    StftConfig,
};

/// Reference sound pressure in Pa (0 dB SPL)
pub const REFERENCE_PRESSURE: f64 = 20e-6;

/// Time-domain samples in [-1, 1] over a time axis in seconds
#[derive(Debug, Clone)]
pub struct SignalSeries {
    series: WindowedSeries<f64, Ix1>,
    source_path: Option<PathBuf>,
    channel: ChannelSelector,
}

/// `linspace(0, len / fs, len)`
fn time_axis(len: usize, sample_rate: f64) -> Array1<f64> {
    Array1::linspace(0.0, len as f64 / sample_rate, len)
}

impl SignalSeries {
    /// Wrap already-normalized samples
    pub fn from_samples(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        let axis = time_axis(samples.len(), sample_rate);
        let series = WindowedSeries::new(Array1::from(samples), axis, sample_rate)?;
        Ok(Self {
            series,
            source_path: None,
            channel: ChannelSelector::Mono,
        })
    }

    /// Decode raw PCM from the loader and keep the selected channel
    ///
    /// # Arguments
    /// * `raw` - Interleaved sample bytes and stream parameters
    /// * `selector` - Channel to keep for stereo input (ignored for mono)
    pub fn from_raw(raw: &RawAudio, selector: ChannelSelector) -> Result<Self> {
        let samples = pcm::decode(raw, selector)?;
        let mut signal = Self::from_samples(samples, raw.frame_rate as f64)?;
        signal.channel = selector;
        Ok(signal)
    }

    /// Record the file this signal was loaded from
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// File stem of the source path, if one was recorded
    pub fn name(&self) -> Option<String> {
        self.source_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    /// Channel selector recorded at load time
    pub fn channel(&self) -> ChannelSelector {
        self.channel
    }

    /// Same metadata, new buffer over the same axis and view
    fn with_buffer(&self, data: Array1<f64>) -> Result<Self> {
        Ok(Self {
            series: self.series.with_data(data)?,
            source_path: self.source_path.clone(),
            channel: self.channel,
        })
    }

    fn fs(&self) -> f64 {
        self.series.fs()
    }

    fn samples(&self) -> Vec<f64> {
        self.series.view().to_vec()
    }

    /// One-sided spectrum of the current view
    ///
    /// The window spans the whole view; the windowed signal is then
    /// zero-padded or truncated to `nfft`. Returns `floor(nfft / 2)` bins
    /// from DC up to (excluding) Nyquist, with the complex values kept.
    pub fn fft(&self, config: &FftConfig) -> Result<SpectrumSeries> {
        let samples = self.samples();
        let nfft = config.nfft.unwrap_or(samples.len());
        let half = nfft / 2;
        if half == 0 {
            return Err(SeriesError::InvalidArgument(format!(
                "FFT length {nfft} leaves no one-sided bins"
            )));
        }

        let windowed = apply_window(&samples, config.window);
        let spectrum = FftEngine::new(nfft).forward(&windowed)?;
        let freqs = fft_frequencies(nfft, self.fs());

        let data = Array1::from(spectrum[..half].to_vec());
        let axis = Array1::from(freqs[..half].to_vec());
        Ok(SpectrumSeries::new(data, axis, self.fs())?.with_name(self.name()))
    }

    /// One-sided STFT spectrogram of the current view
    ///
    /// Rows are frames, columns the first `window_length / 2` bins. The time
    /// axis is spread linearly over the view's time extent.
    pub fn stft(&self, config: &StftConfig) -> Result<SpectrogramSeries> {
        let half = config.window_length / 2;
        if half == 0 {
            return Err(SeriesError::InvalidArgument(format!(
                "STFT window of {} samples leaves no one-sided bins",
                config.window_length
            )));
        }

        let window = generate_window(config.window, config.window_length);
        let frames = stft(&self.samples(), &window, config.hop_size)?;
        let one_sided = frames.slice(s![.., ..half]).to_owned();

        let freqs = fft_frequencies(config.window_length, self.fs());
        let freq_axis = Array1::from(freqs[..half].to_vec());

        let rows = one_sided.nrows();
        let times = self.x_axis();
        let (t0, t1) = (times[0], times[times.len() - 1]);
        let time_axis = if t1 > t0 {
            Array1::linspace(t0, t1, rows)
        } else {
            Array1::from_shape_fn(rows, |i| t0 + (i * config.hop_size) as f64 / self.fs())
        };

        SpectrogramSeries::new(one_sided, time_axis, freq_axis, self.fs())
    }

    /// Gabor wavelet spectrogram of the current view
    ///
    /// Rows are samples of the view (time from 0), columns analysis
    /// frequencies.
    pub fn gwt(&self, config: &GwtConfig) -> Result<SpectrogramSeries> {
        let result = gabor_wavelet_transform(&self.samples(), self.fs(), config)?;
        SpectrogramSeries::new(result.coefficients, result.times, result.frequencies, self.fs())
    }

    /// Scale to sound pressure: `p_max * x / p0`
    pub fn normalize_spl(&self, p_max: f64, p0: f64) -> Result<Self> {
        if p0 == 0.0 || !p0.is_finite() {
            return Err(SeriesError::InvalidArgument(format!(
                "reference pressure must be non-zero, got {p0}"
            )));
        }
        self.with_buffer(self.series.full_data().mapv(|x| p_max * x / p0))
    }

    /// Apply the A-weighting curve (coefficients designed for 44.1 kHz)
    pub fn a_weighting(&self) -> Result<Self> {
        let samples = self.series.full_data().to_vec();
        let weighted = lfilter(&A_WEIGHTING_B, &A_WEIGHTING_A, &samples)?;
        self.with_buffer(Array1::from(weighted))
    }

    /// Convolve with an FIR kernel, keeping the signal length
    pub fn fir_filter(&self, coefficients: &[f64]) -> Result<Self> {
        let samples = self.series.full_data().to_vec();
        if coefficients.is_empty() || coefficients.len() > samples.len() {
            return Err(SeriesError::InvalidArgument(format!(
                "FIR kernel of {} taps for a signal of {} samples",
                coefficients.len(),
                samples.len()
            )));
        }
        self.with_buffer(Array1::from(convolve_same(&samples, coefficients)))
    }

    /// Rebuild a signal from a full (two-sided) STFT matrix by overlap-add
    pub fn resynthesize(
        frames: &Array2<Complex64>,
        window: &[f64],
        hop: usize,
        sample_rate: f64,
    ) -> Result<Self> {
        let samples = istft(frames, window, hop)?;
        Self::from_samples(samples, sample_rate)
    }
}

impl Windowed for SignalSeries {
    type Elem = f64;
    type Dim = Ix1;

    fn series(&self) -> &WindowedSeries<f64, Ix1> {
        &self.series
    }

    fn series_mut(&mut self) -> &mut WindowedSeries<f64, Ix1> {
        &mut self.series
    }
}

impl fmt::Display for SignalSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let times = self.x_axis();
        write!(
            f,
            "Signal {}: {} samples @ {} Hz, {:.3}-{:.3} ms, channel {}",
            self.name().unwrap_or_else(|| "<unnamed>".into()),
            self.len(),
            self.fs(),
            times[0] * 1000.0,
            times[times.len() - 1] * 1000.0,
            self.channel
        )
    }
}
