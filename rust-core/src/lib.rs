//! Impact Texture - Time-Frequency Analysis Core for Impact Sounds
//!
//! Windowed signal/spectrum/spectrogram entities, FFT/STFT, Gabor wavelet
//! and cepstral liftering engines, and the texture features built on them.
//! Python bindings are available behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod audio;
pub mod error;
pub mod features;
pub mod filters;
pub mod series;
pub mod transform;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::{ChannelSelector, PlaybackRoute, RawAudio, RenderedBuffer};
pub use error::{Result, SeriesError};
pub use features::{analyze_impact, ImpactAnalysisConfig, ImpactFeatures};
pub use filters::WindowType;
pub use series::{
    CentroidMode, SignalSeries, SpectrogramSeries, SpectrumSeries, Windowed, WindowedSeries,
};
pub use transform::{FftConfig, GwtConfig, LifterMode, StftConfig};
