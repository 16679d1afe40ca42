//! Signal, spectrum and spectrogram entities over a shared windowed view

pub mod signal;
pub mod spectrogram;
pub mod spectrum;
pub mod windowed;

pub use signal::SignalSeries;
pub use spectrogram::SpectrogramSeries;
pub use spectrum::{linear_fit, CentroidMode, SpectrumSeries};
pub use windowed::{
    Magnitude, WindowDim, Windowed, WindowedSeries, AMPLITUDE_CEILING, AMPLITUDE_FLOOR,
};
