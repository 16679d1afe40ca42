//! Stateless signal transforms: FFT, STFT/iSTFT, Gabor wavelet and cepstrum

pub mod cepstrum;
pub mod fft;
pub mod gwt;
pub mod stft;

pub use cepstrum::{lifter_mask, lifter_rows, lifter_spectrum, LifterMode};
pub use fft::{fft_frequencies, FftConfig, FftEngine};
pub use gwt::{gabor_wavelet_transform, GwtConfig, GwtResult};
pub use stft::{frame_count, istft, stft, StftConfig};
