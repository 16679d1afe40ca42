//! Window functions, FIR design and time-domain filtering

pub mod convolution;
pub mod design;
pub mod iir;
pub mod windows;

pub use convolution::{box_kernel, convolve_same};
pub use design::{design_bandpass, design_highpass, design_lowpass};
pub use iir::{lfilter, A_WEIGHTING_A, A_WEIGHTING_B};
pub use windows::{apply_window, generate_window, WindowType};
