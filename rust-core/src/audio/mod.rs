//! Boundary with the audio I/O collaborators: PCM decoding on the way in,
//! playback rendering on the way out

pub mod pcm;
pub mod playback;

pub use pcm::{ChannelSelector, RawAudio};
pub use playback::{render_playback, PlaybackRoute, RenderedBuffer};
