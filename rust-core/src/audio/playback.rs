//! Playback rendering
//!
//! Device I/O lives outside this crate. Whatever drives the output device
//! gets a buffer that is already gained, routed and quantized, so its
//! callback only copies samples.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SeriesError};

/// Stereo routing applied before playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRoute {
    /// Left channel on both outputs
    Left,
    /// Right channel on both outputs
    Right,
    /// Average of both channels on both outputs
    Mono,
    /// Unchanged
    #[default]
    Stereo,
}

impl FromStr for PlaybackRoute {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" | "l" => Ok(PlaybackRoute::Left),
            "R" | "r" => Ok(PlaybackRoute::Right),
            "M" | "m" => Ok(PlaybackRoute::Mono),
            "S" | "s" => Ok(PlaybackRoute::Stereo),
            other => Err(SeriesError::InvalidArgument(format!(
                "unknown playback route '{other}' (expected L, R, M or S)"
            ))),
        }
    }
}

impl fmt::Display for PlaybackRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PlaybackRoute::Left => "L",
            PlaybackRoute::Right => "R",
            PlaybackRoute::Mono => "M",
            PlaybackRoute::Stereo => "S",
        };
        f.write_str(tag)
    }
}

/// Interleaved 16-bit PCM ready for an output device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBuffer {
    pub samples: Vec<i16>,
    pub channels: u16,

    /// Whether any sample exceeded full scale after the gain
    pub clipped: bool,
}

/// Linear gain for a boost in dB
pub fn db_to_gain(boost_db: f64) -> f64 {
    10f64.powf(boost_db / 20.0)
}

/// Quantize a float sample to i16 (`x * 32767`, saturating)
pub fn float_to_pcm16(sample: f64) -> i16 {
    (sample * i16::MAX as f64).clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Render interleaved float samples for playback
///
/// # Arguments
/// * `interleaved` - Samples in [-1, 1], interleaved by channel
/// * `channels` - 1 or 2; routing only affects stereo input
/// * `route` - Which channel(s) to send to both outputs
/// * `boost_db` - Gain applied before routing
pub fn render_playback(
    interleaved: &[f64],
    channels: u16,
    route: PlaybackRoute,
    boost_db: f64,
) -> Result<RenderedBuffer> {
    if channels == 0 || channels > 2 {
        return Err(SeriesError::UnsupportedFormat(format!(
            "{channels} playback channels (expected 1 or 2)"
        )));
    }
    if interleaved.len() % channels as usize != 0 {
        return Err(SeriesError::Shape(format!(
            "{} samples do not split into {channels} channels",
            interleaved.len()
        )));
    }

    let gain = db_to_gain(boost_db);
    let mut boosted: Vec<f64> = interleaved.iter().map(|&x| x * gain).collect();

    let clipped = boosted.iter().any(|x| x.abs() > 1.0);
    if clipped {
        log::warn!("playback clips at {boost_db:+.1} dB boost");
    }

    if channels == 2 {
        for frame in boosted.chunks_exact_mut(2) {
            let (left, right) = (frame[0], frame[1]);
            let routed = match route {
                PlaybackRoute::Left => (left, left),
                PlaybackRoute::Right => (right, right),
                PlaybackRoute::Mono => ((left + right) / 2.0, (left + right) / 2.0),
                PlaybackRoute::Stereo => (left, right),
            };
            frame[0] = routed.0;
            frame[1] = routed.1;
        }
    }

    Ok(RenderedBuffer {
        samples: boosted.into_iter().map(float_to_pcm16).collect(),
        channels,
        clipped,
    })
}
