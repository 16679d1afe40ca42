//! PCM decoding: raw little-endian frames to normalized single-channel samples
//!
//! Container parsing (WAV headers etc.) belongs to the loader; this module
//! starts from the interleaved sample bytes and the stream parameters.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SeriesError};

/// Raw interleaved PCM as handed over by the audio loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAudio {
    /// Interleaved little-endian sample bytes
    pub bytes: Vec<u8>,

    /// Bits per sample: 8, 16, 24 or 32
    pub sample_width_bits: u16,

    /// Number of interleaved channels (1 or 2)
    pub channels: u16,

    /// Frames per second
    pub frame_rate: u32,
}

impl RawAudio {
    /// Bytes per interleaved frame
    pub fn frame_bytes(&self) -> usize {
        (self.sample_width_bits as usize / 8) * self.channels as usize
    }

    /// Number of complete frames in the buffer
    pub fn frame_count(&self) -> usize {
        match self.frame_bytes() {
            0 => 0,
            frame_bytes => self.bytes.len() / frame_bytes,
        }
    }
}

/// Which channel of a stereo source to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSelector {
    /// Channel 0 (even interleaved indices)
    Left,
    /// Channel 1 (odd interleaved indices)
    Right,
    /// Average of both channels
    #[default]
    Mono,
}

impl FromStr for ChannelSelector {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" | "l" => Ok(ChannelSelector::Left),
            "R" | "r" => Ok(ChannelSelector::Right),
            "M" | "m" => Ok(ChannelSelector::Mono),
            other => Err(SeriesError::InvalidArgument(format!(
                "unknown channel selector '{other}' (expected L, R or M)"
            ))),
        }
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ChannelSelector::Left => "L",
            ChannelSelector::Right => "R",
            ChannelSelector::Mono => "M",
        };
        f.write_str(tag)
    }
}

/// Full-scale divisor `2^bits / 2 - 1` for the given stored width
///
/// 24-bit streams are folded to 16-bit before normalization, so they share
/// the 16-bit divisor.
pub fn full_scale(sample_width_bits: u16) -> Result<f64> {
    let effective = match sample_width_bits {
        8 | 16 | 32 => sample_width_bits,
        24 => 16,
        other => {
            return Err(SeriesError::UnsupportedFormat(format!(
                "{other}-bit samples (expected 8, 16, 24 or 32)"
            )))
        }
    };
    Ok(2f64.powi(effective as i32) / 2.0 - 1.0)
}

/// Decode interleaved bytes into integer sample values
///
/// 8-bit bytes are read as signed. 24-bit samples keep only their two most
/// significant bytes, i.e. they are folded to 16-bit.
fn decode_integers(bytes: &[u8], sample_width_bits: u16) -> Result<Vec<f64>> {
    let values = match sample_width_bits {
        8 => bytes.iter().map(|&b| b as i8 as f64).collect(),
        16 => bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f64)
            .collect(),
        24 => bytes
            .chunks_exact(3)
            .map(|c| i16::from_le_bytes([c[1], c[2]]) as f64)
            .collect(),
        32 => bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        other => {
            return Err(SeriesError::UnsupportedFormat(format!(
                "{other}-bit samples (expected 8, 16, 24 or 32)"
            )))
        }
    };
    Ok(values)
}

/// Decode raw PCM to one channel normalized to [-1, 1]
///
/// Stereo sources are de-interleaved (even = left, odd = right) and reduced
/// with `selector`; mono sources pass through whatever the selector says.
pub fn decode(raw: &RawAudio, selector: ChannelSelector) -> Result<Vec<f64>> {
    let divisor = full_scale(raw.sample_width_bits)?;
    if raw.channels == 0 || raw.channels > 2 {
        return Err(SeriesError::UnsupportedFormat(format!(
            "{} channels (expected 1 or 2)",
            raw.channels
        )));
    }
    if raw.frame_rate == 0 {
        return Err(SeriesError::UnsupportedFormat("frame rate of 0 Hz".into()));
    }

    let frame_bytes = raw.frame_bytes();
    if raw.bytes.len() != raw.frame_count() * frame_bytes {
        return Err(SeriesError::UnsupportedFormat(format!(
            "{} bytes is not a whole number of {frame_bytes}-byte frames",
            raw.bytes.len()
        )));
    }

    let interleaved = decode_integers(&raw.bytes, raw.sample_width_bits)?;
    let samples: Vec<f64> = if raw.channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(2)
            .map(|frame| match selector {
                ChannelSelector::Left => frame[0],
                ChannelSelector::Right => frame[1],
                ChannelSelector::Mono => (frame[0] + frame[1]) / 2.0,
            })
            .collect()
    };

    log::debug!(
        "decoded {} frames ({}-bit, {} ch, {} Hz, channel {})",
        raw.frame_count(),
        raw.sample_width_bits,
        raw.channels,
        raw.frame_rate,
        selector
    );

    Ok(samples.into_iter().map(|s| s / divisor).collect())
}
