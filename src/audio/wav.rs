//! WAV encoder - canonical 44-byte RIFF/WAVE serialization
//!
//! The byte layout is produced by hand rather than through `hound::WavWriter`
//! because consumers rely on the exact canonical header: `hound` switches to
//! `WAVE_FORMAT_EXTENSIBLE` for some channel/bit-depth combinations, which
//! changes the header length.
//!
//! Layout (little-endian throughout):
//!
//! | offset | field           | value                          |
//! |--------|-----------------|--------------------------------|
//! | 0      | "RIFF"          |                                |
//! | 4      | chunk size      | 36 + data size                 |
//! | 8      | "WAVE"          |                                |
//! | 12     | "fmt "          |                                |
//! | 16     | subchunk1 size  | 16                             |
//! | 20     | audio format    | 1 = PCM, 3 = IEEE float        |
//! | 22     | channels        |                                |
//! | 24     | sample rate     |                                |
//! | 28     | byte rate       | sample rate × block align      |
//! | 32     | block align     | channels × bytes per sample    |
//! | 34     | bits per sample |                                |
//! | 36     | "data"          |                                |
//! | 40     | data size       | frames × block align           |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::buffer::SampleBuffer;
use crate::error::AudioError;

/// Size of the canonical header written before sample data
pub const WAV_HEADER_LEN: usize = 44;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Output sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    /// 16-bit signed integer PCM
    Pcm16,
    /// 32-bit IEEE-754 float, written verbatim
    Float32,
}

impl BitDepth {
    /// Parse a bits-per-sample value (16 or 32)
    pub fn from_bits(bits: u16) -> Result<Self, AudioError> {
        match bits {
            16 => Ok(BitDepth::Pcm16),
            32 => Ok(BitDepth::Float32),
            other => Err(AudioError::unsupported(format!(
                "bit depth must be 16 or 32 (got {})",
                other
            ))),
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Pcm16 => 16,
            BitDepth::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(self) -> u16 {
        self.bits() / 8
    }

    fn audio_format(self) -> u16 {
        match self {
            BitDepth::Pcm16 => FORMAT_PCM,
            BitDepth::Float32 => FORMAT_IEEE_FLOAT,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = AudioError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        BitDepth::from_bits(bits)
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

/// Quantize one sample to 16-bit PCM
///
/// Clamps to `[-1, 1]`, then scales negatives by 32768 and non-negatives by
/// 32767 so both rails map exactly onto `i16::MIN`/`i16::MAX`.
#[inline]
pub fn quantize_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Inverse of [`quantize_i16`]
#[inline]
pub fn dequantize_i16(value: i16) -> f32 {
    if value < 0 {
        value as f32 / 32768.0
    } else {
        value as f32 / 32767.0
    }
}

/// Serialize a buffer into a canonical RIFF/WAVE byte sequence
///
/// Total over well-formed buffers: a buffer with zero frames produces the
/// 44-byte header alone.
pub fn encode(buffer: &SampleBuffer, bit_depth: BitDepth) -> Vec<u8> {
    let num_channels = buffer.num_channels() as u16;
    let block_align = num_channels * bit_depth.bytes_per_sample();
    let data_size = buffer.frame_count() as u32 * block_align as u32;
    let byte_rate = buffer.sample_rate() * block_align as u32;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&bit_depth.audio_format().to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate().to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bit_depth.bits().to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());

    let channels = buffer.channels();
    for frame in 0..buffer.frame_count() {
        for channel in channels {
            let sample = channel[frame];
            match bit_depth {
                BitDepth::Pcm16 => out.extend_from_slice(&quantize_i16(sample).to_le_bytes()),
                BitDepth::Float32 => out.extend_from_slice(&sample.to_le_bytes()),
            }
        }
    }

    out
}

/// Encode and write a buffer to disk
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    buffer: &SampleBuffer,
    bit_depth: BitDepth,
) -> Result<(), AudioError> {
    let bytes = encode(buffer, bit_depth);
    fs::write(&path, &bytes)?;
    log::debug!(
        "[WavEncoder] Wrote {} bytes ({} frames, {}-bit) to {:?}",
        bytes.len(),
        buffer.frame_count(),
        bit_depth.bits(),
        path.as_ref()
    );
    Ok(())
}
