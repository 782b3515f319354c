//! Decode boundary - RIFF/WAVE bytes into a [`SampleBuffer`]
//!
//! Compressed formats are decoded by the host platform; this boundary only
//! understands PCM and IEEE-float WAV and reports everything else as
//! `DecodeFailed` so callers can propagate it unchanged.

use std::io::{Cursor, Read};
use std::path::Path;

use super::buffer::SampleBuffer;
use super::wav::dequantize_i16;
use crate::error::AudioError;

/// Decode an in-memory WAV file
///
/// Truncated input surfaces as `DecodeFailed`; nothing here touches the
/// filesystem.
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer, AudioError> {
    hound::WavReader::new(Cursor::new(bytes))
        .map_err(AudioError::from)
        .and_then(read_samples)
        .map_err(|err| match err {
            AudioError::Io { details } => AudioError::decode(details),
            other => other,
        })
}

/// Decode a WAV file from disk
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<SampleBuffer, AudioError> {
    let bytes = std::fs::read(&path)?;
    let buffer = decode(&bytes).map_err(|err| match err {
        AudioError::DecodeFailed { reason } => AudioError::DecodeFailed {
            reason: format!("{}: {}", path.as_ref().display(), reason),
        },
        other => other,
    })?;

    log::debug!(
        "[Decode] {:?}: {} ch, {} Hz, {} frames",
        path.as_ref(),
        buffer.num_channels(),
        buffer.sample_rate(),
        buffer.frame_count()
    );
    Ok(buffer)
}

fn read_samples<R: Read>(mut reader: hound::WavReader<R>) -> Result<SampleBuffer, AudioError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::decode("file declares zero channels"));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => match spec.bits_per_sample {
            32 => reader
                .samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()?,
            bits => {
                return Err(AudioError::decode(format!(
                    "unsupported float bits_per_sample={}",
                    bits
                )))
            }
        },
        hound::SampleFormat::Int => match spec.bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|sample| sample.map(|v| v as f32 / 128.0))
                .collect::<Result<Vec<f32>, _>>()?,
            16 => reader
                .samples::<i16>()
                .map(|sample| sample.map(dequantize_i16))
                .collect::<Result<Vec<f32>, _>>()?,
            bits @ (24 | 32) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / scale))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            bits => {
                return Err(AudioError::decode(format!(
                    "unsupported bits_per_sample={}",
                    bits
                )))
            }
        },
    };

    SampleBuffer::from_interleaved(&samples, spec.channels as usize, spec.sample_rate)
}
