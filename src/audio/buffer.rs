//! SampleBuffer - planar multi-channel PCM held fully in memory
//!
//! Every transformation in the crate takes a `&SampleBuffer` and returns a new
//! one; nothing mutates a caller's buffer in place.

use crate::error::AudioError;

/// Planar floating-point audio buffer
///
/// Samples are nominally in `[-1.0, 1.0]` but may exceed that range between
/// processing stages, before the final limiter or clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from planar channel data
    ///
    /// # Errors
    /// `UnsupportedConfiguration` if there are no channels, the sample rate
    /// is zero, or the channels differ in length.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, AudioError> {
        if channels.is_empty() {
            return Err(AudioError::unsupported("buffer must have at least one channel"));
        }
        if sample_rate == 0 {
            return Err(AudioError::unsupported("sample rate must be > 0"));
        }
        let frames = channels[0].len();
        if let Some(idx) = channels.iter().position(|ch| ch.len() != frames) {
            return Err(AudioError::unsupported(format!(
                "channel {} has {} frames, expected {}",
                idx,
                channels[idx].len(),
                frames
            )));
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Single-channel convenience constructor
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        Self::new(vec![samples], sample_rate)
    }

    /// De-interleave frame-ordered samples (`L R L R ...`)
    pub fn from_interleaved(
        samples: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if num_channels == 0 {
            return Err(AudioError::unsupported("buffer must have at least one channel"));
        }
        if samples.len() % num_channels != 0 {
            return Err(AudioError::decode(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                num_channels
            )));
        }

        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(channels, sample_rate)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn duration_secs(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Frame-ordered copy of all samples
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count() * self.num_channels());
        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Mean of all channels, used for analysis of multichannel material
    pub fn mixdown(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }

        let scale = 1.0 / self.channels.len() as f32;
        (0..self.frame_count())
            .map(|frame| self.channels.iter().map(|ch| ch[frame]).sum::<f32>() * scale)
            .collect()
    }

    /// Apply `f` to every sample of a copy of this buffer
    pub fn map_samples(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        let mut out = self.clone();
        for channel in out.channels_mut() {
            for sample in channel.iter_mut() {
                *sample = f(*sample);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_channels() {
        let err = SampleBuffer::new(Vec::new(), 44_100).unwrap_err();
        assert!(matches!(err, AudioError::UnsupportedConfiguration { .. }));
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert!(SampleBuffer::mono(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn test_rejects_ragged_channels() {
        let err = SampleBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 48_000).unwrap_err();
        assert!(err.to_string().contains("channel 1"));
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        let buffer = SampleBuffer::new(vec![Vec::new(), Vec::new()], 48_000).unwrap();
        assert_eq!(buffer.frame_count(), 0);
        assert!(buffer.is_empty());
        assert!(buffer.mixdown().is_empty());
    }

    #[test]
    fn test_interleave_roundtrip() {
        let interleaved = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buffer = SampleBuffer::from_interleaved(&interleaved, 2, 44_100).unwrap();
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0).unwrap(), &[0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1).unwrap(), &[-0.1, -0.2, -0.3]);
        assert_eq!(buffer.interleaved(), interleaved.to_vec());
    }

    #[test]
    fn test_from_interleaved_rejects_partial_frame() {
        assert!(SampleBuffer::from_interleaved(&[0.0; 5], 2, 44_100).is_err());
    }

    #[test]
    fn test_mixdown_averages_channels() {
        let buffer = SampleBuffer::new(vec![vec![1.0, 0.5], vec![0.0, -0.5]], 44_100).unwrap();
        assert_eq!(buffer.mixdown(), vec![0.5, 0.0]);
    }

    #[test]
    fn test_map_samples_leaves_source_untouched() {
        let buffer = SampleBuffer::mono(vec![0.25, -0.25], 8_000).unwrap();
        let doubled = buffer.map_samples(|s| s * 2.0);
        assert_eq!(doubled.channel(0).unwrap(), &[0.5, -0.5]);
        assert_eq!(buffer.channel(0).unwrap(), &[0.25, -0.25]);
    }
}
