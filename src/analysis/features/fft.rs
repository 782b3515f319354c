// FFT module - Fast Fourier Transform computation
//
// This module handles FFT computation with proper windowing to reduce
// spectral leakage. The magnitude spectrum is used by spectral feature
// extraction functions.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT frame size for spectral descriptors
pub const FFT_SIZE: usize = 1024;

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window for FFT (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT frame size (typically [`FFT_SIZE`])
    pub fn new(fft_size: usize) -> Self {
        // Pre-compute Hann window to reduce spectral leakage
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
        }
    }

    /// Number of bins returned by [`Self::compute_magnitude_spectrum`]
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, zero-pads short frames, and returns magnitudes
    /// for positive frequencies only (size = fft_size / 2 + 1).
    pub fn compute_magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = audio
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.num_bins()].iter().map(|c| c.norm()).collect()
    }

    /// Average magnitude spectrum over consecutive non-overlapping frames
    ///
    /// Returns `None` for an empty signal.
    pub fn average_magnitude_spectrum(&self, audio: &[f32]) -> Option<Vec<f32>> {
        if audio.is_empty() {
            return None;
        }

        let mut sum = vec![0.0f32; self.num_bins()];
        let mut frames = 0usize;
        for frame in audio.chunks(self.fft_size) {
            let spectrum = self.compute_magnitude_spectrum(frame);
            for (acc, mag) in sum.iter_mut().zip(spectrum) {
                *acc += mag;
            }
            frames += 1;
        }

        let scale = 1.0 / frames as f32;
        sum.iter_mut().for_each(|mag| *mag *= scale);
        Some(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_size_and_padding() {
        let fft = FftProcessor::new(FFT_SIZE);
        let spectrum = fft.compute_magnitude_spectrum(&[0.5; 100]);
        assert_eq!(spectrum.len(), FFT_SIZE / 2 + 1);
    }

    #[test]
    fn test_peak_bin_matches_frequency() {
        let sample_rate = 48_000.0;
        let fft = FftProcessor::new(FFT_SIZE);
        // 3000 Hz lands exactly on bin 64 at 48 kHz / 1024
        let signal: Vec<f32> = (0..FFT_SIZE)
            .map(|i| (2.0 * std::f32::consts::PI * 3000.0 * i as f32 / sample_rate).sin())
            .collect();
        let spectrum = fft.compute_magnitude_spectrum(&signal);
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 64);
    }

    #[test]
    fn test_average_of_empty_signal() {
        let fft = FftProcessor::new(FFT_SIZE);
        assert!(fft.average_magnitude_spectrum(&[]).is_none());
        assert!(fft.average_magnitude_spectrum(&[0.0; 10]).is_some());
    }
}
