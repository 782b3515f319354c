// FeatureExtractor - coarse signal descriptors for quality analysis
//
// This module computes the statistics the detector and mastering stage run
// on. Multichannel buffers are analyzed on their mixdown.
//
// Module organization:
// - types: Data structures (FeatureSet, WindowAnalysis)
// - temporal: Time-domain level and first-difference energy measurements
// - fft: FFT computation with windowing
// - spectral: Frequency-domain features (centroid, rolloff)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Descriptors:
// 1. Peak level, RMS and crest factor
// 2. High-frequency energy ratio: first-difference energy / signal energy
// 3. Spectral flatness proxy derived from that ratio
// 4. Estimated loudness (RMS dBFS plus a fixed offset; heuristic only)
// 5. Spectral centroid and rolloff of the frame-averaged FFT spectrum

mod fft;
mod spectral;
pub mod temporal;
mod types;

pub use fft::FFT_SIZE;
pub use types::{FeatureSet, WindowAnalysis};

use crate::analysis::region::{Region, RegionKind};
use crate::audio::SampleBuffer;
use fft::FftProcessor;
use spectral::SpectralFeatures;

/// FeatureExtractor coordinates the whole-buffer and windowed passes
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    spectral_features: SpectralFeatures,
    sample_rate: u32,
}

impl FeatureExtractor {
    /// Create a new FeatureExtractor for the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self {
            fft_processor: FftProcessor::new(FFT_SIZE),
            spectral_features: SpectralFeatures::new(sample_rate, FFT_SIZE),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whole-buffer descriptors of a buffer's mixdown
    pub fn extract(&self, buffer: &SampleBuffer) -> FeatureSet {
        self.extract_samples(&buffer.mixdown())
    }

    /// Whole-buffer descriptors of a mono signal
    pub fn extract_samples(&self, samples: &[f32]) -> FeatureSet {
        let rms = temporal::rms(samples);
        if rms == 0.0 {
            return FeatureSet::silent();
        }

        let peak_level = temporal::peak_level(samples);
        let ratio = temporal::energy_ratio(
            temporal::first_difference_energy(samples),
            temporal::energy(samples),
        );

        let (spectral_centroid_hz, spectral_rolloff_hz) = self
            .fft_processor
            .average_magnitude_spectrum(samples)
            .map(|spectrum| {
                (
                    self.spectral_features.compute_centroid(&spectrum),
                    self.spectral_features.compute_rolloff(&spectrum),
                )
            })
            .unwrap_or((0.0, 0.0));

        FeatureSet {
            peak_level,
            rms,
            crest_factor: temporal::crest_factor(peak_level, rms),
            high_frequency_energy_ratio: ratio,
            spectral_flatness: temporal::flatness_proxy(ratio),
            estimated_lufs: temporal::estimate_lufs(rms),
            spectral_centroid_hz,
            spectral_rolloff_hz,
        }
    }
}

/// Whole-buffer descriptors (convenience wrapper over [`FeatureExtractor`])
pub fn extract_features(buffer: &SampleBuffer) -> FeatureSet {
    FeatureExtractor::new(buffer.sample_rate()).extract(buffer)
}

/// Partition a buffer's mixdown into non-overlapping windows and measure each
///
/// The last window is shorter when `window_size` does not divide the frame
/// count. A `window_size` of zero yields no windows.
pub fn analyze_windows(buffer: &SampleBuffer, window_size: usize) -> Vec<WindowAnalysis> {
    analyze_sample_windows(&buffer.mixdown(), window_size)
}

/// Windowed analysis over a mono signal
pub fn analyze_sample_windows(samples: &[f32], window_size: usize) -> Vec<WindowAnalysis> {
    if window_size == 0 {
        return Vec::new();
    }

    samples
        .chunks(window_size)
        .enumerate()
        .filter_map(|(idx, window)| {
            let start = idx * window_size;
            let total_energy = temporal::energy(window);
            let high_freq_energy = temporal::first_difference_energy(window);
            let ratio = temporal::energy_ratio(high_freq_energy, total_energy);
            Region::new(start, start + window.len(), RegionKind::Unclassified, ratio).map(
                |region| WindowAnalysis {
                    region,
                    total_energy,
                    high_freq_energy,
                    ratio,
                },
            )
        })
        .collect()
}
