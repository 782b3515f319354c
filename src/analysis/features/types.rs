// Types module - Data structures for signal descriptors
//
// This module defines the snapshots produced by the feature extraction
// pipeline. They are derived values: never persisted, recomputed on demand.

use serde::{Deserialize, Serialize};

use crate::analysis::region::Region;

/// Coarse descriptors of a whole buffer (or a window within it)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    /// Largest absolute sample value
    pub peak_level: f32,

    /// Root mean square level
    pub rms: f32,

    /// Peak / RMS (0.0 for silence)
    ///
    /// A sine wave sits at √2; heavily limited material approaches 1.0.
    pub crest_factor: f32,

    /// First-difference energy divided by total energy over the whole buffer
    pub high_frequency_energy_ratio: f32,

    /// Noise-likeness proxy in `[0, 1]`
    ///
    /// Half of `high_frequency_energy_ratio`, clamped. White noise lands near
    /// 1.0, low tones near 0.0. This is not the geometric/arithmetic spectral
    /// flatness; see `spectral_centroid_hz` for an FFT-based descriptor.
    pub spectral_flatness: f32,

    /// Heuristic loudness: RMS in dBFS plus a fixed offset
    ///
    /// Not an ITU-R BS.1770 measurement: there is no K-weighting and no gating.
    #[serde(rename = "estimatedLUFS")]
    pub estimated_lufs: f32,

    /// Magnitude-weighted mean frequency of the averaged FFT spectrum
    pub spectral_centroid_hz: f32,

    /// Frequency below which 85% of spectral energy lies
    pub spectral_rolloff_hz: f32,
}

impl FeatureSet {
    /// Descriptors of an empty or all-zero buffer
    pub fn silent() -> Self {
        Self {
            peak_level: 0.0,
            rms: 0.0,
            crest_factor: 0.0,
            high_frequency_energy_ratio: 0.0,
            spectral_flatness: 0.0,
            estimated_lufs: super::temporal::estimate_lufs(0.0),
            spectral_centroid_hz: 0.0,
            spectral_rolloff_hz: 0.0,
        }
    }

    /// True when the buffer carries any signal at all
    pub fn has_signal(&self) -> bool {
        self.rms > 0.0
    }
}

/// Energy measurements for one analysis window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalysis {
    /// Window position, tagged `RegionKind::Unclassified`
    pub region: Region,
    /// Σ s² over the window
    pub total_energy: f32,
    /// Σ (s[i] − s[i−1])² over the window
    pub high_freq_energy: f32,
    /// `high_freq_energy / total_energy`, 0.0 when the window is silent
    pub ratio: f32,
}
