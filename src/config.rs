//! Configuration management for the processing pipeline
//!
//! Every heuristic constant used by detection, synthesis and mastering lives
//! here as a named field instead of a literal in the DSP code, so thresholds
//! can be tuned from a JSON file without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::audio::wav::BitDepth;
use crate::error::AudioError;

/// Complete application configuration
///
/// Keys are camelCase in every section; unknown keys are rejected so a
/// misspelled setting cannot silently fall back to its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub detection: DetectionThresholds,
    pub synthesis: SynthesisConstants,
    pub mastering: MasteringConfig,
    pub output: OutputConfig,
}

/// Thresholds for window analysis and quality classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DetectionThresholds {
    /// Analysis window length in milliseconds
    pub window_ms: f32,
    /// Minimum window energy (Σ s²) for a window to count as voiced
    pub energy_floor: f32,
    /// Voiced windows with a high-frequency ratio below this lack a consonant transient
    pub consonant_ratio: f32,
    /// Windows with a high-frequency ratio above this are noise-like
    pub static_ratio: f32,
    /// Fraction of energetic windows that must be noise-like to flag static
    pub static_fraction: f32,
    /// Spectral flatness above this is reported as noisy
    pub max_flatness: f32,
    /// Crest factor below this is reported as over-compressed
    pub min_crest_factor: f32,
    /// Peak level above this needs stricter limiting
    pub max_peak_level: f32,
    /// Quality scores below this are reported with high severity
    pub min_quality_score: f32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            window_ms: 10.0,
            energy_floor: 0.001,
            consonant_ratio: 0.15,
            // White noise sits near 2.0; a steady tone below fs/6 stays under 1.0
            static_ratio: 1.0,
            static_fraction: 0.3,
            max_flatness: 0.4,
            min_crest_factor: 2.0,
            max_peak_level: 0.95,
            min_quality_score: 60.0,
        }
    }
}

impl DetectionThresholds {
    /// Window length in samples for the given sample rate (never zero)
    pub fn window_size(&self, sample_rate: u32) -> usize {
        ((sample_rate as f32 * self.window_ms / 1000.0).round() as usize).max(1)
    }
}

/// Shape constants for synthesized consonant bursts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SynthesisConstants {
    /// Peak amplitude of white-noise bursts
    pub noise_amplitude: f32,
    /// Exponential decay rate (1/s) of white-noise bursts
    pub noise_decay: f32,
    /// Peak amplitude of reference-derived bursts
    pub reference_amplitude: f32,
    /// Exponential decay rate (1/s) of reference-derived bursts
    pub reference_decay: f32,
    /// Minimum |first difference| for a reference sample to count as consonant
    pub reference_diff_threshold: f32,
    /// How much of the reference to scan, in seconds
    pub reference_max_secs: f32,
    /// Brick-wall limit applied to the blended output
    pub limit: f32,
}

impl Default for SynthesisConstants {
    fn default() -> Self {
        Self {
            noise_amplitude: 0.3,
            noise_decay: 50.0,
            reference_amplitude: 0.5,
            reference_decay: 40.0,
            reference_diff_threshold: 0.1,
            reference_max_secs: 2.0,
            limit: 0.98,
        }
    }
}

/// Caller-supplied mastering parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MasteringConfig {
    /// Loudness target on the heuristic LUFS scale
    #[serde(rename = "targetLoudnessLUFS", alias = "targetLoudnessLufs")]
    pub target_loudness_lufs: f32,
    /// Spectral tilt, 0.0 = darker, 0.5 = neutral, 1.0 = brighter
    pub spectral_balance: f32,
    /// Soft-saturation blend, 0.0 = untouched dynamics
    pub dynamics_amount: f32,
    /// Consonant correction strength in percent
    pub intensity: f32,
    /// Largest boost or cut the gain stage will apply
    pub max_gain_db: f32,
    /// Gain changes smaller than this are skipped
    pub negligible_gain_db: f32,
}

impl Default for MasteringConfig {
    fn default() -> Self {
        Self {
            target_loudness_lufs: -14.0,
            spectral_balance: 0.5,
            dynamics_amount: 0.0,
            intensity: 50.0,
            max_gain_db: 24.0,
            negligible_gain_db: 0.1,
        }
    }
}

/// Encoder settings for files written by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputConfig {
    pub bit_depth: BitDepth,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bit_depth: BitDepth::Pcm16,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_file(&path) {
            Ok(config) => {
                log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(err) => {
                log::warn!(
                    "[Config] Failed to load {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from JSON file, surfacing read and parse failures
    pub fn try_load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|err| {
            AudioError::unsupported(format!(
                "invalid config {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection.energy_floor, 0.001);
        assert_eq!(config.detection.consonant_ratio, 0.15);
        assert_eq!(config.synthesis.noise_decay, 50.0);
        assert_eq!(config.synthesis.reference_decay, 40.0);
        assert_eq!(config.synthesis.limit, 0.98);
        assert_eq!(config.output.bit_depth, BitDepth::Pcm16);
    }

    #[test]
    fn test_window_size_is_ten_ms() {
        let thresholds = DetectionThresholds::default();
        assert_eq!(thresholds.window_size(44_100), 441);
        assert_eq!(thresholds.window_size(48_000), 480);
        assert_eq!(thresholds.window_size(10_000), 100);
        assert_eq!(thresholds.window_size(1), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "mastering": { "targetLoudnessLUFS": -9.0 }, "output": { "bitDepth": 32 } }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.mastering.target_loudness_lufs, -9.0);
        assert_eq!(parsed.mastering.spectral_balance, 0.5);
        assert_eq!(parsed.output.bit_depth, BitDepth::Float32);
        assert_eq!(parsed.detection, DetectionThresholds::default());
    }

    #[test]
    fn test_invalid_bit_depth_rejected() {
        let json = r#"{ "output": { "bitDepth": 24 } }"#;
        assert!(serde_json::from_str::<AppConfig>(json).is_err());
    }

    #[test]
    fn test_keys_are_camel_case_in_every_section() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        assert!(value["mastering"]["targetLoudnessLUFS"].is_number());
        assert!(value["detection"]["energyFloor"].is_number());
        assert!(value["synthesis"]["noiseDecay"].is_number());
        assert_eq!(value["output"]["bitDepth"], 16);

        let json = r#"{
            "detection": { "energyFloor": 0.01, "windowMs": 20.0 },
            "synthesis": { "noiseDecay": 80.0 },
            "mastering": { "targetLoudnessLufs": -11.0 }
        }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.detection.energy_floor, 0.01);
        assert_eq!(parsed.detection.window_ms, 20.0);
        assert_eq!(parsed.synthesis.noise_decay, 80.0);
        assert_eq!(parsed.mastering.target_loudness_lufs, -11.0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        for json in [
            r#"{ "mastering": { "targetLoudness": -9.0 } }"#,
            r#"{ "detection": { "energy_floor": 0.01 } }"#,
            r#"{ "masterring": {} }"#,
        ] {
            assert!(serde_json::from_str::<AppConfig>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/spectro_config.json");
        assert_eq!(config, AppConfig::default());
        assert!(AppConfig::try_load_from_file("/nonexistent/spectro_config.json").is_err());
    }
}
