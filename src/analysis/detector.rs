// Detector - static/quality classification over windowed analysis
//
// Two passes over the descriptors produced by FeatureExtractor:
//
// 1. Region detection (per 10 ms window):
//    - MissingConsonant: energy > energy_floor AND hf ratio < consonant_ratio
//      (voiced, but no consonant transient)
//    - StaticNoise: energy > 0 AND hf ratio > static_ratio (noise-like)
// 2. Buffer classification: static flag, quality score, and a list of
//    recommendations with severities.
//
// Quality issues are advisory: nothing here fails, callers receive a report
// annotated with high-severity entries instead.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{analyze_windows, FeatureSet, WindowAnalysis};
use crate::analysis::region::{Region, RegionKind};
use crate::audio::SampleBuffer;
use crate::config::DetectionThresholds;

/// Quality score penalty when static is detected
const STATIC_PENALTY: f32 = 40.0;
/// Quality score penalty for noisy spectral flatness
const NOISY_PENALTY: f32 = 20.0;
/// Quality score penalty for a crushed crest factor
const COMPRESSION_PENALTY: f32 = 15.0;
/// Quality score penalty for peaks close to full scale
const PEAK_PENALTY: f32 = 10.0;
/// Quality score penalty scaled by the share of voiced windows lacking consonants
const MISSING_CONSONANT_PENALTY: f32 = 25.0;

/// Recommendation severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

/// Human-readable advice produced by [`QualityDetector::classify`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
}

impl Recommendation {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// The single entry returned when no condition triggers
    pub fn clean() -> Self {
        Self::new(
            Severity::Info,
            "Audio is clean: no static, noise, compression or peak issues detected",
        )
    }
}

/// Result of the region pass over one buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    /// Missing-consonant and static-noise regions, ordered by start
    pub regions: Vec<Region>,
    pub window_count: usize,
    /// Windows with any energy at all
    pub active_windows: usize,
    /// Windows above the energy floor
    pub voiced_windows: usize,
    pub missing_consonant_windows: usize,
    pub static_windows: usize,
    pub has_static: bool,
    /// 0-100, higher is better
    pub quality_score: f32,
}

impl QualityAssessment {
    pub fn regions_of(&self, kind: RegionKind) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }

    /// Share of active windows that are noise-like
    pub fn static_fraction(&self) -> f32 {
        if self.active_windows == 0 {
            0.0
        } else {
            self.static_windows as f32 / self.active_windows as f32
        }
    }

    /// Share of voiced windows lacking a consonant transient
    pub fn missing_consonant_fraction(&self) -> f32 {
        if self.voiced_windows == 0 {
            0.0
        } else {
            self.missing_consonant_windows as f32 / self.voiced_windows as f32
        }
    }
}

/// Detector configured with a fixed set of thresholds
#[derive(Debug, Clone, Default)]
pub struct QualityDetector {
    thresholds: DetectionThresholds,
}

impl QualityDetector {
    pub fn new(thresholds: DetectionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Classify one analysis window, `None` when it is unremarkable
    pub fn classify_window(&self, window: &WindowAnalysis) -> Option<Region> {
        let t = &self.thresholds;
        if window.total_energy > t.energy_floor && window.ratio < t.consonant_ratio {
            Some(window.region.with_kind(RegionKind::MissingConsonant))
        } else if window.total_energy > 0.0 && window.ratio > t.static_ratio {
            Some(window.region.with_kind(RegionKind::StaticNoise))
        } else {
            None
        }
    }

    /// Regions of interest in a buffer, ordered by start
    pub fn detect_regions(&self, buffer: &SampleBuffer) -> Vec<Region> {
        let window_size = self.thresholds.window_size(buffer.sample_rate());
        analyze_windows(buffer, window_size)
            .iter()
            .filter_map(|window| self.classify_window(window))
            .collect()
    }

    /// Region pass plus static flag and quality score
    pub fn assess(&self, buffer: &SampleBuffer, features: &FeatureSet) -> QualityAssessment {
        let t = &self.thresholds;
        let window_size = t.window_size(buffer.sample_rate());
        let windows = analyze_windows(buffer, window_size);

        let active_windows = windows.iter().filter(|w| w.total_energy > 0.0).count();
        let voiced_windows = windows
            .iter()
            .filter(|w| w.total_energy > t.energy_floor)
            .count();
        let regions: Vec<Region> = windows
            .iter()
            .filter_map(|window| self.classify_window(window))
            .collect();
        let missing_consonant_windows = regions
            .iter()
            .filter(|r| r.kind == RegionKind::MissingConsonant)
            .count();
        let static_windows = regions.len() - missing_consonant_windows;

        let mut assessment = QualityAssessment {
            regions,
            window_count: windows.len(),
            active_windows,
            voiced_windows,
            missing_consonant_windows,
            static_windows,
            has_static: false,
            quality_score: 100.0,
        };
        assessment.has_static = assessment.static_fraction() > t.static_fraction;
        assessment.quality_score = self.quality_score(features, &assessment);

        log::debug!(
            "[Detector] {} windows ({} voiced): {} missing-consonant, {} static, score {:.1}",
            assessment.window_count,
            assessment.voiced_windows,
            assessment.missing_consonant_windows,
            assessment.static_windows,
            assessment.quality_score
        );

        assessment
    }

    fn is_noisy(&self, features: &FeatureSet) -> bool {
        features.spectral_flatness > self.thresholds.max_flatness
    }

    fn is_over_compressed(&self, features: &FeatureSet) -> bool {
        features.has_signal() && features.crest_factor < self.thresholds.min_crest_factor
    }

    fn is_hot(&self, features: &FeatureSet) -> bool {
        features.peak_level > self.thresholds.max_peak_level
    }

    fn quality_score(&self, features: &FeatureSet, assessment: &QualityAssessment) -> f32 {
        let mut score = 100.0;
        if assessment.has_static {
            score -= STATIC_PENALTY;
        }
        if self.is_noisy(features) {
            score -= NOISY_PENALTY;
        }
        if self.is_over_compressed(features) {
            score -= COMPRESSION_PENALTY;
        }
        if self.is_hot(features) {
            score -= PEAK_PENALTY;
        }
        score -= MISSING_CONSONANT_PENALTY * assessment.missing_consonant_fraction();
        score.clamp(0.0, 100.0)
    }

    /// Recommendations covering every triggered condition, most severe first
    ///
    /// Returns exactly one `info` entry when nothing triggers.
    pub fn classify(
        &self,
        features: &FeatureSet,
        assessment: &QualityAssessment,
    ) -> Vec<Recommendation> {
        let t = &self.thresholds;
        let mut recommendations = Vec::new();

        if assessment.has_static {
            recommendations.push(Recommendation::new(
                Severity::High,
                format!(
                    "Static detected in {:.0}% of windows: apply noise reduction before mastering",
                    assessment.static_fraction() * 100.0
                ),
            ));
        }
        if assessment.quality_score < t.min_quality_score {
            recommendations.push(Recommendation::new(
                Severity::High,
                format!(
                    "Quality score {:.0} is below the acceptance threshold of {:.0}",
                    assessment.quality_score, t.min_quality_score
                ),
            ));
        }
        if self.is_noisy(features) {
            recommendations.push(Recommendation::new(
                Severity::Medium,
                format!(
                    "Spectral flatness {:.2} indicates a noisy signal: consider denoising",
                    features.spectral_flatness
                ),
            ));
        }
        if self.is_over_compressed(features) {
            recommendations.push(Recommendation::new(
                Severity::Medium,
                format!(
                    "Crest factor {:.2} indicates over-compression: reduce limiting or compression",
                    features.crest_factor
                ),
            ));
        }
        if self.is_hot(features) {
            recommendations.push(Recommendation::new(
                Severity::Low,
                format!(
                    "Peak level {:.3} is close to full scale: apply stricter limiting",
                    features.peak_level
                ),
            ));
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::clean());
        }

        recommendations
    }
}

/// Regions of interest using the given thresholds
pub fn detect_regions(buffer: &SampleBuffer, thresholds: &DetectionThresholds) -> Vec<Region> {
    QualityDetector::new(thresholds.clone()).detect_regions(buffer)
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
