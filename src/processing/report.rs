//! Processing report - what a transformation did and what the analysis found

use serde::{Deserialize, Serialize};

use crate::analysis::detector::{Recommendation, Severity};
use crate::analysis::features::FeatureSet;

/// Transformation stages that can appear in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessKind {
    LoudnessGain,
    SpectralTilt,
    SoftSaturation,
    HardClip,
    ConsonantSynthesis,
    Limiter,
}

/// One applied stage with a human-readable description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedProcess {
    #[serde(rename = "type")]
    pub kind: ProcessKind,
    pub details: String,
}

impl AppliedProcess {
    pub fn new(kind: ProcessKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: details.into(),
        }
    }
}

/// Loudness-related subset of a [`FeatureSet`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoudnessSnapshot {
    #[serde(rename = "estimatedLUFS")]
    pub estimated_lufs: f32,
    pub peak_level: f32,
    pub crest_factor: f32,
}

impl From<&FeatureSet> for LoudnessSnapshot {
    fn from(features: &FeatureSet) -> Self {
        Self {
            estimated_lufs: features.estimated_lufs,
            peak_level: features.peak_level,
            crest_factor: features.crest_factor,
        }
    }
}

/// Summary returned next to every transformed buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingReport {
    /// Empty when the input needed no change
    pub processes_applied: Vec<AppliedProcess>,
    pub regions_detected: usize,
    pub input_analysis: LoudnessSnapshot,
    pub output_analysis: LoudnessSnapshot,
    pub recommendations: Vec<Recommendation>,
}

impl ProcessingReport {
    pub fn new(input: &FeatureSet, output: &FeatureSet) -> Self {
        Self {
            processes_applied: Vec::new(),
            regions_detected: 0,
            input_analysis: input.into(),
            output_analysis: output.into(),
            recommendations: Vec::new(),
        }
    }

    pub fn applied(&self, kind: ProcessKind) -> bool {
        self.processes_applied.iter().any(|p| p.kind == kind)
    }

    /// Most urgent recommendation severity, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.recommendations.iter().map(|r| r.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let features = FeatureSet::silent();
        let mut report = ProcessingReport::new(&features, &features);
        report
            .processes_applied
            .push(AppliedProcess::new(ProcessKind::LoudnessGain, "+3.0 dB"));
        report.recommendations.push(Recommendation::clean());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["processesApplied"][0]["type"], "loudnessGain");
        assert_eq!(json["processesApplied"][0]["details"], "+3.0 dB");
        assert!(json["inputAnalysis"]["estimatedLUFS"].is_number());
        assert_eq!(json["recommendations"][0]["severity"], "info");
        assert_eq!(report.max_severity(), Some(Severity::Info));
        assert!(report.applied(ProcessKind::LoudnessGain));
        assert!(!report.applied(ProcessKind::HardClip));
    }
}
