// Analysis module - descriptors and quality classification
//
// Pipeline: FeatureExtractor (whole buffer + 10 ms windows) → QualityDetector
// (regions, static flag, quality score) → recommendations.

pub mod detector;
pub mod features;
pub mod region;

pub use detector::{
    detect_regions, QualityAssessment, QualityDetector, Recommendation, Severity,
};
pub use features::{analyze_windows, extract_features, FeatureExtractor, FeatureSet, WindowAnalysis};
pub use region::{Region, RegionKind};

use serde::{Deserialize, Serialize};

/// Everything the analysis pass learns about one buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub sample_rate: u32,
    pub channels: usize,
    pub frame_count: usize,
    pub features: FeatureSet,
    pub assessment: QualityAssessment,
    pub recommendations: Vec<Recommendation>,
}
