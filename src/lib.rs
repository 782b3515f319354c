// SpectroModel Audio Core - offline vocal analysis and processing
// Decode, measure, repair and master PCM buffers, then encode them as WAV

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod processing;

// Re-exports for convenience
pub use analysis::{AnalysisReport, FeatureSet, QualityAssessment, Region, RegionKind};
pub use audio::{decode, encode, BitDepth, SampleBuffer};
pub use config::AppConfig;
pub use error::{AudioError, ErrorCode};
pub use pipeline::{AudioPipeline, Operation, PipelineOutput};
pub use processing::ProcessingReport;
