//! Pipeline - decode → analyze → transform → encode
//!
//! `AudioPipeline` wires the stages together with one [`AppConfig`]. Each
//! call works on its own buffer; the pipeline holds no per-call state.

use rand::Rng;
use tracing::{debug, info, info_span};

use crate::analysis::{AnalysisReport, FeatureExtractor, QualityDetector, RegionKind};
use crate::audio::{decode, encode, SampleBuffer};
use crate::config::AppConfig;
use crate::error::{log_audio_error, AudioError};
use crate::processing::{
    apply_mastering, normalize_intensity, AppliedProcess, ConsonantSynthesizer, ProcessKind,
    ProcessingReport,
};

/// Transformation to run in [`AudioPipeline::process_bytes`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Single-pass mastering with the configured `MasteringConfig`
    Master,
    /// Patch missing consonants at the configured intensity
    CorrectConsonants,
}

/// Encoded output plus the report describing it
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub wav: Vec<u8>,
    pub buffer: SampleBuffer,
    pub report: ProcessingReport,
}

/// Configured processing pipeline
#[derive(Debug, Clone, Default)]
pub struct AudioPipeline {
    config: AppConfig,
}

impl AudioPipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn detector(&self) -> QualityDetector {
        QualityDetector::new(self.config.detection.clone())
    }

    /// Features, regions and recommendations for a buffer
    pub fn analyze(&self, buffer: &SampleBuffer) -> AnalysisReport {
        let _span = info_span!("analyze", frames = buffer.frame_count()).entered();
        let detector = self.detector();
        let features = FeatureExtractor::new(buffer.sample_rate()).extract(buffer);
        let assessment = detector.assess(buffer, &features);
        let recommendations = detector.classify(&features, &assessment);

        debug!(
            regions = assessment.regions.len(),
            score = assessment.quality_score,
            "analysis complete"
        );

        AnalysisReport {
            sample_rate: buffer.sample_rate(),
            channels: buffer.num_channels(),
            frame_count: buffer.frame_count(),
            features,
            assessment,
            recommendations,
        }
    }

    /// Master a buffer; recommendations describe the mastered output
    pub fn master(&self, buffer: &SampleBuffer) -> (SampleBuffer, ProcessingReport) {
        let _span = info_span!("master", frames = buffer.frame_count()).entered();
        let input = self.analyze(buffer);
        let (output, mut report) = apply_mastering(buffer, &self.config.mastering, &input.features);

        let after = self.analyze(&output);
        report.regions_detected = input.assessment.regions.len();
        report.recommendations = after.recommendations;

        info!(
            processes = report.processes_applied.len(),
            lufs_in = report.input_analysis.estimated_lufs,
            lufs_out = report.output_analysis.estimated_lufs,
            "mastering complete"
        );
        (output, report)
    }

    /// Detect missing-consonant regions and blend synthesized bursts into them
    pub fn correct_consonants<R: Rng + ?Sized>(
        &self,
        buffer: &SampleBuffer,
        reference: Option<&SampleBuffer>,
        rng: &mut R,
    ) -> (SampleBuffer, ProcessingReport) {
        let _span = info_span!("correct_consonants", frames = buffer.frame_count()).entered();
        let input = self.analyze(buffer);
        let regions: Vec<_> = input
            .assessment
            .regions_of(RegionKind::MissingConsonant)
            .copied()
            .collect();

        let intensity = normalize_intensity(self.config.mastering.intensity);
        let synthesizer = ConsonantSynthesizer::new(self.config.synthesis.clone());
        let bank = synthesizer.bank_for(reference);
        let output = synthesizer.blend(buffer, &regions, bank.as_ref(), intensity, rng);

        let after = self.analyze(&output);
        let mut report = ProcessingReport::new(&input.features, &after.features);
        report.regions_detected = regions.len();
        report.recommendations = after.recommendations;
        if !regions.is_empty() && intensity > 0.0 {
            report.processes_applied.push(AppliedProcess::new(
                ProcessKind::ConsonantSynthesis,
                format!(
                    "{} region(s) at {:.0}% intensity from {}",
                    regions.len(),
                    intensity,
                    if bank.is_some() { "reference voice" } else { "noise bursts" }
                ),
            ));
        }
        if !report.applied(ProcessKind::ConsonantSynthesis) && output != *buffer {
            report.processes_applied.push(AppliedProcess::new(
                ProcessKind::Limiter,
                format!("brick-wall limit at ±{:.2}", self.config.synthesis.limit),
            ));
        }

        info!(
            regions = regions.len(),
            intensity,
            "consonant correction complete"
        );
        (output, report)
    }

    /// Run one operation over encoded WAV bytes
    ///
    /// Decode failures are logged and propagated unchanged.
    pub fn process_bytes<R: Rng + ?Sized>(
        &self,
        input: &[u8],
        reference: Option<&[u8]>,
        operation: Operation,
        rng: &mut R,
    ) -> Result<PipelineOutput, AudioError> {
        let buffer = decode(input).inspect_err(|err| log_audio_error(err, "process_bytes input"))?;
        let reference = reference
            .map(decode)
            .transpose()
            .inspect_err(|err| log_audio_error(err, "process_bytes reference"))?;

        let (buffer, report) = match operation {
            Operation::Master => self.master(&buffer),
            Operation::CorrectConsonants => {
                self.correct_consonants(&buffer, reference.as_ref(), rng)
            }
        };

        let wav = encode(&buffer, self.config.output.bit_depth);
        Ok(PipelineOutput {
            wav,
            buffer,
            report,
        })
    }
}
