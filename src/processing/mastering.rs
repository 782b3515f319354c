//! Mastering - single-pass loudness gain stage
//!
//! One gain is computed from the input's estimated loudness and applied
//! uniformly; there is no measure/adjust loop. Optional stages, each skipped
//! at its neutral setting:
//!
//! 1. Loudness gain toward `target_loudness_lufs`, bounded by `max_gain_db`
//! 2. Spectral tilt from `spectral_balance` (0.5 = neutral): a first-difference
//!    shelf `y = x + k·(x − x[n−1])` with `k = 2·(balance − 0.5)`
//! 3. Soft saturation from `dynamics_amount`: `y = (1 − a)·x + a·tanh(x)`
//! 4. Hard clip to `[-1, 1]`

use crate::analysis::features::{FeatureExtractor, FeatureSet};
use crate::audio::SampleBuffer;
use crate::config::MasteringConfig;

use super::report::{AppliedProcess, ProcessKind, ProcessingReport};

/// Settings within this distance of neutral are treated as neutral
const NEUTRAL_EPSILON: f32 = 1e-3;

/// Convert decibels to a linear amplitude factor
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Gain in dB the stage would apply for these features, `None` when skipped
pub fn planned_gain_db(config: &MasteringConfig, features: &FeatureSet) -> Option<f32> {
    if !features.has_signal() {
        return None;
    }
    let max = config.max_gain_db.abs();
    let gain_db = (config.target_loudness_lufs - features.estimated_lufs).clamp(-max, max);
    (gain_db.abs() >= config.negligible_gain_db).then_some(gain_db)
}

/// Master a buffer in one pass
///
/// `features` must describe `buffer` (usually from [`FeatureExtractor::extract`]).
pub fn apply_mastering(
    buffer: &SampleBuffer,
    config: &MasteringConfig,
    features: &FeatureSet,
) -> (SampleBuffer, ProcessingReport) {
    let mut output = buffer.clone();
    let mut processes = Vec::new();

    if let Some(gain_db) = planned_gain_db(config, features) {
        let gain = db_to_gain(gain_db);
        for channel in output.channels_mut() {
            channel.iter_mut().for_each(|s| *s *= gain);
        }
        processes.push(AppliedProcess::new(
            ProcessKind::LoudnessGain,
            format!(
                "{:+.2} dB ({:.1} -> {:.1} LUFS est.)",
                gain_db, features.estimated_lufs, config.target_loudness_lufs
            ),
        ));
    }

    let tilt = 2.0 * (config.spectral_balance.clamp(0.0, 1.0) - 0.5);
    if tilt.abs() > NEUTRAL_EPSILON {
        for channel in output.channels_mut() {
            apply_tilt(channel, tilt);
        }
        processes.push(AppliedProcess::new(
            ProcessKind::SpectralTilt,
            format!(
                "{} shelf, k = {:+.2}",
                if tilt > 0.0 { "brightening" } else { "darkening" },
                tilt
            ),
        ));
    }

    let amount = config.dynamics_amount.clamp(0.0, 1.0);
    if amount > NEUTRAL_EPSILON {
        for channel in output.channels_mut() {
            channel
                .iter_mut()
                .for_each(|s| *s = (1.0 - amount) * *s + amount * s.tanh());
        }
        processes.push(AppliedProcess::new(
            ProcessKind::SoftSaturation,
            format!("{:.0}% tanh blend", amount * 100.0),
        ));
    }

    let clipped = hard_clip(&mut output);
    if clipped > 0 {
        processes.push(AppliedProcess::new(
            ProcessKind::HardClip,
            format!("{} samples clipped to [-1, 1]", clipped),
        ));
    }

    let output_features = FeatureExtractor::new(output.sample_rate()).extract(&output);
    let mut report = ProcessingReport::new(features, &output_features);
    report.processes_applied = processes;

    log::info!(
        "[Mastering] {:.2} -> {:.2} LUFS est., {} stage(s) applied",
        report.input_analysis.estimated_lufs,
        report.output_analysis.estimated_lufs,
        report.processes_applied.len()
    );

    (output, report)
}

fn apply_tilt(channel: &mut [f32], k: f32) {
    let mut previous = 0.0f32;
    for sample in channel.iter_mut() {
        let x = *sample;
        *sample = x + k * (x - previous);
        previous = x;
    }
}

/// Clamp every sample to `[-1, 1]`, returning how many were out of range
fn hard_clip(buffer: &mut SampleBuffer) -> usize {
    let mut clipped = 0;
    for channel in buffer.channels_mut() {
        for sample in channel.iter_mut() {
            if sample.abs() > 1.0 {
                *sample = sample.clamp(-1.0, 1.0);
                clipped += 1;
            }
        }
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::extract_features;
    use std::f32::consts::PI;

    fn sine_buffer(amplitude: f32) -> SampleBuffer {
        let samples = (0..44_100)
            .map(|i| amplitude * (2.0 * PI * 1000.0 * i as f32 / 44_100.0).sin())
            .collect();
        SampleBuffer::mono(samples, 44_100).unwrap()
    }

    /// 200 Hz + 8 kHz, so a tilt shifts the balance between the partials
    fn two_tone_buffer() -> SampleBuffer {
        let samples = (0..44_100)
            .map(|i| {
                let t = i as f32 / 44_100.0;
                0.3 * (2.0 * PI * 200.0 * t).sin() + 0.1 * (2.0 * PI * 8000.0 * t).sin()
            })
            .collect();
        SampleBuffer::mono(samples, 44_100).unwrap()
    }

    #[test]
    fn test_gain_reaches_target_in_one_pass() {
        let buffer = sine_buffer(0.5);
        let features = extract_features(&buffer);
        let config = MasteringConfig::default();
        let (output, report) = apply_mastering(&buffer, &config, &features);

        assert!(
            (report.output_analysis.estimated_lufs - config.target_loudness_lufs).abs() < 0.05,
            "output {}",
            report.output_analysis.estimated_lufs
        );
        assert_eq!(report.processes_applied.len(), 1);
        assert!(report.applied(ProcessKind::LoudnessGain));
        assert!(output.channels()[0].iter().all(|s| s.abs() <= 1.0));
        // input untouched
        assert_eq!(buffer, sine_buffer(0.5));
    }

    #[test]
    fn test_negligible_change_applies_nothing() {
        let buffer = sine_buffer(0.5);
        let features = extract_features(&buffer);
        let config = MasteringConfig {
            target_loudness_lufs: features.estimated_lufs + 0.01,
            ..MasteringConfig::default()
        };
        let (output, report) = apply_mastering(&buffer, &config, &features);
        assert!(report.processes_applied.is_empty());
        assert_eq!(output, buffer);
    }

    #[test]
    fn test_silence_is_left_alone() {
        let buffer = SampleBuffer::mono(vec![0.0; 4_410], 44_100).unwrap();
        let features = extract_features(&buffer);
        let (output, report) = apply_mastering(&buffer, &MasteringConfig::default(), &features);
        assert!(report.processes_applied.is_empty());
        assert_eq!(output, buffer);
        assert_eq!(planned_gain_db(&MasteringConfig::default(), &features), None);
    }

    #[test]
    fn test_large_boost_is_bounded_and_clipped() {
        let buffer = sine_buffer(0.01);
        let features = extract_features(&buffer);
        let config = MasteringConfig {
            target_loudness_lufs: 0.0,
            max_gain_db: 48.0,
            ..MasteringConfig::default()
        };
        let (output, report) = apply_mastering(&buffer, &config, &features);
        assert!(report.applied(ProcessKind::HardClip));
        assert!(output.channels()[0].iter().all(|s| (-1.0..=1.0).contains(s)));

        let capped = MasteringConfig {
            target_loudness_lufs: 0.0,
            max_gain_db: 6.0,
            ..MasteringConfig::default()
        };
        assert_eq!(planned_gain_db(&capped, &features), Some(6.0));
    }

    #[test]
    fn test_spectral_balance_and_dynamics_are_applied() {
        let buffer = two_tone_buffer();
        let features = extract_features(&buffer);
        let config = MasteringConfig {
            target_loudness_lufs: features.estimated_lufs,
            spectral_balance: 1.0,
            dynamics_amount: 0.5,
            ..MasteringConfig::default()
        };
        let (output, report) = apply_mastering(&buffer, &config, &features);
        assert!(!report.applied(ProcessKind::LoudnessGain));
        assert!(report.applied(ProcessKind::SpectralTilt));
        assert!(report.applied(ProcessKind::SoftSaturation));

        let out_features = extract_features(&output);
        assert!(
            out_features.high_frequency_energy_ratio > features.high_frequency_energy_ratio,
            "brightening should raise the hf ratio"
        );
    }

    #[test]
    fn test_stages_run_gain_tilt_saturation_in_order() {
        let buffer = two_tone_buffer();
        let features = extract_features(&buffer);
        let config = MasteringConfig {
            target_loudness_lufs: features.estimated_lufs + 3.0,
            spectral_balance: 0.8,
            dynamics_amount: 0.3,
            ..MasteringConfig::default()
        };
        let (_, report) = apply_mastering(&buffer, &config, &features);
        let kinds: Vec<ProcessKind> = report.processes_applied.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProcessKind::LoudnessGain,
                ProcessKind::SpectralTilt,
                ProcessKind::SoftSaturation
            ]
        );
    }

    #[test]
    fn test_darkening_lowers_hf_ratio() {
        let buffer = two_tone_buffer();
        let features = extract_features(&buffer);
        let config = MasteringConfig {
            target_loudness_lufs: features.estimated_lufs,
            spectral_balance: 0.25,
            ..MasteringConfig::default()
        };
        let (output, _) = apply_mastering(&buffer, &config, &features);
        assert!(
            extract_features(&output).high_frequency_energy_ratio
                < features.high_frequency_energy_ratio
        );
    }
}
