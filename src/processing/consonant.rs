//! Consonant synthesis - patch voiced regions that lack an attack transient
//!
//! For every region a short burst with an exponential decay is synthesized
//! and added on top of the original samples (never replacing them):
//!
//! - Without a reference: white noise, `(2u − 1) · A · e^(−d·t)`
//! - With a reference voice: the reference's large first differences
//!   (its consonant transients) cycled through, `c[i mod n] · A · e^(−d·t)`
//!
//! where `t` is seconds since the region start. The blended output is
//! brick-wall limited to `±limit`.
//!
//! Randomness comes from the caller's RNG so output is reproducible under a
//! seeded generator.

use rand::Rng;

use crate::analysis::region::Region;
use crate::audio::SampleBuffer;
use crate::config::SynthesisConstants;

/// Consonant-like samples extracted from a reference recording
#[derive(Debug, Clone, PartialEq)]
pub struct ConsonantBank {
    samples: Vec<f32>,
}

impl ConsonantBank {
    /// First differences of the reference mixdown whose magnitude exceeds
    /// `reference_diff_threshold`, scanning at most `reference_max_secs`
    pub fn from_reference(reference: &SampleBuffer, constants: &SynthesisConstants) -> Self {
        let mono = reference.mixdown();
        let limit = (reference.sample_rate() as f32 * constants.reference_max_secs.max(0.0))
            as usize;
        let scan = &mono[..mono.len().min(limit)];

        let samples = scan
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|diff| diff.abs() > constants.reference_diff_threshold)
            .collect();

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn cycled(&self, index: usize) -> f32 {
        self.samples[index % self.samples.len()]
    }
}

/// Synthesizer bound to a set of shape constants
#[derive(Debug, Clone, Default)]
pub struct ConsonantSynthesizer {
    constants: SynthesisConstants,
}

impl ConsonantSynthesizer {
    pub fn new(constants: SynthesisConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &SynthesisConstants {
        &self.constants
    }

    /// Decaying white-noise burst of `len` samples
    pub fn noise_burst<R: Rng + ?Sized>(&self, len: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        let c = &self.constants;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let u: f32 = rng.gen();
                (2.0 * u - 1.0) * c.noise_amplitude * (-c.noise_decay * t).exp()
            })
            .collect()
    }

    /// Decaying burst cycled from a reference bank of `len` samples
    pub fn reference_burst(&self, bank: &ConsonantBank, len: usize, sample_rate: u32) -> Vec<f32> {
        let c = &self.constants;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                bank.cycled(i) * (-c.reference_decay * t).exp() * c.reference_amplitude
            })
            .collect()
    }

    /// Consonant bank for a reference, `None` when there is no reference or
    /// it has no consonant transients
    pub fn bank_for(&self, reference: Option<&SampleBuffer>) -> Option<ConsonantBank> {
        let bank = reference
            .map(|r| ConsonantBank::from_reference(r, &self.constants))
            .filter(|bank| !bank.is_empty());
        if reference.is_some() && bank.is_none() {
            log::warn!("[Consonant] Reference has no consonant transients, using noise bursts");
        }
        bank
    }

    /// Add a synthesized burst to every region and limit the result
    ///
    /// `intensity` is a percentage, see [`normalize_intensity`]. Regions
    /// extending past the buffer are truncated; an empty reference bank falls
    /// back to noise.
    pub fn synthesize_and_blend<R: Rng + ?Sized>(
        &self,
        buffer: &SampleBuffer,
        regions: &[Region],
        reference: Option<&SampleBuffer>,
        intensity: f32,
        rng: &mut R,
    ) -> SampleBuffer {
        let bank = self.bank_for(reference);
        self.blend(buffer, regions, bank.as_ref(), intensity, rng)
    }

    /// Blend bursts drawn from `bank` (noise when `None`) into `regions`
    pub fn blend<R: Rng + ?Sized>(
        &self,
        buffer: &SampleBuffer,
        regions: &[Region],
        bank: Option<&ConsonantBank>,
        intensity: f32,
        rng: &mut R,
    ) -> SampleBuffer {
        let mix = normalize_intensity(intensity) / 100.0;
        let limit = self.constants.limit.abs();
        let sample_rate = buffer.sample_rate();
        let frame_count = buffer.frame_count();

        let mut output = buffer.clone();
        let mut patched = 0usize;
        for region in regions.iter().filter_map(|r| r.clamp_to(frame_count)) {
            let burst = match bank {
                Some(bank) => self.reference_burst(bank, region.len(), sample_rate),
                None => self.noise_burst(region.len(), sample_rate, rng),
            };

            for channel in output.channels_mut() {
                for (sample, synth) in channel[region.start..region.end].iter_mut().zip(&burst) {
                    *sample += synth * mix;
                }
            }
            patched += 1;
        }

        for channel in output.channels_mut() {
            channel
                .iter_mut()
                .for_each(|s| *s = s.clamp(-limit, limit));
        }

        log::debug!(
            "[Consonant] Patched {} region(s) at {:.0}% intensity ({} source)",
            patched,
            mix * 100.0,
            if bank.is_some() { "reference" } else { "noise" }
        );

        output
    }
}

/// Clamp an intensity percentage to `[0, 100]`; NaN and infinities map to 0
pub fn normalize_intensity(intensity: f32) -> f32 {
    if intensity.is_finite() {
        intensity.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Blend synthesized consonant bursts into `regions` of `buffer`
pub fn synthesize_and_blend<R: Rng + ?Sized>(
    buffer: &SampleBuffer,
    regions: &[Region],
    reference: Option<&SampleBuffer>,
    intensity: f32,
    constants: &SynthesisConstants,
    rng: &mut R,
) -> SampleBuffer {
    ConsonantSynthesizer::new(constants.clone()).synthesize_and_blend(
        buffer, regions, reference, intensity, rng,
    )
}
