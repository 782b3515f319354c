// Temporal module - Time-domain feature extraction
//
// Level, energy and first-difference measurements computed directly on
// samples. The first difference acts as a crude high-pass filter: its energy
// relative to the signal energy grows with frequency content
// (2·(1 − cos ω) for a sinusoid at ω rad/sample, ≈ 2.0 for white noise).

/// Fixed offset from RMS dBFS to the heuristic loudness scale
///
/// Borrowed from the BS.1770 constant so full-scale sines read close to
/// their measured LUFS; no K-weighting is applied.
pub const LUFS_OFFSET_DB: f32 = -0.691;

/// RMS floor used before taking the logarithm
const RMS_FLOOR: f32 = 1e-12;

/// Σ s²
pub fn energy(samples: &[f32]) -> f32 {
    samples.iter().map(|&s| s * s).sum()
}

/// Σ (s[i] − s[i−1])² for i ≥ 1 within the slice
pub fn first_difference_energy(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|pair| {
            let d = pair[1] - pair[0];
            d * d
        })
        .sum()
}

/// High-frequency energy ratio, defined as 0.0 when `total_energy` is 0
#[inline]
pub fn energy_ratio(high_freq_energy: f32, total_energy: f32) -> f32 {
    if total_energy > 0.0 {
        high_freq_energy / total_energy
    } else {
        0.0
    }
}

/// Largest absolute sample value
pub fn peak_level(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, &s| peak.max(s.abs()))
}

/// Root mean square level
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (energy(samples) / samples.len() as f32).sqrt()
}

/// Peak / RMS, 0.0 for silence
pub fn crest_factor(peak: f32, rms: f32) -> f32 {
    if rms > 0.0 {
        peak / rms
    } else {
        0.0
    }
}

/// Map a whole-buffer high-frequency ratio onto `[0, 1]`
pub fn flatness_proxy(ratio: f32) -> f32 {
    (ratio / 2.0).clamp(0.0, 1.0)
}

/// Heuristic loudness estimate from RMS
pub fn estimate_lufs(rms: f32) -> f32 {
    20.0 * rms.max(RMS_FLOOR).log10() + LUFS_OFFSET_DB
}
