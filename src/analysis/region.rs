// Region - tagged half-open sample interval within a buffer

use serde::{Deserialize, Serialize};

/// What a region was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionKind {
    /// Plain analysis window, not yet classified
    Unclassified,
    /// Voiced window with no consonant transient
    MissingConsonant,
    /// Noise-like window (hiss, static)
    StaticNoise,
}

/// Half-open frame interval `[start, end)` with a classification and score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub kind: RegionKind,
    /// High-frequency energy ratio of the window that produced this region
    pub score: f32,
}

impl Region {
    /// Create a region, returning `None` unless `start < end`
    pub fn new(start: usize, end: usize, kind: RegionKind, score: f32) -> Option<Self> {
        (start < end).then_some(Self {
            start,
            end,
            kind,
            score,
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Same interval and score under a new classification
    pub fn with_kind(self, kind: RegionKind) -> Self {
        Self { kind, ..self }
    }

    /// Clip the region to a buffer of `frame_count` frames
    pub fn clamp_to(self, frame_count: usize) -> Option<Self> {
        Region::new(
            self.start.min(frame_count),
            self.end.min(frame_count),
            self.kind,
            self.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_interval() {
        assert!(Region::new(10, 10, RegionKind::MissingConsonant, 0.0).is_none());
        assert!(Region::new(11, 10, RegionKind::MissingConsonant, 0.0).is_none());
        assert_eq!(
            Region::new(10, 20, RegionKind::StaticNoise, 1.5).map(|r| r.len()),
            Some(10)
        );
    }

    #[test]
    fn test_clamp_to_buffer() {
        let region = Region::new(90, 120, RegionKind::MissingConsonant, 0.1).unwrap();
        assert_eq!(region.clamp_to(100).map(|r| (r.start, r.end)), Some((90, 100)));
        assert!(region.clamp_to(90).is_none());
    }

    #[test]
    fn test_kind_serializes_camel_case() {
        let json = serde_json::to_string(&RegionKind::MissingConsonant).unwrap();
        assert_eq!(json, "\"missingConsonant\"");
    }
}
