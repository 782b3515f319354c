// Processing module - buffer transformations and their reports
//
// Both transformations are pure: they clone the input buffer, transform the
// copy and return it alongside what was done.

pub mod consonant;
pub mod mastering;
pub mod report;

pub use consonant::{
    normalize_intensity, synthesize_and_blend, ConsonantBank, ConsonantSynthesizer,
};
pub use mastering::apply_mastering;
pub use report::{AppliedProcess, LoudnessSnapshot, ProcessKind, ProcessingReport};
