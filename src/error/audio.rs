// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Single source of truth for the numeric codes reported by [`AudioError`].
///
/// Error code range: 1001-1004
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Input bytes could not be decoded into a sample buffer
    pub const DECODE_FAILED: i32 = 1001;

    /// Channel count, sample rate or bit depth outside the supported set
    pub const UNSUPPORTED_CONFIGURATION: i32 = 1002;

    /// Input has no usable samples for the requested operation
    pub const DEGENERATE_INPUT: i32 = 1003;

    /// Filesystem read/write failed
    pub const IO: i32 = 1004;
}

/// Log an audio error with structured context
///
/// This function logs audio errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - context: Where the error surfaced
/// - message: Human-readable error message
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// Transformations are total over well-formed buffers, so these errors only
/// surface at the boundaries: decoding, buffer construction, configuration
/// and file I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Input bytes are not a supported, well-formed audio file
    DecodeFailed { reason: String },

    /// Zero channels, zero sample rate, unequal channel lengths, bad bit depth
    UnsupportedConfiguration { reason: String },

    /// Input has nothing to operate on
    DegenerateInput { reason: String },

    /// Filesystem error
    Io { details: String },
}

impl AudioError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        AudioError::UnsupportedConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        AudioError::DecodeFailed {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::DecodeFailed { .. } => AudioErrorCodes::DECODE_FAILED,
            AudioError::UnsupportedConfiguration { .. } => {
                AudioErrorCodes::UNSUPPORTED_CONFIGURATION
            }
            AudioError::DegenerateInput { .. } => AudioErrorCodes::DEGENERATE_INPUT,
            AudioError::Io { .. } => AudioErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::DecodeFailed { reason } => format!("Failed to decode audio: {}", reason),
            AudioError::UnsupportedConfiguration { reason } => {
                format!("Unsupported configuration: {}", reason)
            }
            AudioError::DegenerateInput { reason } => format!("Degenerate input: {}", reason),
            AudioError::Io { details } => format!("I/O error: {}", details),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

/// Convert from std::io::Error to AudioError
impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::Io {
            details: err.to_string(),
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => io.into(),
            other => AudioError::DecodeFailed {
                reason: other.to_string(),
            },
        }
    }
}
