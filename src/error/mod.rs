// Error types for the SpectroModel audio core
//
// This module defines the error type shared by the decode boundary, the WAV
// encoder and the configuration loaders, with numeric codes so the web layer
// can map failures without parsing messages.

mod audio;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library/CLI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
