// Audio module - in-memory sample buffers and the WAV codec boundary

pub mod buffer;
pub mod decode;
pub mod wav;

// Re-export commonly used types for convenience
pub use buffer::SampleBuffer;
pub use decode::{decode, decode_file};
pub use wav::{encode, write_wav, BitDepth, WAV_HEADER_LEN};
