//! Error types for raw video access.

use thiserror::Error;

/// Errors raised by the frame store, decoder and crop tool.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Geometry or file size cannot describe a playable video.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Fewer bytes were available than one frame needs.
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    /// Requested frame range lies outside the file.
    #[error("Invalid frame range {start}..={end} (video has {total} frames)")]
    InvalidRange {
        start: usize,
        end: usize,
        total: usize,
    },

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;
