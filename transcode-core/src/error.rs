//! Error types for the Transcode core types.
//!
//! Covers descriptor construction, buffer wrapping and format name parsing.

use thiserror::Error;

/// Main error type for the Transcode core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Frame dimensions are zero or too large to address.
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Buffer too small for the described frame layout.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Format name not recognized.
    #[error("Unknown video format: {0}")]
    UnknownFormat(String),
}

/// Result type alias using the Transcode core error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid dimensions error.
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }
}
