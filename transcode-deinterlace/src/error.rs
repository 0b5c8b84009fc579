//! Error types for deinterlacing operations.
//!
//! Only recoverable caller mistakes are reported here. A dispatch call on an
//! unconfigured method through the unchecked entry point is a programming
//! error and panics instead.

use thiserror::Error;
use transcode_core::VideoFormat;

/// Error type for deinterlacing operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeinterlaceError {
    /// The method has no resolved frame routine.
    #[error("Method {method} is not configured for a supported format")]
    NotConfigured { method: String },

    /// Unsupported pixel format for the method.
    #[error("Unsupported pixel format: {format}")]
    UnsupportedFormat { format: String },

    /// Current field index outside the supplied history.
    #[error("Field index {index} out of range for history of {count} fields")]
    FieldIndexOutOfRange { index: usize, count: usize },

    /// Frame layout differs from the configured one.
    #[error("Frame mismatch: expected {expected_format} {expected_width}x{expected_height}, got {actual_format} {actual_width}x{actual_height}")]
    FrameMismatch {
        expected_format: VideoFormat,
        expected_width: u32,
        expected_height: u32,
        actual_format: VideoFormat,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Result type for deinterlacing operations.
pub type Result<T> = std::result::Result<T, DeinterlaceError>;

impl DeinterlaceError {
    /// Create a not configured error.
    pub fn not_configured(method: impl Into<String>) -> Self {
        Self::NotConfigured {
            method: method.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a field index error.
    pub fn field_index_out_of_range(index: usize, count: usize) -> Self {
        Self::FieldIndexOutOfRange { index, count }
    }

    /// Create a frame mismatch error.
    pub fn frame_mismatch(
        expected: &transcode_core::VideoInfo,
        actual: &transcode_core::VideoInfo,
    ) -> Self {
        Self::FrameMismatch {
            expected_format: expected.format(),
            expected_width: expected.width(),
            expected_height: expected.height(),
            actual_format: actual.format(),
            actual_width: actual.width(),
            actual_height: actual.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcode_core::VideoInfo;

    #[test]
    fn test_error_display() {
        let err = DeinterlaceError::unsupported_format("GRAY8");
        assert!(err.to_string().contains("GRAY8"));

        let err = DeinterlaceError::field_index_out_of_range(3, 2);
        assert!(err.to_string().contains("index 3"));
        assert!(err.to_string().contains("2 fields"));

        let err = DeinterlaceError::not_configured("linear");
        assert!(err.to_string().contains("linear"));
    }

    #[test]
    fn test_frame_mismatch_display() {
        let expected = VideoInfo::new(VideoFormat::I420, 720, 576).unwrap();
        let actual = VideoInfo::new(VideoFormat::Nv12, 720, 480).unwrap();
        let err = DeinterlaceError::frame_mismatch(&expected, &actual);
        assert_eq!(
            err.to_string(),
            "Frame mismatch: expected I420 720x576, got NV12 720x480"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = DeinterlaceError::field_index_out_of_range(1, 1);
        let err2 = DeinterlaceError::field_index_out_of_range(1, 1);
        let err3 = DeinterlaceError::field_index_out_of_range(2, 1);

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
