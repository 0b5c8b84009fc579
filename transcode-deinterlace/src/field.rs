//! Field history entries.
//!
//! A history is a plain slice of [`Field`]s ordered oldest to newest around the
//! field being reconstructed. The frames are borrowed for one dispatch call.

use std::time::Duration;
use transcode_core::VideoFrame;

/// Which half of the picture a field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldPolarity {
    /// Even output rows (0, 2, 4, ...).
    #[default]
    Top,
    /// Odd output rows (1, 3, 5, ...).
    Bottom,
}

impl FieldPolarity {
    /// Check if this is the bottom field.
    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Bottom)
    }

    /// Get the opposite polarity.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Optional timing carried alongside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMetadata {
    /// Presentation timestamp of the field.
    pub pts: Option<Duration>,
    /// Display duration of the field.
    pub duration: Option<Duration>,
}

/// One entry of the field history.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// Frame holding the field's lines.
    pub frame: &'a VideoFrame,
    /// Field polarity.
    pub polarity: FieldPolarity,
    /// Optional per-field timing.
    pub metadata: Option<FieldMetadata>,
}

impl<'a> Field<'a> {
    /// Create a field without metadata.
    pub fn new(frame: &'a VideoFrame, polarity: FieldPolarity) -> Self {
        Self {
            frame,
            polarity,
            metadata: None,
        }
    }

    /// Create a top field.
    pub fn top(frame: &'a VideoFrame) -> Self {
        Self::new(frame, FieldPolarity::Top)
    }

    /// Create a bottom field.
    pub fn bottom(frame: &'a VideoFrame) -> Self {
        Self::new(frame, FieldPolarity::Bottom)
    }

    /// Attach timing metadata.
    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check if this is a bottom field.
    pub fn is_bottom(&self) -> bool {
        self.polarity.is_bottom()
    }
}
