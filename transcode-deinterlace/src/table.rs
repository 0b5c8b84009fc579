//! Format capability table.
//!
//! Every concrete [`VideoFormat`] the engine can process maps onto one
//! [`FormatSlot`]. A method fills the slots it can handle with a whole-frame
//! routine. Formats that only differ in an unused padding byte share a slot.

use crate::method::DeinterlaceFrameFn;
use std::fmt;
use transcode_core::{FormatFamily, VideoFormat};

/// Per-format function slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatSlot {
    Yuy2,
    Yvyu,
    Uyvy,
    Ayuv,
    Argb,
    Abgr,
    Rgba,
    Bgra,
    Rgb,
    Bgr,
    Nv12,
    Nv21,
    I420,
    Yv12,
    Y444,
    Y42b,
    Y41b,
}

impl FormatSlot {
    /// Number of slots.
    pub const COUNT: usize = 17;

    /// All slots in table order.
    pub const ALL: [FormatSlot; Self::COUNT] = [
        Self::Yuy2,
        Self::Yvyu,
        Self::Uyvy,
        Self::Ayuv,
        Self::Argb,
        Self::Abgr,
        Self::Rgba,
        Self::Bgra,
        Self::Rgb,
        Self::Bgr,
        Self::Nv12,
        Self::Nv21,
        Self::I420,
        Self::Yv12,
        Self::Y444,
        Self::Y42b,
        Self::Y41b,
    ];

    /// Slot for a format, or `None` when no slot exists.
    pub fn from_format(format: VideoFormat) -> Option<Self> {
        let slot = match format {
            VideoFormat::Yuy2 => Self::Yuy2,
            VideoFormat::Yvyu => Self::Yvyu,
            VideoFormat::Uyvy => Self::Uyvy,
            VideoFormat::Ayuv => Self::Ayuv,
            VideoFormat::Argb | VideoFormat::Xrgb => Self::Argb,
            VideoFormat::Abgr | VideoFormat::Xbgr => Self::Abgr,
            VideoFormat::Rgba | VideoFormat::Rgbx => Self::Rgba,
            VideoFormat::Bgra | VideoFormat::Bgrx => Self::Bgra,
            VideoFormat::Rgb => Self::Rgb,
            VideoFormat::Bgr => Self::Bgr,
            VideoFormat::Nv12 => Self::Nv12,
            VideoFormat::Nv21 => Self::Nv21,
            VideoFormat::I420 => Self::I420,
            VideoFormat::Yv12 => Self::Yv12,
            VideoFormat::Y444 => Self::Y444,
            VideoFormat::Y42b => Self::Y42b,
            VideoFormat::Y41b => Self::Y41b,
            _ => return None,
        };
        Some(slot)
    }

    /// Layout family shared by every format in this slot.
    pub fn family(&self) -> FormatFamily {
        match self {
            Self::Nv12 | Self::Nv21 => FormatFamily::SemiPlanar,
            Self::I420 | Self::Yv12 | Self::Y444 | Self::Y42b | Self::Y41b => {
                FormatFamily::Planar
            }
            _ => FormatFamily::Packed,
        }
    }

    /// Position in the table.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FormatSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Whole-frame routines indexed by [`FormatSlot`].
#[derive(Clone, Copy, Default)]
pub struct FrameFunctions {
    slots: [Option<DeinterlaceFrameFn>; FormatSlot::COUNT],
}

impl FrameFunctions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routine for a slot.
    pub fn get(&self, slot: FormatSlot) -> Option<DeinterlaceFrameFn> {
        self.slots[slot.index()]
    }

    /// Set or clear the routine for a slot.
    pub fn set(&mut self, slot: FormatSlot, function: Option<DeinterlaceFrameFn>) {
        self.slots[slot.index()] = function;
    }

    /// Routine for a format, resolving aliases.
    pub fn for_format(&self, format: VideoFormat) -> Option<DeinterlaceFrameFn> {
        FormatSlot::from_format(format).and_then(|slot| self.get(slot))
    }

    /// Slots that carry a routine.
    pub fn filled(&self) -> impl Iterator<Item = FormatSlot> + '_ {
        FormatSlot::ALL
            .into_iter()
            .filter(move |slot| self.get(*slot).is_some())
    }
}

impl fmt::Debug for FrameFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.filled()).finish()
    }
}
