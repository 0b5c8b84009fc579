//! Per-component frame geometry captured at setup time.

use transcode_core::{VideoInfo, MAX_COMPONENTS};

/// Geometry of one component as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentGeometry {
    /// Width in samples.
    pub width: usize,
    /// Height in rows. Loop bound for the plane walked with this entry.
    pub height: usize,
    /// Byte offset from the start of the frame.
    pub offset: usize,
    /// Bytes per row.
    pub row_stride: usize,
    /// Bytes between horizontally adjacent samples.
    pub pixel_stride: usize,
}

/// Geometry for components 0..3.
///
/// Entries past the format's component count stay zeroed. An all-zero value is
/// what an unconfigured or unknown-format method holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameGeometry {
    components: [ComponentGeometry; MAX_COMPONENTS],
}

impl FrameGeometry {
    /// Derive geometry from a descriptor.
    pub fn from_info(info: &VideoInfo) -> Self {
        let mut components = [ComponentGeometry::default(); MAX_COMPONENTS];
        for (index, component) in components.iter_mut().enumerate() {
            *component = ComponentGeometry {
                width: info.comp_width(index),
                height: info.comp_height(index),
                offset: info.comp_offset(index),
                row_stride: info.comp_stride(index),
                pixel_stride: info.comp_pstride(index),
            };
        }
        Self { components }
    }

    /// Geometry of a component.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn component(&self, index: usize) -> &ComponentGeometry {
        &self.components[index]
    }

    /// Component width.
    pub fn width(&self, index: usize) -> usize {
        self.component(index).width
    }

    /// Component height.
    pub fn height(&self, index: usize) -> usize {
        self.component(index).height
    }

    /// Component byte offset.
    pub fn offset(&self, index: usize) -> usize {
        self.component(index).offset
    }

    /// Component row stride.
    pub fn row_stride(&self, index: usize) -> usize {
        self.component(index).row_stride
    }

    /// Component pixel stride.
    pub fn pixel_stride(&self, index: usize) -> usize {
        self.component(index).pixel_stride
    }
}
