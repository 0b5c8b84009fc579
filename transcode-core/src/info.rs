//! Video format descriptor.
//!
//! A [`VideoInfo`] pairs a [`VideoFormat`] with a frame size and derives the
//! byte layout of every plane and component. Rows are padded to four bytes and
//! planes follow each other in one contiguous buffer.

use crate::error::{Error, Result};
use crate::format::{VideoFormat, MAX_COMPONENTS, MAX_PLANES};

/// Concrete geometry of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentInfo {
    /// Width in samples.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
    /// Plane holding the component.
    pub plane: usize,
    /// Byte offset of the first sample from the start of the frame.
    pub offset: usize,
    /// Bytes between two horizontally adjacent samples.
    pub pixel_stride: usize,
}

/// Frame layout descriptor for a format and size.
///
/// With the `serde` feature only the format and size are serialized. The
/// layout is rebuilt through [`VideoInfo::new`] on deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "VideoInfoDesc", into = "VideoInfoDesc")
)]
pub struct VideoInfo {
    format: VideoFormat,
    width: u32,
    height: u32,
    components: [ComponentInfo; MAX_COMPONENTS],
    plane_offset: [usize; MAX_PLANES],
    plane_stride: [usize; MAX_PLANES],
    plane_height: [usize; MAX_PLANES],
    size: usize,
}

/// Serialized form of a [`VideoInfo`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct VideoInfoDesc {
    format: VideoFormat,
    width: u32,
    height: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<VideoInfoDesc> for VideoInfo {
    type Error = Error;

    fn try_from(desc: VideoInfoDesc) -> Result<Self> {
        if desc.format.is_unknown() && (desc.width == 0 || desc.height == 0) {
            return Ok(Self::unknown());
        }
        Self::new(desc.format, desc.width, desc.height)
    }
}

#[cfg(feature = "serde")]
impl From<VideoInfo> for VideoInfoDesc {
    fn from(info: VideoInfo) -> Self {
        Self {
            format: info.format,
            width: info.width,
            height: info.height,
        }
    }
}

#[inline]
fn round_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[inline]
fn sub_scale(shift: u32, value: usize) -> usize {
    (value + (1 << shift) - 1) >> shift
}

impl VideoInfo {
    /// Describe a frame of the given format and size.
    ///
    /// [`VideoFormat::Unknown`] is accepted and yields a descriptor with no
    /// planes or components.
    pub fn new(format: VideoFormat, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::invalid_dimensions(width, height));
        }

        let w = width as usize;
        let h = height as usize;
        let mut info = Self {
            format,
            width,
            height,
            components: [ComponentInfo::default(); MAX_COMPONENTS],
            plane_offset: [0; MAX_PLANES],
            plane_stride: [0; MAX_PLANES],
            plane_height: [0; MAX_PLANES],
            size: 0,
        };

        let strides: [usize; 3] = match format {
            VideoFormat::Unknown => return Ok(info),
            VideoFormat::Yuy2 | VideoFormat::Yvyu | VideoFormat::Uyvy => {
                [round_up(round_up(w, 2) * 2, 4), 0, 0]
            }
            VideoFormat::Rgb | VideoFormat::Bgr => [round_up(w * 3, 4), 0, 0],
            VideoFormat::Gray8 => [round_up(w, 4), 0, 0],
            VideoFormat::I420 | VideoFormat::Yv12 => {
                let chroma = round_up(round_up(w, 2) / 2, 4);
                [round_up(w, 4), chroma, chroma]
            }
            VideoFormat::Y444 => [round_up(w, 4); 3],
            VideoFormat::Y42b => [round_up(w, 4), round_up(w, 8) / 2, round_up(w, 8) / 2],
            VideoFormat::Y41b => [round_up(w, 4), round_up(w, 16) / 4, round_up(w, 16) / 4],
            VideoFormat::Nv12 | VideoFormat::Nv21 => [round_up(w, 4), round_up(w, 4), 0],
            // Remaining packed formats are four bytes per pixel.
            _ => [w * 4, 0, 0],
        };

        let descs = format.components();
        let n_planes = format.num_planes();

        for (plane, stride) in strides.iter().copied().enumerate().take(n_planes) {
            let rows = descs
                .iter()
                .find(|desc| desc.plane == plane)
                .map(|desc| sub_scale(desc.h_sub, h))
                .unwrap_or(h);
            info.plane_stride[plane] = stride;
            info.plane_height[plane] = rows;
        }

        // Planes start after the previous plane's rows, padded to an even
        // luma height for vertically subsampled formats.
        let padded_height = match format {
            VideoFormat::I420 | VideoFormat::Yv12 | VideoFormat::Nv12 | VideoFormat::Nv21 => {
                round_up(h, 2)
            }
            _ => h,
        };
        let mut offset = 0usize;
        for plane in 0..n_planes {
            info.plane_offset[plane] = offset;
            let rows = if plane == 0 {
                padded_height
            } else {
                info.plane_height[plane]
            };
            offset = info.plane_stride[plane]
                .checked_mul(rows)
                .and_then(|bytes| bytes.checked_add(offset))
                .ok_or_else(|| Error::invalid_dimensions(width, height))?;
        }
        info.size = offset;

        for (index, desc) in descs.iter().enumerate() {
            info.components[index] = ComponentInfo {
                width: sub_scale(desc.w_sub, w),
                height: sub_scale(desc.h_sub, h),
                plane: desc.plane,
                offset: info.plane_offset[desc.plane] + desc.poffset,
                pixel_stride: desc.pstride,
            };
        }

        Ok(info)
    }

    /// Descriptor for the unknown format, used for capability probing.
    pub fn unknown() -> Self {
        Self {
            format: VideoFormat::Unknown,
            width: 0,
            height: 0,
            components: [ComponentInfo::default(); MAX_COMPONENTS],
            plane_offset: [0; MAX_PLANES],
            plane_stride: [0; MAX_PLANES],
            plane_height: [0; MAX_PLANES],
            size: 0,
        }
    }

    /// Get the video format.
    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Get the frame width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the frame height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of components.
    pub fn num_components(&self) -> usize {
        self.format.num_components()
    }

    /// Number of planes.
    pub fn num_planes(&self) -> usize {
        self.format.num_planes()
    }

    /// Total buffer size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Geometry of a component. Components past the format's count are zeroed.
    pub fn component(&self, index: usize) -> ComponentInfo {
        self.components.get(index).copied().unwrap_or_default()
    }

    /// Component width in samples.
    pub fn comp_width(&self, index: usize) -> usize {
        self.component(index).width
    }

    /// Component height in rows.
    pub fn comp_height(&self, index: usize) -> usize {
        self.component(index).height
    }

    /// Component byte offset from the start of the frame.
    pub fn comp_offset(&self, index: usize) -> usize {
        self.component(index).offset
    }

    /// Row stride of the plane holding a component.
    pub fn comp_stride(&self, index: usize) -> usize {
        if index >= self.num_components() {
            return 0;
        }
        self.plane_stride(self.component(index).plane)
    }

    /// Pixel stride of a component.
    pub fn comp_pstride(&self, index: usize) -> usize {
        self.component(index).pixel_stride
    }

    /// Byte offset of a plane from the start of the frame.
    pub fn plane_offset(&self, plane: usize) -> usize {
        self.plane_offset.get(plane).copied().unwrap_or(0)
    }

    /// Row stride of a plane.
    pub fn plane_stride(&self, plane: usize) -> usize {
        self.plane_stride.get(plane).copied().unwrap_or(0)
    }

    /// Number of rows in a plane.
    pub fn plane_height(&self, plane: usize) -> usize {
        self.plane_height.get(plane).copied().unwrap_or(0)
    }

    /// Bytes covered by a plane's rows.
    pub fn plane_size(&self, plane: usize) -> usize {
        self.plane_stride(plane) * self.plane_height(plane)
    }

    /// Check whether two descriptors describe the same layout.
    pub fn same_layout(&self, other: &VideoInfo) -> bool {
        self.format == other.format && self.width == other.width && self.height == other.height
    }
}

impl Default for VideoInfo {
    fn default() -> Self {
        Self::unknown()
    }
}
