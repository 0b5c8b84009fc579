//! Raw video format definitions.
//!
//! Each [`VideoFormat`] carries a static component table describing which plane
//! a component lives in, its byte offset inside a pixel group, its pixel stride
//! and its subsampling. [`crate::VideoInfo`] turns that table into concrete
//! geometry for a given frame size.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Maximum number of components in any format.
pub const MAX_COMPONENTS: usize = 4;

/// Maximum number of planes in any format.
pub const MAX_PLANES: usize = 4;

/// Raw video format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VideoFormat {
    /// No concrete format. Used for capability probing.
    #[default]
    Unknown,
    /// Packed YUV 4:2:2, Y0 U Y1 V.
    Yuy2,
    /// Packed YUV 4:2:2, Y0 V Y1 U.
    Yvyu,
    /// Packed YUV 4:2:2, U Y0 V Y1.
    Uyvy,
    /// Packed YUV 4:4:4 with alpha first.
    Ayuv,
    /// Packed RGB with alpha first.
    Argb,
    /// Packed RGB with padding first.
    Xrgb,
    /// Packed BGR with alpha first.
    Abgr,
    /// Packed BGR with padding first.
    Xbgr,
    /// Packed RGB with alpha last.
    Rgba,
    /// Packed RGB with padding last.
    Rgbx,
    /// Packed BGR with alpha last.
    Bgra,
    /// Packed BGR with padding last.
    Bgrx,
    /// Packed RGB, 24bpp.
    Rgb,
    /// Packed BGR, 24bpp.
    Bgr,
    /// Planar YUV 4:2:0, U plane before V.
    I420,
    /// Planar YUV 4:2:0, V plane before U.
    Yv12,
    /// Planar YUV 4:4:4.
    Y444,
    /// Planar YUV 4:2:2.
    Y42b,
    /// Planar YUV 4:1:1.
    Y41b,
    /// Semi-planar YUV 4:2:0, interleaved UV plane.
    Nv12,
    /// Semi-planar YUV 4:2:0, interleaved VU plane.
    Nv21,
    /// Grayscale, 8bpp.
    Gray8,
}

/// Memory layout family of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    /// All components interleaved in one plane.
    Packed,
    /// One plane per component.
    Planar,
    /// Luma plane plus one interleaved chroma plane.
    SemiPlanar,
}

/// Static description of one component of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDesc {
    /// Plane holding this component.
    pub plane: usize,
    /// Byte offset of the component inside a pixel group.
    pub poffset: usize,
    /// Bytes between two horizontally adjacent samples.
    pub pstride: usize,
    /// Horizontal subsampling as a power of two.
    pub w_sub: u32,
    /// Vertical subsampling as a power of two.
    pub h_sub: u32,
}

const fn comp(
    plane: usize,
    poffset: usize,
    pstride: usize,
    w_sub: u32,
    h_sub: u32,
) -> ComponentDesc {
    ComponentDesc {
        plane,
        poffset,
        pstride,
        w_sub,
        h_sub,
    }
}

// Component order is Y U V A for YUV formats and R G B A for RGB formats.
static YUY2: [ComponentDesc; 3] = [comp(0, 0, 2, 0, 0), comp(0, 1, 4, 1, 0), comp(0, 3, 4, 1, 0)];
static YVYU: [ComponentDesc; 3] = [comp(0, 0, 2, 0, 0), comp(0, 3, 4, 1, 0), comp(0, 1, 4, 1, 0)];
static UYVY: [ComponentDesc; 3] = [comp(0, 1, 2, 0, 0), comp(0, 0, 4, 1, 0), comp(0, 2, 4, 1, 0)];
static AYUV: [ComponentDesc; 4] = [
    comp(0, 1, 4, 0, 0),
    comp(0, 2, 4, 0, 0),
    comp(0, 3, 4, 0, 0),
    comp(0, 0, 4, 0, 0),
];
static ARGB: [ComponentDesc; 4] = [
    comp(0, 1, 4, 0, 0),
    comp(0, 2, 4, 0, 0),
    comp(0, 3, 4, 0, 0),
    comp(0, 0, 4, 0, 0),
];
static ABGR: [ComponentDesc; 4] = [
    comp(0, 3, 4, 0, 0),
    comp(0, 2, 4, 0, 0),
    comp(0, 1, 4, 0, 0),
    comp(0, 0, 4, 0, 0),
];
static RGBA: [ComponentDesc; 4] = [
    comp(0, 0, 4, 0, 0),
    comp(0, 1, 4, 0, 0),
    comp(0, 2, 4, 0, 0),
    comp(0, 3, 4, 0, 0),
];
static BGRA: [ComponentDesc; 4] = [
    comp(0, 2, 4, 0, 0),
    comp(0, 1, 4, 0, 0),
    comp(0, 0, 4, 0, 0),
    comp(0, 3, 4, 0, 0),
];
static RGB: [ComponentDesc; 3] = [comp(0, 0, 3, 0, 0), comp(0, 1, 3, 0, 0), comp(0, 2, 3, 0, 0)];
static BGR: [ComponentDesc; 3] = [comp(0, 2, 3, 0, 0), comp(0, 1, 3, 0, 0), comp(0, 0, 3, 0, 0)];
static I420: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 0, 1, 1, 1), comp(2, 0, 1, 1, 1)];
static YV12: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(2, 0, 1, 1, 1), comp(1, 0, 1, 1, 1)];
static Y444: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 0, 1, 0, 0), comp(2, 0, 1, 0, 0)];
static Y42B: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 0, 1, 1, 0), comp(2, 0, 1, 1, 0)];
static Y41B: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 0, 1, 2, 0), comp(2, 0, 1, 2, 0)];
static NV12: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 0, 2, 1, 1), comp(1, 1, 2, 1, 1)];
static NV21: [ComponentDesc; 3] = [comp(0, 0, 1, 0, 0), comp(1, 1, 2, 1, 1), comp(1, 0, 2, 1, 1)];
static GRAY8: [ComponentDesc; 1] = [comp(0, 0, 1, 0, 0)];

impl VideoFormat {
    /// All concrete formats, excluding [`VideoFormat::Unknown`].
    pub const ALL: [VideoFormat; 22] = [
        Self::Yuy2,
        Self::Yvyu,
        Self::Uyvy,
        Self::Ayuv,
        Self::Argb,
        Self::Xrgb,
        Self::Abgr,
        Self::Xbgr,
        Self::Rgba,
        Self::Rgbx,
        Self::Bgra,
        Self::Bgrx,
        Self::Rgb,
        Self::Bgr,
        Self::I420,
        Self::Yv12,
        Self::Y444,
        Self::Y42b,
        Self::Y41b,
        Self::Nv12,
        Self::Nv21,
        Self::Gray8,
    ];

    /// Static component table. Empty for [`VideoFormat::Unknown`].
    ///
    /// Padding-byte formats (`xRGB` and friends) expose three components.
    pub fn components(&self) -> &'static [ComponentDesc] {
        match self {
            Self::Unknown => &[],
            Self::Yuy2 => &YUY2,
            Self::Yvyu => &YVYU,
            Self::Uyvy => &UYVY,
            Self::Ayuv => &AYUV,
            Self::Argb => &ARGB,
            Self::Xrgb => &ARGB[..3],
            Self::Abgr => &ABGR,
            Self::Xbgr => &ABGR[..3],
            Self::Rgba => &RGBA,
            Self::Rgbx => &RGBA[..3],
            Self::Bgra => &BGRA,
            Self::Bgrx => &BGRA[..3],
            Self::Rgb => &RGB,
            Self::Bgr => &BGR,
            Self::I420 => &I420,
            Self::Yv12 => &YV12,
            Self::Y444 => &Y444,
            Self::Y42b => &Y42B,
            Self::Y41b => &Y41B,
            Self::Nv12 => &NV12,
            Self::Nv21 => &NV21,
            Self::Gray8 => &GRAY8,
        }
    }

    /// Number of components (0 for unknown).
    pub fn num_components(&self) -> usize {
        self.components().len()
    }

    /// Number of planes (0 for unknown).
    pub fn num_planes(&self) -> usize {
        match self.family() {
            None => 0,
            Some(FormatFamily::Packed) => 1,
            Some(FormatFamily::SemiPlanar) => 2,
            Some(FormatFamily::Planar) => 3,
        }
    }

    /// Layout family, or `None` for unknown.
    pub fn family(&self) -> Option<FormatFamily> {
        match self {
            Self::Unknown => None,
            Self::I420 | Self::Yv12 | Self::Y444 | Self::Y42b | Self::Y41b => {
                Some(FormatFamily::Planar)
            }
            Self::Nv12 | Self::Nv21 => Some(FormatFamily::SemiPlanar),
            _ => Some(FormatFamily::Packed),
        }
    }

    /// Check if this is the unknown probing format.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Check if this is an RGB format.
    pub fn is_rgb(&self) -> bool {
        matches!(
            self,
            Self::Argb
                | Self::Xrgb
                | Self::Abgr
                | Self::Xbgr
                | Self::Rgba
                | Self::Rgbx
                | Self::Bgra
                | Self::Bgrx
                | Self::Rgb
                | Self::Bgr
        )
    }

    /// Check if the format carries an alpha component.
    pub fn has_alpha(&self) -> bool {
        self.num_components() == 4
    }

    /// Canonical format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Yuy2 => "YUY2",
            Self::Yvyu => "YVYU",
            Self::Uyvy => "UYVY",
            Self::Ayuv => "AYUV",
            Self::Argb => "ARGB",
            Self::Xrgb => "xRGB",
            Self::Abgr => "ABGR",
            Self::Xbgr => "xBGR",
            Self::Rgba => "RGBA",
            Self::Rgbx => "RGBx",
            Self::Bgra => "BGRA",
            Self::Bgrx => "BGRx",
            Self::Rgb => "RGB",
            Self::Bgr => "BGR",
            Self::I420 => "I420",
            Self::Yv12 => "YV12",
            Self::Y444 => "Y444",
            Self::Y42b => "Y42B",
            Self::Y41b => "Y41B",
            Self::Nv12 => "NV12",
            Self::Nv21 => "NV21",
            Self::Gray8 => "GRAY8",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VideoFormat {
    type Err = Error;

    /// Parse a canonical format name. Names are case-sensitive because
    /// `RGBx` and `RGBX` style spellings are distinct on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::Unknown.name() {
            return Ok(Self::Unknown);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed => write!(f, "packed"),
            Self::Planar => write!(f, "planar"),
            Self::SemiPlanar => write!(f, "semi-planar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_planes() {
        assert_eq!(VideoFormat::I420.num_planes(), 3);
        assert_eq!(VideoFormat::Nv12.num_planes(), 2);
        assert_eq!(VideoFormat::Yuy2.num_planes(), 1);
        assert_eq!(VideoFormat::Unknown.num_planes(), 0);
    }

    #[test]
    fn test_num_components() {
        assert_eq!(VideoFormat::Ayuv.num_components(), 4);
        assert_eq!(VideoFormat::Argb.num_components(), 4);
        assert_eq!(VideoFormat::Xrgb.num_components(), 3);
        assert_eq!(VideoFormat::Gray8.num_components(), 1);
        assert_eq!(VideoFormat::Unknown.num_components(), 0);
    }

    #[test]
    fn test_component_planes_stay_in_range() {
        for format in VideoFormat::ALL {
            for desc in format.components() {
                assert!(desc.plane < format.num_planes(), "{format}");
                assert!(desc.pstride > 0, "{format}");
            }
        }
    }

    #[test]
    fn test_yv12_swaps_chroma_planes() {
        let comps = VideoFormat::Yv12.components();
        assert_eq!(comps[1].plane, 2);
        assert_eq!(comps[2].plane, 1);
    }

    #[test]
    fn test_name_roundtrip() {
        for format in VideoFormat::ALL {
            assert_eq!(format.to_string().parse::<VideoFormat>(), Ok(format));
        }
        assert_eq!("UNKNOWN".parse::<VideoFormat>(), Ok(VideoFormat::Unknown));
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        assert_eq!(
            "YUV9".parse::<VideoFormat>(),
            Err(Error::UnknownFormat("YUV9".into()))
        );
        assert!("i420".parse::<VideoFormat>().is_err());
    }

    #[test]
    fn test_family() {
        assert_eq!(VideoFormat::Uyvy.family(), Some(FormatFamily::Packed));
        assert_eq!(VideoFormat::Y41b.family(), Some(FormatFamily::Planar));
        assert_eq!(VideoFormat::Nv21.family(), Some(FormatFamily::SemiPlanar));
        assert_eq!(VideoFormat::Unknown.family(), None);
        assert!(VideoFormat::Bgrx.is_rgb());
        assert!(!VideoFormat::Ayuv.is_rgb());
    }
}
