//! Scanline-primitive based methods.
//!
//! Most algorithms only differ in how a single output row is produced. A
//! simple method supplies a copy and an interpolate primitive per packed slot
//! and per planar plane, and the generic dispatchers do the rest. The default
//! primitives do plain line doubling.

use crate::dispatch::{
    deinterlace_packed, deinterlace_planar, deinterlace_semi_planar, ScanlineKernel,
};
use crate::field::Field;
use crate::geometry::FrameGeometry;
use crate::method::{DeinterlaceFrameFn, DeinterlaceMethod, MethodClass};
use crate::scanline::ScanlineData;
use crate::table::FormatSlot;
use std::fmt;
use transcode_core::{FormatFamily, VideoFormat, VideoFrame};

/// Produces one output row from its neighbourhood.
pub type ScanlineFn = fn(&FrameGeometry, &mut [u8], &ScanlineData<'_>);

/// Copy and interpolate primitives for one slot or plane.
#[derive(Clone, Copy, Default)]
pub struct ScanlinePair {
    pub copy: Option<ScanlineFn>,
    pub interpolate: Option<ScanlineFn>,
}

impl ScanlinePair {
    /// The default line-doubling pair.
    pub fn line_doubling() -> Self {
        Self {
            copy: Some(copy_scanline_default),
            interpolate: Some(interpolate_scanline_default),
        }
    }

    /// Both primitives are present.
    pub fn is_complete(&self) -> bool {
        self.copy.is_some() && self.interpolate.is_some()
    }

    fn require(&self, what: &str) -> (ScanlineFn, ScanlineFn) {
        match (self.copy, self.interpolate) {
            (Some(copy), Some(interpolate)) => (copy, interpolate),
            _ => panic!("{what} scanline primitives are not resolved"),
        }
    }
}

impl fmt::Debug for ScanlinePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanlinePair")
            .field("copy", &self.copy.is_some())
            .field("interpolate", &self.interpolate.is_some())
            .finish()
    }
}

/// Primitives selected for the configured format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvedScanlines {
    /// Pair for packed and semi-planar formats.
    pub packed: ScanlinePair,
    /// Pairs for the Y, U and V planes of planar formats.
    pub planar: [ScanlinePair; 3],
}

/// Primitive table of a simple method class.
///
/// The packed table is indexed by [`FormatSlot`]. Entries of planar slots stay
/// empty and are never read; planar formats use the three per-plane pairs.
#[derive(Clone, Copy)]
pub struct SimpleFunctions {
    packed: [ScanlinePair; FormatSlot::COUNT],
    planar: [ScanlinePair; 3],
}

impl SimpleFunctions {
    /// Every packed slot and planar plane set to line doubling.
    pub fn line_doubling() -> Self {
        let mut packed = [ScanlinePair::default(); FormatSlot::COUNT];
        for slot in FormatSlot::ALL {
            if slot.family() != FormatFamily::Planar {
                packed[slot.index()] = ScanlinePair::line_doubling();
            }
        }
        Self {
            packed,
            planar: [ScanlinePair::line_doubling(); 3],
        }
    }

    /// Pair for a packed or semi-planar slot. `None` for planar slots.
    pub fn packed(&self, slot: FormatSlot) -> Option<&ScanlinePair> {
        match slot.family() {
            FormatFamily::Planar => None,
            FormatFamily::Packed | FormatFamily::SemiPlanar => Some(&self.packed[slot.index()]),
        }
    }

    /// Pair for planar plane 0 (Y), 1 (U) or 2 (V).
    pub fn planar(&self, plane: usize) -> Option<&ScanlinePair> {
        self.planar.get(plane)
    }

    /// Check that the primitives a slot needs are present.
    pub fn supports(&self, slot: FormatSlot) -> bool {
        match slot.family() {
            FormatFamily::Planar => self.planar.iter().all(ScanlinePair::is_complete),
            FormatFamily::Packed | FormatFamily::SemiPlanar => {
                self.packed[slot.index()].is_complete()
            }
        }
    }

    /// Select the primitives for a format, starting from an empty set.
    pub fn resolve(&self, format: VideoFormat) -> ResolvedScanlines {
        let mut resolved = ResolvedScanlines::default();
        if let Some(slot) = FormatSlot::from_format(format) {
            match slot.family() {
                FormatFamily::Planar => resolved.planar = self.planar,
                FormatFamily::Packed | FormatFamily::SemiPlanar => {
                    resolved.packed = self.packed[slot.index()]
                }
            }
        }
        resolved
    }
}

impl fmt::Debug for SimpleFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packed: Vec<_> = FormatSlot::ALL
            .into_iter()
            .filter(|slot| slot.family() != FormatFamily::Planar && self.supports(*slot))
            .collect();
        f.debug_struct("SimpleFunctions")
            .field("packed", &packed)
            .field("planar", &self.planar)
            .finish()
    }
}

/// Copy `m0` into the output row.
pub fn copy_scanline_default(_: &FrameGeometry, out: &mut [u8], scanlines: &ScanlineData<'_>) {
    if let Some(m0) = scanlines.m0 {
        let len = out.len().min(m0.len());
        out[..len].copy_from_slice(&m0[..len]);
    }
}

/// Copy `m1` into the output row, or `t0` when there is no following field.
pub fn interpolate_scanline_default(
    _: &FrameGeometry,
    out: &mut [u8],
    scanlines: &ScanlineData<'_>,
) {
    if let Some(src) = scanlines.m1.or(scanlines.t0) {
        let len = out.len().min(src.len());
        out[..len].copy_from_slice(&src[..len]);
    }
}

/// Builds a [`MethodClass`] on top of scanline primitives.
///
/// ```
/// use transcode_deinterlace::{FormatSlot, SimpleMethodBuilder};
///
/// let class = SimpleMethodBuilder::new("Line doubling", "linedoubling")
///     .interpolate_scanline(FormatSlot::Yuy2, None)
///     .build();
/// assert!(!class.supported(transcode_core::VideoFormat::Yuy2, 720, 576));
/// assert!(class.supported(transcode_core::VideoFormat::I420, 720, 576));
/// ```
#[derive(Debug, Clone)]
pub struct SimpleMethodBuilder {
    name: &'static str,
    nick: &'static str,
    fields_required: usize,
    latency: usize,
    functions: SimpleFunctions,
}

impl SimpleMethodBuilder {
    /// Start from line doubling, two fields, no latency.
    pub fn new(name: &'static str, nick: &'static str) -> Self {
        Self {
            name,
            nick,
            fields_required: 2,
            latency: 0,
            functions: SimpleFunctions::line_doubling(),
        }
    }

    /// Number of history fields the method reads.
    pub fn fields_required(mut self, fields_required: usize) -> Self {
        self.fields_required = fields_required;
        self
    }

    /// Output delay in frames.
    pub fn latency(mut self, latency: usize) -> Self {
        self.latency = latency;
        self
    }

    /// Set the copy primitive of a packed or semi-planar slot.
    ///
    /// # Panics
    ///
    /// Panics for planar slots, which take per-plane primitives.
    pub fn copy_scanline(mut self, slot: FormatSlot, function: Option<ScanlineFn>) -> Self {
        Self::assert_packed(slot);
        self.functions.packed[slot.index()].copy = function;
        self
    }

    /// Set the interpolate primitive of a packed or semi-planar slot.
    ///
    /// # Panics
    ///
    /// Panics for planar slots, which take per-plane primitives.
    pub fn interpolate_scanline(mut self, slot: FormatSlot, function: Option<ScanlineFn>) -> Self {
        Self::assert_packed(slot);
        self.functions.packed[slot.index()].interpolate = function;
        self
    }

    /// Set the copy primitive of planar plane 0 (Y), 1 (U) or 2 (V).
    ///
    /// # Panics
    ///
    /// Panics if `plane` is not 0, 1 or 2.
    pub fn copy_scanline_planar(mut self, plane: usize, function: Option<ScanlineFn>) -> Self {
        Self::assert_plane(plane);
        self.functions.planar[plane].copy = function;
        self
    }

    /// Set the interpolate primitive of planar plane 0 (Y), 1 (U) or 2 (V).
    ///
    /// # Panics
    ///
    /// Panics if `plane` is not 0, 1 or 2.
    pub fn interpolate_scanline_planar(
        mut self,
        plane: usize,
        function: Option<ScanlineFn>,
    ) -> Self {
        Self::assert_plane(plane);
        self.functions.planar[plane].interpolate = function;
        self
    }

    /// Finish the class. Every slot gets the dispatcher of its family.
    pub fn build(self) -> MethodClass {
        let mut class = MethodClass::new(self.name, self.nick, self.fields_required, self.latency);
        for slot in FormatSlot::ALL {
            let frame_fn: DeinterlaceFrameFn = match slot.family() {
                FormatFamily::Packed => deinterlace_frame_packed,
                FormatFamily::Planar => deinterlace_frame_planar,
                FormatFamily::SemiPlanar => deinterlace_frame_semi_planar,
            };
            class = class.with_frame_fn(slot, frame_fn);
        }
        class.with_simple(self.functions)
    }

    fn assert_packed(slot: FormatSlot) {
        assert!(
            slot.family() != FormatFamily::Planar,
            "{slot} takes per-plane primitives"
        );
    }

    fn assert_plane(plane: usize) {
        assert!(plane < 3, "planar formats have planes 0..3, got plane {plane}");
    }
}

struct PackedKernel<'a> {
    geometry: &'a FrameGeometry,
    copy: ScanlineFn,
    interpolate: ScanlineFn,
}

impl ScanlineKernel for PackedKernel<'_> {
    fn copy_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>) {
        (self.copy)(self.geometry, out, scanlines);
    }

    fn interpolate_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>) {
        (self.interpolate)(self.geometry, out, scanlines);
    }
}

struct PlanarKernel<'a> {
    geometry: &'a FrameGeometry,
    planes: [(ScanlineFn, ScanlineFn); 3],
}

impl ScanlineKernel for PlanarKernel<'_> {
    fn copy_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>) {
        (self.planes[scanlines.plane].0)(self.geometry, out, scanlines);
    }

    fn interpolate_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>) {
        (self.planes[scanlines.plane].1)(self.geometry, out, scanlines);
    }
}

fn packed_kernel(method: &DeinterlaceMethod) -> PackedKernel<'_> {
    let (copy, interpolate) = method.resolved_scanlines().packed.require("packed");
    PackedKernel {
        geometry: method.geometry(),
        copy,
        interpolate,
    }
}

fn deinterlace_frame_packed(
    method: &DeinterlaceMethod,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    let kernel = packed_kernel(method);
    deinterlace_packed(&kernel, method.geometry(), history, out, cur_field_idx);
}

fn deinterlace_frame_semi_planar(
    method: &DeinterlaceMethod,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    let kernel = packed_kernel(method);
    deinterlace_semi_planar(&kernel, method.geometry(), history, out, cur_field_idx);
}

fn deinterlace_frame_planar(
    method: &DeinterlaceMethod,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    let planar = &method.resolved_scanlines().planar;
    let kernel = PlanarKernel {
        geometry: method.geometry(),
        planes: [
            planar[0].require("Y plane"),
            planar[1].require("U plane"),
            planar[2].require("V plane"),
        ],
    };
    deinterlace_planar(&kernel, method.geometry(), history, out, cur_field_idx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcode_core::VideoInfo;

    fn filled(info: &VideoInfo, value: u8) -> VideoFrame {
        let mut frame = VideoFrame::new(info.clone());
        frame.fill(value);
        frame
    }

    fn fill_one(_: &FrameGeometry, out: &mut [u8], _: &ScanlineData<'_>) {
        out.fill(1);
    }

    fn fill_two(_: &FrameGeometry, out: &mut [u8], _: &ScanlineData<'_>) {
        out.fill(2);
    }

    fn fill_three(_: &FrameGeometry, out: &mut [u8], _: &ScanlineData<'_>) {
        out.fill(3);
    }

    #[test]
    fn test_builder_defaults() {
        let class = SimpleMethodBuilder::new("Line doubling", "linedoubling").build();
        assert_eq!(class.fields_required(), 2);
        assert_eq!(class.latency(), 0);
        assert!(class.is_simple());
        for format in VideoFormat::ALL {
            let expected = FormatSlot::from_format(format).is_some();
            assert_eq!(class.supported(format, 64, 48), expected, "{format}");
        }
    }

    #[test]
    fn test_cleared_primitive_disables_slot_only() {
        let class = SimpleMethodBuilder::new("Half", "half")
            .copy_scanline(FormatSlot::Uyvy, None)
            .build();
        assert!(!class.supported(VideoFormat::Uyvy, 8, 8));
        assert!(class.supported(VideoFormat::Yuy2, 8, 8));

        let class = SimpleMethodBuilder::new("Half", "half")
            .interpolate_scanline_planar(2, None)
            .build();
        for format in [
            VideoFormat::I420,
            VideoFormat::Yv12,
            VideoFormat::Y444,
            VideoFormat::Y42b,
            VideoFormat::Y41b,
        ] {
            assert!(!class.supported(format, 8, 8), "{format}");
        }
        assert!(class.supported(VideoFormat::Nv12, 8, 8));
    }

    #[test]
    #[should_panic(expected = "per-plane")]
    fn test_planar_slot_rejected_for_packed_setter() {
        SimpleMethodBuilder::new("Bad", "bad").copy_scanline(FormatSlot::I420, None);
    }

    #[test]
    #[should_panic(expected = "got plane 3")]
    fn test_planar_setter_rejects_fourth_plane() {
        SimpleMethodBuilder::new("Bad", "bad").interpolate_scanline_planar(3, None);
    }

    #[test]
    fn test_packed_lookup_skips_planar_slots() {
        let functions = SimpleFunctions::line_doubling();
        assert!(functions.packed(FormatSlot::I420).is_none());
        assert!(functions.packed(FormatSlot::Nv12).is_some_and(ScanlinePair::is_complete));
        assert!(functions.planar(2).is_some_and(ScanlinePair::is_complete));
        assert!(functions.planar(3).is_none());
    }

    #[test]
    fn test_resolve_clears_other_families() {
        let functions = SimpleFunctions::line_doubling();

        let packed = functions.resolve(VideoFormat::Nv21);
        assert!(packed.packed.is_complete());
        assert!(packed.planar.iter().all(|pair| !pair.is_complete()));

        let planar = functions.resolve(VideoFormat::Y42b);
        assert!(!planar.packed.is_complete());
        assert!(planar.planar.iter().all(ScanlinePair::is_complete));

        let none = functions.resolve(VideoFormat::Gray8);
        assert!(!none.packed.is_complete());
    }

    #[test]
    fn test_default_interpolate_falls_back_to_t0() {
        let top = [7u8; 4];
        let mut out = [0u8; 4];
        let scanlines = ScanlineData {
            t0: Some(&top),
            ..Default::default()
        };
        interpolate_scanline_default(&FrameGeometry::default(), &mut out, &scanlines);
        assert_eq!(out, top);
    }

    #[test]
    fn test_planar_primitives_per_plane() {
        let info = VideoInfo::new(VideoFormat::I420, 8, 4).unwrap();
        let class = SimpleMethodBuilder::new("Planes", "planes")
            .interpolate_scanline_planar(0, Some(fill_one))
            .interpolate_scanline_planar(1, Some(fill_two))
            .interpolate_scanline_planar(2, Some(fill_three))
            .build();
        let mut method = DeinterlaceMethod::new(class);
        method.setup(&info);

        let src = filled(&info, 9);
        let history = [Field::top(&src)];
        let mut out = VideoFrame::new(info);
        method.deinterlace_frame(&history, &mut out, 0);

        for plane in 0..3 {
            assert_eq!(out.row(plane, 0).unwrap()[0], 9);
            assert_eq!(out.row(plane, 1).unwrap()[0], plane as u8 + 1);
        }
    }

    #[test]
    fn test_semi_planar_uses_packed_pair() {
        let info = VideoInfo::new(VideoFormat::Nv12, 8, 4).unwrap();
        let class = SimpleMethodBuilder::new("Nv", "nv")
            .interpolate_scanline(FormatSlot::Nv12, Some(fill_one))
            .build();
        let mut method = DeinterlaceMethod::new(class);
        method.setup(&info);
        assert!(method.resolved_scanlines().packed.is_complete());

        let src = filled(&info, 5);
        let history = [Field::top(&src)];
        let mut out = VideoFrame::new(info);
        method.deinterlace_frame(&history, &mut out, 0);

        assert_eq!(out.row(0, 1).unwrap(), &[1u8; 8][..]);
        assert_eq!(out.row(1, 1).unwrap(), &[1u8; 8][..]);
        assert_eq!(out.row(1, 0).unwrap(), &[5u8; 8][..]);
    }

    #[test]
    #[should_panic(expected = "not resolved")]
    fn test_missing_primitive_panics_at_dispatch() {
        let info = VideoInfo::new(VideoFormat::Yuy2, 4, 4).unwrap();
        let class = SimpleMethodBuilder::new("Half", "half")
            .copy_scanline(FormatSlot::Yuy2, None)
            .build();
        let mut method = DeinterlaceMethod::new(class);
        method.setup(&info);

        let src = VideoFrame::new(info.clone());
        let mut out = VideoFrame::new(info);
        method.deinterlace_frame(&[Field::top(&src)], &mut out, 0);
    }
}
