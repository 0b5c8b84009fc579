//! Generic frame dispatch.
//!
//! Walks every row of every plane of the output frame, builds the scanline
//! neighbourhood for it and hands it to a [`ScanlineKernel`]. The three frame
//! shapes only differ in how many planes are walked and which geometry entry
//! drives each plane:
//!
//! - packed: plane 0 with component 0 geometry;
//! - planar: planes 0..3, plane `p` with component `p` geometry;
//! - semi-planar: planes 0..2, plane `p` with component `p` geometry.

use crate::field::Field;
use crate::geometry::{ComponentGeometry, FrameGeometry};
use crate::scanline::{FieldPlanes, NeighborhoodBuilder, ScanlineBranch, ScanlineData};
use tracing::trace;
use transcode_core::VideoFrame;

/// Per-row work plugged into the dispatcher.
///
/// `scanlines.plane` tells which plane the row belongs to.
pub trait ScanlineKernel {
    /// Write a row that exists in the current field.
    fn copy_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>);

    /// Write a row that the current field does not carry.
    fn interpolate_scanline(&self, out: &mut [u8], scanlines: &ScanlineData<'_>);
}

/// Walk one plane.
///
/// Row `i` of `out` is always written from the neighbourhood of row `i`; only
/// the source rows are clamped.
///
/// # Panics
///
/// Panics if `out` or a source plane holds fewer than `geometry.height` rows
/// of `geometry.row_stride` bytes.
pub fn deinterlace_plane<K: ScanlineKernel + ?Sized>(
    kernel: &K,
    geometry: &ComponentGeometry,
    sources: FieldPlanes<'_>,
    out: &mut [u8],
    bottom_field: bool,
    plane: usize,
) {
    let height = geometry.height;
    let stride = geometry.row_stride;
    assert!(stride > 0, "plane {plane} has no row stride, was setup skipped?");
    assert!(
        out.len() >= height * stride,
        "output plane {plane} holds {} bytes, {height} rows of {stride} need {}",
        out.len(),
        height * stride
    );

    let builder = NeighborhoodBuilder::new(sources, height, stride, bottom_field, plane);

    for (row, dest) in out.chunks_exact_mut(stride).take(height).enumerate() {
        let scanlines = builder.build(row);
        match builder.branch(row) {
            ScanlineBranch::Copy => kernel.copy_scanline(dest, &scanlines),
            ScanlineBranch::Interpolate => kernel.interpolate_scanline(dest, &scanlines),
        }
    }
}

/// Deinterlace a single-plane packed frame.
pub fn deinterlace_packed<K: ScanlineKernel + ?Sized>(
    kernel: &K,
    geometry: &FrameGeometry,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    deinterlace_planes(kernel, geometry, history, out, cur_field_idx, 1);
}

/// Deinterlace a three-plane frame, each plane with its own geometry.
pub fn deinterlace_planar<K: ScanlineKernel + ?Sized>(
    kernel: &K,
    geometry: &FrameGeometry,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    deinterlace_planes(kernel, geometry, history, out, cur_field_idx, 3);
}

/// Deinterlace a luma plane plus an interleaved chroma plane.
///
/// The chroma plane is walked as opaque rows of sample pairs.
pub fn deinterlace_semi_planar<K: ScanlineKernel + ?Sized>(
    kernel: &K,
    geometry: &FrameGeometry,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
) {
    deinterlace_planes(kernel, geometry, history, out, cur_field_idx, 2);
}

fn deinterlace_planes<K: ScanlineKernel + ?Sized>(
    kernel: &K,
    geometry: &FrameGeometry,
    history: &[Field<'_>],
    out: &mut VideoFrame,
    cur_field_idx: usize,
    n_planes: usize,
) {
    assert!(
        cur_field_idx < history.len(),
        "current field {cur_field_idx} outside history of {}",
        history.len()
    );
    let bottom_field = history[cur_field_idx].is_bottom();

    for plane in 0..n_planes {
        let plane_geometry = geometry.component(plane);
        let sources = FieldPlanes::gather(history, cur_field_idx, plane);
        let dest = match out.plane_mut(plane) {
            Some(dest) => dest,
            None => panic!("output frame has no plane {plane}"),
        };

        trace!(
            plane,
            height = plane_geometry.height,
            stride = plane_geometry.row_stride,
            bottom_field,
            "Deinterlacing plane"
        );

        deinterlace_plane(kernel, plane_geometry, sources, dest, bottom_field, plane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use transcode_core::{VideoFormat, VideoInfo};

    /// Records which branch ran for each (plane, row) and marks output rows.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(usize, usize, ScanlineBranch)>>,
    }

    impl ScanlineKernel for Recorder {
        fn copy_scanline(&self, out: &mut [u8], s: &ScanlineData<'_>) {
            out.fill(b'C');
            self.calls
                .borrow_mut()
                .push((s.plane, s.row, ScanlineBranch::Copy));
        }

        fn interpolate_scanline(&self, out: &mut [u8], s: &ScanlineData<'_>) {
            out.fill(b'I');
            self.calls
                .borrow_mut()
                .push((s.plane, s.row, ScanlineBranch::Interpolate));
        }
    }

    fn frames(format: VideoFormat, width: u32, height: u32, count: usize) -> Vec<VideoFrame> {
        let info = VideoInfo::new(format, width, height).unwrap();
        (0..count).map(|_| VideoFrame::new(info.clone())).collect()
    }

    #[test]
    fn test_i420_scenario() {
        let info = VideoInfo::new(VideoFormat::I420, 4, 4).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let inputs = frames(VideoFormat::I420, 4, 4, 3);
        let history = [
            Field::bottom(&inputs[0]),
            Field::top(&inputs[1]),
            Field::bottom(&inputs[2]),
        ];
        let mut out = VideoFrame::new(info);
        let recorder = Recorder::default();

        deinterlace_planar(&recorder, &geometry, &history, &mut out, 1);

        let calls = recorder.calls.into_inner();
        let luma: Vec<_> = calls.iter().filter(|c| c.0 == 0).collect();
        assert_eq!(luma.len(), 4);
        assert_eq!(
            luma.iter().map(|c| c.2).collect::<Vec<_>>(),
            vec![
                ScanlineBranch::Copy,
                ScanlineBranch::Interpolate,
                ScanlineBranch::Copy,
                ScanlineBranch::Interpolate,
            ]
        );
        assert_eq!(calls.iter().filter(|c| c.0 == 1).count(), 2);
        assert_eq!(calls.iter().filter(|c| c.0 == 2).count(), 2);
        assert_eq!(out.row(0, 1).unwrap()[0], b'I');
        assert_eq!(out.row(2, 1).unwrap()[0], b'I');
    }

    #[test]
    fn test_semi_planar_walks_two_planes() {
        let info = VideoInfo::new(VideoFormat::Nv12, 8, 6).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let inputs = frames(VideoFormat::Nv12, 8, 6, 2);
        let history = [Field::top(&inputs[0]), Field::bottom(&inputs[1])];
        let mut out = VideoFrame::new(info.clone());
        let recorder = Recorder::default();

        deinterlace_semi_planar(&recorder, &geometry, &history, &mut out, 0);

        let calls = recorder.calls.into_inner();
        assert_eq!(calls.iter().filter(|c| c.0 == 0).count(), 6);
        assert_eq!(calls.iter().filter(|c| c.0 == 1).count(), info.plane_height(1));
        assert!(calls.iter().all(|c| c.0 < 2));
    }

    #[test]
    fn test_packed_walks_frame_height() {
        let info = VideoInfo::new(VideoFormat::Uyvy, 4, 5).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let inputs = frames(VideoFormat::Uyvy, 4, 5, 1);
        let history = [Field::bottom(&inputs[0])];
        let mut out = VideoFrame::new(info);
        let recorder = Recorder::default();

        deinterlace_packed(&recorder, &geometry, &history, &mut out, 0);

        let calls = recorder.calls.into_inner();
        assert_eq!(calls.len(), 5);
        for (plane, row, branch) in calls {
            assert_eq!(plane, 0);
            let expected = if row % 2 == 1 {
                ScanlineBranch::Copy
            } else {
                ScanlineBranch::Interpolate
            };
            assert_eq!(branch, expected);
        }
        assert!(out.data().iter().all(|&b| b == b'C' || b == b'I'));
    }

    #[test]
    #[should_panic(expected = "output plane 0 holds 32 bytes")]
    fn test_short_output_frame_panics() {
        let info = VideoInfo::new(VideoFormat::I420, 8, 8).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let inputs = frames(VideoFormat::I420, 8, 8, 1);
        let history = [Field::top(&inputs[0])];
        let mut out = VideoFrame::new(VideoInfo::new(VideoFormat::I420, 8, 4).unwrap());

        deinterlace_planar(&Recorder::default(), &geometry, &history, &mut out, 0);
    }

    #[test]
    #[should_panic(expected = "source plane 0 holds 32 bytes")]
    fn test_short_source_frame_panics() {
        let info = VideoInfo::new(VideoFormat::I420, 8, 8).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let short = frames(VideoFormat::I420, 8, 4, 1);
        let history = [Field::top(&short[0])];
        let mut out = VideoFrame::new(info);

        deinterlace_planar(&Recorder::default(), &geometry, &history, &mut out, 0);
    }

    #[test]
    #[should_panic(expected = "outside history")]
    fn test_current_field_out_of_range_panics() {
        let info = VideoInfo::new(VideoFormat::Yuy2, 4, 4).unwrap();
        let geometry = FrameGeometry::from_info(&info);
        let inputs = frames(VideoFormat::Yuy2, 4, 4, 1);
        let history = [Field::top(&inputs[0])];
        let mut out = VideoFrame::new(info);

        deinterlace_packed(&Recorder::default(), &geometry, &history, &mut out, 1);
    }
}
