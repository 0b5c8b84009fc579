//! Video frame buffer.
//!
//! A [`VideoFrame`] owns one contiguous byte buffer laid out as described by
//! its [`VideoInfo`].

use crate::error::{Error, Result};
use crate::format::VideoFormat;
use crate::info::VideoInfo;
use std::fmt;

/// A raw video frame.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFrame {
    info: VideoInfo,
    data: Vec<u8>,
}

impl VideoFrame {
    /// Allocate a zeroed frame for the descriptor.
    pub fn new(info: VideoInfo) -> Self {
        let data = vec![0u8; info.size()];
        Self { info, data }
    }

    /// Wrap existing bytes. The buffer may be larger than the layout needs.
    pub fn from_data(info: VideoInfo, data: Vec<u8>) -> Result<Self> {
        if data.len() < info.size() {
            return Err(Error::buffer_too_small(info.size(), data.len()));
        }
        Ok(Self { info, data })
    }

    /// Get the frame descriptor.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Get the video format.
    pub fn format(&self) -> VideoFormat {
        self.info.format()
    }

    /// Get the frame width.
    pub fn width(&self) -> u32 {
        self.info.width()
    }

    /// Get the frame height.
    pub fn height(&self) -> u32 {
        self.info.height()
    }

    /// Number of planes.
    pub fn num_planes(&self) -> usize {
        self.info.num_planes()
    }

    /// Get the stride (bytes per row) for a plane.
    pub fn stride(&self, plane: usize) -> usize {
        self.info.plane_stride(plane)
    }

    /// Whole frame buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whole frame buffer, mutable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get a plane's rows, `stride * plane_height` bytes.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        let (start, end) = self.plane_range(index)?;
        Some(&self.data[start..end])
    }

    /// Get a mutable reference to a plane's rows.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let (start, end) = self.plane_range(index)?;
        Some(&mut self.data[start..end])
    }

    /// Get one row of a plane.
    pub fn row(&self, plane: usize, row: usize) -> Option<&[u8]> {
        if row >= self.info.plane_height(plane) {
            return None;
        }
        let stride = self.info.plane_stride(plane);
        self.plane(plane)
            .map(|data| &data[row * stride..(row + 1) * stride])
    }

    /// Fill every byte with a value.
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    fn plane_range(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.info.num_planes() {
            return None;
        }
        let start = self.info.plane_offset(index);
        Some((start, start + self.info.plane_size(index)))
    }
}

impl fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFrame")
            .field("format", &self.format())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("size", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(format: VideoFormat, width: u32, height: u32) -> VideoInfo {
        VideoInfo::new(format, width, height).unwrap()
    }

    #[test]
    fn test_frame_creation() {
        let frame = VideoFrame::new(info(VideoFormat::I420, 16, 8));
        assert_eq!(frame.width(), 16);
        assert_eq!(frame.height(), 8);
        assert_eq!(frame.num_planes(), 3);
        assert!(frame.plane(2).is_some());
        assert!(frame.plane(3).is_none());
    }

    #[test]
    fn test_plane_slices_do_not_overlap() {
        let mut frame = VideoFrame::new(info(VideoFormat::I420, 8, 4));
        frame.plane_mut(1).unwrap().fill(7);
        assert!(frame.plane(0).unwrap().iter().all(|&b| b == 0));
        assert!(frame.plane(2).unwrap().iter().all(|&b| b == 0));
        assert_eq!(frame.plane(1).unwrap().len(), frame.stride(1) * 2);
    }

    #[test]
    fn test_row_access() {
        let vinfo = info(VideoFormat::Gray8, 4, 3);
        let data: Vec<u8> = (0..12).collect();
        let frame = VideoFrame::from_data(vinfo, data).unwrap();
        assert_eq!(frame.row(0, 1), Some(&[4u8, 5, 6, 7][..]));
        assert!(frame.row(0, 3).is_none());
        assert!(frame.row(1, 0).is_none());
    }

    #[test]
    fn test_from_data_too_small() {
        let vinfo = info(VideoFormat::Yuy2, 4, 4);
        let needed = vinfo.size();
        let result = VideoFrame::from_data(vinfo, vec![0; needed - 1]);
        assert_eq!(result, Err(Error::buffer_too_small(needed, needed - 1)));
    }

    #[test]
    fn test_unknown_frame_has_no_planes() {
        let frame = VideoFrame::new(VideoInfo::unknown());
        assert_eq!(frame.data().len(), 0);
        assert!(frame.plane(0).is_none());
    }
}
