//! # Transcode Core
//!
//! Core types shared by the Transcode video components:
//! - Raw video format identifiers and their component tables
//! - Frame layout descriptors with per-plane and per-component geometry
//! - An owned, contiguous video frame buffer
//! - Error handling types

pub mod error;
pub mod format;
pub mod frame;
pub mod info;

pub use error::{Error, Result};
pub use format::{ComponentDesc, FormatFamily, VideoFormat, MAX_COMPONENTS, MAX_PLANES};
pub use frame::VideoFrame;
pub use info::{ComponentInfo, VideoInfo};
