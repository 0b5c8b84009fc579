//! # transcode-deinterlace
//!
//! Pluggable deinterlacing method engine for the transcode library.
//!
//! A method turns a rolling history of interlaced fields into one progressive
//! frame. For every output row it either copies a row the current field
//! carries or synthesizes the missing one from rows of up to four neighbouring
//! fields. This crate owns the parts every algorithm shares:
//!
//! - the format capability table ([`FormatSlot`], [`FrameFunctions`]);
//! - geometry resolution at setup time ([`FrameGeometry`]);
//! - scanline neighbourhood addressing with edge reflection ([`ScanlineData`]);
//! - the generic packed, planar and semi-planar frame walkers ([`dispatch`]);
//! - the method base ([`MethodClass`], [`DeinterlaceMethod`]);
//! - the scanline-primitive specialization ([`SimpleMethodBuilder`]).
//!
//! ## Neighbourhood
//!
//! | source  | history index | copy rows      | interpolate rows |
//! |---------|---------------|----------------|------------------|
//! | `fieldp`| `cur - 1`     | `tp bp`        | `ttp mp bbp`     |
//! | `field0`| `cur`         | `tt0 m0 bb0`   | `t0 b0`          |
//! | `field1`| `cur + 1`     | `t1 b1`        | `tt1 m1 bb1`     |
//! | `field2`| `cur + 2`     | `tt2 m2 bb2`   | `t2 b2`          |
//!
//! Slots whose field is not in the history are `None`.
//!
//! ## Quick Start
//!
//! ```
//! use transcode_core::{VideoFormat, VideoFrame, VideoInfo};
//! use transcode_deinterlace::{DeinterlaceMethod, Field, SimpleMethodBuilder};
//!
//! let class = SimpleMethodBuilder::new("Line doubling", "linedoubling").build();
//! let mut method = DeinterlaceMethod::new(class);
//!
//! let info = VideoInfo::new(VideoFormat::I420, 720, 576).unwrap();
//! method.configure(&info).unwrap();
//!
//! let frame = VideoFrame::new(info.clone());
//! let history = [Field::top(&frame), Field::bottom(&frame)];
//! let mut out = VideoFrame::new(info);
//! method.deinterlace_frame(&history, &mut out, 0);
//! ```
//!
//! ## Custom Primitives
//!
//! ```
//! use transcode_deinterlace::{FormatSlot, FrameGeometry, ScanlineData, SimpleMethodBuilder};
//!
//! fn average(_: &FrameGeometry, out: &mut [u8], s: &ScanlineData<'_>) {
//!     if let (Some(t0), Some(b0)) = (s.t0, s.b0) {
//!         for ((o, &a), &b) in out.iter_mut().zip(t0).zip(b0) {
//!             *o = ((a as u16 + b as u16 + 1) / 2) as u8;
//!         }
//!     }
//! }
//!
//! let class = SimpleMethodBuilder::new("Linear", "linear")
//!     .fields_required(1)
//!     .interpolate_scanline(FormatSlot::Yuy2, Some(average))
//!     .interpolate_scanline_planar(0, Some(average))
//!     .build();
//! assert_eq!(class.fields_required(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for formats, descriptors and field metadata.

pub mod dispatch;
pub mod error;
pub mod field;
pub mod geometry;
pub mod method;
pub mod scanline;
pub mod simple;
pub mod table;

// Re-export main types
pub use dispatch::ScanlineKernel;
pub use error::{DeinterlaceError, Result};
pub use field::{Field, FieldMetadata, FieldPolarity};
pub use geometry::{ComponentGeometry, FrameGeometry};
pub use method::{DeinterlaceFrameFn, DeinterlaceMethod, MethodClass, MAX_FIELDS_REQUIRED};
pub use scanline::{clamp_row, ScanlineBranch, ScanlineData};
pub use simple::{
    copy_scanline_default, interpolate_scanline_default, ResolvedScanlines, ScanlineFn,
    ScanlinePair, SimpleFunctions, SimpleMethodBuilder,
};
pub use table::{FormatSlot, FrameFunctions};
