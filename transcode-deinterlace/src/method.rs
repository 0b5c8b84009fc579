//! Deinterlace method base.
//!
//! A [`MethodClass`] is the static definition of an algorithm: its name, how
//! many history fields it reads, its output latency and a whole-frame routine
//! per [`FormatSlot`]. A [`DeinterlaceMethod`] is a class configured for one
//! format. Every [`DeinterlaceMethod::setup`] call rebuilds the configured
//! state from scratch.

use crate::error::{DeinterlaceError, Result};
use crate::field::Field;
use crate::geometry::FrameGeometry;
use crate::simple::{ResolvedScanlines, SimpleFunctions};
use crate::table::{FormatSlot, FrameFunctions};
use std::fmt;
use tracing::{debug, warn};
use transcode_core::{VideoFormat, VideoFrame, VideoInfo};

/// Upper bound on `fields_required`: previous, current and two following fields.
pub const MAX_FIELDS_REQUIRED: usize = 4;

/// Whole-frame routine.
///
/// Arguments are the configured method, the field history, the output frame
/// and the index of the current field in the history.
pub type DeinterlaceFrameFn = fn(&DeinterlaceMethod, &[Field<'_>], &mut VideoFrame, usize);

/// Static definition of a deinterlacing algorithm.
#[derive(Clone)]
pub struct MethodClass {
    name: &'static str,
    nick: &'static str,
    fields_required: usize,
    latency: usize,
    frame_fns: FrameFunctions,
    simple: Option<SimpleFunctions>,
}

impl MethodClass {
    /// Create a class with an empty frame routine table.
    ///
    /// # Panics
    ///
    /// Panics if `fields_required` exceeds [`MAX_FIELDS_REQUIRED`].
    pub fn new(
        name: &'static str,
        nick: &'static str,
        fields_required: usize,
        latency: usize,
    ) -> Self {
        assert!(
            fields_required <= MAX_FIELDS_REQUIRED,
            "{nick} requires {fields_required} fields, at most {MAX_FIELDS_REQUIRED} are \
             addressable"
        );
        Self {
            name,
            nick,
            fields_required,
            latency,
            frame_fns: FrameFunctions::new(),
            simple: None,
        }
    }

    /// Set the whole-frame routine for a slot.
    pub fn with_frame_fn(mut self, slot: FormatSlot, function: DeinterlaceFrameFn) -> Self {
        self.frame_fns.set(slot, Some(function));
        self
    }

    /// Remove the whole-frame routine for a slot.
    pub fn without_frame_fn(mut self, slot: FormatSlot) -> Self {
        self.frame_fns.set(slot, None);
        self
    }

    pub(crate) fn with_simple(mut self, simple: SimpleFunctions) -> Self {
        self.simple = Some(simple);
        self
    }

    /// Descriptive name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Short identifier.
    pub fn nick(&self) -> &'static str {
        self.nick
    }

    /// Number of history fields the algorithm reads.
    pub fn fields_required(&self) -> usize {
        self.fields_required
    }

    /// Output delay in frames.
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Whole-frame routine table.
    pub fn frame_functions(&self) -> &FrameFunctions {
        &self.frame_fns
    }

    /// Check if the class is built on the scanline primitives.
    pub fn is_simple(&self) -> bool {
        self.simple.is_some()
    }

    pub(crate) fn simple(&self) -> Option<&SimpleFunctions> {
        self.simple.as_ref()
    }

    /// Check whether the class can process a format.
    ///
    /// [`VideoFormat::Unknown`] is always supported so the class can be probed
    /// before a format is known. `width` and `height` do not restrict support.
    pub fn supported(&self, format: VideoFormat, _width: u32, _height: u32) -> bool {
        if format.is_unknown() {
            return true;
        }
        let Some(slot) = FormatSlot::from_format(format) else {
            return false;
        };
        if self.frame_fns.get(slot).is_none() {
            return false;
        }
        match &self.simple {
            Some(simple) => simple.supports(slot),
            None => true,
        }
    }
}

impl fmt::Debug for MethodClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodClass")
            .field("name", &self.name)
            .field("nick", &self.nick)
            .field("fields_required", &self.fields_required)
            .field("latency", &self.latency)
            .field("frame_fns", &self.frame_fns)
            .field("simple", &self.simple.is_some())
            .finish()
    }
}

/// State derived by `setup`. Replaced as a whole, never patched.
#[derive(Clone, Default)]
struct MethodState {
    info: Option<VideoInfo>,
    geometry: FrameGeometry,
    frame_fn: Option<DeinterlaceFrameFn>,
    scanlines: ResolvedScanlines,
}

impl MethodState {
    fn resolve(class: &MethodClass, info: &VideoInfo) -> Self {
        let format = info.format();
        let mut state = Self {
            info: Some(info.clone()),
            geometry: FrameGeometry::from_info(info),
            frame_fn: None,
            scanlines: ResolvedScanlines::default(),
        };

        if format.is_unknown() {
            debug!(method = class.nick, "Unknown format, dispatch disabled");
            return state;
        }

        state.frame_fn = class.frame_fns.for_format(format);
        if let Some(simple) = class.simple() {
            state.scanlines = simple.resolve(format);
        }

        match state.frame_fn {
            Some(_) => debug!(
                method = class.nick,
                %format,
                width = info.width(),
                height = info.height(),
                family = ?format.family(),
                "Resolved frame routine"
            ),
            None => warn!(
                method = class.nick,
                %format,
                "No frame routine for format, dispatch disabled"
            ),
        }

        state
    }
}

/// A deinterlacing method configured for one format.
///
/// Concurrent `deinterlace_frame` calls on one instance are fine; `setup`
/// needs `&mut self` and so cannot race with them.
#[derive(Clone)]
pub struct DeinterlaceMethod {
    class: MethodClass,
    state: MethodState,
}

impl DeinterlaceMethod {
    /// Create an unconfigured instance of a class.
    pub fn new(class: MethodClass) -> Self {
        Self {
            class,
            state: MethodState::default(),
        }
    }

    /// Get the method class.
    pub fn class(&self) -> &MethodClass {
        &self.class
    }

    /// Check whether the method can process a format.
    pub fn supported(&self, format: VideoFormat, width: u32, height: u32) -> bool {
        self.class.supported(format, width, height)
    }

    /// Configure for a format descriptor.
    ///
    /// Rebuilds the geometry and re-resolves the frame routine (and, for simple
    /// methods, the scanline primitives). An unknown or unmapped format leaves
    /// dispatch disabled.
    pub fn setup(&mut self, info: &VideoInfo) {
        self.state = MethodState::resolve(&self.class, info);
    }

    /// Check support, then [`setup`](Self::setup).
    pub fn configure(&mut self, info: &VideoInfo) -> Result<()> {
        if !self.supported(info.format(), info.width(), info.height()) {
            return Err(DeinterlaceError::unsupported_format(info.format().to_string()));
        }
        self.setup(info);
        Ok(())
    }

    /// Build one progressive frame from the history.
    ///
    /// # Panics
    ///
    /// Panics if no frame routine is resolved or `cur_field_idx` is outside
    /// the history. Both mean `setup` or the caller contract was skipped.
    pub fn deinterlace_frame(
        &self,
        history: &[Field<'_>],
        out: &mut VideoFrame,
        cur_field_idx: usize,
    ) {
        let Some(frame_fn) = self.state.frame_fn else {
            panic!(
                "{}: deinterlace_frame called without a resolved frame routine",
                self.class.nick
            );
        };
        assert!(
            cur_field_idx < history.len(),
            "current field {cur_field_idx} outside history of {}",
            history.len()
        );
        frame_fn(self, history, out, cur_field_idx);
    }

    /// Checked variant of [`deinterlace_frame`](Self::deinterlace_frame).
    ///
    /// Also verifies that every frame matches the configured layout.
    pub fn try_deinterlace_frame(
        &self,
        history: &[Field<'_>],
        out: &mut VideoFrame,
        cur_field_idx: usize,
    ) -> Result<()> {
        let info = match (&self.state.info, self.state.frame_fn) {
            (Some(info), Some(_)) => info,
            _ => return Err(DeinterlaceError::not_configured(self.class.nick)),
        };
        if cur_field_idx >= history.len() {
            return Err(DeinterlaceError::field_index_out_of_range(
                cur_field_idx,
                history.len(),
            ));
        }
        for field in history {
            if !field.frame.info().same_layout(info) {
                return Err(DeinterlaceError::frame_mismatch(info, field.frame.info()));
            }
        }
        if !out.info().same_layout(info) {
            return Err(DeinterlaceError::frame_mismatch(info, out.info()));
        }

        self.deinterlace_frame(history, out, cur_field_idx);
        Ok(())
    }

    /// Number of history fields the method reads.
    pub fn fields_required(&self) -> usize {
        self.class.fields_required
    }

    /// Output delay in frames.
    pub fn latency(&self) -> usize {
        self.class.latency
    }

    /// Geometry captured by the last `setup`.
    pub fn geometry(&self) -> &FrameGeometry {
        &self.state.geometry
    }

    /// Descriptor passed to the last `setup`.
    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.state.info.as_ref()
    }

    /// Resolved whole-frame routine.
    pub fn frame_fn(&self) -> Option<DeinterlaceFrameFn> {
        self.state.frame_fn
    }

    /// Check if a frame routine is resolved.
    pub fn is_configured(&self) -> bool {
        self.state.frame_fn.is_some()
    }

    /// Scanline primitives resolved by the last `setup`. Empty for classes
    /// that are not simple.
    pub fn resolved_scanlines(&self) -> &ResolvedScanlines {
        &self.state.scanlines
    }
}

impl fmt::Debug for DeinterlaceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeinterlaceMethod")
            .field("class", &self.class.nick)
            .field("format", &self.state.info.as_ref().map(VideoInfo::format))
            .field("configured", &self.is_configured())
            .finish()
    }
}
