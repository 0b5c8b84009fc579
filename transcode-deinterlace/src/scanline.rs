//! Scanline neighbourhood addressing.
//!
//! For an output row the builder gathers the rows around it from up to four
//! history fields:
//!
//! | source  | history index       | copy branch        | interpolate branch   |
//! |---------|---------------------|--------------------|----------------------|
//! | `fieldp`| `cur - 1`           | `tp bp`            | `ttp mp bbp`         |
//! | `field0`| `cur`               | `tt0 m0 bb0`       | `t0 b0`              |
//! | `field1`| `cur + 1`           | `t1 b1`            | `tt1 m1 bb1`         |
//! | `field2`| `cur + 2`           | `tt2 m2 bb2`       | `t2 b2`              |
//!
//! `t`/`b` are one row above/below, `tt`/`bb` two rows, `m` the same row.
//! Rows that fall outside the plane are reflected back inside it.

use crate::field::Field;
use transcode_core::VideoFrame;

/// Rows around one output row, grouped by source field.
///
/// A slot is `None` when its source field is not in the history or when the
/// branch taken for this row does not fill it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanlineData<'a> {
    pub ttp: Option<&'a [u8]>,
    pub tp: Option<&'a [u8]>,
    pub mp: Option<&'a [u8]>,
    pub bp: Option<&'a [u8]>,
    pub bbp: Option<&'a [u8]>,

    pub tt0: Option<&'a [u8]>,
    pub t0: Option<&'a [u8]>,
    pub m0: Option<&'a [u8]>,
    pub b0: Option<&'a [u8]>,
    pub bb0: Option<&'a [u8]>,

    pub tt1: Option<&'a [u8]>,
    pub t1: Option<&'a [u8]>,
    pub m1: Option<&'a [u8]>,
    pub b1: Option<&'a [u8]>,
    pub bb1: Option<&'a [u8]>,

    pub tt2: Option<&'a [u8]>,
    pub t2: Option<&'a [u8]>,
    pub m2: Option<&'a [u8]>,
    pub b2: Option<&'a [u8]>,
    pub bb2: Option<&'a [u8]>,

    /// Current field is the bottom field.
    pub bottom_field: bool,
    /// Plane being processed.
    pub plane: usize,
    /// Output row index.
    pub row: usize,
}

impl ScanlineData<'_> {
    /// Every slot derived from `fieldp`.
    pub fn previous_field_rows(&self) -> [Option<&[u8]>; 5] {
        [self.ttp, self.tp, self.mp, self.bp, self.bbp]
    }

    /// Every slot derived from `field1` or `field2`.
    pub fn future_field_rows(&self) -> [Option<&[u8]>; 10] {
        [
            self.tt1, self.t1, self.m1, self.b1, self.bb1, self.tt2, self.t2, self.m2, self.b2,
            self.bb2,
        ]
    }
}

/// What happens to an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanlineBranch {
    /// The row belongs to the current field and is copied.
    Copy,
    /// The row belongs to the opposite field and is synthesized.
    Interpolate,
}

impl ScanlineBranch {
    /// Branch for a row: `(row & 1) ^ bottom_field` selects interpolation.
    #[inline]
    pub fn for_row(row: usize, bottom_field: bool) -> Self {
        if ((row & 1) == 1) ^ bottom_field {
            Self::Interpolate
        } else {
            Self::Copy
        }
    }
}

/// Resolve `row + offset` inside `[0, height)`.
///
/// An offset that leaves the plane is reflected about `row`: `row - k` becomes
/// `row + k` at the top edge and `row + k` becomes `row - k` at the bottom
/// edge. Planes shorter than the reflected span are clamped to the nearest
/// edge row.
#[inline]
pub fn clamp_row(row: usize, offset: isize, height: usize) -> usize {
    debug_assert!(height > 0 && row < height);
    let row = row as isize;
    let last = height as isize - 1;
    let target = row + offset;
    let resolved = if target < 0 || target > last {
        row - offset
    } else {
        target
    };
    resolved.clamp(0, last) as usize
}

/// Plane data of the four source fields around the current field.
#[derive(Debug, Clone, Copy)]
pub struct FieldPlanes<'a> {
    /// Field before the current one.
    pub fieldp: Option<&'a [u8]>,
    /// Current field.
    pub field0: &'a [u8],
    /// First field after the current one.
    pub field1: Option<&'a [u8]>,
    /// Second field after the current one.
    pub field2: Option<&'a [u8]>,
}

impl<'a> FieldPlanes<'a> {
    /// Present source planes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> {
        [self.fieldp, Some(self.field0), self.field1, self.field2]
            .into_iter()
            .flatten()
    }

    /// Collect plane `plane` of the fields around `cur_field_idx`.
    ///
    /// # Panics
    ///
    /// Panics if `cur_field_idx` is outside `history` or a history frame has
    /// no such plane.
    pub fn gather(history: &[Field<'a>], cur_field_idx: usize, plane: usize) -> Self {
        let field_at = |index: usize| history.get(index).map(|field| field_plane(field, plane));
        Self {
            fieldp: cur_field_idx.checked_sub(1).and_then(field_at),
            field0: field_plane(&history[cur_field_idx], plane),
            field1: field_at(cur_field_idx + 1),
            field2: field_at(cur_field_idx + 2),
        }
    }
}

fn field_plane<'a>(field: &Field<'a>, plane: usize) -> &'a [u8] {
    let frame: &'a VideoFrame = field.frame;
    match frame.plane(plane) {
        Some(data) => data,
        None => panic!("{} history frame has no plane {plane}", frame.format()),
    }
}

/// Builds [`ScanlineData`] for the rows of one plane.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodBuilder<'a> {
    sources: FieldPlanes<'a>,
    height: usize,
    stride: usize,
    bottom_field: bool,
    plane: usize,
}

impl<'a> NeighborhoodBuilder<'a> {
    /// Create a builder for a plane of `height` rows of `stride` bytes.
    ///
    /// # Panics
    ///
    /// Panics if a source plane is shorter than `height * stride` bytes.
    pub fn new(
        sources: FieldPlanes<'a>,
        height: usize,
        stride: usize,
        bottom_field: bool,
        plane: usize,
    ) -> Self {
        let needed = height * stride;
        for source in sources.iter() {
            assert!(
                source.len() >= needed,
                "source plane {plane} holds {} bytes, {height} rows of {stride} need {needed}",
                source.len()
            );
        }
        Self {
            sources,
            height,
            stride,
            bottom_field,
            plane,
        }
    }

    /// Branch taken for `row`.
    pub fn branch(&self, row: usize) -> ScanlineBranch {
        ScanlineBranch::for_row(row, self.bottom_field)
    }

    /// Neighbourhood of `row`.
    pub fn build(&self, row: usize) -> ScanlineData<'a> {
        let src = self.sources;
        let mut scanlines = ScanlineData {
            bottom_field: self.bottom_field,
            plane: self.plane,
            row,
            ..Default::default()
        };

        match self.branch(row) {
            ScanlineBranch::Copy => {
                scanlines.tp = self.line2(src.fieldp, row, -1);
                scanlines.bp = self.line2(src.fieldp, row, 1);

                scanlines.tt0 = Some(self.line(src.field0, row, -2));
                scanlines.m0 = Some(self.line(src.field0, row, 0));
                scanlines.bb0 = Some(self.line(src.field0, row, 2));

                scanlines.t1 = self.line2(src.field1, row, -1);
                scanlines.b1 = self.line2(src.field1, row, 1);

                scanlines.tt2 = self.line2(src.field2, row, -2);
                scanlines.m2 = self.line2(src.field2, row, 0);
                scanlines.bb2 = self.line2(src.field2, row, 2);
            }
            ScanlineBranch::Interpolate => {
                scanlines.ttp = self.line2(src.fieldp, row, -2);
                scanlines.mp = self.line2(src.fieldp, row, 0);
                scanlines.bbp = self.line2(src.fieldp, row, 2);

                scanlines.t0 = Some(self.line(src.field0, row, -1));
                scanlines.b0 = Some(self.line(src.field0, row, 1));

                scanlines.tt1 = self.line2(src.field1, row, -2);
                scanlines.m1 = self.line2(src.field1, row, 0);
                scanlines.bb1 = self.line2(src.field1, row, 2);

                scanlines.t2 = self.line2(src.field2, row, -1);
                scanlines.b2 = self.line2(src.field2, row, 1);
            }
        }

        scanlines
    }

    #[inline]
    fn line(&self, field: &'a [u8], row: usize, offset: isize) -> &'a [u8] {
        let start = clamp_row(row, offset, self.height) * self.stride;
        &field[start..start + self.stride]
    }

    #[inline]
    fn line2(&self, field: Option<&'a [u8]>, row: usize, offset: isize) -> Option<&'a [u8]> {
        field.map(|data| self.line(data, row, offset))
    }
}
