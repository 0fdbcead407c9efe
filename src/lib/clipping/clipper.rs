//! The clip orchestrator: collects clip ranges for one record and applies them in order.

use log::warn;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::op::Kind;

use readclip_sam::record_utils::{
    consumes_read, empty_record, format_cigar, is_empty, read_index_for_reference_coordinate,
};

use super::op::{ClippingOp, ClippingRepresentation};
use super::read_name;
use crate::errors::{ClipError, Result};

/// Which end of a read to clip, and up to (or from) which reference coordinate.
///
/// Coordinates are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipTail {
    /// Clip from the start of the read through this reference coordinate
    LeftTo(usize),
    /// Clip from this reference coordinate through the end of the read
    RightFrom(usize),
}

/// Accumulates clip ranges for a single record and materializes them into a new record.
///
/// Ranges are applied in the order they were added, each against the record produced by
/// the previous one. A range that starts past the end of the current record is skipped and
/// one that runs past it is truncated, so ranges computed against the original length can
/// be queued together as long as the right-most range comes first.
///
/// # Example
///
/// ```rust
/// use readclip_lib::clipping::{ClippingOp, ClippingRepresentation, ReadClipper};
/// use readclip_sam::builder::RecordBuilder;
/// use readclip_sam::record_utils::format_cigar;
///
/// let record = RecordBuilder::mapped_read().cigar("10M").alignment_start(100).build();
///
/// let mut clipper = ReadClipper::new(&record);
/// clipper.add_op(ClippingOp::new(8, 9));
/// clipper.add_op(ClippingOp::new(0, 1));
/// let clipped = clipper.clip_read(ClippingRepresentation::HardclipBases).unwrap();
///
/// assert_eq!(format_cigar(clipped.cigar().as_ref()), "2H6M2H");
/// assert!(clipper.was_clipped());
/// ```
#[derive(Debug)]
pub struct ReadClipper<'a> {
    read: &'a RecordBuf,
    ops: Vec<ClippingOp>,
    was_clipped: bool,
    extra_bases: usize,
}

impl<'a> ReadClipper<'a> {
    /// Creates a clipper for `read` with no pending ranges.
    #[must_use]
    pub fn new(read: &'a RecordBuf) -> Self {
        Self::with_extra_bases(read, 0)
    }

    /// Creates a clipper that also removes `extra_bases` beyond each soft clip when hard
    /// clipping soft-clipped bases.
    #[must_use]
    pub fn with_extra_bases(read: &'a RecordBuf, extra_bases: usize) -> Self {
        Self { read, ops: Vec::new(), was_clipped: false, extra_bases }
    }

    /// Queues a clip range. Ranges are not validated until they are applied.
    pub fn add_op(&mut self, op: ClippingOp) {
        self.ops.push(op);
    }

    /// The ranges queued since the last [`clip_read`](Self::clip_read).
    #[must_use]
    pub fn ops(&self) -> &[ClippingOp] {
        &self.ops
    }

    /// Whether [`clip_read`](Self::clip_read) has applied any ranges.
    #[must_use]
    pub fn was_clipped(&self) -> bool {
        self.was_clipped
    }

    /// The record being clipped, as it was given to the clipper.
    #[must_use]
    pub fn read(&self) -> &'a RecordBuf {
        self.read
    }

    /// Number of bases to remove beyond each soft clip.
    #[must_use]
    pub fn extra_bases(&self) -> usize {
        self.extra_bases
    }

    /// Applies every queued range with `representation` and returns the clipped record.
    ///
    /// With no queued ranges a copy of the original record is returned. When the ranges
    /// leave no bases the canonical empty record is returned instead.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`ClippingOp::apply`]; the queued ranges are kept
    /// in that case.
    pub fn clip_read(&mut self, representation: ClippingRepresentation) -> Result<RecordBuf> {
        if self.ops.is_empty() {
            return Ok(self.read.clone());
        }

        let mut clipped = self.read.clone();
        for op in &self.ops {
            let len = clipped.sequence().len();
            if op.start >= len {
                continue;
            }
            let op = ClippingOp::new(op.start, op.stop.min(len - 1));
            clipped = op.apply(representation, &clipped)?;
        }

        self.was_clipped = true;
        self.ops.clear();

        if is_empty(&clipped) { Ok(empty_record(self.read)) } else { Ok(clipped) }
    }

    /// Clips one tail of the read at a reference coordinate.
    ///
    /// The coordinate is translated to a read index. For [`ClipTail::LeftTo`] a coordinate
    /// falling in a deletion or skip clips only up to the base before the gap, leaving the
    /// gap itself alone. Coordinates outside the alignment leave the record unchanged, as
    /// does an empty record.
    ///
    /// # Errors
    ///
    /// * [`ClipError::SoftClipUnmapped`] when soft clipping an unmapped record
    /// * [`ClipError::InvertedRange`] when the translated range is inverted, e.g. a right
    ///   tail starting at a trailing deletion
    /// * [`ClipError::OutOfBounds`] when the translated range runs past the read
    /// * any error from [`clip_read`](Self::clip_read)
    pub fn clip_by_reference_coordinates(
        &mut self,
        tail: ClipTail,
        representation: ClippingRepresentation,
    ) -> Result<RecordBuf> {
        let read = self.read;
        if is_empty(read) {
            return Ok(read.clone());
        }
        if representation == ClippingRepresentation::SoftclipBases && read.flags().is_unmapped() {
            return Err(ClipError::SoftClipUnmapped { name: read_name(read) });
        }

        let len = read.sequence().len();
        let (start, stop) = match tail {
            ClipTail::LeftTo(ref_stop) => {
                let Some((index, kind)) = read_index_for_reference_coordinate(read, ref_stop)
                else {
                    return Ok(read.clone());
                };
                if consumes_read(kind) {
                    (0, index)
                } else if let Some(stop) = index.checked_sub(1) {
                    (0, stop)
                } else {
                    // Nothing aligned before a leading deletion.
                    return Ok(read.clone());
                }
            }
            ClipTail::RightFrom(ref_start) => {
                match read_index_for_reference_coordinate(read, ref_start) {
                    Some((index, _)) => (index, len - 1),
                    None => return Ok(read.clone()),
                }
            }
        };

        if start > stop {
            return Err(ClipError::InvertedRange {
                start,
                stop,
                cigar: format_cigar(read.cigar().as_ref()),
            });
        }
        if stop >= len {
            return Err(ClipError::OutOfBounds { start, stop, len });
        }

        self.add_op(ClippingOp::new(start, stop));
        self.clip_read(representation)
    }

    /// Clips the read-coordinate range `start..=stop`.
    ///
    /// An empty record, or a soft or hard clip covering the whole read, yields the canonical
    /// empty record.
    ///
    /// # Errors
    ///
    /// Returns any error from [`clip_read`](Self::clip_read).
    pub fn clip_by_read_coordinates(
        &mut self,
        start: usize,
        stop: usize,
        representation: ClippingRepresentation,
    ) -> Result<RecordBuf> {
        let read = self.read;
        let len = read.sequence().len();
        if len == 0 {
            return Ok(empty_record(read));
        }
        if representation.clips_alignment() && start == 0 && stop >= len - 1 {
            warn!(
                "Clipping [{start}, {stop}] removes all {len} bases of read '{}'; \
                 returning an empty record",
                read_name(read)
            );
            return Ok(empty_record(read));
        }

        self.add_op(ClippingOp::new(start, stop));
        self.clip_read(representation)
    }

    /// Hard clips every soft-clipped base, plus [`extra_bases`](Self::extra_bases) more
    /// beyond each soft clip.
    ///
    /// Leading hard clips do not end the leading soft clip, so `2H3S10M` clips three bases.
    ///
    /// # Errors
    ///
    /// Returns any error from [`clip_read`](Self::clip_read).
    pub fn clip_soft_clipped_bases(&mut self) -> Result<RecordBuf> {
        let read = self.read;
        if is_empty(read) {
            return Ok(read.clone());
        }

        let len = read.sequence().len();
        let mut read_index = 0;
        let mut cut_left = None;
        let mut cut_right = None;
        let mut in_right_tail = false;

        for op in read.cigar().as_ref() {
            let kind = op.kind();
            if op.len() == 0 {
                continue;
            }
            if kind == Kind::SoftClip {
                if in_right_tail {
                    cut_right = Some(read_index);
                } else {
                    cut_left = Some(read_index + op.len() - 1);
                }
            } else if kind != Kind::HardClip {
                in_right_tail = true;
            }
            if consumes_read(kind) {
                read_index += op.len();
            }
        }

        if let Some(cut) = cut_right {
            self.add_op(ClippingOp::new(cut.saturating_sub(self.extra_bases), len - 1));
        }
        if let Some(cut) = cut_left {
            self.add_op(ClippingOp::new(0, cut.saturating_add(self.extra_bases)));
        }

        self.clip_read(ClippingRepresentation::HardclipBases)
    }
}
