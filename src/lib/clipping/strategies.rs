//! Clipping strategies.
//!
//! Each strategy inspects a record, decides which ranges to clip and materializes them with
//! a [`ReadClipper`]. Degenerate inputs never fail: an empty record, a coordinate outside the
//! alignment or a region that doesn't overlap the read give back the record unchanged or the
//! canonical empty record (see [`empty_record`]).

use log::warn;
use noodles::sam::alignment::RecordBuf;

use readclip_sam::adaptor::{adaptor_boundary, is_inside_read};
use readclip_sam::record_utils::{
    alignment_end, alignment_start, empty_record, is_empty, unclipped_end, unclipped_start,
};

use super::clipper::{ClipTail, ReadClipper};
use super::op::{ClippingOp, ClippingRepresentation};
use super::read_name;
use crate::errors::{ClipError, Result};

/// Clips one tail of `record` at a reference coordinate.
///
/// See [`ReadClipper::clip_by_reference_coordinates`].
pub fn clip_by_reference_coordinates(
    record: &RecordBuf,
    tail: ClipTail,
    representation: ClippingRepresentation,
) -> Result<RecordBuf> {
    ReadClipper::new(record).clip_by_reference_coordinates(tail, representation)
}

/// Hard clips everything from the start of the read through `ref_stop`.
pub fn hard_clip_by_reference_coordinates_left_tail(
    record: &RecordBuf,
    ref_stop: usize,
) -> Result<RecordBuf> {
    clip_by_reference_coordinates(
        record,
        ClipTail::LeftTo(ref_stop),
        ClippingRepresentation::HardclipBases,
    )
}

/// Hard clips everything from `ref_start` through the end of the read.
pub fn hard_clip_by_reference_coordinates_right_tail(
    record: &RecordBuf,
    ref_start: usize,
) -> Result<RecordBuf> {
    clip_by_reference_coordinates(
        record,
        ClipTail::RightFrom(ref_start),
        ClippingRepresentation::HardclipBases,
    )
}

fn clip_both_ends_by_reference_coordinates(
    record: &RecordBuf,
    left: usize,
    right: usize,
    representation: ClippingRepresentation,
) -> Result<RecordBuf> {
    let right_clipped =
        clip_by_reference_coordinates(record, ClipTail::RightFrom(right), representation)?;

    // The right clip may have moved the alignment end left of `left`.
    if is_empty(&right_clipped) || alignment_end(&right_clipped).is_some_and(|end| left > end) {
        return Ok(empty_record(record));
    }

    clip_by_reference_coordinates(&right_clipped, ClipTail::LeftTo(left), representation)
}

/// Hard clips both tails: everything up to and including `left`, and everything from
/// `right` onwards.
///
/// The right tail is clipped first. `left == right` gives the canonical empty record.
///
/// # Errors
///
/// Returns any error from [`ReadClipper::clip_by_reference_coordinates`].
pub fn hard_clip_both_ends_by_reference_coordinates(
    record: &RecordBuf,
    left: usize,
    right: usize,
) -> Result<RecordBuf> {
    if is_empty(record) || left == right {
        return Ok(empty_record(record));
    }
    clip_both_ends_by_reference_coordinates(
        record,
        left,
        right,
        ClippingRepresentation::HardclipBases,
    )
}

/// Soft-clip counterpart of [`hard_clip_both_ends_by_reference_coordinates`].
pub fn soft_clip_both_ends_by_reference_coordinates(
    record: &RecordBuf,
    left: usize,
    right: usize,
) -> Result<RecordBuf> {
    if is_empty(record) {
        return Ok(empty_record(record));
    }
    if left == right {
        warn!(
            "Soft clipping read '{}' at {left} on both ends would leave nothing aligned; \
             returning an empty record",
            read_name(record)
        );
        return Ok(empty_record(record));
    }
    clip_both_ends_by_reference_coordinates(
        record,
        left,
        right,
        ClippingRepresentation::SoftclipBases,
    )
}

/// Clips the low quality tails of a read.
///
/// Bases with quality `<= low_qual` at either end are clipped with `representation`; the
/// first base above the threshold stops each scan. A read with no base above the
/// threshold yields the canonical empty record.
///
/// # Arguments
///
/// * `record` - The read to clip
/// * `low_qual` - Highest quality still considered low
/// * `representation` - How to clip the low quality tails
///
/// # Errors
///
/// Returns any error from [`ReadClipper::clip_read`], e.g. soft clipping an unmapped read.
pub fn clip_low_qual_ends(
    record: &RecordBuf,
    low_qual: u8,
    representation: ClippingRepresentation,
) -> Result<RecordBuf> {
    if is_empty(record) {
        return Ok(record.clone());
    }

    let quals = record.quality_scores().as_ref();
    let len = quals.len();
    let Some(good_right) = quals.iter().rposition(|&q| q > low_qual) else {
        // Includes reads without qualities, where len == 0.
        return Ok(if len == 0 { record.clone() } else { empty_record(record) });
    };
    let good_left = quals.iter().position(|&q| q > low_qual).unwrap_or(good_right);

    let mut clipper = ReadClipper::new(record);
    if good_right < len - 1 {
        clipper.add_op(ClippingOp::new(good_right + 1, len - 1));
    }
    if good_left > 0 {
        clipper.add_op(ClippingOp::new(0, good_left - 1));
    }
    clipper.clip_read(representation)
}

/// Hard clips the low quality tails of a read. See [`clip_low_qual_ends`].
pub fn hard_clip_low_qual_ends(record: &RecordBuf, low_qual: u8) -> Result<RecordBuf> {
    clip_low_qual_ends(record, low_qual, ClippingRepresentation::HardclipBases)
}

/// Soft clips the low quality tails of a read. See [`clip_low_qual_ends`].
pub fn soft_clip_low_qual_ends(record: &RecordBuf, low_qual: u8) -> Result<RecordBuf> {
    clip_low_qual_ends(record, low_qual, ClippingRepresentation::SoftclipBases)
}

/// Converts all soft clips into hard clips.
///
/// # Errors
///
/// Returns any error from [`ReadClipper::clip_read`].
pub fn hard_clip_soft_clipped_bases(record: &RecordBuf) -> Result<RecordBuf> {
    hard_clip_soft_clipped_bases_with_extra(record, 0)
}

/// Converts all soft clips into hard clips, also removing `extra` aligned bases next to each
/// soft clip.
pub fn hard_clip_soft_clipped_bases_with_extra(
    record: &RecordBuf,
    extra: usize,
) -> Result<RecordBuf> {
    ReadClipper::with_extra_bases(record, extra).clip_soft_clipped_bases()
}

/// Which parts of an alignment fall outside a reference region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overhang {
    Disjoint,
    Both,
    Left,
    Right,
    None,
}

impl Overhang {
    fn of(span_start: usize, span_end: usize, ref_start: usize, ref_stop: usize) -> Self {
        if span_start > ref_stop || span_end < ref_start {
            Overhang::Disjoint
        } else if span_start < ref_start && span_end > ref_stop {
            Overhang::Both
        } else if span_start < ref_start {
            Overhang::Left
        } else if span_end > ref_stop {
            Overhang::Right
        } else {
            Overhang::None
        }
    }
}

fn clip_to_region(
    record: &RecordBuf,
    overhang: Overhang,
    ref_start: usize,
    ref_stop: usize,
    representation: ClippingRepresentation,
) -> Result<RecordBuf> {
    match overhang {
        Overhang::Disjoint => Ok(empty_record(record)),
        Overhang::Both => match representation {
            ClippingRepresentation::SoftclipBases => {
                soft_clip_both_ends_by_reference_coordinates(record, ref_start - 1, ref_stop + 1)
            }
            _ => hard_clip_both_ends_by_reference_coordinates(record, ref_start - 1, ref_stop + 1),
        },
        Overhang::Left => {
            clip_by_reference_coordinates(record, ClipTail::LeftTo(ref_start - 1), representation)
        }
        Overhang::Right => {
            clip_by_reference_coordinates(record, ClipTail::RightFrom(ref_stop + 1), representation)
        }
        Overhang::None => Ok(record.clone()),
    }
}

/// Hard clips the read so its alignment lies within `ref_start..=ref_stop`.
///
/// A read contained in the region is returned unchanged; a read not overlapping it gives
/// the canonical empty record. Unmapped reads are returned unchanged.
///
/// # Errors
///
/// Returns any error from [`ReadClipper::clip_by_reference_coordinates`].
pub fn hard_clip_to_region(
    record: &RecordBuf,
    ref_start: usize,
    ref_stop: usize,
) -> Result<RecordBuf> {
    if is_empty(record) {
        return Ok(record.clone());
    }
    let (Some(start), Some(end)) = (alignment_start(record), alignment_end(record)) else {
        return Ok(record.clone());
    };

    let overhang = Overhang::of(start, end, ref_start, ref_stop);
    clip_to_region(record, overhang, ref_start, ref_stop, ClippingRepresentation::HardclipBases)
}

/// Soft clips the read to `ref_start..=ref_stop`, judging overlap by its unclipped span.
///
/// Existing soft and hard clips count towards the span, so a read whose clipped bases
/// would reach outside the region is clipped even when its aligned bases don't.
///
/// # Errors
///
/// * [`ClipError::SoftClipUnmapped`] for unmapped reads
/// * any error from [`ReadClipper::clip_by_reference_coordinates`]
pub fn soft_clip_to_region_including_clipped_bases(
    record: &RecordBuf,
    ref_start: usize,
    ref_stop: usize,
) -> Result<RecordBuf> {
    if is_empty(record) {
        return Ok(record.clone());
    }
    let (Some(start), Some(end)) = (unclipped_start(record), unclipped_end(record)) else {
        return Err(ClipError::SoftClipUnmapped { name: read_name(record) });
    };

    let overhang = Overhang::of(start, end, ref_start, ref_stop);
    if overhang == Overhang::Disjoint {
        warn!(
            "Read '{}' spanning {start}-{end} does not overlap region {ref_start}-{ref_stop}; \
             returning an empty record",
            read_name(record)
        );
    }
    clip_to_region(record, overhang, ref_start, ref_stop, ClippingRepresentation::SoftclipBases)
}

/// Hard clips adaptor read-through from a paired read.
///
/// The adaptor boundary comes from [`adaptor_boundary`]. Reads whose boundary can't be
/// computed, or lies outside the aligned span, are returned unchanged. Reverse-strand reads
/// lose everything up to the boundary, forward-strand reads everything from it.
///
/// # Errors
///
/// Returns any error from [`ReadClipper::clip_by_reference_coordinates`].
pub fn hard_clip_adaptor_sequence(record: &RecordBuf) -> Result<RecordBuf> {
    let Some(boundary) = adaptor_boundary(record) else {
        return Ok(record.clone());
    };
    if !is_inside_read(record, boundary) {
        return Ok(record.clone());
    }

    if record.flags().is_reverse_complemented() {
        hard_clip_by_reference_coordinates_left_tail(record, boundary)
    } else {
        hard_clip_by_reference_coordinates_right_tail(record, boundary)
    }
}

/// Turns all soft clips back into aligned bases. See
/// [`ClippingRepresentation::RevertSoftclippedBases`].
pub fn revert_soft_clipped_bases(record: &RecordBuf) -> Result<RecordBuf> {
    if is_empty(record) {
        return Ok(record.clone());
    }
    let mut clipper = ReadClipper::new(record);
    clipper.add_op(ClippingOp::new(0, 0));
    clipper.clip_read(ClippingRepresentation::RevertSoftclippedBases)
}

/// Clips the read-coordinate range `start..=stop` with `representation`.
///
/// See [`ReadClipper::clip_by_read_coordinates`].
pub fn clip_by_read_coordinates(
    record: &RecordBuf,
    start: usize,
    stop: usize,
    representation: ClippingRepresentation,
) -> Result<RecordBuf> {
    ReadClipper::new(record).clip_by_read_coordinates(start, stop, representation)
}

/// Soft clips the read-coordinate range `start..=stop`.
pub fn soft_clip_by_read_coordinates(
    record: &RecordBuf,
    start: usize,
    stop: usize,
) -> Result<RecordBuf> {
    clip_by_read_coordinates(record, start, stop, ClippingRepresentation::SoftclipBases)
}
