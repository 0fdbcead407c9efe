//! Adaptor boundary estimation for paired reads.
//!
//! When the fragment is shorter than the read length, the sequencer reads through the
//! fragment and into the adaptor on the other side. For a well-defined FR pair the
//! position where that happens follows from the mate's position and the template length:
//!
//! ```text
//! forward read:  |----------------------->|adaptor
//!                start                    start + |tlen|
//! reverse read:  adaptor|<-----------------------|
//!                  mate_start - 1
//! ```

use noodles::sam::alignment::RecordBuf;

use crate::record_utils::{alignment_end, alignment_start};

/// Returns true if the record belongs to a pair whose fragment size can be trusted.
///
/// Requires a paired, mapped read with a mapped mate on the opposite strand, a non-zero
/// template length, and the two reads actually facing each other.
#[must_use]
pub fn has_well_defined_fragment_size(record: &RecordBuf) -> bool {
    let flags = record.flags();
    let template_length = record.template_length();

    if template_length == 0 || !flags.is_segmented() {
        return false;
    }
    if flags.is_unmapped() || flags.is_mate_unmapped() {
        return false;
    }
    if flags.is_reverse_complemented() == flags.is_mate_reverse_complemented() {
        return false;
    }

    let (Some(start), Some(end), Some(mate_start)) = (
        alignment_start(record),
        alignment_end(record),
        record.mate_alignment_start().map(usize::from),
    ) else {
        return false;
    };

    if flags.is_reverse_complemented() {
        end > mate_start
    } else {
        start as i64 <= mate_start as i64 + i64::from(template_length)
    }
}

/// Estimates the first reference coordinate of adaptor sequence in the read.
///
/// Returns `None` when the boundary cannot be computed (see
/// [`has_well_defined_fragment_size`]).
#[must_use]
pub fn adaptor_boundary(record: &RecordBuf) -> Option<usize> {
    if !has_well_defined_fragment_size(record) {
        return None;
    }

    if record.flags().is_reverse_complemented() {
        let mate_start = usize::from(record.mate_alignment_start()?);
        mate_start.checked_sub(1)
    } else {
        let start = alignment_start(record)?;
        Some(start + record.template_length().unsigned_abs() as usize)
    }
}

/// Returns true if the reference coordinate lies within the record's aligned span.
#[must_use]
pub fn is_inside_read(record: &RecordBuf, ref_coord: usize) -> bool {
    match (alignment_start(record), alignment_end(record)) {
        (Some(start), Some(end)) => ref_coord >= start && ref_coord <= end,
        _ => false,
    }
}
