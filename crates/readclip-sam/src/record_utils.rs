//! Record-level utilities for SAM/BAM records.
//!
//! This module provides utilities for working with individual SAM records, including:
//! - CIGAR consumption rules and lengths
//! - Alignment end, unclipped start/end and soft start positions
//! - Translation of reference coordinates into read indices
//! - The canonical empty record produced when a read is clipped away entirely

use std::fmt::Write;

use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::Data;

/// Returns true if the operation kind consumes read bases (M, I, S, =, X).
#[must_use]
pub fn consumes_read(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match
            | Kind::Insertion
            | Kind::SoftClip
            | Kind::SequenceMatch
            | Kind::SequenceMismatch
    )
}

/// Returns true if the operation kind consumes reference bases (M, D, N, =, X).
#[must_use]
pub fn consumes_reference(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match
            | Kind::Deletion
            | Kind::Skip
            | Kind::SequenceMatch
            | Kind::SequenceMismatch
    )
}

/// Counts reference-consuming operations from a CIGAR.
#[must_use]
pub fn reference_length(ops: &[Op]) -> usize {
    ops.iter().filter(|op| consumes_reference(op.kind())).map(|op| op.len()).sum()
}

/// Counts read-consuming operations from a CIGAR, i.e. the number of stored bases.
#[must_use]
pub fn read_length(ops: &[Op]) -> usize {
    ops.iter().filter(|op| consumes_read(op.kind())).map(|op| op.len()).sum()
}

/// Formats CIGAR operations as a SAM CIGAR string. An empty CIGAR formats as `*`.
#[must_use]
pub fn format_cigar(ops: &[Op]) -> String {
    if ops.is_empty() {
        return "*".to_string();
    }

    ops.iter().fold(String::new(), |mut acc, op| {
        let kind_char = match op.kind() {
            Kind::Match => 'M',
            Kind::Insertion => 'I',
            Kind::Deletion => 'D',
            Kind::Skip => 'N',
            Kind::SoftClip => 'S',
            Kind::HardClip => 'H',
            Kind::Pad => 'P',
            Kind::SequenceMatch => '=',
            Kind::SequenceMismatch => 'X',
        };
        let _ = write!(acc, "{}{}", op.len(), kind_char);
        acc
    })
}

/// Calculates leading clipping (soft + hard) from CIGAR operations.
#[must_use]
pub fn leading_clipping(ops: &[Op]) -> usize {
    ops.iter()
        .take_while(|op| matches!(op.kind(), Kind::SoftClip | Kind::HardClip))
        .map(|op| op.len())
        .sum()
}

/// Calculates trailing clipping (soft + hard) from CIGAR operations.
#[must_use]
pub fn trailing_clipping(ops: &[Op]) -> usize {
    ops.iter()
        .rev()
        .take_while(|op| matches!(op.kind(), Kind::SoftClip | Kind::HardClip))
        .map(|op| op.len())
        .sum()
}

/// Calculates leading soft clipping only from CIGAR operations.
#[must_use]
pub fn leading_soft_clipping(ops: &[Op]) -> usize {
    ops.iter()
        .skip_while(|op| op.kind() == Kind::HardClip)
        .take_while(|op| op.kind() == Kind::SoftClip)
        .map(|op| op.len())
        .sum()
}

/// Calculates trailing soft clipping only from CIGAR operations.
#[must_use]
pub fn trailing_soft_clipping(ops: &[Op]) -> usize {
    ops.iter()
        .rev()
        .skip_while(|op| op.kind() == Kind::HardClip)
        .take_while(|op| op.kind() == Kind::SoftClip)
        .map(|op| op.len())
        .sum()
}

/// Returns true if the record has no bases, which is the case for the canonical empty record.
#[must_use]
pub fn is_empty(record: &RecordBuf) -> bool {
    record.sequence().is_empty()
}

/// Gets the read's alignment start position (1-based), or `None` for unmapped reads.
#[must_use]
pub fn alignment_start(record: &RecordBuf) -> Option<usize> {
    if record.flags().is_unmapped() {
        return None;
    }
    record.alignment_start().map(usize::from)
}

/// Gets the read's alignment end position (1-based, inclusive).
///
/// Calculated as: `alignment_start + reference_length - 1`
#[must_use]
pub fn alignment_end(record: &RecordBuf) -> Option<usize> {
    let start = alignment_start(record)?;
    let ref_len = reference_length(record.cigar().as_ref());
    Some((start + ref_len).saturating_sub(1))
}

/// Gets the unclipped start position of a read (alignment start minus leading clips).
///
/// This matches HTSJDK's `SAMRecord.getUnclippedStart()` behavior, which includes
/// both soft clips and hard clips. Returns `None` for unmapped reads.
#[must_use]
pub fn unclipped_start(record: &RecordBuf) -> Option<usize> {
    let start = alignment_start(record)?;
    let leading = leading_clipping(record.cigar().as_ref());
    Some(start.saturating_sub(leading))
}

/// Gets the unclipped end position of a read (alignment end plus trailing clips).
///
/// Returns `None` for unmapped reads.
#[must_use]
pub fn unclipped_end(record: &RecordBuf) -> Option<usize> {
    let start = alignment_start(record)?;
    let ops = record.cigar();
    let ref_len = reference_length(ops.as_ref());
    let trailing = trailing_clipping(ops.as_ref());
    Some(start + ref_len.saturating_sub(1) + trailing)
}

/// Gets the position the first stored base would occupy if leading soft clips were aligned.
///
/// The result can be zero or negative for reads near the start of a contig, so it is signed.
#[must_use]
pub fn soft_start(record: &RecordBuf) -> Option<isize> {
    let start = alignment_start(record)?;
    let leading = leading_soft_clipping(record.cigar().as_ref());
    Some(start as isize - leading as isize)
}

/// Returns the 0-based read index aligned to a 1-based reference coordinate.
///
/// The CIGAR is walked once, bracketing each operation's reference span. When the
/// coordinate falls on a read-consuming operation, the index of the aligned base is
/// returned. When it falls inside a deletion or skip, the index of the first base after
/// the gap is returned, together with the gap's kind so callers can tell the two apart.
///
/// Returns `None` for unmapped reads and coordinates outside the alignment.
#[must_use]
pub fn read_index_for_reference_coordinate(
    record: &RecordBuf,
    ref_coord: usize,
) -> Option<(usize, Kind)> {
    let alignment_start = alignment_start(record)?;
    if ref_coord < alignment_start {
        return None;
    }

    let mut read_pos = 0;
    let mut ref_cursor = alignment_start;

    for op in record.cigar().as_ref() {
        let (kind, len) = (op.kind(), op.len());
        let read_len = if consumes_read(kind) { len } else { 0 };
        let ref_len = if consumes_reference(kind) { len } else { 0 };

        if ref_coord >= ref_cursor && ref_coord < ref_cursor + ref_len {
            let offset = if consumes_read(kind) { ref_coord - ref_cursor } else { 0 };
            return Some((read_pos + offset, kind));
        }

        read_pos += read_len;
        ref_cursor += ref_len;
    }

    None
}

/// Builds the canonical empty record for a read that was clipped away entirely.
///
/// The read name and read group are kept so the record can still be traced; everything
/// describing the alignment, the bases and the remaining tags is cleared and the record
/// is flagged as unmapped.
#[must_use]
pub fn empty_record(record: &RecordBuf) -> RecordBuf {
    let mut empty = RecordBuf::default();

    *empty.name_mut() = record.name().map(ToOwned::to_owned);

    let mut flags = record.flags();
    flags.insert(Flags::UNMAPPED);
    *empty.flags_mut() = flags;

    let mut data = Data::default();
    if let Some(read_group) = record.data().get(&Tag::READ_GROUP) {
        data.insert(Tag::READ_GROUP, read_group.clone());
    }
    *empty.data_mut() = data;

    empty
}
