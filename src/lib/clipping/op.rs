//! The clip primitive: a read-coordinate range and the ways it can be applied to a record.

use std::fmt::{self, Display};
use std::str::FromStr;

use noodles::core::Position;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record_buf::{Cigar as CigarBuf, QualityScores, Sequence};

use readclip_sam::record_utils::{empty_record, format_cigar, soft_start};

use super::cigar::{self, ClippedCigar};
use super::read_name;
use crate::errors::{ClipError, Result};

/// Base written over masked positions by [`ClippingRepresentation::WriteNs`].
pub const NO_CALL_BASE: u8 = b'N';

/// Quality written over masked positions by [`ClippingRepresentation::WriteQ0s`].
pub const MIN_QUALITY: u8 = 0;

/// How a clip range is applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClippingRepresentation {
    /// Overwrite bases in the range with `N`
    WriteNs,
    /// Overwrite base qualities in the range with 0
    WriteQ0s,
    /// Overwrite both bases and qualities
    WriteNsAndQ0s,
    /// Convert the range to a soft clip, keeping bases and qualities
    SoftclipBases,
    /// Remove bases and qualities, recording the removed length as a hard clip
    HardclipBases,
    /// Turn every soft clip back into aligned bases
    RevertSoftclippedBases,
}

impl ClippingRepresentation {
    /// All representations, in declaration order.
    pub const ALL: [ClippingRepresentation; 6] = [
        ClippingRepresentation::WriteNs,
        ClippingRepresentation::WriteQ0s,
        ClippingRepresentation::WriteNsAndQ0s,
        ClippingRepresentation::SoftclipBases,
        ClippingRepresentation::HardclipBases,
        ClippingRepresentation::RevertSoftclippedBases,
    ];

    /// Returns true for the representations that change the alignment (soft and hard clips).
    #[must_use]
    pub fn clips_alignment(self) -> bool {
        matches!(
            self,
            ClippingRepresentation::SoftclipBases | ClippingRepresentation::HardclipBases
        )
    }
}

impl Display for ClippingRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClippingRepresentation::WriteNs => "write-ns",
            ClippingRepresentation::WriteQ0s => "write-q0s",
            ClippingRepresentation::WriteNsAndQ0s => "write-ns-and-q0s",
            ClippingRepresentation::SoftclipBases => "soft-clip",
            ClippingRepresentation::HardclipBases => "hard-clip",
            ClippingRepresentation::RevertSoftclippedBases => "revert-soft-clip",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ClippingRepresentation {
    type Err = ClipError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "write-ns" => Ok(ClippingRepresentation::WriteNs),
            "write-q0s" => Ok(ClippingRepresentation::WriteQ0s),
            "write-ns-and-q0s" => Ok(ClippingRepresentation::WriteNsAndQ0s),
            "soft-clip" | "softclip" | "soft" | "softclip-bases" => {
                Ok(ClippingRepresentation::SoftclipBases)
            }
            "hard-clip" | "hardclip" | "hard" | "hardclip-bases" => {
                Ok(ClippingRepresentation::HardclipBases)
            }
            "revert-soft-clip" | "revert-softclipped-bases" => {
                Ok(ClippingRepresentation::RevertSoftclippedBases)
            }
            _ => Err(ClipError::UnknownRepresentation { value: s.to_string() }),
        }
    }
}

/// An inclusive range of 0-based read indices to clip.
///
/// The range is resolved against the record it is applied to; [`ReadClipper`] clamps it to
/// the record's current length before applying it.
///
/// [`ReadClipper`]: super::ReadClipper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippingOp {
    /// First read index to clip
    pub start: usize,
    /// Last read index to clip (inclusive)
    pub stop: usize,
}

impl ClippingOp {
    /// Creates a new clip range covering `start..=stop`.
    #[must_use]
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Applies this range to `record` using `representation`, returning a new record.
    ///
    /// The input record is never modified.
    ///
    /// # Errors
    ///
    /// * [`ClipError::InvertedRange`] if `start > stop`
    /// * [`ClipError::OutOfBounds`] if `stop` is past the last base
    /// * [`ClipError::ClipsMiddleOfRead`] if a soft or hard clip touches neither end
    /// * [`ClipError::SoftClipUnmapped`] if soft clipping an unmapped record
    ///
    /// `RevertSoftclippedBases` ignores the range and never fails.
    pub fn apply(
        &self,
        representation: ClippingRepresentation,
        record: &RecordBuf,
    ) -> Result<RecordBuf> {
        if representation != ClippingRepresentation::RevertSoftclippedBases {
            self.check_bounds(record)?;
        }

        match representation {
            ClippingRepresentation::WriteNs => Ok(self.write_ns(record)),
            ClippingRepresentation::WriteQ0s => Ok(self.write_q0s(record)),
            ClippingRepresentation::WriteNsAndQ0s => Ok(self.write_q0s(&self.write_ns(record))),
            ClippingRepresentation::SoftclipBases => self.soft_clip(record),
            ClippingRepresentation::HardclipBases => self.hard_clip(record),
            ClippingRepresentation::RevertSoftclippedBases => Ok(revert_soft_clips(record)),
        }
    }

    fn check_bounds(&self, record: &RecordBuf) -> Result<()> {
        if self.start > self.stop {
            return Err(ClipError::InvertedRange {
                start: self.start,
                stop: self.stop,
                cigar: format_cigar(record.cigar().as_ref()),
            });
        }
        let len = record.sequence().len();
        if self.stop >= len {
            return Err(ClipError::OutOfBounds { start: self.start, stop: self.stop, len });
        }
        Ok(())
    }

    fn middle_of_read(&self, record: &RecordBuf) -> ClipError {
        ClipError::ClipsMiddleOfRead {
            start: self.start,
            stop: self.stop,
            cigar: format_cigar(record.cigar().as_ref()),
        }
    }

    fn write_ns(&self, record: &RecordBuf) -> RecordBuf {
        let mut bases = record.sequence().as_ref().to_vec();
        bases[self.start..=self.stop].fill(NO_CALL_BASE);

        let mut masked = record.clone();
        *masked.sequence_mut() = Sequence::from(bases);
        masked
    }

    fn write_q0s(&self, record: &RecordBuf) -> RecordBuf {
        let mut quals = record.quality_scores().as_ref().to_vec();
        // Records without qualities have nothing to mask.
        if let Some(range) = quals.get_mut(self.start..=self.stop) {
            range.fill(MIN_QUALITY);
        }

        let mut masked = record.clone();
        *masked.quality_scores_mut() = QualityScores::from(quals);
        masked
    }

    fn soft_clip(&self, record: &RecordBuf) -> Result<RecordBuf> {
        if record.flags().is_unmapped() {
            return Err(ClipError::SoftClipUnmapped { name: read_name(record) });
        }

        let len = record.sequence().len();
        let from_left = self.start == 0;
        if !from_left && self.stop != len - 1 {
            return Err(self.middle_of_read(record));
        }

        // A record cannot be soft clipped away entirely: at least one M, = or X base stays
        // aligned, even when the range covers it.
        let ops = record.cigar().as_ref();
        let Some((first_aligned, last_aligned)) = cigar::aligned_read_bounds(ops) else {
            return Ok(record.clone());
        };
        let clipped = if from_left {
            let stop = if self.stop < last_aligned {
                self.stop
            } else if let Some(stop) = last_aligned.checked_sub(1) {
                stop
            } else {
                return Ok(record.clone());
            };
            cigar::soft_clip_left(ops, stop + 1)
        } else {
            let start = self.start.max(first_aligned + 1);
            if start >= len {
                return Ok(record.clone());
            }
            cigar::soft_clip_right(ops, len - start)
        };

        let mut soft_clipped = record.clone();
        *soft_clipped.cigar_mut() = CigarBuf::from(clipped.ops);
        if from_left {
            shift_alignment_start(&mut soft_clipped, clipped.reference_shift);
        }
        Ok(soft_clipped)
    }

    fn hard_clip(&self, record: &RecordBuf) -> Result<RecordBuf> {
        let len = record.sequence().len();
        let from_left = self.start == 0;
        if !from_left && self.stop != len - 1 {
            return Err(self.middle_of_read(record));
        }

        let ops = record.cigar().as_ref();
        let n = if from_left { self.stop + 1 } else { len - self.start };
        let clipped = if ops.is_empty() {
            ClippedCigar { ops: Vec::new(), bases_removed: n, reference_shift: 0 }
        } else if from_left {
            cigar::hard_clip_left(ops, n)
        } else {
            cigar::hard_clip_right(ops, n)
        };

        let removed = clipped.bases_removed.min(len);
        if removed == len {
            return Ok(empty_record(record));
        }
        let kept = if from_left { removed..len } else { 0..len - removed };

        let mut hard_clipped = record.clone();
        *hard_clipped.sequence_mut() =
            Sequence::from(record.sequence().as_ref()[kept.clone()].to_vec());
        let quals = record.quality_scores().as_ref();
        if quals.len() == len {
            *hard_clipped.quality_scores_mut() = QualityScores::from(quals[kept].to_vec());
        }
        *hard_clipped.cigar_mut() = CigarBuf::from(clipped.ops);
        if from_left && !record.flags().is_unmapped() {
            shift_alignment_start(&mut hard_clipped, clipped.reference_shift);
        }
        Ok(hard_clipped)
    }
}

/// Moves the alignment start of a mapped record `shift` reference bases to the right.
fn shift_alignment_start(record: &mut RecordBuf, shift: usize) {
    if shift == 0 {
        return;
    }
    if let Some(start) = record.alignment_start() {
        *record.alignment_start_mut() = Position::new(usize::from(start) + shift);
    }
}

/// Converts soft clips back to aligned bases, moving the start to the soft start.
///
/// Bases that would then lie before the first position of the contig are hard clipped and
/// the record starts at position 1.
fn revert_soft_clips(record: &RecordBuf) -> RecordBuf {
    let Some(soft_start) = soft_start(record) else {
        return record.clone();
    };

    let ops = cigar::revert_soft_clips(record.cigar().as_ref());
    let mut reverted = record.clone();
    *reverted.cigar_mut() = CigarBuf::from(ops.clone());

    if soft_start >= 1 {
        *reverted.alignment_start_mut() = Position::new(soft_start as usize);
        return reverted;
    }

    let before_contig = (1 - soft_start) as usize;
    let clipped = cigar::hard_clip_left(&ops, before_contig);
    let len = record.sequence().len();
    let removed = clipped.bases_removed.min(len);
    if removed == len {
        return empty_record(record);
    }

    *reverted.sequence_mut() = Sequence::from(record.sequence().as_ref()[removed..].to_vec());
    let quals = record.quality_scores().as_ref();
    if quals.len() == len {
        *reverted.quality_scores_mut() = QualityScores::from(quals[removed..].to_vec());
    }
    *reverted.cigar_mut() = CigarBuf::from(clipped.ops);
    *reverted.alignment_start_mut() = Position::new(1);
    reverted
}
