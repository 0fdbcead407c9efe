//! Read clipping.
//!
//! A clip is described by a [`ClippingOp`], an inclusive range of read indices, and applied
//! with one of the [`ClippingRepresentation`]s: masking bases or qualities, soft clipping,
//! hard clipping, or reverting existing soft clips. [`ReadClipper`] queues ranges for one
//! record and applies them in order; the functions in [`strategies`] decide which ranges
//! to queue (low-quality tails, soft clips, reference regions, adaptor read-through).
//!
//! Hard clipping keeps the read's unclipped span recoverable from its CIGAR: every removed
//! base that was aligned or soft clipped, and every deletion left dangling at the new end,
//! is recorded as a hard clip.
//!
//! ```rust
//! use readclip_lib::clipping::strategies::hard_clip_soft_clipped_bases;
//! use readclip_sam::builder::RecordBuilder;
//! use readclip_sam::record_utils::format_cigar;
//!
//! let record = RecordBuilder::mapped_read().cigar("5M5S").alignment_start(100).build();
//! let clipped = hard_clip_soft_clipped_bases(&record).unwrap();
//!
//! assert_eq!(format_cigar(clipped.cigar().as_ref()), "5M5H");
//! assert_eq!(clipped.sequence().len(), 5);
//! ```

pub mod cigar;
pub mod clipper;
pub mod op;
pub mod strategies;

use noodles::sam::alignment::RecordBuf;

pub use clipper::{ClipTail, ReadClipper};
pub use op::{ClippingOp, ClippingRepresentation};

/// The read name for diagnostics, or an empty string for unnamed records.
pub(crate) fn read_name(record: &RecordBuf) -> String {
    use bstr::ByteSlice;

    record.name().map(|name| name.to_str_lossy().into_owned()).unwrap_or_default()
}
