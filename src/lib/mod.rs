#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: Coordinate code casts between signed and unsigned positions
// - missing_*_doc: Documentation improvements tracked separately
// - module_name_repetitions: Types such as ClippingOp live in the clipping module
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! # readclip - Clipping of aligned sequencing reads
//!
//! This library removes, masks or reclassifies bases at the ends of aligned reads while
//! keeping each read's unclipped alignment span recoverable from its CIGAR.
//!
//! ## Overview
//!
//! - **[`clipping`]** - Clip ranges, representations, the [`ReadClipper`](clipping::ReadClipper)
//!   orchestrator and the clipping strategies
//! - **[`errors`]** - The [`ClipError`](errors::ClipError) type
//!
//! Record-level helpers (coordinate translation, unclipped positions, adaptor boundaries
//! and the test record builder) live in the `readclip-sam` crate.
//!
//! ## Example
//!
//! ```rust
//! use readclip_lib::clipping::strategies::soft_clip_low_qual_ends;
//! use readclip_sam::builder::RecordBuilder;
//! use readclip_sam::record_utils::format_cigar;
//!
//! let record = RecordBuilder::mapped_read()
//!     .sequence("ACGTAC")
//!     .qualities(&[2, 2, 2, 30, 30, 2])
//!     .alignment_start(100)
//!     .build();
//!
//! let clipped = soft_clip_low_qual_ends(&record, 2).unwrap();
//! assert_eq!(format_cigar(clipped.cigar().as_ref()), "3S2M1S");
//! ```
//!
//! ## Logging
//!
//! Non-fatal conditions, such as clipping a read away entirely, are reported through the
//! [`log`] facade at `warn` level. The library never installs a logger.

pub mod clipping;
pub mod errors;

pub use clipping::{ClipTail, ClippingOp, ClippingRepresentation, ReadClipper};
pub use errors::{ClipError, Result};
