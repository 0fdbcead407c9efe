#![deny(unsafe_code)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! SAM record helpers used by the readclip clipping core.
//!
//! - **[`record_utils`]** - CIGAR consumption rules, alignment end, unclipped start/end, soft
//!   start, reference-to-read coordinate translation and the canonical empty record
//! - **[`adaptor`]** - Adaptor boundary estimation for FR read pairs
//! - **[`builder`]** - Fluent [`RecordBuilder`](builder::RecordBuilder) for test records

pub mod adaptor;
pub mod builder;
pub mod record_utils;

pub use adaptor::{adaptor_boundary, has_well_defined_fragment_size, is_inside_read};
pub use builder::{RecordBuilder, parse_cigar};
pub use record_utils::{
    alignment_end, alignment_start, empty_record, format_cigar, read_index_for_reference_coordinate,
    soft_start, unclipped_end, unclipped_start,
};
