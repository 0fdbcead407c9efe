//! Custom error types for read clipping operations.

use thiserror::Error;

/// Result type alias for clipping operations
pub type Result<T> = std::result::Result<T, ClipError>;

/// Error type for clipping operations
///
/// Degenerate inputs (an empty record, a coordinate outside the alignment, a range covering
/// the whole read) are not errors: they produce the record unchanged or the canonical empty
/// record. These variants are reserved for requests that cannot be honored at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// A soft or hard clip range touches neither end of the read
    #[error("Cannot clip the middle of a read: [{start}, {stop}] on cigar {cigar}")]
    ClipsMiddleOfRead {
        /// First read index of the range
        start: usize,
        /// Last read index of the range (inclusive)
        stop: usize,
        /// The record's cigar
        cigar: String,
    },

    /// A range whose start lies after its stop
    #[error("Invalid range: start {start} is after stop {stop} on cigar {cigar}")]
    InvertedRange {
        /// First read index of the range
        start: usize,
        /// Last read index of the range (inclusive)
        stop: usize,
        /// The record's cigar
        cigar: String,
    },

    /// A range extending past the last base of the read
    #[error("Range [{start}, {stop}] is out of bounds for a read of length {len}")]
    OutOfBounds {
        /// First read index of the range
        start: usize,
        /// Last read index of the range (inclusive)
        stop: usize,
        /// Number of bases in the read
        len: usize,
    },

    /// Soft clipping was requested on a read without an alignment
    #[error("Cannot soft clip unmapped read '{name}'")]
    SoftClipUnmapped {
        /// The read name
        name: String,
    },

    /// A clipping representation name that could not be parsed
    #[error(
        "Invalid clipping representation: '{value}' (valid values: 'write-ns', 'write-q0s', \
         'write-ns-and-q0s', 'soft-clip', 'hard-clip', 'revert-soft-clip')"
    )]
    UnknownRepresentation {
        /// The unrecognized value
        value: String,
    },
}
