//! CIGAR rewriting for soft clipping, hard clipping and reverting soft clips.
//!
//! All functions work on one end of the alignment at a time. The left-end functions walk the
//! operations from the start of the read; the right-end functions reverse the operations,
//! run the same walk and reverse the result back.
//!
//! Hard clipping keeps the unclipped span recoverable: every removed length that consumed
//! reference or was soft clipped is re-encoded as a leading (or trailing) `H`, merged with any
//! existing hard clip at that end. Insertions never contribute to `H`.

use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;

use readclip_sam::record_utils::{consumes_read, consumes_reference};

/// The outcome of clipping one end of a CIGAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClippedCigar {
    /// The rewritten operations
    pub ops: Vec<Op>,
    /// Number of stored bases that must be removed from that end of the read
    pub bases_removed: usize,
    /// Number of reference bases no longer covered at that end of the alignment
    pub reference_shift: usize,
}

/// What a walk over the clipped end of a CIGAR consumed.
#[derive(Debug, Default)]
struct EdgeWalk {
    /// Pre-existing hard clips at the edge
    hard_clipped: usize,
    /// Length of M, =, X, S, D and N inside (or adjacent to) the clipped range
    clipped: usize,
    /// Stored bases inside the range, plus insertions split by or adjacent to its boundary
    read_bases: usize,
    /// Reference bases inside the range, plus deletions and skips adjacent to its boundary
    reference_shift: usize,
    /// The part of an operation split by the boundary that stays in the alignment
    remainder: Option<Op>,
    /// Index of the first operation left untouched
    next: usize,
}

/// Walks the first `n` stored bases of `ops`.
///
/// Once the range is exhausted on an operation boundary, deletions, skips, insertions and
/// pads that would otherwise start the alignment are swallowed as well.
fn walk_edge(ops: &[Op], n: usize) -> EdgeWalk {
    let mut walk = EdgeWalk::default();
    let mut remaining = n;
    let mut i = 0;

    while remaining > 0 && i < ops.len() {
        let op = ops[i];
        i += 1;

        let (kind, len) = (op.kind(), op.len());
        match kind {
            Kind::HardClip => walk.hard_clipped += len,
            Kind::Pad => {}
            Kind::Deletion | Kind::Skip => {
                walk.clipped += len;
                walk.reference_shift += len;
            }
            // A split insertion is removed in full.
            Kind::Insertion => {
                walk.read_bases += len;
                remaining = remaining.saturating_sub(len);
            }
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch | Kind::SoftClip => {
                let take = len.min(remaining);
                walk.read_bases += take;
                walk.clipped += take;
                if consumes_reference(kind) {
                    walk.reference_shift += take;
                }
                remaining -= take;
                if take < len {
                    walk.remainder = Some(Op::new(kind, len - take));
                }
            }
        }
    }

    if walk.remainder.is_none() {
        while let Some(op) = ops.get(i) {
            match op.kind() {
                Kind::Deletion | Kind::Skip => {
                    walk.clipped += op.len();
                    walk.reference_shift += op.len();
                }
                Kind::Insertion => walk.read_bases += op.len(),
                Kind::Pad => {}
                _ => break,
            }
            i += 1;
        }
    }

    walk.next = i;
    walk
}

/// Appends `op` to `ops`, merging it into the last operation when the kinds match.
///
/// Zero-length operations are dropped.
fn push_merged(ops: &mut Vec<Op>, op: Op) {
    if op.len() == 0 {
        return;
    }
    match ops.last_mut() {
        Some(last) if last.kind() == op.kind() => *last = Op::new(op.kind(), last.len() + op.len()),
        _ => ops.push(op),
    }
}

/// Collapses adjacent operations of the same kind and drops zero-length operations.
#[must_use]
pub fn merge_adjacent<I>(ops: I) -> Vec<Op>
where
    I: IntoIterator<Item = Op>,
{
    let mut merged = Vec::new();
    for op in ops {
        push_merged(&mut merged, op);
    }
    merged
}

/// Rebuilds a CIGAR from a clipped edge: the new clip operations, then whatever is left.
fn rebuild(clip: impl IntoIterator<Item = Op>, walk: &EdgeWalk, ops: &[Op]) -> Vec<Op> {
    merge_adjacent(clip.into_iter().chain(walk.remainder).chain(ops[walk.next..].iter().copied()))
}

fn reversed(ops: &[Op]) -> Vec<Op> {
    ops.iter().rev().copied().collect()
}

/// Hard clips the first `n` stored bases.
///
/// # Arguments
///
/// * `ops` - The CIGAR operations of the read
/// * `n` - Number of stored bases to clip, counted from the start of the read
#[must_use]
pub fn hard_clip_left(ops: &[Op], n: usize) -> ClippedCigar {
    let walk = walk_edge(ops, n);
    let hard = Op::new(Kind::HardClip, walk.hard_clipped + walk.clipped);

    ClippedCigar {
        ops: rebuild([hard], &walk, ops),
        bases_removed: walk.read_bases,
        reference_shift: walk.reference_shift,
    }
}

/// Hard clips the last `n` stored bases.
#[must_use]
pub fn hard_clip_right(ops: &[Op], n: usize) -> ClippedCigar {
    let mut clipped = hard_clip_left(&reversed(ops), n);
    clipped.ops.reverse();
    clipped
}

/// Soft clips the first `n` stored bases.
///
/// Existing leading hard clips are kept. Insertions split by or adjacent to the boundary are
/// folded into the soft clip and adjacent deletions are dropped; the reference bases they
/// covered count towards the reference shift.
#[must_use]
pub fn soft_clip_left(ops: &[Op], n: usize) -> ClippedCigar {
    let walk = walk_edge(ops, n);
    let clip =
        [Op::new(Kind::HardClip, walk.hard_clipped), Op::new(Kind::SoftClip, walk.read_bases)];

    ClippedCigar {
        ops: rebuild(clip, &walk, ops),
        bases_removed: 0,
        reference_shift: walk.reference_shift,
    }
}

/// Soft clips the last `n` stored bases.
#[must_use]
pub fn soft_clip_right(ops: &[Op], n: usize) -> ClippedCigar {
    let mut clipped = soft_clip_left(&reversed(ops), n);
    clipped.ops.reverse();
    clipped
}

/// Read indices of the first and last bases aligned by an `M`, `=` or `X` operation, or
/// `None` when no base is aligned.
#[must_use]
pub fn aligned_read_bounds(ops: &[Op]) -> Option<(usize, usize)> {
    let mut read_index = 0;
    let mut bounds = None;

    for op in ops {
        let kind = op.kind();
        let aligned = matches!(kind, Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch);
        if aligned && op.len() > 0 {
            let last = read_index + op.len() - 1;
            bounds = Some(bounds.map_or((read_index, last), |(first, _)| (first, last)));
        }
        if consumes_read(kind) {
            read_index += op.len();
        }
    }

    bounds
}

/// Turns every soft clip into an alignment match.
#[must_use]
pub fn revert_soft_clips(ops: &[Op]) -> Vec<Op> {
    merge_adjacent(ops.iter().map(|op| match op.kind() {
        Kind::SoftClip => Op::new(Kind::Match, op.len()),
        _ => *op,
    }))
}
