//! Error path integration tests.
//!
//! Requests that cannot be honored fail with a `ClipError`; degenerate but well-formed
//! requests return the record unchanged or the canonical empty record.

use readclip_lib::ClipError;
use readclip_lib::clipping::strategies::{
    clip_by_read_coordinates, clip_by_reference_coordinates, hard_clip_adaptor_sequence,
    hard_clip_soft_clipped_bases, hard_clip_to_region, revert_soft_clipped_bases,
    soft_clip_by_read_coordinates, soft_clip_low_qual_ends,
};
use readclip_lib::clipping::{ClipTail, ClippingOp, ClippingRepresentation};
use readclip_sam::builder::RecordBuilder;
use readclip_sam::record_utils::{empty_record, is_empty};

// ==================== Errors ====================

#[test]
fn test_clipping_the_middle_of_a_read_fails() {
    let record = RecordBuilder::mapped_read().name("m").cigar("20M").alignment_start(1).build();
    let err = clip_by_read_coordinates(&record, 5, 10, ClippingRepresentation::HardclipBases)
        .unwrap_err();
    assert_eq!(err, ClipError::ClipsMiddleOfRead { start: 5, stop: 10, cigar: "20M".to_string() });
}

#[test]
fn test_inverted_range_fails() {
    let record = RecordBuilder::mapped_read().name("i").cigar("20M").alignment_start(1).build();
    let err =
        ClippingOp::new(9, 3).apply(ClippingRepresentation::WriteNs, &record).unwrap_err();
    assert!(matches!(err, ClipError::InvertedRange { start: 9, stop: 3, .. }));
}

#[test]
fn test_soft_clipping_unmapped_reads_fails() {
    let record = RecordBuilder::new()
        .name("unmapped")
        .sequence("ACGTACGT")
        .qualities(&[2, 30, 30, 30, 30, 30, 30, 30])
        .unmapped(true)
        .build();

    assert_eq!(
        soft_clip_low_qual_ends(&record, 2).unwrap_err(),
        ClipError::SoftClipUnmapped { name: "unmapped".to_string() }
    );
    assert_eq!(
        soft_clip_by_read_coordinates(&record, 0, 2).unwrap_err(),
        ClipError::SoftClipUnmapped { name: "unmapped".to_string() }
    );
    assert!(matches!(
        clip_by_reference_coordinates(
            &record,
            ClipTail::RightFrom(5),
            ClippingRepresentation::SoftclipBases
        ),
        Err(ClipError::SoftClipUnmapped { .. })
    ));
}

// ==================== Degenerate inputs ====================

#[test]
fn test_empty_record_passes_through_strategies() {
    let empty = empty_record(
        &RecordBuilder::mapped_read().name("e").cigar("10M").alignment_start(1).build(),
    );

    assert_eq!(hard_clip_soft_clipped_bases(&empty).unwrap(), empty);
    assert_eq!(revert_soft_clipped_bases(&empty).unwrap(), empty);
    assert_eq!(hard_clip_to_region(&empty, 1, 5).unwrap(), empty);
    assert_eq!(hard_clip_adaptor_sequence(&empty).unwrap(), empty);
    assert_eq!(
        clip_by_reference_coordinates(
            &empty,
            ClipTail::LeftTo(3),
            ClippingRepresentation::SoftclipBases
        )
        .unwrap(),
        empty
    );
}

#[test]
fn test_unmapped_reads_are_left_alone_by_reference_strategies() {
    let record = RecordBuilder::new().name("u").sequence("ACGTACGT").unmapped(true).build();

    assert_eq!(hard_clip_to_region(&record, 1, 5).unwrap(), record);
    assert_eq!(hard_clip_adaptor_sequence(&record).unwrap(), record);
    assert_eq!(revert_soft_clipped_bases(&record).unwrap(), record);
    assert_eq!(
        clip_by_reference_coordinates(
            &record,
            ClipTail::LeftTo(3),
            ClippingRepresentation::HardclipBases
        )
        .unwrap(),
        record
    );
}

#[test]
fn test_hard_clipping_unmapped_reads_by_read_coordinates() {
    let record = RecordBuilder::new().name("u").sequence("ACGTACGT").unmapped(true).build();
    let clipped =
        clip_by_read_coordinates(&record, 0, 2, ClippingRepresentation::HardclipBases).unwrap();
    assert_eq!(clipped.sequence().as_ref(), b"TACGT");
    assert!(clipped.flags().is_unmapped());

    let clipped =
        clip_by_read_coordinates(&record, 0, 7, ClippingRepresentation::HardclipBases).unwrap();
    assert!(is_empty(&clipped));
}
