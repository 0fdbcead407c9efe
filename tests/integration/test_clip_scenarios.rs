//! End-to-end clipping scenarios.

use anyhow::Result;
use noodles::core::Position;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::data::field::Tag;
use readclip_lib::clipping::strategies::{
    clip_low_qual_ends, hard_clip_adaptor_sequence, hard_clip_both_ends_by_reference_coordinates,
    hard_clip_by_reference_coordinates_left_tail, hard_clip_soft_clipped_bases,
    hard_clip_to_region, soft_clip_both_ends_by_reference_coordinates, soft_clip_low_qual_ends,
};
use readclip_lib::clipping::{ClipTail, ClippingOp, ClippingRepresentation, ReadClipper};
use readclip_sam::builder::RecordBuilder;
use readclip_sam::record_utils::{format_cigar, is_empty, unclipped_end, unclipped_start};
use rstest::rstest;

fn cigar_of(record: &RecordBuf) -> String {
    format_cigar(record.cigar().as_ref())
}

#[test]
fn test_hard_clip_trailing_soft_clip() -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("fwd")
        .sequence("ACGTACGTAC")
        .cigar("5M5S")
        .alignment_start(1000)
        .build();

    let clipped = hard_clip_soft_clipped_bases(&record)?;

    assert_eq!(clipped.sequence().len(), 5);
    assert_eq!(clipped.sequence().as_ref(), b"ACGTA");
    assert_eq!(cigar_of(&clipped), "5M5H");
    assert_eq!(clipped.alignment_start(), record.alignment_start());
    Ok(())
}

#[test]
fn test_soft_clip_low_quality_tails() -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("lowq")
        .sequence("ACGTAC")
        .qualities(&[2, 2, 2, 30, 30, 2])
        .alignment_start(50)
        .build();

    let clipped = soft_clip_low_qual_ends(&record, 2)?;

    assert_eq!(cigar_of(&clipped), "3S2M1S");
    assert_eq!(clipped.alignment_start(), Position::new(53));
    assert_eq!(clipped.sequence(), record.sequence());
    assert_eq!(clipped.quality_scores(), record.quality_scores());
    Ok(())
}

#[rstest]
#[case(ClippingRepresentation::HardclipBases)]
#[case(ClippingRepresentation::SoftclipBases)]
fn test_both_ends_at_one_coordinate_is_empty(
    #[case] representation: ClippingRepresentation,
) -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("both")
        .cigar("30M")
        .alignment_start(200)
        .tag("RG", "rg1")
        .tag("NM", 0i32)
        .build();

    let clipped = match representation {
        ClippingRepresentation::SoftclipBases => {
            soft_clip_both_ends_by_reference_coordinates(&record, 210, 210)?
        }
        _ => hard_clip_both_ends_by_reference_coordinates(&record, 210, 210)?,
    };

    assert!(is_empty(&clipped));
    assert!(clipped.flags().is_unmapped());
    assert!(clipped.cigar().as_ref().is_empty());
    assert_eq!(clipped.name(), record.name());
    assert!(clipped.data().get(&Tag::READ_GROUP).is_some());
    assert!(clipped.data().get(&Tag::EDIT_DISTANCE).is_none());
    Ok(())
}

#[test]
fn test_left_tail_on_deletion_keeps_deletion() -> Result<()> {
    // 10M5D10M at 100: 110..=114 is deleted.
    let record =
        RecordBuilder::mapped_read().name("del").cigar("10M5D10M").alignment_start(100).build();

    for coordinate in 110..=114 {
        let clipped = hard_clip_by_reference_coordinates_left_tail(&record, coordinate)?;
        assert_eq!(clipped.sequence().len(), 10, "coordinate {coordinate}");
        assert_eq!(cigar_of(&clipped), "15H10M");
        assert_eq!(clipped.alignment_start(), Position::new(115));
        assert_eq!(unclipped_start(&clipped), unclipped_start(&record));
    }
    Ok(())
}

#[test]
fn test_right_then_left_differs_from_left_then_right() -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("order")
        .sequence("AACCGGTTAA")
        .alignment_start(10)
        .build();

    let mut clipper = ReadClipper::new(&record);
    clipper.add_op(ClippingOp::new(7, 9));
    clipper.add_op(ClippingOp::new(0, 2));
    let right_then_left = clipper.clip_read(ClippingRepresentation::HardclipBases)?;

    let mut clipper = ReadClipper::new(&record);
    clipper.add_op(ClippingOp::new(0, 2));
    clipper.add_op(ClippingOp::new(7, 9));
    let left_then_right = clipper.clip_read(ClippingRepresentation::HardclipBases)?;

    assert_eq!(right_then_left.sequence().as_ref(), b"CGGT");
    assert_eq!(left_then_right.sequence().as_ref(), b"CGGTTAA");
    assert_ne!(right_then_left, left_then_right);
    Ok(())
}

#[test]
fn test_contained_region_returns_record_unchanged() -> Result<()> {
    let record =
        RecordBuilder::mapped_read().name("in").cigar("3S20M2S").alignment_start(500).build();
    assert_eq!(hard_clip_to_region(&record, 500, 519)?, record);
    assert_eq!(hard_clip_to_region(&record, 1, 10_000)?, record);
    Ok(())
}

#[test]
fn test_disjoint_region_returns_empty_record() -> Result<()> {
    let record = RecordBuilder::mapped_read().name("out").cigar("20M").alignment_start(500).build();
    assert!(is_empty(&hard_clip_to_region(&record, 1, 499)?));
    assert!(is_empty(&hard_clip_to_region(&record, 520, 600)?));
    Ok(())
}

#[test]
fn test_region_clip_with_indels_keeps_unclipped_span() -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("indel")
        .cigar("2H3S10M2I10M4D10M3S")
        .alignment_start(1000)
        .build();

    let clipped = hard_clip_to_region(&record, 1005, 1030)?;

    assert_eq!(clipped.alignment_start(), Position::new(1005));
    assert_eq!(unclipped_start(&clipped), unclipped_start(&record));
    assert_eq!(unclipped_end(&clipped), unclipped_end(&record));
    assert_eq!(cigar_of(&clipped), "10H5M2I10M4D7M6H");
    Ok(())
}

#[test]
fn test_masking_does_not_change_the_alignment() -> Result<()> {
    let record = RecordBuilder::mapped_read()
        .name("mask")
        .sequence("ACGTACGT")
        .qualities(&[5, 5, 30, 30, 30, 30, 5, 5])
        .alignment_start(10)
        .build();

    let clipped = clip_low_qual_ends(&record, 5, ClippingRepresentation::WriteNsAndQ0s)?;

    assert_eq!(clipped.sequence().as_ref(), b"NNGTACNN");
    assert_eq!(clipped.quality_scores().as_ref(), &[0, 0, 30, 30, 30, 30, 0, 0]);
    assert_eq!(clipped.cigar(), record.cigar());
    assert_eq!(clipped.alignment_start(), record.alignment_start());
    Ok(())
}

#[test]
fn test_adaptor_read_through_on_both_mates() -> Result<()> {
    // A 30bp fragment at 1000..=1029 read with 40bp reads: each read runs 10bp into adaptor.
    let forward = RecordBuilder::mapped_read()
        .name("frag")
        .cigar("40M")
        .alignment_start(1000)
        .first_segment(true)
        .mate_reverse_complement(true)
        .mate_reference_sequence_id(0)
        .mate_alignment_start(990)
        .template_length(30)
        .build();
    let reverse = RecordBuilder::mapped_read()
        .name("frag")
        .cigar("40M")
        .alignment_start(990)
        .first_segment(false)
        .reverse_complement(true)
        .mate_reference_sequence_id(0)
        .mate_alignment_start(1000)
        .template_length(-30)
        .build();

    let forward_clipped = hard_clip_adaptor_sequence(&forward)?;
    assert_eq!(cigar_of(&forward_clipped), "30M10H");
    assert_eq!(forward_clipped.alignment_start(), Position::new(1000));

    let reverse_clipped = hard_clip_adaptor_sequence(&reverse)?;
    assert_eq!(cigar_of(&reverse_clipped), "10H30M");
    assert_eq!(reverse_clipped.alignment_start(), Position::new(1000));
    Ok(())
}

#[test]
fn test_orchestrator_reports_clipping() -> Result<()> {
    let record = RecordBuilder::mapped_read().name("o").cigar("10M").alignment_start(1).build();
    let mut clipper = ReadClipper::new(&record);
    assert!(!clipper.was_clipped());

    let clipped = clipper.clip_by_reference_coordinates(
        ClipTail::RightFrom(9),
        ClippingRepresentation::SoftclipBases,
    )?;

    assert!(clipper.was_clipped());
    assert!(clipper.ops().is_empty());
    assert_eq!(cigar_of(&clipped), "8M2S");
    Ok(())
}
