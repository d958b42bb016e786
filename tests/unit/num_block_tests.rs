/*!
 * Tests for block splitting and field extraction
 */

use numblocks::num_block::{self, Field, NumBlock, ParsedDocument, Section, MARKER};
use crate::common::{SAMPLE_TEXT, REALISTIC_BLOCK};

/// Block count always equals the number of marker occurrences
#[test]
fn test_parse_withNMarkers_shouldProduceNBlocks() {
    for count in 0..6 {
        let mut text = String::from("preamble\n");
        for i in 0..count {
            text.push_str(&format!("{}{:04}\nAddress {}\n", MARKER, i + 1, i));
        }
        let parsed = ParsedDocument::parse(&text);
        assert_eq!(parsed.len(), count);
        assert_eq!(parsed.outside_text, "preamble\n");
    }
}

/// Marker right next to other text still splits
#[test]
fn test_parse_withAdjacentMarkers_shouldKeepEmptyBlocks() {
    let text = format!("{m}0001{m}0002", m = MARKER);
    let parsed = ParsedDocument::parse(&text);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.blocks[0].raw_text, "0001");
    assert_eq!(parsed.blocks[0].number, Some(1));
    assert_eq!(parsed.blocks[1].number, Some(2));
    assert!(parsed.outside_text.is_empty());
}

/// The marker is case-sensitive
#[test]
fn test_parse_withLowercaseMarker_shouldNotSplit() {
    let parsed = ParsedDocument::parse("numeral display & input[NUM0001\nAddress 1");
    assert!(parsed.is_empty());
    assert_eq!(parsed.outside_text, "numeral display & input[NUM0001\nAddress 1");
}

/// Blocks without digits after the marker are kept without a number
#[test]
fn test_parse_withMissingDigits_shouldKeepUnnumberedBlock() {
    let text = format!("{}]\nAddress X\n", MARKER);
    let parsed = ParsedDocument::parse(&text);

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.blocks[0].number, None);
    assert_eq!(parsed.blocks[0].object_number(), None);
    assert_eq!(parsed.blocks[0].address(), Some("X"));
}

/// Same-line labels from the sample export
#[test]
fn test_parse_withSampleText_shouldExtractExactLabels() {
    let parsed = ParsedDocument::parse(SAMPLE_TEXT);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.blocks[0].object_number().as_deref(), Some("NUM0001"));
    assert_eq!(parsed.blocks[0].field_line(Field::Address).as_deref(), Some("Address 100"));
    assert_eq!(parsed.blocks[1].field_line(Field::UnitScale).as_deref(), Some("UnitScale D"));
    assert_eq!(
        parsed.blocks[1].field_line(Field::TimingRangeCheck).as_deref(),
        Some("Timing of max/min range check F")
    );
    assert_eq!(parsed.blocks[1].address(), Some("ETHERNET:200"));
}

/// Label on one line, value on the next
#[test]
fn test_extract_fields_withNextLineLayout_shouldJoinLabelAndValue() {
    let text = format!(
        "{}0007\nAddress\n300\nUnitScale\nX\nStorage Type\nY\nMinimum Input Limit\n0\nMaximum Input Limit\n9\nTiming of max/min range check\nZ\n",
        MARKER
    );
    let block = &ParsedDocument::parse(&text).blocks[0];

    assert_eq!(block.field_line(Field::Address).as_deref(), Some("Address 300"));
    assert_eq!(block.field_line(Field::UnitScale).as_deref(), Some("UnitScale X"));
    assert_eq!(block.field_line(Field::StorageType).as_deref(), Some("Storage Type Y"));
    assert_eq!(block.field_line(Field::TimingRangeCheck).as_deref(), Some("Timing of max/min range check Z"));
}

/// Realistic export layout with an Input Max/Min section
#[test]
fn test_extract_fields_withRealisticLayout_shouldExtractAllFields() {
    let block = &ParsedDocument::parse(REALISTIC_BLOCK).blocks[0];

    assert_eq!(block.object_number().as_deref(), Some("NUM0010"));
    assert_eq!(block.field_line(Field::Address).as_deref(), Some("Address ETHERNET:VUA.IJ.Buffer_afstand"));
    assert_eq!(block.field_line(Field::UnitScale).as_deref(), Some("Set UnitScale 1000"));
    assert_eq!(block.field_line(Field::StorageType).as_deref(), Some("Storage Type REAL(Real Number 2 words)"));
    assert_eq!(block.field_line(Field::MaxInputLimit).as_deref(), Some("Maximum Input Limit 10"));
    assert_eq!(block.field_line(Field::MinInputLimit).as_deref(), Some("Minimum Input Limit 0"));
    assert_eq!(block.field(Field::MaxInputLimit).map(|f| f.section), Some(Some(Section::InputMaxMin)));
}

/// The General section wins over later sections
#[test]
fn test_extract_fields_withGeneralAndFlickerAddresses_shouldPreferGeneral() {
    let text = format!(
        "{}0011]\nGeneral\nAddress\nETHERNET:MAIN.VALUE\nFlicker\n   Address\n\nInput Max/Min\n   Minimum Input Limit\n1\n   Maximum Input Limit\n9\n",
        MARKER
    );
    let block = &ParsedDocument::parse(&text).blocks[0];

    assert_eq!(block.field_line(Field::Address).as_deref(), Some("Address ETHERNET:MAIN.VALUE"));
    assert_eq!(block.field(Field::Address).map(|f| f.section), Some(Some(Section::General)));
    assert_eq!(block.field_line(Field::MinInputLimit).as_deref(), Some("Minimum Input Limit 1"));
}

/// A preferred section wins even when it comes later
#[test]
fn test_extract_fields_withPreferredSectionLater_shouldPreferIt() {
    let fields = num_block::extract_fields(
        "Alarm\nMaximum Input Limit 500\nInput Max/Min\nMaximum Input Limit 100\n",
    );
    assert_eq!(fields[&Field::MaxInputLimit].value, "100");
}

/// Colon separated values, missing fields absent
#[test]
fn test_extract_fields_withColonLabels_shouldStripColon() {
    let fields = num_block::extract_fields("0001\nAddress: A1\nStorage Type:   BCD  \n");

    assert_eq!(fields[&Field::Address].value, "A1");
    assert_eq!(fields[&Field::StorageType].value, "BCD");
    assert!(!fields.contains_key(&Field::UnitScale));
    assert!(!fields.contains_key(&Field::TimingRangeCheck));
}

/// Windows line endings do not leak into values
#[test]
fn test_extract_fields_withCrLf_shouldTrimCarriageReturns() {
    let fields = num_block::extract_fields("0001\r\nAddress\r\nETHERNET:X\r\nUnitScale 2\r\n");
    assert_eq!(fields[&Field::Address].value, "ETHERNET:X");
    assert_eq!(fields[&Field::UnitScale].value, "2");
}

/// Preview and filter helpers used by the block table
#[test]
fn test_num_block_preview_and_filter_shouldMatchNumberAddressAndText() {
    let block = NumBlock::from_segment(0, "0042\nAddress ETHERNET:PUMP\nColor Red\n");

    assert_eq!(block.preview(10), "0042 Addre");
    assert!(block.matches_filter(""));
    assert!(block.matches_filter("NUM0042"));
    assert!(block.matches_filter("PUMP"));
    assert!(block.matches_filter("Red"));
    assert!(!block.matches_filter("Blue"));
    assert_eq!(block.to_string(), "NUM0042 [Address ETHERNET:PUMP]");
}
