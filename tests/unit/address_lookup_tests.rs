/*!
 * Tests for address lookup
 */

use numblocks::address_lookup::{self, FOUND_OUTSIDE_NUM_BLOCK, NOT_FOUND_IN_FILE};
use numblocks::num_block::{ParsedDocument, MARKER};
use numblocks::{LookupOutcome, lookup_address, lookup_addresses};
use crate::common::{SAMPLE_TEXT, REALISTIC_BLOCK};

#[test]
fn test_lookup_withAddressInBlock_shouldReturnBlockAndFields() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);
    let rows = lookup_addresses(&doc, ["100"]);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.requested_address, "100");
    assert_eq!(row.outcome.to_string(), "NUM0001");
    assert_eq!(row.address_in_file.as_deref(), Some("Address 100"));
    assert_eq!(
        row.fields,
        vec![
            Some("UnitScale A".to_string()),
            Some("Storage Type B".to_string()),
            Some("Minimum Input Limit 1".to_string()),
            Some("Maximum Input Limit 9".to_string()),
            Some("Timing of max/min range check C".to_string()),
        ]
    );
}

#[test]
fn test_lookup_withEthernetAddress_shouldMatchWithoutPrefix() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);

    assert_eq!(
        lookup_address(&doc, "200"),
        LookupOutcome::Found { block_index: 1, number: Some(3) }
    );
    assert_eq!(
        lookup_address(&doc, "ETHERNET:200"),
        LookupOutcome::Found { block_index: 1, number: Some(3) }
    );

    let rows = lookup_addresses(&doc, ["200"]);
    assert_eq!(rows[0].address_in_file.as_deref(), Some("Address ETHERNET:200"));
}

#[test]
fn test_lookup_withAddressOutsideBlocks_shouldReportOutsideWithEmptyFields() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);
    let rows = lookup_addresses(&doc, ["777"]);

    assert_eq!(rows[0].outcome, LookupOutcome::FoundOutsideBlocks);
    assert_eq!(rows[0].outcome.to_string(), FOUND_OUTSIDE_NUM_BLOCK);
    assert_eq!(rows[0].address_in_file.as_deref(), Some("Address 777"));
    assert!(rows[0].fields.iter().all(Option::is_none));
}

#[test]
fn test_lookup_withUnknownAddress_shouldReportNotFound() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);
    let rows = lookup_addresses(&doc, ["404"]);

    assert_eq!(rows[0].outcome, LookupOutcome::NotFound);
    assert_eq!(rows[0].outcome.to_string(), NOT_FOUND_IN_FILE);
    assert_eq!(rows[0].address_in_file, None);
    assert_eq!(rows[0].fields.len(), 5);
}

/// The first block in document order wins
#[test]
fn test_lookup_withSharedAddress_shouldReturnFirstBlock() {
    let text = format!("{m}0002\nAddress: A1\n{m}0001\nAddress: A1\n", m = MARKER);
    let doc = ParsedDocument::parse(&text);

    assert_eq!(
        lookup_address(&doc, "A1"),
        LookupOutcome::Found { block_index: 0, number: Some(2) }
    );
    assert_eq!(lookup_address(&doc, "ZZZ"), LookupOutcome::NotFound);
}

/// Raw address lines are searched when the extracted Address differs
#[test]
fn test_match_in_block_withSecondAddressLine_shouldMatchRawLine() {
    let text = format!(
        "{}0004\nGeneral\nAddress ETHERNET:MAIN\nFlicker\nAddress ETHERNET:BLINK\n",
        MARKER
    );
    let doc = ParsedDocument::parse(&text);
    let block = &doc.blocks[0];

    assert_eq!(block.address(), Some("ETHERNET:MAIN"));
    assert_eq!(
        address_lookup::match_in_block(block, "BLINK").as_deref(),
        Some("Address ETHERNET:BLINK")
    );
    assert_eq!(address_lookup::match_in_block(block, "BLIN"), None);
}

#[test]
fn test_lookup_withRealisticBlock_shouldUseNextLineValues() {
    let doc = ParsedDocument::parse(REALISTIC_BLOCK);
    let rows = lookup_addresses(&doc, ["VUA.IJ.Buffer_afstand"]);

    assert_eq!(rows[0].outcome.to_string(), "NUM0010");
    assert_eq!(
        rows[0].address_in_file.as_deref(),
        Some("Address ETHERNET:VUA.IJ.Buffer_afstand")
    );
    assert_eq!(rows[0].fields[0].as_deref(), Some("Set UnitScale 1000"));
    assert_eq!(rows[0].fields[3].as_deref(), Some("Maximum Input Limit 10"));
}

#[test]
fn test_lookup_addresses_withBlankEntries_shouldSkipAndTrim() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);
    let rows = lookup_addresses(&doc, vec!["", "  100  ", "\t", "404"]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].requested_address, "100");
    assert_eq!(rows[1].requested_address, "404");
}

#[test]
fn test_lookup_address_withEmptyAddress_shouldReportNotFound() {
    let doc = ParsedDocument::parse(SAMPLE_TEXT);
    assert_eq!(lookup_address(&doc, ""), LookupOutcome::NotFound);
}

#[test]
fn test_outcome_display_withUnnumberedBlock_shouldUsePosition() {
    let outcome = LookupOutcome::Found { block_index: 2, number: None };
    assert_eq!(outcome.to_string(), "block #3");
}

/// Lookup over a document holding only some of the parsed blocks
#[test]
fn test_lookup_addresses_withBlockSubset_shouldUseMatchedBlock() {
    let text = format!(
        "{m}0001\nAddress A\nUnitScale first\n{m}0002\nAddress B\nUnitScale second\n",
        m = MARKER
    );
    let full = ParsedDocument::parse(&text);
    let subset = ParsedDocument {
        blocks: full.blocks[1..].to_vec(),
        outside_text: full.outside_text.clone(),
    };

    let rows = lookup_addresses(&subset, ["B", "A"]);

    assert_eq!(rows[0].outcome, LookupOutcome::Found { block_index: 1, number: Some(2) });
    assert_eq!(rows[0].outcome.to_string(), "NUM0002");
    assert_eq!(rows[0].fields[0].as_deref(), Some("UnitScale second"));
    assert_eq!(rows[1].outcome, LookupOutcome::NotFound);
}

/// The Address in file column shows the line as the file spells it
#[test]
fn test_lookup_addresses_withColonAddress_shouldReturnSourceLine() {
    let text = format!("{m}0001\nAddress:  A1\n{m}0002\n  Address\n  ETHERNET:B2\n", m = MARKER);
    let doc = ParsedDocument::parse(&text);

    let rows = lookup_addresses(&doc, ["A1", "B2"]);

    assert_eq!(rows[0].address_in_file.as_deref(), Some("Address:  A1"));
    assert_eq!(rows[1].address_in_file.as_deref(), Some("Address ETHERNET:B2"));
}
