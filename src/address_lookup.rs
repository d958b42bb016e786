use log::debug;
use std::fmt;

use crate::num_block::{Field, NumBlock, ParsedDocument};

// @module: Address lookup against a parsed document

/// Shown in the Objectnummer column when the address only occurs outside blocks
pub const FOUND_OUTSIDE_NUM_BLOCK: &str = "gevonden buiten NUM-blok";

/// Shown when the address does not occur in the file
pub const NOT_FOUND_IN_FILE: &str = "niet gevonden in bestand";

/// Where a requested address was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Inside a block; the first one in document order
    Found {
        block_index: usize,
        number: Option<u32>,
    },
    /// Only in the text before the first block
    FoundOutsideBlocks,
    NotFound,
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LookupOutcome::Found { number: Some(number), .. } => {
                write!(f, "{}", crate::num_block::format_object_number(*number))
            }
            LookupOutcome::Found { block_index, number: None } => {
                write!(f, "block #{}", block_index + 1)
            }
            LookupOutcome::FoundOutsideBlocks => f.write_str(FOUND_OUTSIDE_NUM_BLOCK),
            LookupOutcome::NotFound => f.write_str(NOT_FOUND_IN_FILE),
        }
    }
}

/// One row of the lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow {
    /// The address as requested
    pub requested_address: String,
    pub outcome: LookupOutcome,
    /// The matching text in the file (`Address ETHERNET:X`), if any
    pub address_in_file: Option<String>,
    /// Field lines of the matching block for every field after Address,
    /// in `Field::ALL` order
    pub fields: Vec<Option<String>>,
}

// Address lines that refer to the requested address
fn address_line_variants(address: &str) -> [String; 4] {
    [
        format!("Address ETHERNET:{}", address),
        format!("Address {}", address),
        format!("Address: {}", address),
        format!("ETHERNET:{}", address),
    ]
}

/// The address line as written in the block for the requested address, if any.
/// The extracted Address field is checked before the raw address lines.
pub fn match_in_block(block: &NumBlock, address: &str) -> Option<String> {
    if let Some(field) = block.field(Field::Address) {
        let value = field.value.as_str();
        if value == address || value.strip_prefix("ETHERNET:") == Some(address) {
            return Some(field.source_line.clone());
        }
    }

    let variants = address_line_variants(address);
    block
        .raw_text
        .lines()
        .map(str::trim)
        .find(|line| variants.iter().any(|variant| line == variant))
        .map(str::to_string)
}

// First block in document order holding the address, with the matched line
fn find_block<'a>(document: &'a ParsedDocument, address: &str) -> Option<(&'a NumBlock, String)> {
    document
        .blocks
        .iter()
        .find_map(|block| match_in_block(block, address).map(|line| (block, line)))
}

/// Classify one address against the document
pub fn lookup_address(document: &ParsedDocument, address: &str) -> LookupOutcome {
    if address.is_empty() {
        return LookupOutcome::NotFound;
    }

    if let Some((block, _)) = find_block(document, address) {
        return LookupOutcome::Found {
            block_index: block.index,
            number: block.number,
        };
    }

    if find_outside(&document.outside_text, address).is_some() {
        LookupOutcome::FoundOutsideBlocks
    } else {
        LookupOutcome::NotFound
    }
}

// The address text as it appears outside the blocks
fn find_outside(outside_text: &str, address: &str) -> Option<String> {
    let [ethernet, plain, ..] = address_line_variants(address);
    if outside_text.contains(&ethernet) {
        return Some(ethernet);
    }
    if outside_text.contains(&plain) {
        return Some(plain);
    }
    outside_text
        .lines()
        .find(|line| line.contains(address))
        .map(|line| line.trim().to_string())
}

/// Look up a batch of addresses; blank entries are skipped
pub fn lookup_addresses<I, S>(document: &ParsedDocument, requested: I) -> Vec<LookupRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();

    for address in requested {
        let address = address.as_ref().trim();
        if address.is_empty() {
            continue;
        }

        let row = match find_block(document, address) {
            Some((block, line)) => LookupRow {
                requested_address: address.to_string(),
                outcome: LookupOutcome::Found {
                    block_index: block.index,
                    number: block.number,
                },
                address_in_file: Some(line),
                fields: Field::ALL
                    .iter()
                    .skip(1)
                    .map(|&field| block.field_line(field))
                    .collect(),
            },
            None => {
                let address_in_file = find_outside(&document.outside_text, address);
                LookupRow {
                    requested_address: address.to_string(),
                    outcome: if address_in_file.is_some() {
                        LookupOutcome::FoundOutsideBlocks
                    } else {
                        LookupOutcome::NotFound
                    },
                    address_in_file,
                    fields: vec![None; Field::ALL.len() - 1],
                }
            }
        };
        debug!("Lookup {} -> {}", address, row.outcome);
        rows.push(row);
    }

    rows
}
