/*!
 * NUM block model and parsing.
 *
 * A NUM block is the part of a document between two occurrences of the
 * `Numeral Display & Input[NUM` marker (or the end of the document). Blocks
 * keep document order; their numbers are not assumed to be unique or
 * contiguous, gaps and duplicates are reported by the diagnostics.
 *
 * # Architecture
 *
 * - `splitter`: marker splitting and block number parsing
 * - `fields`: section-aware field extraction
 */

pub mod fields;
pub mod splitter;

use log::info;
use std::fmt;

pub use fields::{Field, FieldMap, FieldValue, Section, extract_fields};
pub use splitter::{Segments, parse_block_number, split_segments};

/// Literal block delimiter, case-sensitive
pub const MARKER: &str = "Numeral Display & Input[NUM";

/// Render a block number the way the export shows it
pub fn format_object_number(number: u32) -> String {
    format!("NUM{:04}", number)
}

// @struct: Single NUM block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumBlock {
    // @field: Position in document order, from 0
    pub index: usize,

    // @field: Number parsed after the marker
    pub number: Option<u32>,

    // @field: Block text without the marker
    pub raw_text: String,

    // @field: Extracted fields
    pub fields: FieldMap,
}

impl NumBlock {
    /// Build a block from the segment following a marker
    pub fn from_segment(index: usize, segment: &str) -> Self {
        NumBlock {
            index,
            number: parse_block_number(segment),
            raw_text: segment.to_string(),
            fields: extract_fields(segment),
        }
    }

    /// `NUM0001` style label, if the block has a number
    pub fn object_number(&self) -> Option<String> {
        self.number.map(format_object_number)
    }

    pub fn field(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// The field as an export line (`Address 100`)
    pub fn field_line(&self, field: Field) -> Option<String> {
        self.field(field).map(FieldValue::line)
    }

    /// The extracted Address value
    pub fn address(&self) -> Option<&str> {
        self.field(Field::Address).map(|value| value.value.as_str())
    }

    /// First characters of the raw text on a single line
    pub fn preview(&self, max_chars: usize) -> String {
        self.raw_text
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }

    /// Substring filter over number, Address line and raw text
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        self.object_number().is_some_and(|n| n.contains(filter))
            || self.field_line(Field::Address).is_some_and(|line| line.contains(filter))
            || self.raw_text.contains(filter)
    }
}

impl fmt::Display for NumBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.object_number() {
            Some(number) => write!(f, "{}", number)?,
            None => write!(f, "block #{} (no number)", self.index + 1)?,
        }
        if let Some(address) = self.field_line(Field::Address) {
            write!(f, " [{}]", address)?;
        }
        Ok(())
    }
}

/// Blocks of one document plus the text outside all blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Blocks in document order
    pub blocks: Vec<NumBlock>,

    /// Text before the first marker
    pub outside_text: String,
}

impl ParsedDocument {
    /// Split normalized text into blocks and extract their fields
    pub fn parse(text: &str) -> Self {
        let segments = split_segments(text);
        let blocks: Vec<NumBlock> = segments
            .blocks
            .iter()
            .enumerate()
            .map(|(index, segment)| NumBlock::from_segment(index, segment))
            .collect();

        info!("Parsed {} NUM block(s)", blocks.len());
        ParsedDocument {
            blocks,
            outside_text: segments.outside_text.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
