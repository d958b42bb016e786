//! Splitting normalized text into NUM block segments.

use log::debug;

use super::MARKER;

/// Text before the first marker, and one segment per marker occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    pub outside_text: &'a str,
    pub blocks: Vec<&'a str>,
}

/// Split text at every marker occurrence, discarding the marker itself
pub fn split_segments(text: &str) -> Segments<'_> {
    let mut parts = text.split(MARKER);
    // split always yields at least one part
    let outside_text = parts.next().unwrap_or_default();
    let blocks: Vec<&str> = parts.collect();

    debug!("Found {} marker occurrence(s)", blocks.len());
    Segments { outside_text, blocks }
}

/// Parse the leading digit run of a segment as the block number
pub fn parse_block_number(segment: &str) -> Option<u32> {
    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    if digits_end == 0 {
        return None;
    }
    let digits = &segment[..digits_end];
    match digits.parse::<u32>() {
        Ok(number) => Some(number),
        Err(e) => {
            debug!("Block number {} not usable ({}), block left unnumbered", digits, e);
            None
        }
    }
}
