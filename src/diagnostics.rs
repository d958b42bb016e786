/*!
 * Diagnostics over the blocks of one document.
 *
 * This module reports:
 * - how many blocks were found
 * - the parsed block numbers in numeric order
 * - numbers missing from the min..=max range
 * - Address values shared by more than one block
 * - repeated block numbers, unnumbered blocks and out-of-order blocks
 */

use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::num_block::{NumBlock, format_object_number};

/// An Address value found on more than one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAddress {
    /// The shared Address value
    pub address: String,
    /// Numbers of the blocks carrying it, in document order
    pub block_numbers: Vec<Option<u32>>,
}

/// Read-only summary of a parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsReport {
    /// Number of blocks
    pub block_count: usize,
    /// Parsed numbers in ascending order, repeats kept
    pub sorted_numbers: Vec<u32>,
    /// Numbers absent from the min..=max range
    pub missing_numbers: Vec<u32>,
    /// Addresses shared by several blocks, in order of first appearance
    pub duplicate_addresses: Vec<DuplicateAddress>,
    /// Numbers used by more than one block, with their occurrence count
    pub duplicate_numbers: Vec<(u32, usize)>,
    /// Blocks without a parseable number
    pub unnumbered_blocks: usize,
    /// Index of the first block whose number is lower than its predecessor's
    pub first_out_of_order: Option<usize>,
}

impl DiagnosticsReport {
    /// Compute the report for blocks in document order
    pub fn build(blocks: &[NumBlock]) -> Self {
        let mut sorted_numbers: Vec<u32> = blocks.iter().filter_map(|b| b.number).collect();
        sorted_numbers.sort_unstable();

        let missing_numbers = missing_in_range(&sorted_numbers);

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for number in &sorted_numbers {
            *counts.entry(*number).or_insert(0) += 1;
        }
        let duplicate_numbers = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect();

        let report = DiagnosticsReport {
            block_count: blocks.len(),
            sorted_numbers,
            missing_numbers,
            duplicate_addresses: duplicate_addresses(blocks),
            duplicate_numbers,
            unnumbered_blocks: blocks.iter().filter(|b| b.number.is_none()).count(),
            first_out_of_order: first_out_of_order(blocks),
        };

        debug!(
            "Diagnostics: {} block(s), {} missing, {} duplicate address(es)",
            report.block_count,
            report.missing_numbers.len(),
            report.duplicate_addresses.len()
        );
        report
    }

    /// True when nothing suspicious was found
    pub fn is_clean(&self) -> bool {
        self.missing_numbers.is_empty()
            && self.duplicate_addresses.is_empty()
            && self.duplicate_numbers.is_empty()
            && self.unnumbered_blocks == 0
            && self.first_out_of_order.is_none()
    }
}

// Gaps between the smallest and largest number; needs two distinct numbers
fn missing_in_range(sorted_numbers: &[u32]) -> Vec<u32> {
    let present: BTreeSet<u32> = sorted_numbers.iter().copied().collect();
    let (Some(&min), Some(&max)) = (present.first(), present.last()) else {
        return Vec::new();
    };
    if present.len() < 2 {
        return Vec::new();
    }
    (min..=max).filter(|n| !present.contains(n)).collect()
}

fn duplicate_addresses(blocks: &[NumBlock]) -> Vec<DuplicateAddress> {
    let mut order: Vec<DuplicateAddress> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for block in blocks {
        let Some(address) = block.address().filter(|a| !a.is_empty()) else {
            continue;
        };
        match positions.get(address) {
            Some(&position) => order[position].block_numbers.push(block.number),
            None => {
                positions.insert(address, order.len());
                order.push(DuplicateAddress {
                    address: address.to_string(),
                    block_numbers: vec![block.number],
                });
            }
        }
    }

    order.retain(|entry| entry.block_numbers.len() > 1);
    order
}

fn first_out_of_order(blocks: &[NumBlock]) -> Option<usize> {
    let mut previous: Option<u32> = None;
    for block in blocks {
        let Some(number) = block.number else {
            continue;
        };
        if previous.is_some_and(|p| number < p) {
            return Some(block.index);
        }
        previous = Some(number);
    }
    None
}

fn join_numbers(numbers: impl IntoIterator<Item = u32>) -> String {
    numbers
        .into_iter()
        .map(format_object_number)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "num_block_count: {}", self.block_count)?;
        writeln!(f, "sorted_object_numbers: {}", join_numbers(self.sorted_numbers.iter().copied()))?;
        writeln!(f, "missing_numbers: {}", join_numbers(self.missing_numbers.iter().copied()))?;

        if self.duplicate_addresses.is_empty() {
            writeln!(f, "duplicate_addresses: none")?;
        } else {
            writeln!(f, "duplicate_addresses:")?;
            for duplicate in &self.duplicate_addresses {
                let numbers: Vec<String> = duplicate
                    .block_numbers
                    .iter()
                    .map(|n| n.map(format_object_number).unwrap_or_else(|| "?".to_string()))
                    .collect();
                writeln!(f, "  - {} -> {}", duplicate.address, numbers.join(", "))?;
            }
        }

        if !self.duplicate_numbers.is_empty() {
            let repeated: Vec<String> = self
                .duplicate_numbers
                .iter()
                .map(|(number, count)| format!("{} (x{})", format_object_number(*number), count))
                .collect();
            writeln!(f, "duplicate_object_numbers: {}", repeated.join(", "))?;
        }
        if self.unnumbered_blocks > 0 {
            writeln!(f, "unnumbered_blocks: {}", self.unnumbered_blocks)?;
        }
        if let Some(index) = self.first_out_of_order {
            writeln!(f, "first_out_of_order_block: {}", index + 1)?;
        }
        Ok(())
    }
}
