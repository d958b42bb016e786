/*!
 * Markdown export of parse and lookup results.
 *
 * Column names and order are fixed: they are what downstream documents paste
 * and compare against. Missing values render as empty cells.
 */

use log::{debug, info, warn};
use std::path::Path;

use crate::address_lookup::{LookupOutcome, LookupRow, NOT_FOUND_IN_FILE};
use crate::errors::ExportError;
use crate::file_utils::FileManager;
use crate::num_block::{Field, NumBlock};

/// Columns of the address lookup table
pub const LOOKUP_HEADERS: [&str; 8] = [
    "Gevraagd Address",
    "Objectnummer",
    "Address in file",
    "UnitScale",
    "Storage Type",
    "Minimum Input Limit",
    "Maximum Input Limit",
    "Timing of max/min range check",
];

/// Columns of the block table
pub const BLOCK_HEADERS: [&str; 7] = [
    "Objectnummer",
    "Address",
    "UnitScale",
    "Storage Type",
    "Minimum Input Limit",
    "Maximum Input Limit",
    "Timing of max/min range check",
];

fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn render_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn render_table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator = vec!["---".to_string(); headers.len()];

    let mut lines = vec![render_row(&header), render_row(&separator)];
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
        lines.push(render_row(&cells));
    }
    lines.join("\n")
}

/// Render lookup rows as a Markdown table
pub fn lookup_rows_to_markdown(rows: &[LookupRow]) -> String {
    render_table(
        &LOOKUP_HEADERS,
        rows.iter().map(|row| {
            let address_in_file = match (&row.outcome, &row.address_in_file) {
                (_, Some(found)) => found.clone(),
                (LookupOutcome::NotFound, None) => NOT_FOUND_IN_FILE.to_string(),
                (_, None) => String::new(),
            };
            let mut cells = vec![
                row.requested_address.clone(),
                row.outcome.to_string(),
                address_in_file,
            ];
            cells.extend(row.fields.iter().map(|f| f.clone().unwrap_or_default()));
            cells
        }),
    )
}

/// Render one row per block as a Markdown table
pub fn blocks_to_markdown(blocks: &[NumBlock]) -> String {
    render_table(
        &BLOCK_HEADERS,
        blocks.iter().map(|block| {
            let mut cells = vec![block.object_number().unwrap_or_default()];
            cells.extend(
                Field::ALL
                    .iter()
                    .map(|&field| block.field_line(field).unwrap_or_default()),
            );
            cells
        }),
    )
}

/// Per-block listing of every extracted value followed by the raw text
pub fn blocks_debug_report(blocks: &[NumBlock]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in blocks {
        let number = block
            .object_number()
            .unwrap_or_else(|| "(no number)".to_string());
        lines.push(format!("### Block {}: {}", block.index + 1, number));
        for field in Field::ALL {
            lines.push(format!(
                "{}: {}",
                field.name(),
                block.field_line(field).unwrap_or_default()
            ));
        }
        lines.push("Raw block:".to_string());
        lines.push(block.raw_text.clone());
        lines.push("-".repeat(60));
    }
    lines.join("\n")
}

/// Write rendered Markdown to a file
pub fn save_markdown<P: AsRef<Path>>(path: P, markdown: &str) -> Result<(), ExportError> {
    let path = path.as_ref();
    FileManager::write_to_file(path, markdown).map_err(|e| ExportError::Write(e.to_string()))?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Destination for copied text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The system clipboard
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

/// Copy Markdown to a clipboard. Failure is logged and returned but leaves
/// the rendered text usable.
pub fn copy_markdown(sink: &mut dyn ClipboardSink, markdown: &str) -> Result<(), ExportError> {
    match sink.set_text(markdown) {
        Ok(()) => {
            debug!("Copied {} characters to the clipboard", markdown.len());
            info!("Markdown copied to clipboard");
            Ok(())
        }
        Err(e) => {
            warn!("{}", e);
            Err(e)
        }
    }
}
