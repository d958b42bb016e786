/*!
 * # numblocks - NUM block parser for HMI screen exports
 *
 * A Rust library for pulling `Numeral Display & Input` blocks out of plain
 * text and RTF project exports, checking them, and exporting the results.
 *
 * ## Features
 *
 * - Read `.txt` and `.rtf` exports (UTF-8 or Latin-1)
 * - Split the text into NUM blocks at the `Numeral Display & Input[NUM` marker
 * - Extract Address, UnitScale, Storage Type and input limit fields,
 *   preferring the `General` and `Input Max/Min` sections
 * - Diagnostics: block count, missing and repeated numbers, shared addresses
 * - Address lookup: inside a block, outside all blocks, or not in the file
 * - Markdown export to stdout, file or clipboard
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `normalizer`: Decoding and RTF to text conversion
 * - `num_block`: Block splitting and field extraction
 * - `diagnostics`: Checks over all blocks of a document
 * - `address_lookup`: Classification of requested addresses
 * - `markdown_export`: Markdown tables, debug report and clipboard
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod normalizer;
pub mod num_block;
pub mod diagnostics;
pub mod address_lookup;
pub mod markdown_export;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, ParseRun};
pub use num_block::{Field, NumBlock, ParsedDocument, MARKER};
pub use diagnostics::DiagnosticsReport;
pub use address_lookup::{LookupOutcome, LookupRow, lookup_address, lookup_addresses};
pub use errors::{AppError, DocumentError, ExportError};
