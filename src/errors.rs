/*!
 * Error types for the numblocks application.
 *
 * This module contains custom error types for the parsing pipeline and the
 * export side, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and decoding a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read at all
    #[error("Failed to read file {path:?}: {source}")]
    Read {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither .txt nor .rtf
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Unexpected RTF structure met by the fallback extractor.
    /// Never fatal: the document is still produced, this is kept as a warning.
    #[error("RTF structure problem at offset {offset}: {message}")]
    Format {
        /// Character offset in the RTF source
        offset: usize,
        /// What was unexpected
        message: String,
    },
}

/// Errors that can occur when exporting results
#[derive(Error, Debug)]
pub enum ExportError {
    /// Clipboard access failed; the rendered Markdown is still valid
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Writing the Markdown file failed
    #[error("Failed to write Markdown: {0}")]
    Write(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from loading a document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from exporting
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
