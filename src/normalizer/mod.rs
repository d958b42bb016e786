/*!
 * Text normalization for loaded documents.
 *
 * Turns the raw bytes of a `.txt` or `.rtf` export into one plain-text string:
 * - decodes UTF-8, falling back to Latin-1
 * - converts RTF with the `rtf-parser` crate when it is compiled in and gives a
 *   usable result, otherwise with the built-in extractor in [`rtf`]
 * - turns literal `\n` sequences left behind by the conversion into newlines
 */

pub mod rtf;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use crate::app_config::Config;
use crate::errors::DocumentError;
use crate::file_utils::{FileManager, FileType};

pub use rtf::{StrippedRtf, strip_rtf};

// @const: Paragraph or line break control word (not \pard)
static RTF_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:par|line)\b").unwrap()
});

/// Character encoding the raw bytes were decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// Used when the bytes are not valid UTF-8
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf-8"),
            Encoding::Latin1 => write!(f, "latin-1 (fallback)"),
        }
    }
}

/// How the decoded text was turned into plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Plain text, used as-is
    None,
    /// Converted by the rtf-parser crate
    RtfLibrary,
    /// Converted by the built-in extractor
    RtfFallback,
}

/// Provenance of a normalized document, shown in status output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSource {
    pub encoding: Encoding,
    pub conversion: Conversion,
    /// At least one literal `\n` sequence was replaced
    pub escaped_newlines_normalized: bool,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.conversion {
            Conversion::None => write!(f, "{}", self.encoding)?,
            Conversion::RtfLibrary => write!(f, "rtf(rtf-parser, {})", self.encoding)?,
            Conversion::RtfFallback => write!(f, "rtf(fallback, {})", self.encoding)?,
        }
        if self.escaped_newlines_normalized {
            write!(f, " + escaped-newline-normalization")?;
        }
        Ok(())
    }
}

/// Options that change how documents are normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Try the RTF library before the built-in extractor
    pub use_rtf_library: bool,
    /// Apply escaped-newline normalization to .txt files as well
    pub normalize_txt_escaped_newlines: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            use_rtf_library: true,
            normalize_txt_escaped_newlines: false,
        }
    }
}

impl From<&Config> for NormalizeOptions {
    fn from(config: &Config) -> Self {
        Self {
            use_rtf_library: config.use_rtf_library,
            normalize_txt_escaped_newlines: config.normalize_txt_escaped_newlines,
        }
    }
}

/// A document reduced to normalized plain text
#[derive(Debug)]
pub struct NormalizedDocument {
    /// Normalized text
    pub text: String,
    /// How the text was produced
    pub source: TextSource,
    /// Non-fatal problems met during RTF extraction
    pub warnings: Vec<DocumentError>,
}

/// Read and normalize a document from disk
pub fn load_document<P: AsRef<Path>>(path: P, options: &NormalizeOptions) -> Result<NormalizedDocument, DocumentError> {
    let path = path.as_ref();
    let file_type = FileManager::detect_file_type(path);
    if file_type == FileType::Unknown {
        return Err(DocumentError::UnsupportedFormat(format!(
            "{} (expected .txt or .rtf)",
            path.display()
        )));
    }

    let raw = FileManager::read_bytes(path)?;
    let document = normalize(&raw, file_type, options)?;
    info!("Decoded {} with {}", path.display(), document.source);
    Ok(document)
}

/// Normalize raw bytes of the given file type
pub fn normalize(raw: &[u8], file_type: FileType, options: &NormalizeOptions) -> Result<NormalizedDocument, DocumentError> {
    let (decoded, encoding) = decode_bytes(raw);

    match file_type {
        FileType::Text => {
            if !options.normalize_txt_escaped_newlines {
                return Ok(NormalizedDocument {
                    text: decoded,
                    source: TextSource {
                        encoding,
                        conversion: Conversion::None,
                        escaped_newlines_normalized: false,
                    },
                    warnings: Vec::new(),
                });
            }

            let (text, changed) = match normalize_escaped_newlines(&decoded) {
                Cow::Borrowed(_) => (decoded, false),
                Cow::Owned(owned) => (owned, true),
            };
            Ok(NormalizedDocument {
                text,
                source: TextSource {
                    encoding,
                    conversion: Conversion::None,
                    escaped_newlines_normalized: changed,
                },
                warnings: Vec::new(),
            })
        }
        FileType::Rtf => {
            let (converted, conversion, warnings) = convert_rtf(&decoded, options);
            let (text, changed) = match normalize_escaped_newlines(&converted) {
                Cow::Borrowed(_) => (converted, false),
                Cow::Owned(owned) => (owned, true),
            };
            Ok(NormalizedDocument {
                text,
                source: TextSource {
                    encoding,
                    conversion,
                    escaped_newlines_normalized: changed,
                },
                warnings,
            })
        }
        FileType::Unknown => Err(DocumentError::UnsupportedFormat(
            "expected .txt or .rtf".to_string(),
        )),
    }
}

/// Decode bytes as UTF-8, or as Latin-1 when they are not valid UTF-8
pub fn decode_bytes(raw: &[u8]) -> (String, Encoding) {
    match std::str::from_utf8(raw) {
        Ok(text) => (text.to_string(), Encoding::Utf8),
        Err(e) => {
            debug!("Input is not UTF-8 ({}), decoding as Latin-1", e);
            (raw.iter().map(|&b| char::from(b)).collect(), Encoding::Latin1)
        }
    }
}

/// Replace literal `\r\n` and `\n` two-character sequences with a newline.
/// Borrowed output means nothing was replaced.
pub fn normalize_escaped_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains("\\n") {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\\r\\n", "\n").replace("\\n", "\n"))
}

/// Convert RTF source to plain text, library first, built-in extractor second
fn convert_rtf(source: &str, options: &NormalizeOptions) -> (String, Conversion, Vec<DocumentError>) {
    if options.use_rtf_library {
        match convert_with_library(source) {
            Some(text) if library_output_usable(source, &text) => {
                return (text, Conversion::RtfLibrary, Vec::new());
            }
            Some(_) => debug!("RTF library output lost the line structure, using built-in extractor"),
            None => debug!("RTF library unavailable or failed, using built-in extractor"),
        }
    }

    let stripped = strip_rtf(source);
    for issue in &stripped.issues {
        warn!("RTF fallback: {}", issue);
    }
    (stripped.text, Conversion::RtfFallback, stripped.issues)
}

#[cfg(feature = "rtf-library")]
fn convert_with_library(source: &str) -> Option<String> {
    match rtf_parser::RtfDocument::try_from(source) {
        Ok(document) => Some(
            document
                .body
                .iter()
                .map(|block| block.text.as_str())
                .collect::<String>(),
        ),
        Err(e) => {
            debug!("rtf-parser failed: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "rtf-library"))]
fn convert_with_library(_source: &str) -> Option<String> {
    None
}

// A library result is rejected when it is empty or has fewer line breaks
// than the source has \par and \line control words
fn library_output_usable(source: &str, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let breaks = RTF_BREAK_REGEX.find_iter(source).count();
    let newlines = text.matches('\n').count();
    if newlines < breaks {
        debug!("RTF library kept {} of {} line breaks", newlines, breaks);
        return false;
    }
    true
}
