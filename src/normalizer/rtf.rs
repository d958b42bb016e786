/*!
 * Built-in RTF text extractor.
 *
 * Best-effort: walks the RTF source once, tracks brace depth, drops control
 * words and ignorable destinations, and keeps the readable text with paragraph
 * breaks turned into newlines. Structural anomalies are collected as
 * `DocumentError::Format` warnings instead of failing the conversion.
 */

use crate::errors::DocumentError;

/// Destinations whose whole group carries no document text
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "filetbl",
    "fldinst",
];

/// Text recovered from an RTF source by the built-in extractor
#[derive(Debug, Default)]
pub struct StrippedRtf {
    /// Readable text content
    pub text: String,
    /// Non-fatal structure problems met on the way
    pub issues: Vec<DocumentError>,
}

struct Stripper<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
    // Group depth at which an ignorable destination started
    skip_depth: Option<usize>,
    // Fallback characters still to drop after a \uN escape
    pending_unicode_skip: usize,
    unicode_skip_count: usize,
    out: String,
    issues: Vec<DocumentError>,
}

/// Strip RTF control syntax and return the readable text
pub fn strip_rtf(source: &str) -> StrippedRtf {
    let chars: Vec<char> = source.chars().collect();
    let mut stripper = Stripper {
        chars: &chars,
        pos: 0,
        depth: 0,
        skip_depth: None,
        pending_unicode_skip: 0,
        unicode_skip_count: 1,
        out: String::with_capacity(source.len() / 2),
        issues: Vec::new(),
    };
    stripper.run();

    StrippedRtf {
        text: stripper.out,
        issues: stripper.issues,
    }
}

impl Stripper<'_> {
    fn run(&mut self) {
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '{' => {
                    self.depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    if self.depth == 0 {
                        self.issue(self.pos, "unmatched closing brace");
                    } else {
                        if self.skip_depth == Some(self.depth) {
                            self.skip_depth = None;
                        }
                        self.depth -= 1;
                    }
                    self.pos += 1;
                }
                '\\' => self.control(),
                // Raw line breaks are not content in RTF
                '\r' | '\n' => self.pos += 1,
                ch => {
                    self.emit(ch);
                    self.pos += 1;
                }
            }
        }

        if self.depth > 0 {
            let message = format!("{} unclosed group(s) at end of input", self.depth);
            self.issue(self.chars.len(), &message);
        }
    }

    fn control(&mut self) {
        let start = self.pos;
        let Some(&next) = self.chars.get(self.pos + 1) else {
            self.issue(start, "dangling backslash at end of input");
            self.pos += 1;
            return;
        };

        match next {
            '\\' | '{' | '}' => {
                self.emit(next);
                self.pos += 2;
            }
            '\'' => self.hex_escape(),
            '*' => {
                self.skip_depth = self.skip_depth.or(Some(self.depth));
                self.pos += 2;
            }
            '~' => {
                self.emit(' ');
                self.pos += 2;
            }
            '_' => {
                self.emit('-');
                self.pos += 2;
            }
            '\r' | '\n' => {
                self.emit('\n');
                self.pos += 2;
            }
            c if c.is_ascii_alphabetic() => self.control_word(),
            _ => self.pos += 2,
        }
    }

    fn hex_escape(&mut self) {
        let start = self.pos;
        let digits: String = self.chars.iter().skip(self.pos + 2).take(2).collect();
        match u8::from_str_radix(&digits, 16) {
            Ok(byte) if digits.len() == 2 => {
                self.emit(char::from(byte));
                self.pos += 4;
            }
            _ => {
                self.issue(start, "invalid \\' hex escape");
                self.pos += 2;
            }
        }
    }

    fn control_word(&mut self) {
        let mut end = self.pos + 1;
        while end < self.chars.len() && self.chars[end].is_ascii_alphabetic() {
            end += 1;
        }
        let word: String = self.chars[self.pos + 1..end].iter().collect();

        let param_start = end;
        if end < self.chars.len() && self.chars[end] == '-' {
            end += 1;
        }
        while end < self.chars.len() && self.chars[end].is_ascii_digit() {
            end += 1;
        }
        let param: Option<i32> = if end > param_start {
            self.chars[param_start..end]
                .iter()
                .collect::<String>()
                .parse()
                .ok()
        } else {
            None
        };

        // A single space delimits the control word and is not text
        if end < self.chars.len() && self.chars[end] == ' ' {
            end += 1;
        }
        self.pos = end;

        match word.as_str() {
            "par" | "line" | "sect" | "page" | "row" => self.emit('\n'),
            "tab" => self.emit('\t'),
            "cell" => self.emit(' '),
            "emdash" => self.emit('\u{2014}'),
            "endash" => self.emit('\u{2013}'),
            "bullet" => self.emit('\u{2022}'),
            "lquote" | "rquote" => self.emit('\''),
            "ldblquote" | "rdblquote" => self.emit('"'),
            "uc" => self.unicode_skip_count = param.unwrap_or(1).max(0) as usize,
            "u" => match param {
                Some(value) => {
                    // Negative values encode code points above 32767
                    let code = if value < 0 { value + 65_536 } else { value };
                    let decoded = u32::try_from(code).ok().and_then(char::from_u32);
                    match decoded {
                        Some(ch) => self.emit(ch),
                        None => self.issue(self.pos, "invalid \\u code point"),
                    }
                    if self.skip_depth.is_none() {
                        self.pending_unicode_skip = self.unicode_skip_count;
                    }
                }
                None => self.issue(self.pos, "\\u without a code point"),
            },
            w if SKIPPED_DESTINATIONS.contains(&w) => {
                self.skip_depth = self.skip_depth.or(Some(self.depth));
            }
            _ => {}
        }
    }

    fn emit(&mut self, ch: char) {
        if self.skip_depth.is_some() {
            return;
        }
        if self.pending_unicode_skip > 0 {
            self.pending_unicode_skip -= 1;
            return;
        }
        self.out.push(ch);
    }

    fn issue(&mut self, offset: usize, message: &str) {
        self.issues.push(DocumentError::Format {
            offset,
            message: message.to_string(),
        });
    }
}
