/*!
 * Field extraction from the lines of a NUM block.
 *
 * Lines are matched against a fixed set of labels. When a field shows up more
 * than once, the line under a preferred section (`General`, `Input Max/Min`)
 * wins over one before any section header, which wins over one under another
 * section. A single forward scan carries the current section.
 */

use std::collections::BTreeMap;
use std::fmt;

/// Fields extracted from every block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Address,
    UnitScale,
    StorageType,
    MinInputLimit,
    MaxInputLimit,
    TimingRangeCheck,
}

impl Field {
    /// All fields in export column order
    pub const ALL: [Field; 6] = [
        Field::Address,
        Field::UnitScale,
        Field::StorageType,
        Field::MinInputLimit,
        Field::MaxInputLimit,
        Field::TimingRangeCheck,
    ];

    /// Canonical name, also the export column header
    pub fn name(self) -> &'static str {
        match self {
            Field::Address => "Address",
            Field::UnitScale => "UnitScale",
            Field::StorageType => "Storage Type",
            Field::MinInputLimit => "Minimum Input Limit",
            Field::MaxInputLimit => "Maximum Input Limit",
            Field::TimingRangeCheck => "Timing of max/min range check",
        }
    }

    /// Line prefixes accepted for this field
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Field::Address => &["Address"],
            Field::UnitScale => &["UnitScale", "Set UnitScale"],
            Field::StorageType => &["Storage Type"],
            Field::MinInputLimit => &["Minimum Input Limit"],
            Field::MaxInputLimit => &["Maximum Input Limit"],
            Field::TimingRangeCheck => &["Timing of max/min range check"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Section headers inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    General,
    InputMaxMin,
    Flicker,
    Color,
    Alarm,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::General,
        Section::InputMaxMin,
        Section::Flicker,
        Section::Color,
        Section::Alarm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::General => "General",
            Section::InputMaxMin => "Input Max/Min",
            Section::Flicker => "Flicker",
            Section::Color => "Color",
            Section::Alarm => "Alarm",
        }
    }

    /// Values found under these sections take precedence
    pub fn is_preferred(self) -> bool {
        matches!(self, Section::General | Section::InputMaxMin)
    }
}

/// A value pulled out of a labelled line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// The label that matched, e.g. `Set UnitScale`
    pub label: &'static str,
    /// Trailing content after the label (or the next line), trimmed
    pub value: String,
    /// Section the line was found under, if any
    pub section: Option<Section>,
    /// The trimmed line as written in the file; a value taken from the next
    /// line is appended after a space
    pub source_line: String,
}

impl FieldValue {
    /// The value as a line of the export, e.g. `Address ETHERNET:X`
    pub fn line(&self) -> String {
        if self.value.is_empty() {
            self.label.to_string()
        } else {
            format!("{} {}", self.label, self.value)
        }
    }

    // Higher wins; ties keep the earlier line
    fn rank(&self) -> (u8, bool) {
        let section_rank = match self.section {
            Some(section) if section.is_preferred() => 2,
            None => 1,
            Some(_) => 0,
        };
        (section_rank, !self.value.is_empty())
    }
}

pub type FieldMap = BTreeMap<Field, FieldValue>;

/// True when the left-trimmed line is the label, or the label followed by a space or colon
pub fn line_matches_label(line: &str, label: &str) -> bool {
    let line = line.trim_start();
    match line.strip_prefix(label) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with(':'),
        None => false,
    }
}

/// The field and label a line starts with
pub fn match_field_label(line: &str) -> Option<(Field, &'static str)> {
    Field::ALL.iter().find_map(|&field| {
        field
            .labels()
            .iter()
            .find(|label| line_matches_label(line, label))
            .map(|&label| (field, label))
    })
}

/// The section a header line opens
pub fn match_section(line: &str) -> Option<Section> {
    if match_field_label(line).is_some() {
        return None;
    }
    Section::ALL
        .iter()
        .copied()
        .find(|section| line_matches_label(line, section.name()))
}

fn trailing_content<'a>(line: &'a str, label: &str) -> &'a str {
    let rest = line.trim_start()[label.len()..].trim_start();
    rest.strip_prefix(':').unwrap_or(rest).trim()
}

/// Extract every known field from a block's text
pub fn extract_fields(block_text: &str) -> FieldMap {
    let lines: Vec<&str> = block_text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    let mut fields = FieldMap::new();
    let mut section: Option<Section> = None;

    for (index, line) in lines.iter().enumerate() {
        if let Some(opened) = match_section(line) {
            section = Some(opened);
            continue;
        }

        let Some((field, label)) = match_field_label(line) else {
            continue;
        };

        let mut value = trailing_content(line, label).to_string();
        let mut source_line = line.trim().to_string();
        if value.is_empty() {
            // Label on its own line, value on the next one
            if let Some(next) = lines.get(index + 1) {
                let next_trimmed = next.trim();
                if !next_trimmed.is_empty()
                    && match_field_label(next).is_none()
                    && match_section(next).is_none()
                {
                    value = next_trimmed.to_string();
                    source_line = format!("{} {}", source_line, next_trimmed);
                }
            }
        }

        let candidate = FieldValue { label, value, section, source_line };
        let replace = match fields.get(&field) {
            Some(existing) => candidate.rank() > existing.rank(),
            None => true,
        };
        if replace {
            fields.insert(field, candidate);
        }
    }

    fields
}
