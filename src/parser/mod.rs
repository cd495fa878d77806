//! Input parsing module.
//!
//! Turns one semi-structured text block into ordered [`Section`]s of
//! field-keyed rows. Two grammars are supported: sectioned Markdown-style
//! tables under `###` headings, and the legacy flat `;`-delimited format.

mod legacy;
mod table;

pub use legacy::parse_legacy;
pub use table::parse_section_tables;

use crate::model::Section;

/// The input grammar selected for a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Markdown-style tables grouped under `###` section headings.
    SectionTables,
    /// Flat `;`-delimited rows with a single header line.
    LegacyDelimited,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::SectionTables => write!(f, "sectioned tables"),
            InputFormat::LegacyDelimited => write!(f, "legacy delimited"),
        }
    }
}

/// Detect which grammar a text block uses.
///
/// A block that contains both a heading marker and a table-row marker is
/// treated as sectioned tables; everything else falls back to the legacy
/// flat format.
pub fn detect_format(text: &str) -> InputFormat {
    if text.contains(table::HEADING_MARKER) && text.contains(table::COLUMN_DELIMITER) {
        InputFormat::SectionTables
    } else {
        InputFormat::LegacyDelimited
    }
}

/// Parse a text block into sections.
///
/// Never fails: unreadable input yields an empty list, which callers must
/// surface as "could not interpret the input data" before attempting
/// document generation.
///
/// # Example
/// ```
/// use formulario::parser::parse;
///
/// let sections = parse("Concepto;Fórmula\nPeso;P=mg");
/// assert_eq!(sections.len(), 1);
/// assert_eq!(sections[0].rows[0].get("Concepto"), Some("Peso"));
/// ```
pub fn parse(text: &str) -> Vec<Section> {
    let format = detect_format(text);
    let sections = match format {
        InputFormat::SectionTables => table::parse_section_tables(text),
        InputFormat::LegacyDelimited => legacy::parse_legacy(text),
    };
    log::debug!(
        "parsed {} section(s) from {} input",
        sections.len(),
        format
    );
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_section_tables() {
        let text = "### Título\n| a | b |";
        assert_eq!(detect_format(text), InputFormat::SectionTables);
    }

    #[test]
    fn test_detect_legacy_without_heading() {
        // A table without headings is still legacy input.
        assert_eq!(detect_format("| a | b |"), InputFormat::LegacyDelimited);
        assert_eq!(detect_format("a;b\n1;2"), InputFormat::LegacyDelimited);
    }

    #[test]
    fn test_detect_requires_both_markers() {
        assert_eq!(detect_format("### solo título"), InputFormat::LegacyDelimited);
    }

    #[test]
    fn test_parse_dispatches_by_format() {
        let sectioned = "### T\n| a |\n| 1 |";
        assert_eq!(parse(sectioned)[0].title, "T");

        let legacy = "a;b\n1;2";
        assert_eq!(parse(legacy)[0].title, "");
    }
}
