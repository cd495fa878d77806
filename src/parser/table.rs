//! Sectioned-table grammar (grammar A).
//!
//! Heading lines start a new section; the first non-separator table row
//! after a heading becomes that section's header, and every following
//! table row is mapped key→value against it.

use crate::model::{Row, Section};

/// Marker that opens a section heading line.
pub(super) const HEADING_MARKER: &str = "###";

/// Column delimiter for table-row lines.
pub(super) const COLUMN_DELIMITER: char = '|';

/// Substring that identifies a Markdown alignment/separator row.
const SEPARATOR_DASHES: &str = "---";

/// The section currently being built during the line scan.
///
/// Flushed into the result list at heading boundaries and end of input,
/// and only when both a header and at least one row were captured; an
/// orphan heading therefore contributes nothing.
struct SectionAccumulator {
    title: String,
    header: Vec<String>,
    rows: Vec<Row>,
}

impl SectionAccumulator {
    fn new(title: String) -> Self {
        Self {
            title,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Consume one table-row line, already known to start with the
    /// column delimiter.
    fn accept_table_line(&mut self, line: &str) {
        let mut parts: Vec<String> = line
            .split(COLUMN_DELIMITER)
            .map(|part| part.trim().to_string())
            .collect();

        // Delimiters at the line edges produce one empty leading and one
        // empty trailing field; strip a single one of each.
        if parts.first().is_some_and(|part| part.is_empty()) {
            parts.remove(0);
        }
        if parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }

        let Some(first) = parts.first() else {
            return;
        };
        if first.contains(SEPARATOR_DASHES) {
            return;
        }

        if self.header.is_empty() {
            self.header = parts;
        } else {
            self.push_row(parts);
        }
    }

    /// Map a data row against the captured header, silently padding short
    /// rows with empty strings and truncating long rows from the right.
    fn push_row(&mut self, mut parts: Vec<String>) {
        parts.resize(self.header.len(), String::new());
        let row: Row = self.header.iter().cloned().zip(parts).collect();
        self.rows.push(row);
    }

    /// Turn the accumulator into a section, or nothing if either the
    /// header or the rows are missing.
    fn into_section(self) -> Option<Section> {
        if self.header.is_empty() || self.rows.is_empty() {
            return None;
        }
        Some(Section {
            title: self.title,
            rows: self.rows,
        })
    }
}

/// Extract the title from a heading line.
fn heading_title(line: &str) -> String {
    line.replace(HEADING_MARKER, "").trim().to_string()
}

/// Parse sectioned Markdown-style tables.
///
/// Blank lines and prose lines outside tables are ignored; malformed rows
/// are normalized, never rejected. Returns an empty list when no section
/// captured both a header and data rows.
pub fn parse_section_tables(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut acc = SectionAccumulator::new(String::new());

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(HEADING_MARKER) {
            let next = SectionAccumulator::new(heading_title(line));
            if let Some(section) = std::mem::replace(&mut acc, next).into_section() {
                sections.push(section);
            }
        } else if line.starts_with(COLUMN_DELIMITER) {
            acc.accept_table_line(line);
        }
    }

    if let Some(section) = acc.into_section() {
        sections.push(section);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KINEMATICS: &str = "\
### Cinemática
| Nombre | Fórmula Simbólica | Unidad (SI) |
| --- | --- | --- |
| Velocidad | v = d/t | m/s |
";

    #[test]
    fn test_single_section_single_row() {
        let sections = parse_section_tables(KINEMATICS);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Cinemática");
        assert_eq!(sections[0].row_count(), 1);

        let row = &sections[0].rows[0];
        assert_eq!(row.get("Nombre"), Some("Velocidad"));
        assert_eq!(row.get("Fórmula Simbólica"), Some("v = d/t"));
        assert_eq!(row.get("Unidad (SI)"), Some("m/s"));
    }

    #[test]
    fn test_every_row_carries_every_header_key() {
        let text = "\
### Dinámica
| Nombre | Fórmula | Unidad (SI) |
| Peso | P = mg |
| Fricción | f = μN | N | extra |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].row_count(), 2);

        // Short row padded with an empty string.
        let short = &sections[0].rows[0];
        assert_eq!(short.len(), 3);
        assert_eq!(short.get("Unidad (SI)"), Some(""));

        // Long row truncated from the right.
        let long = &sections[0].rows[1];
        assert_eq!(long.len(), 3);
        assert_eq!(long.get("Unidad (SI)"), Some("N"));
    }

    #[test]
    fn test_exact_arity_row_is_unchanged() {
        let sections = parse_section_tables(KINEMATICS);
        let row = &sections[0].rows[0];
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Nombre", "Fórmula Simbólica", "Unidad (SI)"]);
    }

    #[test]
    fn test_orphan_heading_dropped() {
        let text = "\
### Vacío
### Cinemática
| Nombre |
| Velocidad |
### Final
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Cinemática");
    }

    #[test]
    fn test_heading_with_header_but_no_rows_dropped() {
        let text = "\
### Solo encabezado
| Nombre | Fórmula |
### Real
| Nombre |
| Peso |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Real");
    }

    #[test]
    fn test_separator_row_consumes_no_slot() {
        let text = "\
### T
| A | B |
| :--- | ---: |
| 1 | 2 |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections[0].rows[0].get("A"), Some("1"));
    }

    #[test]
    fn test_sectionless_rows_before_first_heading() {
        let text = "\
| Nombre | Fórmula |
| Peso | P = mg |
### Cinemática
| Nombre |
| Velocidad |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].rows[0].get("Nombre"), Some("Peso"));
        assert_eq!(sections[1].title, "Cinemática");
    }

    #[test]
    fn test_prose_between_tables_ignored() {
        let text = "\
Notas del profesor
### T
Una tabla:
| A |
| 1 |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].row_count(), 1);
    }

    #[test]
    fn test_header_resets_per_section() {
        let text = "\
### Uno
| A | B |
| 1 | 2 |
### Dos
| X |
| 9 |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].rows[0].get("X"), Some("9"));
        assert_eq!(sections[1].rows[0].get("A"), None);
    }

    #[test]
    fn test_heading_title_trimmed() {
        assert_eq!(heading_title("###   Cinemática  "), "Cinemática");
        assert_eq!(heading_title("### Ondas ### Sonido"), "Ondas  Sonido");
    }

    #[test]
    fn test_bare_delimiter_line_ignored() {
        let text = "\
### T
|
| A |
| 1 |
";
        let sections = parse_section_tables(text);
        assert_eq!(sections[0].rows[0].get("A"), Some("1"));
    }
}
