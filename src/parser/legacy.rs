//! Legacy flat-row grammar (grammar B).
//!
//! One `;`-delimited header line followed by data rows; the whole block
//! becomes a single untitled section.

use crate::model::{Row, Section};

/// Reserved field delimiter of the legacy format.
const LEGACY_DELIMITER: u8 = b';';

/// Parse legacy `;`-delimited rows into one untitled section.
///
/// An unreadable header or an input with no data rows yields an empty
/// list; malformed data rows are fitted to the header arity instead of
/// aborting the parse.
pub fn parse_legacy(text: &str) -> Vec<Section> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(LEGACY_DELIMITER)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header = match reader.headers() {
        Ok(header) if !header.is_empty() => header.clone(),
        _ => return Vec::new(),
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::debug!("skipping unreadable legacy row: {err}");
                continue;
            }
        };
        let row: Row = header
            .iter()
            .enumerate()
            .map(|(index, column)| (column, record.get(index).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        Vec::new()
    } else {
        vec![Section::untitled(rows)]
    }
}
