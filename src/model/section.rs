//! Section and row types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A titled (or untitled) group of formula rows, rendered as one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title; empty for legacy input and sectionless tables.
    pub title: String,

    /// Rows in input order.
    pub rows: Vec<Row>,
}

impl Section {
    /// Create an empty section with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Create a section with no title from existing rows.
    pub fn untitled(rows: Vec<Row>) -> Self {
        Self {
            title: String::new(),
            rows,
        }
    }

    /// Add a row to the section.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the section has any rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether the section carries a displayable title.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// One formula record: a mapping from column name to string value.
///
/// Column insertion order is preserved so serialized output matches the
/// input header order, but lookups are by name only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, String>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Create a row from (column, value) pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a field value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Get a field value by exact column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Resolve a logical field through an ordered list of column aliases.
    ///
    /// Returns the value of the first alias present in the row, even when
    /// that value is empty; later aliases are not consulted.
    pub fn first_match(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Input shapes accepted by the composer.
///
/// The canonical shape is a list of sections; a flat list of rows is
/// wrapped as one untitled section.
#[derive(Debug, Clone)]
pub enum TableData {
    /// The canonical parsed shape.
    Sections(Vec<Section>),
    /// A flat row list without section structure.
    Rows(Vec<Row>),
}

impl TableData {
    /// Normalize to the canonical list-of-sections shape.
    ///
    /// An empty row list produces zero sections, so composing it yields an
    /// empty but valid document.
    pub fn into_sections(self) -> Vec<Section> {
        match self {
            TableData::Sections(sections) => sections,
            TableData::Rows(rows) => {
                if rows.is_empty() {
                    Vec::new()
                } else {
                    vec![Section::untitled(rows)]
                }
            }
        }
    }
}

impl From<Vec<Section>> for TableData {
    fn from(sections: Vec<Section>) -> Self {
        TableData::Sections(sections)
    }
}

impl From<Vec<Row>> for TableData {
    fn from(rows: Vec<Row>) -> Self {
        TableData::Rows(rows)
    }
}
