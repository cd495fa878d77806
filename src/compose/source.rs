//! Typst source generation for composed documents.
//!
//! Lowers sections of display-ready cells into a single Typst source
//! string. Formula images are referenced through virtual paths that the
//! compilation world resolves from in-memory assets.

use super::options::ComposeOptions;
use crate::markup;

/// Column headers of the output table.
pub(super) const TABLE_HEADERS: [&str; 4] = ["Concepto", "Fórmula", "Variables", "Unidades (SI)"];

/// Formula column content for one row.
pub(super) enum FormulaCell {
    /// Rasterized notation, placed as an image of the given size in points.
    Image {
        path: String,
        width: f64,
        height: f64,
    },
    /// Escaped verbatim text, used when rasterization failed.
    Text(String),
}

/// One input row lowered to display markup.
pub(super) struct RenderedRow {
    pub concept: String,
    pub formula: FormulaCell,
    pub variables: String,
    pub units: String,
}

/// Incrementally builds the document source, one section at a time.
pub(super) struct SourceBuilder<'a> {
    options: &'a ComposeOptions,
    out: String,
}

impl<'a> SourceBuilder<'a> {
    pub fn new(options: &'a ComposeOptions) -> Self {
        let mut out = String::new();
        out.push_str(&format!(
            "#set page(paper: \"us-letter\", flipped: true, margin: (x: {}pt, y: {}pt))\n",
            options.margin_x, options.margin_y
        ));
        out.push_str(&format!("#set text(size: {}pt)\n", options.font_size));
        out.push_str("#show heading.where(level: 1): set align(center)\n");
        out.push_str("#show heading.where(level: 1): set text(size: 18pt)\n");
        out.push_str(
            "#show table.cell.where(y: 0): set text(fill: rgb(\"#f5f5f5\"), weight: \"bold\")\n",
        );
        out.push('\n');
        Self { options, out }
    }

    /// Append one section: an optional centered heading followed by its table.
    pub fn push_section(&mut self, title: &str, rows: &[RenderedRow]) {
        if !title.is_empty() {
            self.out.push_str(&format!("= {}\n", markup::escape(title)));
            self.out
                .push_str(&format!("#v({}pt)\n", self.options.title_spacing));
        }
        self.push_table(rows);
        self.out
            .push_str(&format!("#v({}pt)\n", self.options.section_spacing));
    }

    fn push_table(&mut self, rows: &[RenderedRow]) {
        let [w0, w1, w2, w3] = self.options.column_widths;
        self.out.push_str(&format!(
            "#table(\n  columns: ({}pt, {}pt, {}pt, {}pt),\n",
            w0, w1, w2, w3
        ));
        self.out.push_str("  align: left + horizon,\n");
        self.out.push_str("  inset: 6pt,\n");
        self.out.push_str("  stroke: 1pt + black,\n");
        self.out.push_str(
            "  fill: (_, y) => if y == 0 { rgb(\"#808080\") } else { rgb(\"#f5f5dc\") },\n",
        );
        self.out.push_str("  table.header(\n");
        for header in TABLE_HEADERS {
            self.out.push_str(&format!(
                "    table.cell(inset: (bottom: 12pt))[{}],\n",
                header
            ));
        }
        self.out.push_str("  ),\n");
        for row in rows {
            self.out.push_str("  ");
            self.push_cell(&row.concept);
            match &row.formula {
                FormulaCell::Image {
                    path,
                    width,
                    height,
                } => {
                    self.out.push_str(&format!(
                        "[#image(\"{}\", width: {:.1}pt, height: {:.1}pt)], ",
                        path, width, height
                    ));
                }
                FormulaCell::Text(text) => self.push_cell(text),
            }
            self.push_cell(&row.variables);
            self.out.push_str(&format!("[{}],\n", row.units));
        }
        self.out.push_str(")\n");
    }

    fn push_cell(&mut self, content: &str) {
        self.out.push_str(&format!("[{}], ", content));
    }

    pub fn finish(self) -> String {
        self.out
    }
}
