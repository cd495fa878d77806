//! Document composition.
//!
//! Turns parsed sections into the final landscape-letter PDF: resolves
//! column aliases, lowers every cell to safe markup, rasterizes the
//! symbolic formula column, and compiles the assembled Typst source.
//!
//! # Example
//!
//! ```no_run
//! use formulario::compose::Composer;
//! use formulario::parser;
//!
//! fn main() -> formulario::Result<()> {
//!     let text = std::fs::read_to_string("hoja.txt")?;
//!     let sections = parser::parse(&text);
//!     Composer::new().compose_to_file(sections, "formulario.pdf")
//! }
//! ```

mod options;
mod source;

pub use options::ComposeOptions;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Timelike};
use rayon::prelude::*;
use typst::foundations::{Datetime, Smart};
use typst::layout::PagedDocument;
use typst_pdf::{PdfOptions, PdfStandards, Timestamp};

use crate::error::{Error, Result};
use crate::markup;
use crate::model::{RenderedFormula, Row, Section, TableData};
use crate::raster::{self, FormulaCache};
use crate::world::PipelineWorld;
use source::{FormulaCell, RenderedRow, SourceBuilder};

/// Column aliases for the concept cell, first present key wins.
const CONCEPT_ALIASES: [&str; 2] = ["Nombre", "Concepto"];

/// Column aliases for the symbolic formula cell.
const FORMULA_ALIASES: [&str; 3] = ["Fórmula Simbólica", "Fórmula", "Formula Simbólica"];

/// Column aliases for the units cell.
const UNITS_ALIASES: [&str; 3] = ["Unidad (SI)", "Unidades (SI)", "Simbolo"];

/// Column holding pre-written variable descriptions.
const VARIABLES_COLUMN: &str = "Variables";

/// Columns describing the formula in words, first non-empty value wins.
const FORMULA_TEXT_ALIASES: [&str; 2] = ["Fórmula en Texto", "Formula en Texto"];

/// Column holding usage notes.
const USAGE_COLUMN: &str = "Dato Relevante / Uso";

/// A usable field value: non-blank and not a textual nan marker.
fn has_value(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

/// A composed document before PDF export: the generated Typst source plus
/// the formula images it references by virtual path.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    /// Typst source for the whole sheet.
    pub source: String,

    /// PNG assets keyed by the virtual path used in the source.
    pub assets: HashMap<String, Vec<u8>>,
}

impl ComposedDocument {
    /// Number of rasterized formulas referenced by the source.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    fn into_world(self) -> PipelineWorld {
        PipelineWorld::with_assets(self.source, self.assets)
    }
}

/// Composes section tables into a PDF document.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    options: ComposeOptions,
}

impl Composer {
    /// Create a composer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with the given options.
    pub fn with_options(options: ComposeOptions) -> Self {
        Self { options }
    }

    /// The active compose options.
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Lower input into Typst source and image assets without exporting.
    ///
    /// Formulas are rasterized in parallel. Rows keep their input order.
    pub fn build(&self, input: impl Into<TableData>) -> ComposedDocument {
        let sections = input.into().into_sections();
        let raster_options = self.options.raster_options();
        let formulas: Vec<&str> = sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .map(Self::formula_source)
            .collect();
        let rendered: Vec<Option<Arc<RenderedFormula>>> = formulas
            .par_iter()
            .map(|formula| raster::render_formula(formula, &raster_options).map(Arc::new))
            .collect();
        self.assemble(&sections, rendered)
    }

    /// Like [`build`](Self::build), but reuses rasterizations across calls.
    ///
    /// Rendering is sequential here since the cache is borrowed mutably.
    pub fn build_with_cache(
        &self,
        input: impl Into<TableData>,
        cache: &mut FormulaCache,
    ) -> ComposedDocument {
        let sections = input.into().into_sections();
        let raster_options = self.options.raster_options();
        let rendered: Vec<Option<Arc<RenderedFormula>>> = sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .map(|row| cache.render(Self::formula_source(row), &raster_options))
            .collect();
        self.assemble(&sections, rendered)
    }

    /// Compose the input and export it as PDF bytes.
    pub fn compose(&self, input: impl Into<TableData>) -> Result<Vec<u8>> {
        self.export_pdf(self.build(input))
    }

    /// Compose with a formula cache and export as PDF bytes.
    pub fn compose_with_cache(
        &self,
        input: impl Into<TableData>,
        cache: &mut FormulaCache,
    ) -> Result<Vec<u8>> {
        self.export_pdf(self.build_with_cache(input, cache))
    }

    /// Compose the input and write the PDF to a file.
    pub fn compose_to_file(&self, input: impl Into<TableData>, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.compose(input)?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("document written to {}", path.as_ref().display());
        Ok(())
    }

    fn formula_source(row: &Row) -> &str {
        row.first_match(&FORMULA_ALIASES).unwrap_or("")
    }

    fn assemble(
        &self,
        sections: &[Section],
        rendered: Vec<Option<Arc<RenderedFormula>>>,
    ) -> ComposedDocument {
        let mut assets = HashMap::new();
        let mut builder = SourceBuilder::new(&self.options);
        let mut images = rendered.into_iter();
        let mut asset_index = 0usize;

        for section in sections {
            let rows: Vec<RenderedRow> = section
                .rows
                .iter()
                .map(|row| {
                    self.lower_row(row, images.next().flatten(), &mut assets, &mut asset_index)
                })
                .collect();
            builder.push_section(&section.title, &rows);
        }

        ComposedDocument {
            source: builder.finish(),
            assets,
        }
    }

    fn lower_row(
        &self,
        row: &Row,
        image: Option<Arc<RenderedFormula>>,
        assets: &mut HashMap<String, Vec<u8>>,
        asset_index: &mut usize,
    ) -> RenderedRow {
        let concept = row.first_match(&CONCEPT_ALIASES).unwrap_or("");
        let units = row.first_match(&UNITS_ALIASES).unwrap_or("");
        let formula = match image {
            Some(image) => {
                let path = format!("/formulas/f{}.png", asset_index);
                *asset_index += 1;
                let (width, height) = image.display_size(self.options.display_height);
                assets.insert(path.clone(), image.png.clone());
                FormulaCell::Image {
                    path,
                    width,
                    height,
                }
            }
            None => FormulaCell::Text(markup::escape(Self::formula_source(row))),
        };
        RenderedRow {
            concept: markup::to_safe_markup(concept, false),
            formula,
            variables: self.variables_markup(row),
            units: markup::to_safe_markup(units, false),
        }
    }

    /// The variables cell: the explicit column when present, otherwise a
    /// description synthesized from the textual formula and usage columns.
    fn variables_markup(&self, row: &Row) -> String {
        if let Some(direct) = row.get(VARIABLES_COLUMN).filter(|value| !value.is_empty()) {
            return markup::to_safe_markup(direct, false);
        }

        let mut parts = Vec::new();
        let formula_text = FORMULA_TEXT_ALIASES
            .iter()
            .find_map(|alias| row.get(alias).filter(|value| !value.is_empty()));
        if let Some(text) = formula_text.filter(|value| has_value(value)) {
            parts.push(format!("*Fórmula:* {}", markup::escape(text)));
        }
        if let Some(usage) = row.get(USAGE_COLUMN).filter(|value| has_value(value)) {
            parts.push(format!("*Uso:* {}", markup::escape(usage)));
        }
        markup::to_safe_markup(&parts.join("\n"), true)
    }

    fn export_pdf(&self, document: ComposedDocument) -> Result<Vec<u8>> {
        let world = document.into_world();
        let compiled = typst::compile::<PagedDocument>(&world);
        for warning in &compiled.warnings {
            log::debug!("compile warning: {}", warning.message);
        }
        let paged = compiled
            .output
            .map_err(|errors| Error::Compile(raster::format_diagnostics(&errors)))?;

        let pdf_options = PdfOptions {
            ident: Smart::Auto,
            timestamp: local_timestamp(),
            page_ranges: None,
            standards: PdfStandards::default(),
            tagged: true,
        };
        let bytes = typst_pdf::pdf(&paged, &pdf_options)
            .map_err(|errors| Error::PdfExport(raster::format_diagnostics(&errors)))?;
        comemo::evict(10);
        Ok(bytes)
    }
}

/// The current local time as a PDF creation timestamp.
fn local_timestamp() -> Option<Timestamp> {
    let now = chrono::Local::now();
    convert_datetime(&now)
        .and_then(|datetime| Timestamp::new_local(datetime, now.offset().local_minus_utc() / 60))
}

/// Convert a chrono datetime into a Typst datetime.
fn convert_datetime<Tz: chrono::TimeZone>(date_time: &chrono::DateTime<Tz>) -> Option<Datetime> {
    Datetime::from_ymd_hms(
        date_time.year(),
        date_time.month().try_into().ok()?,
        date_time.day().try_into().ok()?,
        date_time.hour().try_into().ok()?,
        date_time.minute().try_into().ok()?,
        date_time.second().try_into().ok()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        Row::from_pairs(pairs.iter().copied())
    }

    fn section(title: &str, rows: Vec<Row>) -> Section {
        let mut section = Section::new(title);
        for row in rows {
            section.add_row(row);
        }
        section
    }

    #[test]
    fn test_variables_prefers_direct_column() {
        let composer = Composer::new();
        let row = row(&[
            ("Variables", "d: distancia, t: tiempo"),
            ("Fórmula en Texto", "velocidad = distancia / tiempo"),
        ]);
        assert_eq!(
            composer.variables_markup(&row),
            "d: distancia, t: tiempo"
        );
    }

    #[test]
    fn test_variables_synthesized_from_text_and_usage() {
        let composer = Composer::new();
        let row = row(&[
            ("Fórmula en Texto", "v = d/t"),
            ("Dato Relevante / Uso", "MRU"),
        ]);
        assert_eq!(
            composer.variables_markup(&row),
            "*Fórmula:* v \\= d\\/t\\ *Uso:* MRU"
        );
    }

    #[test]
    fn test_variables_empty_direct_column_yields_empty_cell() {
        let composer = Composer::new();
        let row = row(&[
            ("Concepto", "Peso"),
            ("Fórmula", "P=mg"),
            ("Variables", ""),
            ("Unidades (SI)", "N"),
        ]);
        assert_eq!(composer.variables_markup(&row), "");
    }

    #[test]
    fn test_variables_nan_markers_skipped() {
        let composer = Composer::new();
        let row = row(&[
            ("Fórmula en Texto", "nan"),
            ("Dato Relevante / Uso", " NaN "),
        ]);
        assert_eq!(composer.variables_markup(&row), "");
    }

    #[test]
    fn test_variables_textual_formula_falls_through_empty_alias() {
        let composer = Composer::new();
        let row = row(&[
            ("Fórmula en Texto", ""),
            ("Formula en Texto", "corriente = carga / tiempo"),
        ]);
        assert_eq!(
            composer.variables_markup(&row),
            "*Fórmula:* corriente \\= carga \\/ tiempo"
        );
    }

    #[test]
    fn test_concept_alias_priority() {
        let composer = Composer::new();
        let mut assets = HashMap::new();
        let mut index = 0;
        let row = row(&[("Nombre", "Presión"), ("Concepto", "ignorado")]);
        let lowered = composer.lower_row(&row, None, &mut assets, &mut index);
        assert_eq!(lowered.concept, "Presión");
    }

    #[test]
    fn test_failed_formula_falls_back_to_escaped_text() {
        let composer = Composer::new();
        let section = section(
            "Cinemática",
            vec![row(&[
                ("Concepto", "MRU"),
                ("Fórmula Simbólica", "v = d/t"),
            ])],
        );
        let document = composer.assemble(&[section], vec![None]);
        assert!(document.source.contains("[v \\= d\\/t]"));
        assert_eq!(document.asset_count(), 0);
    }

    #[test]
    fn test_unconvertible_formula_never_reaches_assets() {
        let composer = Composer::new();
        let section = section(
            "Varios",
            vec![row(&[
                ("Concepto", "Rota"),
                ("Fórmula Simbólica", "\\undefinedcommandxyz{"),
            ])],
        );
        let document = composer.build(vec![section]);
        assert_eq!(document.asset_count(), 0);
        assert!(document.source.contains("\\\\undefinedcommandxyz"));
    }

    #[test]
    fn test_empty_input_builds_bare_document() {
        let composer = Composer::new();
        let document = composer.build(Vec::<Section>::new());
        assert!(document.source.contains("#set page"));
        assert_eq!(document.asset_count(), 0);
        assert!(!document.source.contains("#table"));
    }

    #[test]
    fn test_rendered_formula_becomes_indexed_asset() {
        let composer = Composer::new();
        let image = Arc::new(RenderedFormula {
            png: vec![1, 2, 3],
            width_px: 200,
            height_px: 100,
        });
        let section = section(
            "Energía",
            vec![row(&[
                ("Concepto", "Cinética"),
                ("Fórmula Simbólica", "E = m v^2 / 2"),
            ])],
        );
        let document = composer.assemble(&[section], vec![Some(image)]);
        assert_eq!(document.asset_count(), 1);
        assert!(document.assets.contains_key("/formulas/f0.png"));
        assert!(document
            .source
            .contains("#image(\"/formulas/f0.png\", width: 80.0pt, height: 40.0pt)"));
    }
}
