//! # formulario
//!
//! Physics formula-sheet generation library for Rust.
//!
//! This library parses semi-structured tables of physics formulas,
//! rewrites their notation into safe display markup, rasterizes each
//! symbolic formula, and composes everything into a landscape-letter PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use formulario::generate_pdf;
//!
//! fn main() -> formulario::Result<()> {
//!     let text = std::fs::read_to_string("formulas.txt")?;
//!     generate_pdf(&text, "formulario.pdf")
//! }
//! ```
//!
//! ## Features
//!
//! - **Dual input grammars**: sectioned pipe tables and legacy delimited rows
//! - **Notation rewriting**: exponents, subscripts, Greek letters, operators
//! - **Formula rasterization**: tightly cropped transparent PNGs
//! - **Column aliasing**: tolerant of historical header spellings
//! - **Parallel processing**: formulas rasterize on a Rayon pool
//! - **Self-contained output**: embedded math fonts, no system TeX required

pub mod compose;
pub mod config;
pub mod error;
pub mod fonts;
pub mod markup;
pub mod model;
pub mod parser;
pub mod raster;
pub mod world;

// Re-export commonly used types
pub use compose::{ComposeOptions, ComposedDocument, Composer};
pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use model::{RenderedFormula, Row, Section, TableData, TextColor};
pub use parser::{detect_format, InputFormat};
pub use raster::{FormulaCache, RasterOptions};

use std::path::Path;

/// Parse raw input text into sections.
///
/// Never fails: text that matches neither grammar yields an empty list.
///
/// # Example
///
/// ```
/// use formulario::parse_text;
///
/// let sections = parse_text("### Cinemática\n| Concepto | Fórmula Simbólica |\n| MRU | v = d/t |");
/// assert_eq!(sections.len(), 1);
/// assert_eq!(sections[0].title, "Cinemática");
/// ```
pub fn parse_text(text: &str) -> Vec<Section> {
    parser::parse(text)
}

/// Generate a formula-sheet PDF from raw input text.
///
/// # Arguments
///
/// * `text` - Raw input in either supported grammar
/// * `output` - Path of the PDF file to write
///
/// # Example
///
/// ```no_run
/// use formulario::generate_pdf;
///
/// let text = std::fs::read_to_string("formulas.txt").unwrap();
/// generate_pdf(&text, "formulario.pdf").unwrap();
/// ```
pub fn generate_pdf<P: AsRef<Path>>(text: &str, output: P) -> Result<()> {
    let sections = parse_nonempty(text)?;
    Composer::new().compose_to_file(sections, output)
}

/// Generate a formula-sheet PDF with custom compose options.
///
/// # Example
///
/// ```no_run
/// use formulario::{generate_pdf_with_options, ComposeOptions, TextColor};
///
/// let options = ComposeOptions::new()
///     .with_formula_dpi(150.0)
///     .with_formula_color(TextColor::Black);
/// let text = std::fs::read_to_string("formulas.txt").unwrap();
/// generate_pdf_with_options(&text, "formulario.pdf", options).unwrap();
/// ```
pub fn generate_pdf_with_options<P: AsRef<Path>>(
    text: &str,
    output: P,
    options: ComposeOptions,
) -> Result<()> {
    let sections = parse_nonempty(text)?;
    Composer::with_options(options).compose_to_file(sections, output)
}

/// Generate a formula-sheet PDF and return it as bytes.
///
/// # Example
///
/// ```no_run
/// use formulario::generate_pdf_bytes;
///
/// let bytes = generate_pdf_bytes("Concepto;Fórmula\nPeso;P=mg").unwrap();
/// assert!(bytes.starts_with(b"%PDF"));
/// ```
pub fn generate_pdf_bytes(text: &str) -> Result<Vec<u8>> {
    let sections = parse_nonempty(text)?;
    Composer::new().compose(sections)
}

fn parse_nonempty(text: &str) -> Result<Vec<Section>> {
    let sections = parser::parse(text);
    if sections.is_empty() {
        return Err(Error::UnreadableInput);
    }
    Ok(sections)
}

/// Builder for parsing and composing formula sheets.
///
/// # Example
///
/// ```no_run
/// use formulario::Formulario;
///
/// let sheet = Formulario::new()
///     .with_formula_dpi(150.0)
///     .with_display_height(32.0)
///     .parse("### Cinemática\n| Concepto | Fórmula Simbólica |\n| MRU | v = d/t |")?;
/// sheet.to_file("formulario.pdf")?;
/// # Ok::<(), formulario::Error>(())
/// ```
pub struct Formulario {
    options: ComposeOptions,
}

impl Formulario {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ComposeOptions::default(),
        }
    }

    /// Replace all compose options at once.
    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the base cell font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.options = self.options.with_font_size(size);
        self
    }

    /// Set the formula rasterization font size.
    pub fn with_formula_font_size(mut self, size: f64) -> Self {
        self.options = self.options.with_formula_font_size(size);
        self
    }

    /// Set the formula rasterization resolution.
    pub fn with_formula_dpi(mut self, dpi: f64) -> Self {
        self.options = self.options.with_formula_dpi(dpi);
        self
    }

    /// Set the formula ink color.
    pub fn with_formula_color(mut self, color: TextColor) -> Self {
        self.options = self.options.with_formula_color(color);
        self
    }

    /// Set the display height of formula images.
    pub fn with_display_height(mut self, height: f64) -> Self {
        self.options = self.options.with_display_height(height);
        self
    }

    /// Fold settings from a generator config into the options.
    pub fn with_config(mut self, config: &GeneratorConfig) -> Self {
        self.options = config.apply(self.options);
        self
    }

    /// Parse input text and return a result wrapper.
    pub fn parse(self, text: &str) -> Result<FormularioResult> {
        let sections = parse_nonempty(text)?;
        Ok(FormularioResult {
            sections,
            options: self.options,
        })
    }
}

impl Default for Formulario {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing formula-sheet input.
pub struct FormularioResult {
    /// Parsed sections in input order
    pub sections: Vec<Section>,
    /// Compose options to use
    options: ComposeOptions,
}

impl FormularioResult {
    /// Compose the sections and return PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Composer::with_options(self.options.clone()).compose(self.sections.clone())
    }

    /// Compose the sections and write the PDF to a file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        Composer::with_options(self.options.clone()).compose_to_file(self.sections.clone(), path)
    }

    /// Lower the sections to Typst source and assets without exporting.
    pub fn build(&self) -> ComposedDocument {
        Composer::with_options(self.options.clone()).build(self.sections.clone())
    }

    /// Number of parsed sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The parsed sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
