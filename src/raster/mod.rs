//! Formula rasterization.
//!
//! Converts one LaTeX-flavored formula string into a tightly cropped,
//! transparent PNG. Rasterization is stateless and never raises: any
//! failure is logged and reported as `None` so callers fall back to the
//! literal formula text.

mod cache;

pub use cache::FormulaCache;

use std::path::Path;

use typst::diag::SourceDiagnostic;
use typst::layout::PagedDocument;

use crate::error::{Error, Result};
use crate::model::{RenderedFormula, TextColor};
use crate::world::PipelineWorld;

/// Fixed padding around the cropped formula, in points.
const CROP_PADDING_PT: f64 = 7.2;

/// Rendering parameters at the rasterizer boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Math font size in points.
    pub font_size: f64,

    /// Output resolution in dots per inch.
    pub dpi: f64,

    /// Ink color.
    pub color: TextColor,
}

impl RasterOptions {
    /// Create options with the standalone-rendering defaults.
    pub fn new() -> Self {
        Self {
            font_size: 12.0,
            dpi: 300.0,
            color: TextColor::Black,
        }
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the resolution in dots per inch.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the ink color.
    pub fn with_color(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Rasterize one formula to a PNG bitmap.
///
/// The formula may arrive with or without `$` delimiters. Returns `None`
/// on empty input, unconvertible notation, typesetting failure, or
/// encoding failure; every failure is logged, none is raised.
pub fn render_formula(formula: &str, options: &RasterOptions) -> Option<RenderedFormula> {
    let trimmed = formula.trim();
    if trimmed.is_empty() {
        return None;
    }
    log::debug!("rendering formula: {trimmed}");

    let latex = trimmed.trim_matches('$');
    let math = match mitex::convert_math(latex, None) {
        Ok(math) => math,
        Err(err) => {
            log::warn!("formula '{trimmed}' could not be converted: {err}");
            return None;
        }
    };

    let world = PipelineWorld::new(formula_page_source(&math, options));
    let document = match typst::compile::<PagedDocument>(&world).output {
        Ok(document) => document,
        Err(errors) => {
            log::warn!(
                "formula '{trimmed}' failed to typeset: {}",
                format_diagnostics(&errors)
            );
            return None;
        }
    };

    let Some(page) = document.pages.first() else {
        log::warn!("formula '{trimmed}' produced no pages");
        return None;
    };
    let pixmap = typst_render::render(page, (options.dpi / 72.0) as f32);
    let (width_px, height_px) = (pixmap.width(), pixmap.height());
    match pixmap.encode_png() {
        Ok(png) => Some(RenderedFormula {
            png,
            width_px,
            height_px,
        }),
        Err(err) => {
            log::warn!("formula '{trimmed}' could not be encoded: {err}");
            None
        }
    }
}

/// Rasterize one formula and write the PNG to a file.
///
/// Unlike [`render_formula`], this surfaces failure as an error since the
/// caller asked for a concrete file.
pub fn render_formula_png(
    formula: &str,
    options: &RasterOptions,
    path: impl AsRef<Path>,
) -> Result<()> {
    match render_formula(formula, options) {
        Some(rendered) => {
            std::fs::write(path, &rendered.png)?;
            Ok(())
        }
        None => Err(Error::Raster(formula.trim().to_string())),
    }
}

/// A minimal auto-sized page holding nothing but the math block.
///
/// `width: auto, height: auto` makes the page hug the content, which
/// together with the margin realizes the tight crop with fixed padding;
/// `fill: none` keeps the background transparent.
fn formula_page_source(math: &str, options: &RasterOptions) -> String {
    format!(
        "#set page(width: auto, height: auto, margin: {CROP_PADDING_PT}pt, fill: none)\n\
         #set text(size: {}pt, fill: {})\n\
         $ {} $\n",
        options.font_size,
        options.color.to_typst(),
        math
    )
}

/// Flatten compile diagnostics into one log line.
pub(crate) fn format_diagnostics(errors: &[SourceDiagnostic]) -> String {
    errors
        .iter()
        .map(|diagnostic| diagnostic.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
