//! Composition options and configuration.

use crate::model::TextColor;
use crate::raster::RasterOptions;

/// Options controlling page layout and formula rendering.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Base font size for table cells, in points
    pub font_size: f64,

    /// Font size used when rasterizing formulas, in points
    pub formula_font_size: f64,

    /// Rasterization resolution for formulas, in dots per inch
    pub formula_dpi: f64,

    /// Ink color for rasterized formulas
    pub formula_color: TextColor,

    /// Display height of formula images inside cells, in points
    pub display_height: f64,

    /// Widths of the four output columns, in points
    pub column_widths: [f64; 4],

    /// Horizontal page margin, in points
    pub margin_x: f64,

    /// Vertical page margin, in points
    pub margin_y: f64,

    /// Gap between a section heading and its table, in points
    pub title_spacing: f64,

    /// Gap after each section table, in points
    pub section_spacing: f64,
}

impl ComposeOptions {
    /// Create new compose options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base cell font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the formula rasterization font size.
    pub fn with_formula_font_size(mut self, size: f64) -> Self {
        self.formula_font_size = size;
        self
    }

    /// Set the formula rasterization resolution.
    pub fn with_formula_dpi(mut self, dpi: f64) -> Self {
        self.formula_dpi = dpi;
        self
    }

    /// Set the formula ink color.
    pub fn with_formula_color(mut self, color: TextColor) -> Self {
        self.formula_color = color;
        self
    }

    /// Set the display height of formula images.
    pub fn with_display_height(mut self, height: f64) -> Self {
        self.display_height = height;
        self
    }

    /// Set the four column widths.
    pub fn with_column_widths(mut self, widths: [f64; 4]) -> Self {
        self.column_widths = widths;
        self
    }

    /// Raster options for the formula column derived from these settings.
    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions::new()
            .with_font_size(self.formula_font_size)
            .with_dpi(self.formula_dpi)
            .with_color(self.formula_color)
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            formula_font_size: 14.0,
            formula_dpi: 200.0,
            formula_color: TextColor::Black,
            display_height: 40.0,
            column_widths: [108.0, 180.0, 288.0, 108.0],
            margin_x: 54.0,
            margin_y: 72.0,
            title_spacing: 12.0,
            section_spacing: 24.0,
        }
    }
}
