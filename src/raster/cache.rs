//! Caller-level memoization for rasterized formulas.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{RenderedFormula, TextColor};

use super::{render_formula, RasterOptions};

/// Cache key: raw formula text plus the rendering parameters.
///
/// Float parameters are keyed by their bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    formula: String,
    font_size_bits: u64,
    dpi_bits: u64,
    color: TextColor,
}

impl CacheKey {
    fn new(formula: &str, options: &RasterOptions) -> Self {
        Self {
            formula: formula.to_string(),
            font_size_bits: options.font_size.to_bits(),
            dpi_bits: options.dpi.to_bits(),
            color: options.color,
        }
    }
}

/// Memoizes rendered formulas across repeated generation passes.
///
/// Failures are remembered too: rendering is deterministic, so a formula
/// that failed once cannot succeed later in the same process, and
/// re-rendering it would only repeat the same warning.
#[derive(Debug, Default)]
pub struct FormulaCache {
    entries: HashMap<CacheKey, Option<Arc<RenderedFormula>>>,
}

impl FormulaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a formula through the cache.
    pub fn render(
        &mut self,
        formula: &str,
        options: &RasterOptions,
    ) -> Option<Arc<RenderedFormula>> {
        self.entries
            .entry(CacheKey::new(formula, options))
            .or_insert_with(|| render_formula(formula, options).map(Arc::new))
            .clone()
    }

    /// Number of memoized formulas, including failures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all memoized entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
