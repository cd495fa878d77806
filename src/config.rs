//! Generator settings loaded from an optional JSON file.
//!
//! Settings mirror the tunable parts of [`ComposeOptions`]. A missing file
//! means defaults; a file that exists but cannot be parsed is an error so
//! typos do not silently fall back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compose::ComposeOptions;
use crate::error::{Error, Result};
use crate::model::TextColor;

/// On-disk generator settings. Absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Font size used when rasterizing formulas, in points
    pub formula_font_size: f64,

    /// Rasterization resolution for formulas, in dots per inch
    pub formula_dpi: f64,

    /// Ink color for rasterized formulas
    pub formula_color: TextColor,

    /// Display height of formula images inside cells, in points
    pub display_height: f64,
}

impl GeneratorConfig {
    /// Read settings from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
    }

    /// Fold these settings into existing compose options.
    pub fn apply(&self, options: ComposeOptions) -> ComposeOptions {
        options
            .with_formula_font_size(self.formula_font_size)
            .with_formula_dpi(self.formula_dpi)
            .with_formula_color(self.formula_color)
            .with_display_height(self.display_height)
    }

    /// Compose options built from these settings alone.
    pub fn compose_options(&self) -> ComposeOptions {
        self.apply(ComposeOptions::default())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let options = ComposeOptions::default();
        Self {
            formula_font_size: options.formula_font_size,
            formula_dpi: options.formula_dpi,
            formula_color: options.formula_color,
            display_height: options.display_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = GeneratorConfig::load_or_default("/nonexistent/config.json")
            .expect("missing file should not be an error");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "formula_dpi": 120.0 }"#).expect("write config");

        let config = GeneratorConfig::load_or_default(&path).expect("load config");
        assert_eq!(config.formula_dpi, 120.0);
        assert_eq!(config.formula_font_size, 14.0);
        assert_eq!(config.display_height, 40.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write config");

        let result = GeneratorConfig::load_or_default(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_color_value_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r##"{ "formula_color": "#€€" }"##).expect("write config");

        let result = GeneratorConfig::load_or_default(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_color_round_trips_through_json() {
        let json = r##"{ "formula_color": "#336699" }"##;
        let config: GeneratorConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.formula_color, TextColor::Rgb(0x33, 0x66, 0x99));

        let back = serde_json::to_string(&config).expect("serialize");
        assert!(back.contains("#336699"));
    }

    #[test]
    fn test_apply_overrides_compose_options() {
        let config = GeneratorConfig {
            formula_font_size: 18.0,
            formula_dpi: 96.0,
            formula_color: TextColor::White,
            display_height: 30.0,
        };
        let options = config.apply(ComposeOptions::default().with_font_size(11.0));
        assert_eq!(options.font_size, 11.0);
        assert_eq!(options.formula_font_size, 18.0);
        assert_eq!(options.formula_dpi, 96.0);
        assert_eq!(options.display_height, 30.0);
    }
}
