//! Data model for parsed formula sheets.
//!
//! This module defines the intermediate representation that bridges
//! input parsing and document composition: ordered sections of
//! field-keyed rows, plus the rasterizer's bitmap output type.

mod cell;
mod section;

pub use cell::{RenderedFormula, TextColor};
pub use section::{Row, Section, TableData};
