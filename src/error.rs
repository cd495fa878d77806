//! Error types for the formulario library.

use std::io;
use thiserror::Error;

/// Result type alias for formulario operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during formula-sheet generation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Neither input grammar produced any sections.
    #[error("Could not interpret the input data")]
    UnreadableInput,

    /// The Typst layout engine rejected the generated document source.
    #[error("Document compilation failed: {0}")]
    Compile(String),

    /// The compiled document could not be exported as PDF.
    #[error("PDF export failed: {0}")]
    PdfExport(String),

    /// A formula could not be rasterized to an image file.
    #[error("Formula rasterization failed: {0}")]
    Raster(String),

    /// A color identifier was not recognized.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
