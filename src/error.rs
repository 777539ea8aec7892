//! Error types for files-preview.

use thiserror::Error;

/// Result type for files-preview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving or converting a preview.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller passed a source or container of the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A URL fetch failed or returned a non-success status.
    #[error("{0}")]
    Network(String),

    /// Error occurred while parsing DOCX file.
    #[error("Failed to parse DOCX file: {0}")]
    DocxParse(String),

    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A renderer could not produce its output.
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Media file not found in DOCX archive.
    #[error("Media not found: {0}")]
    MediaNotFound(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(format!("Network error while fetching: {}", err))
    }
}
