//! Unified error types for the redline library.
use crate::ooxml::docx::revision::RevisionError;
use thiserror::Error;

/// Main error type for redline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Part or member not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Revision processing failed
    #[error(transparent)]
    Revision(RevisionError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for redline operations.
pub type Result<T> = std::result::Result<T, Error>;
