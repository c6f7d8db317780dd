//! Error types for pagefit library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pagefit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during analysis, building or validation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analyzer or builder configuration is malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layout node referenced by a fix does not exist.
    #[error("Unknown layout node: {0}")]
    UnknownNode(String),

    /// A layout node is detached from the document and cannot be mutated.
    #[error("Layout node is detached: {0}")]
    DetachedNode(String),

    /// A layout snapshot could not be decoded.
    #[error("Invalid layout snapshot: {0}")]
    Snapshot(String),

    /// The document template is missing.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// A section fragment is missing.
    #[error("Section not found: {}", .0.display())]
    SectionNotFound(PathBuf),

    /// Malformed page range.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (JSON, HTML, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DetachedNode("page-4".to_string());
        assert_eq!(err.to_string(), "Layout node is detached: page-4");

        let err = Error::TemplateNotFound(PathBuf::from("src/templates/document-template.html"));
        assert_eq!(
            err.to_string(),
            "Template not found: src/templates/document-template.html"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
