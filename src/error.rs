//! Error types for pdfreflow.

use std::io;
use thiserror::Error;

/// Result type alias for pdfreflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconstructing a document.
///
/// Only source-level failures abort a reconstruction. Conditions the engine
/// recovers from locally (empty documents, images that cannot be embedded,
/// table runs that cannot be normalized) are reported as
/// [`Warning`](crate::report::Warning)s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The source is unreadable or corrupt.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// The source exceeds a page or fragment budget set by the host.
    #[error("{what} budget exceeded: {actual} > {limit}")]
    BudgetExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// An image could not be encoded into the target document.
    #[error("Image embedding error: {0}")]
    ImageEmbed(String),

    /// A table row run could not be normalized.
    #[error("Table parse error: {0}")]
    TableParse(String),

    /// The target document could not be produced.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A layout profile is invalid.
    #[error("Invalid layout profile: {0}")]
    Profile(String),
}

impl Error {
    /// Whether this error means the source itself could not be read.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::Extraction(_)
                | Error::Encrypted
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Extraction(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageEmbed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::BudgetExceeded {
            what: "page",
            limit: 10,
            actual: 12,
        };
        assert_eq!(err.to_string(), "page budget exceeded: 12 > 10");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_extraction_failure_classification() {
        assert!(Error::Extraction("bad xref".into()).is_extraction_failure());
        assert!(Error::Encrypted.is_extraction_failure());
        assert!(!Error::TableParse("ragged".into()).is_extraction_failure());
        assert!(!Error::ImageEmbed("bad png".into()).is_extraction_failure());
    }
}
