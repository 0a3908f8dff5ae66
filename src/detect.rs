//! Source format detection and output sniffing.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information of a PDF source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Whether the file declares itself linearized (fast web view)
    pub linearized: bool,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// ZIP local file header, the container of every DOCX package.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// The linearization dictionary must appear within the first 1024 bytes.
const LINEARIZED_WINDOW: usize = 1024;

/// Detect the PDF header of a file on disk.
///
/// # Example
/// ```no_run
/// use pdfreflow::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let mut head = Vec::with_capacity(LINEARIZED_WINDOW);
    File::open(path)?
        .take(LINEARIZED_WINDOW as u64)
        .read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect the PDF header from the leading bytes of a source.
///
/// Returns [`Error::UnknownFormat`] when the bytes do not start with
/// `%PDF-x.y` and [`Error::UnsupportedVersion`] for a malformed version.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    let window = &data[..data.len().min(LINEARIZED_WINDOW)];
    let linearized = window.windows(11).any(|w| w == b"/Linearized");

    Ok(PdfFormat {
        version,
        linearized,
    })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a readable PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check if bytes look like a DOCX package (a ZIP container).
pub fn is_docx_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}
