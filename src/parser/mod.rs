//! PDF parsing module.
//!
//! Reads a PDF through a [`PdfBackend`] and yields positioned text
//! fragments, placed images and plain page text.

mod backend;
mod content;
mod fonts;
mod images;
mod options;
mod pdf_parser;
mod source;
mod text_flow;

pub use backend::{
    BackendFontInfo, ContentOp, LopdfBackend, PageBox, PageId, PdfBackend, PdfValue,
};
pub use content::{ContentInterpreter, ImageAnchor, InterpretedPage};
pub use fonts::{FontMetrics, FontStyle, WidthEntry};
pub use images::{encode_png, ColorSpace, ImagePayload, ImageXObject};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
pub use source::{
    DocumentSource, FragmentSource, ImageSource, PageText, PlacedImage, PlainTextSource,
    SourcePage,
};
pub use text_flow::synthesize_page;
