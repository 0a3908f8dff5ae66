//! Rendering of the block sequence into target documents.

mod construct;
mod docx;
mod image;
mod json;
mod options;
mod renderer;

pub use construct::{
    Construct, EmbeddedImage, StyledCell, StyledParagraph, StyledRun, StyledTable, EMU_PER_PIXEL,
};
pub use docx::{write_constructs, DocxSink, TargetSink};
pub use image::{flatten_onto_white, prepare_image, scale_to_fit};
pub use json::{to_json, JsonFormat};
pub use options::{Banner, Margins, RenderOptions, PIXELS_PER_INCH, TWIPS_PER_INCH};
pub use renderer::{Renderer, EMPTY_PLACEHOLDER};

use crate::error::Result;
use crate::layout::LayoutProfile;
use crate::model::Document;
use crate::report::ReconstructionReport;

/// Render a document and serialize it as DOCX.
pub fn to_docx(
    document: &Document,
    options: &RenderOptions,
    profile: &LayoutProfile,
    report: &mut ReconstructionReport,
) -> Result<Vec<u8>> {
    let constructs = Renderer::new(options, profile).render(document, report);
    write_constructs(DocxSink::new(options), &constructs)
}
