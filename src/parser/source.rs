//! Capabilities the layout engine consumes from a source document.

use crate::error::Result;
use crate::model::{ImageBlock, Metadata, PositionedFragment};
use crate::report::Warning;

/// One page of positioned text.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    /// 1-indexed page number
    pub number: u32,
    pub width: f32,
    pub height: f32,
    /// Fragments in any order; y grows upwards from the page bottom
    pub fragments: Vec<PositionedFragment>,
    /// Images placed on this page
    pub images: Vec<PlacedImage>,
    /// Degradations recovered while reading the page
    pub warnings: Vec<Warning>,
}

impl SourcePage {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<PositionedFragment>) -> Self {
        self.fragments = fragments;
        self
    }
}

/// An image together with where it sits on its page.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    /// Y of the image's top edge in page space, when it was painted
    pub top: Option<f32>,
    pub block: ImageBlock,
}

/// Plain text of one page, without geometry.
#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

/// Yields positioned fragments per page.
///
/// A source that cannot be read must return an error rather than
/// empty pages.
pub trait FragmentSource: Sync {
    /// Pages in ascending page order.
    fn fragment_pages(&self) -> Result<Vec<SourcePage>>;

    /// Document metadata.
    fn metadata(&self) -> Metadata;
}

/// Yields image payloads independently of text.
pub trait ImageSource {
    fn images(&self) -> Result<Vec<ImageBlock>>;
}

/// Yields page text without positions.
pub trait PlainTextSource {
    fn text_pages(&self) -> Result<Vec<PageText>>;
}

/// Everything a conversion strategy may draw on.
pub trait DocumentSource: FragmentSource + ImageSource + PlainTextSource {}

impl<T: FragmentSource + ImageSource + PlainTextSource> DocumentSource for T {}
