//! Target-document constructs produced by the renderer.
//!
//! Constructs are format-neutral: sizes are in half-points, distances in
//! layout units and image extents in pixels. A [`TargetSink`] turns them
//! into bytes.
//!
//! [`TargetSink`]: super::TargetSink

use crate::model::Alignment;

/// EMU per pixel at 96 DPI.
pub const EMU_PER_PIXEL: u32 = 9525;

/// One element of the rendered output, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    Paragraph(StyledParagraph),
    Table(StyledTable),
    Image(EmbeddedImage),
    PageBreak,
}

/// A paragraph of styled runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledParagraph {
    pub runs: Vec<StyledRun>,
    pub alignment: Alignment,
    /// Left indentation in layout units
    pub indent: u32,
    /// Hanging indentation in layout units
    pub hanging: u32,
    /// Spacing before, in layout units
    pub spacing_before: u32,
    /// Spacing after, in layout units
    pub spacing_after: u32,
    /// Named paragraph style (e.g. `Heading1`)
    pub style: Option<String>,
}

impl StyledParagraph {
    /// A paragraph with a single run.
    pub fn single(run: StyledRun) -> Self {
        Self {
            runs: vec![run],
            ..Default::default()
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn indented(mut self, indent: u32, hanging: u32) -> Self {
        self.indent = indent;
        self.hanging = hanging;
        self
    }

    pub fn styled(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Size in half-points
    pub size: usize,
    /// Hex RGB color without `#`
    pub color: Option<String>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            size,
            ..Default::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A bordered grid.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledTable {
    pub rows: Vec<Vec<StyledCell>>,
    pub column_count: usize,
    /// Body text size in half-points
    pub size: usize,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledCell {
    pub text: String,
    pub bold: bool,
    pub alignment: Alignment,
}

/// An image ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    /// PNG bytes, alpha flattened
    pub png: Vec<u8>,
    /// Display width in pixels
    pub width: u32,
    /// Display height in pixels
    pub height: u32,
}

impl EmbeddedImage {
    /// Display extent in EMU (width, height).
    pub fn extent_emu(&self) -> (u32, u32) {
        (self.width * EMU_PER_PIXEL, self.height * EMU_PER_PIXEL)
    }
}
