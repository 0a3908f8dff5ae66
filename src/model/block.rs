//! Structural block nodes.

use serde::{Deserialize, Serialize};

use super::Alignment;

/// A typed node in the structural intermediate representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        alignment: Alignment,
    },
    Paragraph {
        text: String,
        alignment: Alignment,
        /// Indentation in layout units
        indent: u32,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
    },
    Bullet {
        /// Item text with the marker stripped
        text: String,
        indent: u32,
        #[serde(default)]
        bold: bool,
    },
    /// A table row candidate awaiting grouping.
    TableRow(TableRow),
    Table(Table),
    Image(ImageBlock),
    PageBreak,
}

impl Block {
    /// Create a left-aligned, unindented paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            alignment: Alignment::Left,
            indent: 0,
            bold: false,
            italic: false,
        }
    }

    /// Whether the block puts visible content into the target document.
    pub fn is_content(&self) -> bool {
        !matches!(self, Block::PageBreak)
    }

    /// Whether the block carries non-blank text.
    pub fn has_text(&self) -> bool {
        self.text().is_some_and(|t| !t.trim().is_empty())
    }

    /// Plain text carried by the block, if any.
    pub fn text(&self) -> Option<String> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text, .. } | Block::Bullet { text, .. } => {
                Some(text.clone())
            }
            Block::TableRow(row) => Some(row.cells.join(" | ")),
            Block::Table(table) => Some(
                table
                    .rows
                    .iter()
                    .map(|r| r.cells.join(" | "))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Block::Image(_) | Block::PageBreak => None,
        }
    }
}

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cell texts, left to right
    pub cells: Vec<String>,
    /// Block this row degrades to when it does not end up in a table
    #[serde(skip)]
    pub fallback: Option<Box<Block>>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            fallback: None,
        }
    }

    /// Attach the block to fall back to.
    pub fn with_fallback(mut self, block: Block) -> Self {
        self.fallback = Some(Box::new(block));
        self
    }

    /// Take the fallback block, or rebuild a paragraph from the cells.
    pub fn into_fallback(self) -> Block {
        match self.fallback {
            Some(block) => *block,
            None => Block::paragraph(self.cells.join(" ")),
        }
    }

    /// Whether at least one cell has visible text.
    pub fn has_content(&self) -> bool {
        self.cells.iter().any(|c| !c.trim().is_empty())
    }
}

/// A grid of rows with a uniform column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Maximum cell count over all rows
    pub column_count: usize,
    /// Whether the first row is a header row
    pub header: bool,
    /// Alignment used for header cells
    pub header_alignment: Alignment,
}

impl Table {
    /// Build a table, right-padding short rows with empty cells.
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        let column_count = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.cells.resize(column_count, String::new());
                row.fallback = None;
                row
            })
            .collect();
        Self {
            rows,
            column_count,
            header: false,
            header_alignment: Alignment::Center,
        }
    }

    /// Mark the first row as a header.
    pub fn with_header(mut self, header: bool, alignment: Alignment) -> Self {
        self.header = header;
        self.header_alignment = alignment;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Encoding of an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// An image placed in the document flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Encoded image bytes
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
    /// Width in source pixels
    pub width: u32,
    /// Height in source pixels
    pub height: u32,
    pub format: ImageFormat,
    /// Page the image was found on
    pub page: u32,
}

impl ImageBlock {
    /// Data size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
