//! Document-level types.

use super::{Block, ImageBlock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reconstructed document: source metadata plus the ordered block sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Source document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Blocks in reading order, pages separated by [`Block::PageBreak`]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks.
    pub fn with_blocks(metadata: Metadata, blocks: Vec<Block>) -> Self {
        Self { metadata, blocks }
    }

    /// Whether any block carries visible content.
    pub fn has_content(&self) -> bool {
        self.blocks.iter().any(Block::is_content)
    }

    /// Whether any block carries text. Images alone do not count: a scanned
    /// page yields no recoverable structure.
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(Block::has_text)
    }

    /// Number of pages represented (page breaks + 1).
    pub fn page_span(&self) -> usize {
        if self.blocks.is_empty() {
            return 0;
        }
        1 + self
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    /// Iterate over image blocks.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Image(img) => Some(img),
            _ => None,
        })
    }

    /// Plain text of every text-bearing block, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Source document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// PDF producer
    pub producer: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages in the source
    pub page_count: u32,

    /// Whether the source is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}
