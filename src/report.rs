//! Reconstruction report: counts and recovered degradations.

use serde::{Deserialize, Serialize};

use crate::model::Block;

/// A condition the engine recovered from without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// No usable fragments; a placeholder was emitted
    EmptyDocument,
    /// An image could not be embedded; a placeholder was emitted
    ImageEmbed,
    /// A full-page capture was dropped
    ImageDropped,
    /// A table run was degraded to its original blocks
    TableParse,
    /// A page could not be read and was skipped
    PageSkipped,
    /// An image payload could not be decoded from the source
    ImageSkipped,
}

/// A recorded degradation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub message: String,
}

/// Statistics and warnings collected during a reconstruction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconstructionReport {
    /// Name of the strategy that produced the document
    pub strategy: String,
    pub page_count: u32,
    pub fragment_count: usize,
    pub line_count: usize,
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub bullet_count: usize,
    pub table_count: usize,
    pub image_count: usize,
    pub warnings: Vec<Warning>,
}

impl ReconstructionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, kind: WarningKind, page: Option<u32>, message: impl Into<String>) {
        let message = message.into();
        match page {
            Some(p) => log::warn!("page {}: {}", p, message),
            None => log::warn!("{}", message),
        }
        self.warnings.push(Warning {
            kind,
            page,
            message,
        });
    }

    /// Count the block kinds of an assembled sequence.
    pub fn record_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Heading { .. } => self.heading_count += 1,
                Block::Paragraph { .. } => self.paragraph_count += 1,
                Block::Bullet { .. } => self.bullet_count += 1,
                Block::Table(_) => self.table_count += 1,
                Block::Image(_) => self.image_count += 1,
                Block::TableRow(_) | Block::PageBreak => {}
            }
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of warnings of a given kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Table, TableRow};

    #[test]
    fn test_record_blocks() {
        let mut report = ReconstructionReport::new();
        report.record_blocks(&[
            Block::Heading {
                level: 2,
                text: "A".into(),
                alignment: Alignment::Left,
            },
            Block::paragraph("b"),
            Block::PageBreak,
            Block::Table(Table::from_rows(vec![
                TableRow::new(vec!["x".into()]),
                TableRow::new(vec!["y".into()]),
            ])),
        ]);
        assert_eq!(report.heading_count, 1);
        assert_eq!(report.paragraph_count, 1);
        assert_eq!(report.table_count, 1);
    }

    #[test]
    fn test_warn_counts_by_kind() {
        let mut report = ReconstructionReport::new();
        report.warn(WarningKind::ImageDropped, Some(2), "full-page capture");
        report.warn(WarningKind::TableParse, None, "ragged run");
        assert!(report.has_warnings());
        assert_eq!(report.count(WarningKind::ImageDropped), 1);
        assert_eq!(report.count(WarningKind::EmptyDocument), 0);
    }
}
