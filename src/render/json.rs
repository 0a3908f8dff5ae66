//! JSON dump of the block sequence for inspection.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Block, Metadata};

    fn sample() -> Document {
        let mut metadata = Metadata::with_version("1.7");
        metadata.title = Some("Test".to_string());
        Document::with_blocks(
            metadata,
            vec![
                Block::Heading {
                    level: 1,
                    text: "Intro".into(),
                    alignment: Alignment::Center,
                },
                Block::paragraph("Hello"),
                Block::PageBreak,
            ],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Intro"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_parses_back() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        let doc: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.blocks.len(), 3);
        assert!(matches!(doc.blocks[2], Block::PageBreak));
    }
}
