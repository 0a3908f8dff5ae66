//! Document model assembly: classified lines to blocks.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Block, ClassifiedLine, LineRole, TableRow};
use crate::parser::PlacedImage;

use super::table::row_cells;
use super::LayoutProfile;

/// Classified lines of one page, top to bottom, with its placed images.
#[derive(Debug, Clone)]
pub struct ClassifiedPage {
    pub number: u32,
    pub lines: Vec<ClassifiedLine>,
    /// Images ordered top of page first
    pub images: Vec<PlacedImage>,
}

fn numbered_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s*").unwrap())
}

/// Build the block sequence for all pages, in page order.
///
/// Table row candidates become [`Block::TableRow`]s carrying the block
/// they degrade to; grouping them into tables is a separate pass.
pub fn assemble(pages: Vec<ClassifiedPage>, profile: &LayoutProfile) -> Vec<Block> {
    let multi_page = pages.len() > 1;
    let mut blocks = Vec::new();

    for (i, page) in pages.into_iter().enumerate() {
        if multi_page && i > 0 {
            blocks.push(Block::PageBreak);
        }

        let mut images = page.images.into_iter().peekable();
        for line in page.lines {
            while let Some(image) = images.next_if(|img| img.top.is_some_and(|top| top > line.line.y)) {
                blocks.push(Block::Image(image.block));
            }
            if let Some(block) = line_block(line, profile) {
                blocks.push(block);
            }
        }
        // images below the last line, or never anchored
        blocks.extend(images.map(|img| Block::Image(img.block)));
    }

    log::debug!("assembled {} blocks", blocks.len());
    blocks
}

/// Map one classified line to its block; `None` for lines without text.
pub fn line_block(line: ClassifiedLine, profile: &LayoutProfile) -> Option<Block> {
    let text = line.text().to_string();
    if text.is_empty() {
        return None;
    }

    let block = match line.role {
        LineRole::Heading => heading_or_paragraph(&line, text),
        LineRole::Bullet => {
            let item = strip_marker(&text, profile);
            if item.is_empty() {
                return None;
            }
            Block::Bullet {
                text: item.to_string(),
                indent: line.indent,
                bold: line.bold,
            }
        }
        LineRole::TableRow => {
            let fallback = heading_or_paragraph(&line, text);
            match row_cells(&line, profile) {
                Some(cells) => Block::TableRow(TableRow::new(cells).with_fallback(fallback)),
                None => fallback,
            }
        }
        LineRole::Paragraph => paragraph(&line, text),
    };
    Some(block)
}

fn heading_or_paragraph(line: &ClassifiedLine, text: String) -> Block {
    match line.heading_level {
        Some(level) => Block::Heading {
            level,
            text,
            alignment: line.alignment,
        },
        None => paragraph(line, text),
    }
}

fn paragraph(line: &ClassifiedLine, text: String) -> Block {
    Block::Paragraph {
        text,
        alignment: line.alignment,
        indent: line.indent,
        bold: line.bold,
        italic: line.italic,
    }
}

/// Remove a leading bullet glyph, dash or `1.` / `1)` numbering.
pub fn strip_marker<'t>(text: &'t str, profile: &LayoutProfile) -> &'t str {
    let text = text.trim_start();
    let mut chars = text.chars();
    if let Some(c) = chars.next() {
        if profile.is_bullet_glyph(c) || c == '-' {
            return chars.as_str().trim_start();
        }
    }
    match numbered_marker_regex().find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, HeadingCue, ImageBlock, ImageFormat, Line, PositionedFragment};

    fn classified(text: &str, y: f32, role: LineRole) -> ClassifiedLine {
        ClassifiedLine {
            line: Line::from_fragments(vec![PositionedFragment::new(text, 72.0, y, 100.0, 11.0)])
                .unwrap(),
            page: 1,
            index: 0,
            alignment: Alignment::Left,
            indent: if role == LineRole::Bullet { 720 } else { 0 },
            role,
            heading_level: (role == LineRole::Heading).then_some(2),
            heading_cue: (role == LineRole::Heading).then_some(HeadingCue::FontSize),
            bold: role == LineRole::Heading,
            italic: false,
        }
    }

    fn image(top: Option<f32>, page: u32) -> PlacedImage {
        PlacedImage {
            top,
            block: ImageBlock {
                data: vec![1, 2, 3],
                width: 10,
                height: 10,
                format: ImageFormat::Png,
                page,
            },
        }
    }

    fn page(number: u32, lines: Vec<ClassifiedLine>, images: Vec<PlacedImage>) -> ClassifiedPage {
        ClassifiedPage {
            number,
            lines,
            images,
        }
    }

    #[test]
    fn test_roles_map_to_blocks() {
        let blocks = assemble(
            vec![page(
                1,
                vec![
                    classified("Overview", 700.0, LineRole::Heading),
                    classified("• first point", 680.0, LineRole::Bullet),
                    classified("Body text.", 660.0, LineRole::Paragraph),
                ],
                Vec::new(),
            )],
            &LayoutProfile::default(),
        );
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Heading { level: 2, text, .. } if text == "Overview"));
        assert!(matches!(&blocks[1], Block::Bullet { text, indent: 720, .. } if text == "first point"));
        assert!(matches!(&blocks[2], Block::Paragraph { text, .. } if text == "Body text."));
    }

    #[test]
    fn test_page_breaks_between_pages_only() {
        let blocks = assemble(
            vec![
                page(1, vec![classified("one", 700.0, LineRole::Paragraph)], Vec::new()),
                page(2, vec![classified("two", 700.0, LineRole::Paragraph)], Vec::new()),
            ],
            &LayoutProfile::default(),
        );
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], Block::PageBreak);

        let single = assemble(
            vec![page(1, vec![classified("one", 700.0, LineRole::Paragraph)], Vec::new())],
            &LayoutProfile::default(),
        );
        assert!(!single.contains(&Block::PageBreak));
    }

    #[test]
    fn test_images_merge_by_position() {
        let blocks = assemble(
            vec![page(
                1,
                vec![
                    classified("above", 700.0, LineRole::Paragraph),
                    classified("below", 300.0, LineRole::Paragraph),
                ],
                vec![image(Some(500.0), 1), image(None, 1)],
            )],
            &LayoutProfile::default(),
        );
        let kinds: Vec<&str> = blocks
            .iter()
            .map(|b| match b {
                Block::Image(_) => "image",
                _ => "text",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "image", "text", "image"]);
    }

    #[test]
    fn test_table_row_keeps_fallback() {
        let block = line_block(
            classified("a | b", 700.0, LineRole::TableRow),
            &LayoutProfile::default(),
        )
        .unwrap();
        let Block::TableRow(row) = block else {
            panic!("expected table row");
        };
        assert_eq!(row.cells, vec!["a", "b"]);
        assert!(matches!(row.into_fallback(), Block::Paragraph { text, .. } if text == "a | b"));
    }

    #[test]
    fn test_strip_marker() {
        let profile = LayoutProfile::default();
        assert_eq!(strip_marker("• item", &profile), "item");
        assert_eq!(strip_marker("- dash item", &profile), "dash item");
        assert_eq!(strip_marker("12) twelfth", &profile), "twelfth");
        assert_eq!(strip_marker("3. third", &profile), "third");
        assert_eq!(strip_marker("plain", &profile), "plain");
    }

    #[test]
    fn test_empty_bullet_is_skipped() {
        let mut line = classified("x", 700.0, LineRole::Bullet);
        line.line.full_text = "•".to_string();
        assert!(line_block(line, &LayoutProfile::default()).is_none());
    }
}
