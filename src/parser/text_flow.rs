//! Synthetic geometry for plain page text.
//!
//! When positioned fragments are unusable, the plain text of a page can still
//! be laid out on a monospace grid and fed through the same layout engine.
//! Leading spaces become indentation and runs of spaces inside a line are
//! kept, so column gaps still read as cell delimiters.

use crate::model::PositionedFragment;

use super::source::{PageText, SourcePage};

const MARGIN: f32 = 72.0;
const CHAR_WIDTH: f32 = 6.0;
const LINE_HEIGHT: f32 = 14.0;
const FONT_SIZE: f32 = 12.0;
const TAB_WIDTH: usize = 4;

/// Lay out plain page text as one fragment per non-blank line.
pub fn synthesize_page(page: &PageText) -> SourcePage {
    let mut fragments = Vec::new();
    let mut y = page.height - MARGIN;

    for raw in page.text.lines() {
        let line = raw.replace('\t', &" ".repeat(TAB_WIDTH));
        let body = line.trim_start();
        if !body.trim().is_empty() {
            let leading = line.chars().count() - body.chars().count();
            let text = body.trim_end();
            fragments.push(PositionedFragment::new(
                text,
                MARGIN + leading as f32 * CHAR_WIDTH,
                y,
                text.chars().count() as f32 * CHAR_WIDTH,
                FONT_SIZE,
            ));
        }
        y -= LINE_HEIGHT;
    }

    SourcePage::new(page.number, page.width, page.height).with_fragments(fragments)
}
