//! Structure classification of single lines.
//!
//! Each line gets an alignment, an indentation, a role and emphasis from its
//! geometry and text, judged against the whole-document statistics.

use regex::Regex;

use crate::model::{Alignment, ClassifiedLine, HeadingCue, Line, LineRole};

use super::{DocumentStats, LayoutProfile};

/// Classifies lines against a profile and document statistics.
pub struct Classifier<'a> {
    profile: &'a LayoutProfile,
    stats: &'a DocumentStats,
    numbered_regex: Regex,
}

impl<'a> Classifier<'a> {
    pub fn new(profile: &'a LayoutProfile, stats: &'a DocumentStats) -> Self {
        Self {
            profile,
            stats,
            numbered_regex: Regex::new(r"^\d+[.)]\s").unwrap(),
        }
    }

    /// Classify one line of a page.
    pub fn classify(&self, line: Line, page: u32, index: usize, page_width: f32) -> ClassifiedLine {
        let alignment = self.alignment(&line, page_width);
        let bullet = self.is_bullet(&line.full_text);
        let heading_cue = if bullet { None } else { self.heading_cue(&line) };

        let (role, heading_level) = match (bullet, heading_cue) {
            (true, _) => (LineRole::Bullet, None),
            (false, Some(_)) => (LineRole::Heading, Some(self.heading_level(line.max_font_size))),
            (false, None) => (LineRole::Paragraph, None),
        };

        let mut indent = self.stats.snap_indent(
            self.profile.to_units(line.left_edge - self.stats.left_margin),
            self.profile.indent_snap,
        );
        if bullet {
            indent = indent.max(self.profile.min_bullet_indent);
        }

        ClassifiedLine {
            bold: line.all_bold || heading_cue.is_some(),
            italic: line.all_italic(),
            line,
            page,
            index,
            alignment,
            indent,
            role,
            heading_level,
            heading_cue,
        }
    }

    /// Alignment rules, first match wins: center, right, justify, left.
    pub fn alignment(&self, line: &Line, page_width: f32) -> Alignment {
        let p = self.profile;
        let left_margin = self.stats.left_margin;
        let right_margin = self.stats.right_margin(page_width);

        if (line.center_x - page_width / 2.0).abs() < p.center_ratio * page_width
            && line.left_edge > left_margin + p.center_margin_offset
        {
            Alignment::Center
        } else if line.right_edge > right_margin - p.right_edge_slack
            && line.left_edge > p.right_min_left_ratio * page_width
        {
            Alignment::Right
        } else if line.text_len() > p.justify_min_len
            && line.right_edge > right_margin - p.justify_edge_slack
            && line.left_edge <= left_margin + p.justify_left_slack
        {
            Alignment::Justify
        } else {
            Alignment::Left
        }
    }

    /// A bullet glyph followed by whitespace, or `1.` / `1)` numbering.
    pub fn is_bullet(&self, text: &str) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), Some(next)) if self.profile.is_bullet_glyph(glyph) && next.is_whitespace() => {
                true
            }
            _ => self.numbered_regex.is_match(text),
        }
    }

    fn heading_cue(&self, line: &Line) -> Option<HeadingCue> {
        let p = self.profile;
        let len = line.text_len();
        if line.max_font_size > p.heading_size {
            Some(HeadingCue::FontSize)
        } else if line.all_bold && len < p.bold_caps_max_len && is_caps(&line.full_text) {
            Some(HeadingCue::BoldCaps)
        } else if len < p.caps_max_len && is_caps(&line.full_text) {
            Some(HeadingCue::Caps)
        } else {
            None
        }
    }

    fn heading_level(&self, font_size: f32) -> u8 {
        if font_size > self.profile.title_size {
            1
        } else if font_size > self.profile.heading_size {
            2
        } else {
            3
        }
    }
}

/// Whether the trimmed text equals its upper-cased form and has a letter.
pub fn is_caps(text: &str) -> bool {
    let text = text.trim();
    text.chars().any(char::is_alphabetic) && text.to_uppercase() == text
}
