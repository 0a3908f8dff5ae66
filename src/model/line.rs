//! Lines and their classification.

use serde::{Deserialize, Serialize};

use super::PositionedFragment;

/// Fragments judged to lie on the same visual text row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Baseline of the leftmost fragment
    pub y: f32,
    /// Fragments ordered by ascending x
    pub fragments: Vec<PositionedFragment>,
    /// Space-joined fragment texts
    pub full_text: String,
    pub left_edge: f32,
    pub right_edge: f32,
    pub center_x: f32,
    pub max_font_size: f32,
    /// Whether every fragment is bold
    pub all_bold: bool,
}

impl Line {
    /// Build a line from the fragments of one bucket.
    ///
    /// Blank fragments are discarded; returns `None` when nothing is left.
    pub fn from_fragments(mut fragments: Vec<PositionedFragment>) -> Option<Self> {
        fragments.retain(|f| !f.is_blank());
        if fragments.is_empty() {
            return None;
        }
        fragments.sort_by(|a, b| a.x.total_cmp(&b.x));

        let full_text = fragments
            .iter()
            .map(|f| f.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let left_edge = fragments[0].x;
        let right_edge = fragments
            .iter()
            .map(PositionedFragment::right)
            .fold(f32::MIN, f32::max);
        let max_font_size = fragments.iter().map(|f| f.font_size).fold(0.0, f32::max);
        let all_bold = fragments.iter().all(|f| f.bold);

        Some(Self {
            y: fragments[0].y,
            full_text,
            left_edge,
            right_edge,
            center_x: (left_edge + right_edge) / 2.0,
            max_font_size,
            all_bold,
            fragments,
        })
    }

    /// Number of characters in the full text.
    pub fn text_len(&self) -> usize {
        self.full_text.chars().count()
    }

    /// Whether every fragment is italic.
    pub fn all_italic(&self) -> bool {
        self.fragments.iter().all(|f| f.italic)
    }

    /// Text with column gaps made visible.
    ///
    /// Fragments separated by at least `column_gap` points are joined with
    /// two spaces, so positioned table columns read like space-aligned text.
    pub fn column_text(&self, column_gap: f32) -> String {
        let mut text = String::with_capacity(self.full_text.len() + 8);
        let mut prev_right: Option<f32> = None;
        for frag in &self.fragments {
            if let Some(right) = prev_right {
                text.push_str(if frag.x - right >= column_gap { "  " } else { " " });
            }
            text.push_str(frag.text.trim());
            prev_right = Some(frag.right());
        }
        text
    }
}

/// Horizontal alignment of a line or paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Structural role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    Heading,
    Bullet,
    TableRow,
    #[default]
    Paragraph,
}

/// Which heading rule fired for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingCue {
    /// Font noticeably larger than body text
    FontSize,
    /// Short, bold, upper-case line
    BoldCaps,
    /// Short upper-case line
    Caps,
}

/// A line plus the structural decisions made about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub line: Line,
    /// Page number (1-indexed)
    pub page: u32,
    /// Position of the line on its page, top to bottom
    pub index: usize,
    pub alignment: Alignment,
    /// Indentation in layout units
    pub indent: u32,
    pub role: LineRole,
    /// Set exactly when `role` is [`LineRole::Heading`]
    pub heading_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_cue: Option<HeadingCue>,
    pub bold: bool,
    pub italic: bool,
}

impl ClassifiedLine {
    /// Trimmed text of the underlying line.
    pub fn text(&self) -> &str {
        self.line.full_text.trim()
    }

    pub fn is_heading(&self) -> bool {
        self.role == LineRole::Heading
    }

    pub fn is_bullet(&self) -> bool {
        self.role == LineRole::Bullet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, width: f32) -> PositionedFragment {
        PositionedFragment::new(text, x, 700.0, width, 12.0)
    }

    #[test]
    fn test_line_orders_fragments_by_x() {
        let line = Line::from_fragments(vec![frag("world", 110.0, 30.0), frag("Hello", 72.0, 30.0)])
            .unwrap();
        assert_eq!(line.full_text, "Hello world");
        assert_eq!(line.left_edge, 72.0);
        assert_eq!(line.right_edge, 140.0);
        assert_eq!(line.center_x, 106.0);
    }

    #[test]
    fn test_line_drops_blank_fragments() {
        assert!(Line::from_fragments(vec![frag("   ", 72.0, 10.0)]).is_none());
        let line = Line::from_fragments(vec![frag(" ", 60.0, 3.0), frag("Text", 72.0, 24.0)]).unwrap();
        assert_eq!(line.fragments.len(), 1);
        assert_eq!(line.left_edge, 72.0);
    }

    #[test]
    fn test_line_all_bold() {
        let bold = frag("A", 72.0, 6.0).with_bold(true);
        let line = Line::from_fragments(vec![bold.clone(), frag("B", 80.0, 6.0)]).unwrap();
        assert!(!line.all_bold);
        let line = Line::from_fragments(vec![bold]).unwrap();
        assert!(line.all_bold);
    }

    #[test]
    fn test_column_text_marks_wide_gaps() {
        let line = Line::from_fragments(vec![
            frag("Name", 72.0, 24.0),
            frag("Role", 200.0, 24.0),
            frag("lead", 227.0, 24.0),
        ])
        .unwrap();
        assert_eq!(line.full_text, "Name Role lead");
        assert_eq!(line.column_text(15.0), "Name  Role lead");
    }

    #[test]
    fn test_alignment_serde() {
        let json = serde_json::to_string(&Alignment::Justify).unwrap();
        assert_eq!(json, "\"justify\"");
    }
}
