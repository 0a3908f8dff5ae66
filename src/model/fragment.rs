//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// A run of text placed on a page, as recorded by the source format.
///
/// Coordinates are in points with the origin at the bottom-left corner of
/// the page, so `y` grows towards the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    /// The text content
    pub text: String,
    /// X position of the left edge
    pub x: f32,
    /// Y position of the baseline
    pub y: f32,
    /// Advance width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font is bold
    pub bold: bool,
    /// Whether the font is italic
    pub italic: bool,
}

impl PositionedFragment {
    /// Create a regular-weight fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
            bold: false,
            italic: false,
        }
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// X position of the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the fragment carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the geometry can be placed on a page at all.
    pub fn has_finite_geometry(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_edges() {
        let frag = PositionedFragment::new("Hello", 72.0, 700.0, 30.0, 12.0);
        assert_eq!(frag.right(), 102.0);
        assert!(!frag.bold);
    }

    #[test]
    fn test_fragment_blank() {
        assert!(PositionedFragment::new("  \t", 0.0, 0.0, 0.0, 12.0).is_blank());
        assert!(!PositionedFragment::new(" a ", 0.0, 0.0, 0.0, 12.0).is_blank());
    }

    #[test]
    fn test_fragment_style_builders() {
        let frag = PositionedFragment::new("x", 0.0, 0.0, 6.0, 12.0)
            .with_bold(true)
            .with_italic(true);
        assert!(frag.bold);
        assert!(frag.italic);
    }
}
