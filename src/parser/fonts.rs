//! Font metrics and style detection.

use std::collections::BTreeMap;

/// Glyph width used when a font carries no metrics, in 1/1000 em.
pub const FALLBACK_GLYPH_WIDTH: f32 = 500.0;

/// FontDescriptor flag bits (PDF 32000-1, table 123).
const FLAG_ITALIC: i64 = 1 << 6;
const FLAG_FORCE_BOLD: i64 = 1 << 18;

/// Advance widths of a font, in 1/1000 em.
#[derive(Debug, Clone, Default)]
pub struct FontMetrics {
    /// First code covered by `widths` (simple fonts)
    pub first_char: u32,
    /// Widths indexed from `first_char` (simple fonts)
    pub widths: Vec<f32>,
    /// Width of codes outside `widths` (`MissingWidth` or `DW`)
    pub missing_width: Option<f32>,
    /// Per-CID widths from the descendant `W` array (composite fonts)
    pub cid_widths: BTreeMap<u32, f32>,
    /// Whether character codes are two bytes wide (Type0 fonts)
    pub two_byte: bool,
    /// FontDescriptor `Flags`
    pub flags: i64,
}

impl FontMetrics {
    /// Width of one character code.
    pub fn glyph_width(&self, code: u32) -> f32 {
        let width = if self.two_byte {
            self.cid_widths.get(&code).copied()
        } else {
            code.checked_sub(self.first_char)
                .and_then(|i| self.widths.get(i as usize))
                .copied()
                .filter(|w| *w > 0.0)
        };
        width
            .or(self.missing_width.filter(|w| *w > 0.0))
            .unwrap_or(FALLBACK_GLYPH_WIDTH)
    }

    /// Split raw string bytes into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|c| match c {
                    [hi, lo] => u32::from(*hi) << 8 | u32::from(*lo),
                    [b] => u32::from(*b),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Parse a composite font `W` array: `c [w1 w2 ...]` or `c_first c_last w`.
    pub fn parse_cid_widths(entries: &[WidthEntry]) -> BTreeMap<u32, f32> {
        let mut widths = BTreeMap::new();
        let mut i = 0;
        while i < entries.len() {
            match (entries.get(i), entries.get(i + 1), entries.get(i + 2)) {
                (Some(WidthEntry::Number(start)), Some(WidthEntry::List(list)), _) => {
                    for (offset, w) in list.iter().enumerate() {
                        widths.insert(*start as u32 + offset as u32, *w);
                    }
                    i += 2;
                }
                (
                    Some(WidthEntry::Number(first)),
                    Some(WidthEntry::Number(last)),
                    Some(WidthEntry::Number(w)),
                ) => {
                    for cid in (*first as u32)..=(*last as u32) {
                        widths.insert(cid, *w);
                    }
                    i += 3;
                }
                _ => break,
            }
        }
        widths
    }
}

/// One element of a composite font `W` array.
#[derive(Debug, Clone, PartialEq)]
pub enum WidthEntry {
    Number(f32),
    List(Vec<f32>),
}

/// Style flags derived from a font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    /// Detect bold/italic from the base font name and descriptor flags.
    pub fn detect(base_font: &str, flags: i64) -> Self {
        let name = base_font.to_lowercase();
        let bold = name.contains("bold")
            || name.contains("black")
            || name.contains("heavy")
            || flags & FLAG_FORCE_BOLD != 0;
        let italic =
            name.contains("italic") || name.contains("oblique") || flags & FLAG_ITALIC != 0;
        Self { bold, italic }
    }
}
