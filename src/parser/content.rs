//! Content stream interpretation.
//!
//! Walks the operators of a page and produces positioned text fragments and
//! the placement of image XObjects. Positions follow the text and graphics
//! state closely enough to recover lines and columns; exact glyph outlines
//! are not needed.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::model::PositionedFragment;

use super::backend::{BackendFontInfo, ContentOp, PageId, PdfBackend, PdfValue};
use super::fonts::FALLBACK_GLYPH_WIDTH;

/// TJ adjustment (in 1/1000 em) above which a word space is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Fragments closer than this fraction of the font size are merged.
const MERGE_GAP_RATIO: f32 = 0.1;

/// An affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(op: &ContentOp) -> Option<Self> {
        Some(Self {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`, applying `self` first.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state parameters (PDF 32000-1, 9.3).
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Horizontal scaling as a fraction (Tz / 100)
    h_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Where an XObject was painted on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnchor {
    /// XObject resource name
    pub name: Vec<u8>,
    /// Y of the top edge, in page space
    pub top: f32,
    /// X of the left edge, in page space
    pub left: f32,
}

/// Output of interpreting one page.
#[derive(Debug, Clone, Default)]
pub struct InterpretedPage {
    pub fragments: Vec<PositionedFragment>,
    pub image_anchors: Vec<ImageAnchor>,
}

/// Interprets content stream operations for one page.
pub struct ContentInterpreter<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    fonts: HashMap<Vec<u8>, BackendFontInfo>,
}

impl<'a, B: PdfBackend + ?Sized> ContentInterpreter<'a, B> {
    pub fn new(backend: &'a B, page: PageId, fonts: Vec<BackendFontInfo>) -> Self {
        Self {
            backend,
            page,
            fonts: fonts.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    /// Run the operations and collect fragments and image placements.
    pub fn interpret(&self, ops: &[ContentOp]) -> InterpretedPage {
        let mut out = InterpretedPage::default();
        let mut state = GraphicsState {
            ctm: Matrix::IDENTITY,
            text: TextState::default(),
        };
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut text_matrix = Matrix::IDENTITY;
        let mut line_matrix = Matrix::IDENTITY;
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => stack.push(state.clone()),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        state.ctm = m.then(&state.ctm);
                    }
                }
                "BT" => {
                    in_text = true;
                    text_matrix = Matrix::IDENTITY;
                    line_matrix = Matrix::IDENTITY;
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.text.font = name.clone();
                    }
                    if let Some(size) = op.number(1) {
                        state.text.size = size;
                    }
                }
                "Tc" => state.text.char_spacing = op.number(0).unwrap_or(0.0),
                "Tw" => state.text.word_spacing = op.number(0).unwrap_or(0.0),
                "Tz" => state.text.h_scale = op.number(0).unwrap_or(100.0) / 100.0,
                "TL" => state.text.leading = op.number(0).unwrap_or(0.0),
                "Ts" => state.text.rise = op.number(0).unwrap_or(0.0),
                "Td" | "TD" => {
                    let tx = op.number(0).unwrap_or(0.0);
                    let ty = op.number(1).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.text.leading = -ty;
                    }
                    line_matrix = Matrix::translation(tx, ty).then(&line_matrix);
                    text_matrix = line_matrix;
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        line_matrix = m;
                        text_matrix = m;
                    }
                }
                "T*" => {
                    line_matrix = self.next_line(&state.text, &line_matrix);
                    text_matrix = line_matrix;
                }
                "Tj" | "TJ" | "'" | "\"" if in_text => {
                    let operand = match op.operator.as_str() {
                        "'" => {
                            line_matrix = self.next_line(&state.text, &line_matrix);
                            text_matrix = line_matrix;
                            op.operands.first()
                        }
                        "\"" => {
                            state.text.word_spacing = op.number(0).unwrap_or(0.0);
                            state.text.char_spacing = op.number(1).unwrap_or(0.0);
                            line_matrix = self.next_line(&state.text, &line_matrix);
                            text_matrix = line_matrix;
                            op.operands.get(2)
                        }
                        _ => op.operands.first(),
                    };
                    if let Some(operand) = operand {
                        if let Some(fragment) =
                            self.show(operand, &state, &mut text_matrix)
                        {
                            push_fragment(&mut out.fragments, fragment);
                        }
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        out.image_anchors.push(anchor(name, &state.ctm));
                    }
                }
                _ => {}
            }
        }

        out
    }

    fn next_line(&self, text: &TextState, line_matrix: &Matrix) -> Matrix {
        // TL defaults to zero; fall back to single spacing so T* still advances
        let leading = if text.leading.abs() > f32::EPSILON {
            text.leading
        } else {
            text.size * 1.2
        };
        Matrix::translation(0.0, -leading).then(line_matrix)
    }

    /// Show a string (Tj) or an array of strings and adjustments (TJ).
    fn show(
        &self,
        operand: &PdfValue,
        state: &GraphicsState,
        text_matrix: &mut Matrix,
    ) -> Option<PositionedFragment> {
        let text_state = &state.text;
        let font = self.fonts.get(&text_state.font);
        let start = text_matrix.then(&state.ctm);
        let (x, y) = start.apply(0.0, text_state.rise);

        let mut text = String::new();
        match operand {
            PdfValue::Str(bytes) => {
                text.push_str(&self.decode(text_state, bytes));
                self.advance(text_state, font, bytes, text_matrix);
            }
            PdfValue::Array(items) => {
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => {
                            text.push_str(&self.decode(text_state, bytes));
                            self.advance(text_state, font, bytes, text_matrix);
                        }
                        PdfValue::Integer(_) | PdfValue::Real(_) => {
                            let adjustment = -super::backend::get_number_from_value(item)
                                .unwrap_or(0.0);
                            let tx = adjustment / 1000.0 * text_state.size * text_state.h_scale;
                            *text_matrix = Matrix::translation(tx, 0.0).then(text_matrix);
                            if adjustment > TJ_SPACE_THRESHOLD && needs_space(&text) {
                                text.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => return None,
        }

        if text.trim().is_empty() {
            return None;
        }

        let end = text_matrix.then(&state.ctm);
        let (end_x, _) = end.apply(0.0, text_state.rise);
        let font_size = text_state.size * start.vertical_scale();
        let style = font.map(|f| f.style).unwrap_or_default();

        Some(
            PositionedFragment::new(
                text.nfkc().collect::<String>(),
                x,
                y,
                (end_x - x).abs(),
                font_size,
            )
            .with_bold(style.bold)
            .with_italic(style.italic),
        )
    }

    fn decode(&self, text_state: &TextState, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, &text_state.font, bytes)
    }

    /// Move the text matrix past the glyphs of `bytes`.
    fn advance(
        &self,
        text_state: &TextState,
        font: Option<&BackendFontInfo>,
        bytes: &[u8],
        text_matrix: &mut Matrix,
    ) {
        let mut tx = 0.0;
        let codes = match font {
            Some(f) => f.metrics.codes(bytes),
            None => bytes.iter().map(|&b| u32::from(b)).collect(),
        };
        let two_byte = font.map(|f| f.metrics.two_byte).unwrap_or(false);
        for code in codes {
            let w0 = font
                .map(|f| f.metrics.glyph_width(code))
                .unwrap_or(FALLBACK_GLYPH_WIDTH);
            let mut glyph = w0 / 1000.0 * text_state.size + text_state.char_spacing;
            if code == 32 && !two_byte {
                glyph += text_state.word_spacing;
            }
            tx += glyph * text_state.h_scale;
        }
        *text_matrix = Matrix::translation(tx, 0.0).then(text_matrix);
    }
}

/// Anchor of an XObject painted through the unit square of `ctm`.
fn anchor(name: &[u8], ctm: &Matrix) -> ImageAnchor {
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];
    ImageAnchor {
        name: name.to_vec(),
        top: corners.iter().map(|c| c.1).fold(f32::MIN, f32::max),
        left: corners.iter().map(|c| c.0).fold(f32::MAX, f32::min),
    }
}

/// Whether a TJ word gap should become a space after `text`.
fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Append a fragment, merging it into the previous one when it continues
/// the same word run on the same baseline.
fn push_fragment(fragments: &mut Vec<PositionedFragment>, fragment: PositionedFragment) {
    if let Some(last) = fragments.last_mut() {
        let same_run = (last.y - fragment.y).abs() < 0.5
            && (last.font_size - fragment.font_size).abs() < 0.1
            && last.bold == fragment.bold
            && last.italic == fragment.italic;
        let gap = fragment.x - last.right();
        if same_run && gap > -0.5 && gap < fragment.font_size * MERGE_GAP_RATIO {
            last.text.push_str(&fragment.text);
            last.width = fragment.right() - last.x;
            return;
        }
    }
    fragments.push(fragment);
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
