//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the fragment extraction logic.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{ImageFormat, Metadata};

use super::fonts::{FontMetrics, FontStyle, WidthEntry};
use super::images::{ColorSpace, ImagePayload, ImageXObject};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Page rectangle (MediaBox) in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageBox {
    /// US Letter, used when a page declares no usable MediaBox.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    pub fn width(&self) -> f32 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f32 {
        (self.ury - self.lly).abs()
    }
}

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// Advance widths for positioning.
    pub metrics: FontMetrics,
    /// Bold/italic flags.
    pub style: FontStyle,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(get_number_from_value)
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, geometry, font metrics, content
/// stream decoding, text decoding and image XObjects without exposing any
/// concrete PDF library types.
pub trait PdfBackend: Sync {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the page rectangle.
    fn page_box(&self, page: PageId) -> PageBox;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Return the image XObjects of a page.
    fn page_images(&self, page: PageId) -> Result<Vec<ImageXObject>>;

    /// Extract the plain text of a page (1-indexed) without geometry.
    fn page_text(&self, page_number: u32) -> Result<String>;

    /// Return document metadata.
    fn metadata(&self) -> Metadata;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// How far up the page tree inherited attributes are looked up.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        Self { doc }
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Follow a reference to its target object.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).as_dict().ok()
    }

    /// Look up a page attribute, following `Parent` links for inherited keys.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut dict = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(self.resolve(value));
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn font_metrics(&self, font: &Dictionary) -> FontMetrics {
        let mut metrics = FontMetrics::default();
        let subtype = font.get(b"Subtype").and_then(Object::as_name).unwrap_or(b"");

        let descriptor = if subtype == b"Type0" {
            metrics.two_byte = true;
            let descendant = font
                .get(b"DescendantFonts")
                .ok()
                .map(|o| self.resolve(o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .and_then(|o| self.resolve_dict(o));
            if let Some(cid_font) = descendant {
                metrics.missing_width = cid_font
                    .get(b"DW")
                    .ok()
                    .and_then(|o| self.resolve(o).as_float().ok())
                    .or(Some(1000.0));
                if let Ok(w) = cid_font.get(b"W") {
                    if let Ok(arr) = self.resolve(w).as_array() {
                        let entries: Vec<WidthEntry> = arr
                            .iter()
                            .filter_map(|o| match self.resolve(o) {
                                Object::Array(list) => Some(WidthEntry::List(
                                    list.iter()
                                        .filter_map(|v| self.resolve(v).as_float().ok())
                                        .collect(),
                                )),
                                other => other.as_float().ok().map(WidthEntry::Number),
                            })
                            .collect();
                        metrics.cid_widths = FontMetrics::parse_cid_widths(&entries);
                    }
                }
            }
            descendant.and_then(|d| d.get(b"FontDescriptor").ok())
        } else {
            metrics.first_char = font
                .get(b"FirstChar")
                .ok()
                .and_then(|o| self.resolve(o).as_i64().ok())
                .unwrap_or(0)
                .max(0) as u32;
            if let Ok(w) = font.get(b"Widths") {
                if let Ok(arr) = self.resolve(w).as_array() {
                    metrics.widths = arr
                        .iter()
                        .map(|o| self.resolve(o).as_float().unwrap_or(0.0))
                        .collect();
                }
            }
            font.get(b"FontDescriptor").ok()
        };

        if let Some(desc) = descriptor.and_then(|o| self.resolve_dict(o)) {
            if metrics.missing_width.is_none() {
                metrics.missing_width = desc
                    .get(b"MissingWidth")
                    .ok()
                    .and_then(|o| self.resolve(o).as_float().ok());
            }
            metrics.flags = desc
                .get(b"Flags")
                .ok()
                .and_then(|o| self.resolve(o).as_i64().ok())
                .unwrap_or(0);
        }
        metrics
    }

    fn image_xobject(&self, name: &[u8], obj: &Object) -> Option<ImageXObject> {
        let stream = self.resolve(obj).as_stream().ok()?;
        let dict = &stream.dict;
        if dict.get(b"Subtype").and_then(Object::as_name).ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()?.max(0) as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()?.max(0) as u32;

        let filters: Vec<Vec<u8>> = match dict.get(b"Filter").map(|f| self.resolve(f)) {
            Ok(Object::Name(n)) => vec![n.clone()],
            Ok(Object::Array(arr)) => arr
                .iter()
                .filter_map(|o| o.as_name().ok().map(<[u8]>::to_vec))
                .collect(),
            _ => Vec::new(),
        };

        let payload = if filters.iter().any(|f| f == b"DCTDecode") {
            if filters.len() == 1 {
                ImagePayload::Encoded {
                    data: stream.content.clone(),
                    format: ImageFormat::Jpeg,
                }
            } else {
                ImagePayload::Unsupported("chained DCT filters".to_string())
            }
        } else if let Some(f) = filters
            .iter()
            .find(|f| matches!(f.as_slice(), b"JPXDecode" | b"CCITTFaxDecode" | b"JBIG2Decode"))
        {
            ImagePayload::Unsupported(format!("{} images", String::from_utf8_lossy(f)))
        } else {
            let data = if filters.is_empty() {
                Ok(stream.content.clone())
            } else {
                stream.decompressed_content()
            };
            let bits = dict
                .get(b"BitsPerComponent")
                .ok()
                .and_then(|o| o.as_i64().ok())
                .unwrap_or(8) as u8;
            match (data, dict.get(b"ColorSpace").ok().and_then(|cs| self.color_space(cs))) {
                (Ok(data), Some(color_space)) => ImagePayload::Raw {
                    data,
                    color_space,
                    bits_per_component: bits,
                },
                (Err(e), _) => ImagePayload::Unsupported(e.to_string()),
                (_, None) => ImagePayload::Unsupported("unknown color space".to_string()),
            }
        };

        Some(ImageXObject {
            name: name.to_vec(),
            width,
            height,
            payload,
        })
    }

    fn color_space(&self, obj: &Object) -> Option<ColorSpace> {
        match self.resolve(obj) {
            Object::Name(n) => match n.as_slice() {
                b"DeviceGray" | b"CalGray" | b"G" => Some(ColorSpace::Gray),
                b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(ColorSpace::Rgb),
                b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::Cmyk),
                _ => None,
            },
            Object::Array(arr) => {
                let family = arr.first()?.as_name().ok()?;
                match family {
                    b"ICCBased" => {
                        let n = self
                            .resolve(arr.get(1)?)
                            .as_stream()
                            .ok()?
                            .dict
                            .get(b"N")
                            .ok()?
                            .as_i64()
                            .ok()?;
                        ColorSpace::from_components(n)
                    }
                    b"Indexed" | b"I" => {
                        let base = self.color_space(arr.get(1)?)?;
                        let palette = match self.resolve(arr.get(3)?) {
                            Object::String(bytes, _) => bytes.clone(),
                            Object::Stream(s) => s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone()),
                            _ => return None,
                        };
                        Some(ColorSpace::Indexed {
                            base: Box::new(base),
                            palette,
                        })
                    }
                    _ => self.color_space(&Object::Name(family.to_vec())),
                }
            }
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_box(&self, page: PageId) -> PageBox {
        let numbers: Option<Vec<f32>> = self
            .inherited(page, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(|v| self.resolve(v).as_float().ok()).collect());

        match numbers.as_deref() {
            Some([llx, lly, urx, ury, ..]) if (urx - llx).abs() > 0.0 && (ury - lly).abs() > 0.0 => {
                PageBox {
                    llx: llx.min(*urx),
                    lly: lly.min(*ury),
                    urx: urx.max(*llx),
                    ury: ury.max(*lly),
                }
            }
            _ => PageBox::LETTER,
        }
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let metrics = self.font_metrics(font_dict);
            let style = FontStyle::detect(&base_font, metrics.flags);
            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
                metrics,
                style,
            });
        }
        Ok(result)
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(c) => c,
            // a page without content streams is legal and empty
            Err(_) => return Ok(Vec::new()),
        };

        let stream_bytes = |obj: &Object| -> Result<Vec<u8>> {
            match self.resolve(obj) {
                Object::Stream(s) => s
                    .decompressed_content()
                    .or_else(|_| Ok(s.content.clone())),
                _ => Err(Error::Extraction("Invalid content stream".to_string())),
            }
        };

        match self.resolve(contents) {
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    content.extend_from_slice(&stream_bytes(obj)?);
                    content.push(b'\n');
                }
                Ok(content)
            }
            other => stream_bytes(other),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_images(&self, page: PageId) -> Result<Vec<ImageXObject>> {
        let resources = match self.inherited(page, b"Resources").and_then(|o| o.as_dict().ok()) {
            Some(r) => r,
            None => return Ok(Vec::new()),
        };
        let xobjects = match resources.get(b"XObject").ok().and_then(|o| self.resolve_dict(o)) {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(xobjects
            .iter()
            .filter_map(|(name, obj)| self.image_xobject(name, obj))
            .collect())
    }

    fn page_text(&self, page_number: u32) -> Result<String> {
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::Extraction(format!("Page {}: {}", page_number, e)))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.doc.get_pages().len() as u32;
        metadata.encrypted = self.doc.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|o| self.resolve_dict(o));
        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|d| parse_pdf_date(&d));
        }
        metadata
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Read a text string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_text_simple(bytes),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok()?,
        _ => return None,
    };
    Some(value).filter(|s| !s.trim().is_empty())
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(1.5)), Some(1.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_page_box_dimensions() {
        let page = PageBox {
            llx: 10.0,
            lly: 20.0,
            urx: 622.0,
            ury: 812.0,
        };
        assert_eq!(page.width(), 612.0);
        assert_eq!(page.height(), 792.0);
    }

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045+09'00'").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);

        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.month(), 1);
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_lopdf_backend_rejects_garbage() {
        let result = LopdfBackend::load_bytes(b"%PDF-1.4\nthis is not a pdf");
        assert!(result.is_err());
    }
}
