//! Synthetic PDF fixtures and DOCX inspection helpers.

#![allow(dead_code)]

use std::io::{Cursor, Read};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

/// Regular font resource name.
pub const REGULAR: &str = "F1";
/// Bold font resource name.
pub const BOLD: &str = "F2";

/// Text shown with one font at one position.
pub struct TextLine {
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextLine {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            font: REGULAR,
            size,
            x,
            y,
            text: text.into(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.font = BOLD;
        self
    }

    /// Width with the 0.5 em fallback advance of the metric-less test fonts.
    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.size * 0.5
    }
}

/// A raw 8-bit DeviceRGB image painted on a page.
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    /// Painted rectangle: x, y, width, height in points
    pub rect: (f32, f32, f32, f32),
}

#[derive(Default)]
struct PageSpec {
    lines: Vec<TextLine>,
    images: Vec<RawImage>,
}

/// Builds small Letter-sized PDFs with the standard Helvetica fonts.
#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<PageSpec>,
    title: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(PageSpec::default());
        self
    }

    /// Add a line to the current page.
    pub fn line(mut self, line: TextLine) -> Self {
        self.current().lines.push(line);
        self
    }

    /// Add an image to the current page.
    pub fn image(mut self, image: RawImage) -> Self {
        self.current().images.push(image);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    fn current(&mut self) -> &mut PageSpec {
        if self.pages.is_empty() {
            self.pages.push(PageSpec::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });

        let mut kids: Vec<Object> = Vec::new();
        for spec in &self.pages {
            let page_id = add_page(&mut doc, pages_id, regular, bold, spec);
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        if let Some(title) = self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    regular: ObjectId,
    bold: ObjectId,
    spec: &PageSpec,
) -> ObjectId {
    let mut operations = Vec::new();
    for line in &spec.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.into(), Object::Real(line.size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let mut xobjects = lopdf::Dictionary::new();
    for (i, image) in spec.images.iter().enumerate() {
        let name = format!("Im{}", i + 1);
        let samples = vec![128u8; (image.width * image.height * 3) as usize];
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            samples,
        ));
        xobjects.set(name.as_bytes().to_vec(), image_id);

        let (x, y, w, h) = image.rect;
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(w),
                0.into(),
                0.into(),
                Object::Real(h),
                Object::Real(x),
                Object::Real(y),
            ],
        ));
        operations.push(Operation::new("Do", vec![name.as_str().into()]));
        operations.push(Operation::new("Q", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular,
            BOLD => bold,
        },
        "XObject" => xobjects,
    });

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    })
}

/// Unzip `word/document.xml` from a DOCX package.
pub fn document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Names of every entry in a DOCX package.
pub fn package_entries(docx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Text of every `w:t` run element, in document order.
///
/// Paragraph ids in the package come from a process-wide counter, so tests
/// compare run text rather than raw XML.
pub fn run_texts(xml: &str) -> Vec<String> {
    let mut texts = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<w:t") {
        rest = &rest[start + 4..];
        // skip w:tbl, w:tc, w:tr and friends
        if !rest.starts_with('>') && !rest.starts_with(' ') {
            continue;
        }
        let Some(open_end) = rest.find('>') else { break };
        if rest[..open_end].ends_with('/') {
            rest = &rest[open_end + 1..];
            texts.push(String::new());
            continue;
        }
        rest = &rest[open_end + 1..];
        let Some(close) = rest.find("</w:t>") else { break };
        texts.push(rest[..close].to_string());
        rest = &rest[close + 6..];
    }
    texts
}
