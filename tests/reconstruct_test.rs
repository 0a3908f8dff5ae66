//! End-to-end tests: synthetic PDF in, DOCX package out.

mod common;

use common::{document_xml, package_entries, run_texts, PdfBuilder, RawImage, TextLine};
use pdfreflow::render::EMPTY_PLACEHOLDER;
use pdfreflow::{
    analyze_bytes, reconstruct, reconstruct_file, Block, Error, PageSelection, ParseOptions,
    Reconstructor, WarningKind,
};

fn report_pdf() -> Vec<u8> {
    PdfBuilder::new()
        .title("Quarterly")
        .page()
        .line(TextLine::new("QUARTERLY REPORT", 226.0, 720.0, 20.0).bold())
        .line(TextLine::new("Revenue grew in every region.", 72.0, 680.0, 11.0))
        .line(TextLine::new("Name | Role | Years", 72.0, 650.0, 11.0))
        .line(TextLine::new("Ann | Eng | 5", 72.0, 636.0, 11.0))
        .line(TextLine::new("Bo | PM | 3", 72.0, 622.0, 11.0))
        .build()
}

#[test]
fn test_output_is_docx_package() {
    let docx = reconstruct(&report_pdf()).unwrap();
    assert!(docx.starts_with(b"PK"));
    assert!(pdfreflow::detect::is_docx_bytes(&docx));
    assert!(package_entries(&docx)
        .iter()
        .any(|name| name == "word/document.xml"));
}

#[test]
fn test_structure_reaches_the_package() {
    let docx = reconstruct(&report_pdf()).unwrap();
    let xml = document_xml(&docx);

    assert!(xml.contains("QUARTERLY REPORT"));
    assert!(xml.contains("Heading1"));
    assert!(xml.contains("Revenue grew in every region."));
    assert_eq!(xml.matches("<w:tbl>").count(), 1);
    assert!(!xml.contains("Name | Role"));
}

#[test]
fn test_analyze_bytes_recovers_blocks() {
    let doc = analyze_bytes(&report_pdf()).unwrap();
    assert_eq!(doc.metadata.title.as_deref(), Some("Quarterly"));
    assert_eq!(doc.metadata.page_count, 1);

    assert!(matches!(
        &doc.blocks[0],
        Block::Heading { level: 1, text, .. } if text == "QUARTERLY REPORT"
    ));
    let tables: Vec<_> = doc
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].column_count, 3);
    assert_eq!(tables[0].rows.len(), 3);
    assert!(!tables[0].header);
}

#[test]
fn test_empty_source_yields_placeholder() {
    let pdf = PdfBuilder::new().page().build();
    let result = Reconstructor::new().run(&pdf).unwrap();

    assert!(!result.document.has_content());
    assert_eq!(result.report.count(WarningKind::EmptyDocument), 1);
    let xml = document_xml(&result.bytes);
    assert_eq!(xml.matches(EMPTY_PLACEHOLDER).count(), 1);
}

#[test]
fn test_scanned_page_yields_placeholder() {
    let pdf = PdfBuilder::new()
        .page()
        .image(RawImage {
            width: 1500,
            height: 2000,
            rect: (0.0, 0.0, 612.0, 792.0),
        })
        .build();
    let result = Reconstructor::new().run(&pdf).unwrap();

    assert!(!result.document.has_text());
    assert_eq!(result.document.images().count(), 1);
    assert_eq!(result.report.count(WarningKind::ImageDropped), 1);
    assert_eq!(result.report.count(WarningKind::EmptyDocument), 1);

    let xml = document_xml(&result.bytes);
    assert_eq!(run_texts(&xml), vec![EMPTY_PLACEHOLDER.to_string()]);
    assert!(!package_entries(&result.bytes)
        .iter()
        .any(|name| name.starts_with("word/media/")));
}

#[test]
fn test_pages_are_separated_by_breaks() {
    let pdf = PdfBuilder::new()
        .page()
        .line(TextLine::new("First page text", 72.0, 700.0, 11.0))
        .page()
        .line(TextLine::new("Second page text", 72.0, 700.0, 11.0))
        .page()
        .line(TextLine::new("Third page text", 72.0, 700.0, 11.0))
        .build();

    let result = Reconstructor::new().run(&pdf).unwrap();
    let breaks = result
        .document
        .blocks
        .iter()
        .filter(|b| matches!(b, Block::PageBreak))
        .count();
    assert_eq!(breaks, 2);
    assert_eq!(result.report.page_count, 3);
    assert_eq!(document_xml(&result.bytes).matches("w:type=\"page\"").count(), 2);
}

#[test]
fn test_page_selection() {
    let pdf = PdfBuilder::new()
        .page()
        .line(TextLine::new("Alpha", 72.0, 700.0, 11.0))
        .page()
        .line(TextLine::new("Beta", 72.0, 700.0, 11.0))
        .build();

    let result = Reconstructor::new()
        .with_pages(PageSelection::Pages(vec![2]))
        .run(&pdf)
        .unwrap();
    assert_eq!(result.document.plain_text(), "Beta");

    let out_of_range = Reconstructor::new()
        .without_fallback()
        .with_pages(PageSelection::Pages(vec![5]))
        .run(&pdf);
    assert!(matches!(out_of_range, Err(Error::PageOutOfRange(5, 2))));
}

#[test]
fn test_page_budget() {
    let pdf = PdfBuilder::new()
        .page()
        .line(TextLine::new("one", 72.0, 700.0, 11.0))
        .page()
        .line(TextLine::new("two", 72.0, 700.0, 11.0))
        .build();

    let result = Reconstructor::new()
        .without_fallback()
        .with_parse_options(ParseOptions::default().with_max_pages(1))
        .run(&pdf);
    assert!(matches!(
        result,
        Err(Error::BudgetExceeded { what: "page", .. })
    ));
}

#[test]
fn test_painted_image_is_embedded() {
    let pdf = PdfBuilder::new()
        .page()
        .line(TextLine::new("Above the figure", 72.0, 700.0, 11.0))
        .image(RawImage {
            width: 4,
            height: 2,
            rect: (72.0, 500.0, 200.0, 100.0),
        })
        .line(TextLine::new("Below the figure", 72.0, 450.0, 11.0))
        .build();

    let result = Reconstructor::new().run(&pdf).unwrap();
    let kinds: Vec<&str> = result
        .document
        .blocks
        .iter()
        .map(|b| match b {
            Block::Image(_) => "image",
            Block::Paragraph { .. } => "paragraph",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["paragraph", "image", "paragraph"]);
    assert!(package_entries(&result.bytes)
        .iter()
        .any(|name| name.starts_with("word/media/")));
}

#[test]
fn test_without_images() {
    let pdf = PdfBuilder::new()
        .page()
        .line(TextLine::new("Caption", 72.0, 700.0, 11.0))
        .image(RawImage {
            width: 4,
            height: 4,
            rect: (72.0, 500.0, 100.0, 100.0),
        })
        .build();

    let result = Reconstructor::new().without_images().run(&pdf).unwrap();
    assert_eq!(result.document.images().count(), 0);
}

#[test]
fn test_reconstruct_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, report_pdf()).unwrap();

    let docx = reconstruct_file(&path).unwrap();
    assert!(document_xml(&docx).contains("QUARTERLY REPORT"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = reconstruct_file(dir.path().join("absent.pdf"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_non_pdf_input_is_rejected() {
    assert!(matches!(
        reconstruct(b"PK\x03\x04 not a pdf"),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_corrupt_pdf_is_extraction_failure() {
    let err = reconstruct(b"%PDF-1.4\nthis is not a cross-reference table").unwrap_err();
    assert!(err.is_extraction_failure(), "unexpected error: {}", err);
}

#[test]
fn test_output_is_deterministic() {
    let pdf = report_pdf();
    let first = Reconstructor::new().sequential().run(&pdf).unwrap();
    let second = Reconstructor::new().run(&pdf).unwrap();
    assert_eq!(first.document.blocks, second.document.blocks);
    assert_eq!(
        run_texts(&document_xml(&first.bytes)),
        run_texts(&document_xml(&second.bytes))
    );
}
