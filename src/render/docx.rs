//! DOCX serialization of rendered constructs.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BorderType, BreakType, Docx, LineSpacing, PageMargin, Paragraph, Pic, Run,
    SpecialIndentType, Style, StyleType, Table, TableBorder, TableBorderPosition, TableBorders,
    TableCell, TableRow, WidthType,
};

use crate::error::{Error, Result};
use crate::model::Alignment;

use super::construct::{Construct, EmbeddedImage, StyledParagraph, StyledRun, StyledTable};
use super::RenderOptions;

/// Accepts constructs in document order and serializes them.
pub trait TargetSink {
    /// Append one construct.
    fn emit(&mut self, construct: &Construct) -> Result<()>;

    /// Produce the target document bytes.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Feed every construct into a sink and finish it.
pub fn write_constructs<S: TargetSink>(mut sink: S, constructs: &[Construct]) -> Result<Vec<u8>> {
    for construct in constructs {
        sink.emit(construct)?;
    }
    sink.finish()
}

const OUTER_BORDER_COLOR: &str = "000000";
const INNER_BORDER_COLOR: &str = "DDDDDD";
const BORDER_SIZE: usize = 4;
/// Full width in fiftieths of a percent
const FULL_WIDTH_PCT: usize = 5000;

/// Builds a DOCX package with `docx-rs`.
pub struct DocxSink {
    docx: Option<Docx>,
}

impl DocxSink {
    /// Start a document with the page geometry and heading styles of `options`.
    pub fn new(options: &RenderOptions) -> Self {
        let margins = &options.margins;
        let mut docx = Docx::new()
            .page_size(options.page_width, options.page_height)
            .page_margin(
                PageMargin::new()
                    .top(margins.top as i32)
                    .right(margins.right as i32)
                    .bottom(margins.bottom as i32)
                    .left(margins.left as i32),
            );
        for level in 1..=3u8 {
            docx = docx.add_style(
                Style::new(format!("Heading{}", level), StyleType::Paragraph)
                    .name(format!("Heading {}", level))
                    .size(options.heading_size(level))
                    .bold(),
            );
        }
        Self { docx: Some(docx) }
    }

    fn update(&mut self, f: impl FnOnce(Docx) -> Docx) -> Result<()> {
        let docx = self
            .docx
            .take()
            .ok_or_else(|| Error::Render("document already finished".to_string()))?;
        self.docx = Some(f(docx));
        Ok(())
    }
}

impl TargetSink for DocxSink {
    fn emit(&mut self, construct: &Construct) -> Result<()> {
        match construct {
            Construct::Paragraph(para) => {
                let p = paragraph(para);
                self.update(|d| d.add_paragraph(p))
            }
            Construct::Table(table) => {
                let t = table_of(table);
                self.update(|d| d.add_table(t))
            }
            Construct::Image(image) => {
                let p = image_paragraph(image);
                self.update(|d| d.add_paragraph(p))
            }
            Construct::PageBreak => self.update(|d| {
                d.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
            }),
        }
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let docx = self
            .docx
            .take()
            .ok_or_else(|| Error::Render("document already finished".to_string()))?;
        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| Error::Render(format!("DOCX packaging failed: {}", e)))?;
        Ok(buf.into_inner())
    }
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

fn run(styled: &StyledRun) -> Run {
    let mut run = Run::new().add_text(styled.text.as_str()).size(styled.size);
    if styled.bold {
        run = run.bold();
    }
    if styled.italic {
        run = run.italic();
    }
    if let Some(color) = &styled.color {
        run = run.color(color.as_str());
    }
    run
}

fn paragraph(para: &StyledParagraph) -> Paragraph {
    let mut p = para
        .runs
        .iter()
        .fold(Paragraph::new(), |p, r| p.add_run(run(r)))
        .align(alignment_type(para.alignment))
        .line_spacing(
            LineSpacing::new()
                .before(para.spacing_before)
                .after(para.spacing_after),
        );
    if para.indent > 0 || para.hanging > 0 {
        let special = (para.hanging > 0).then(|| SpecialIndentType::Hanging(para.hanging as i32));
        p = p.indent(Some(para.indent as i32), special, None, None);
    }
    if let Some(style) = &para.style {
        p = p.style(style);
    }
    p
}

fn image_paragraph(image: &EmbeddedImage) -> Paragraph {
    let (width, height) = image.extent_emu();
    let pic = Pic::new(&image.png).size(width, height);
    Paragraph::new()
        .add_run(Run::new().add_image(pic))
        .align(AlignmentType::Center)
}

fn table_of(table: &StyledTable) -> Table {
    let rows = table
        .rows
        .iter()
        .map(|cells| {
            TableRow::new(
                cells
                    .iter()
                    .map(|cell| {
                        let mut text = Run::new().add_text(cell.text.as_str()).size(table.size);
                        if cell.bold {
                            text = text.bold();
                        }
                        TableCell::new().add_paragraph(
                            Paragraph::new()
                                .add_run(text)
                                .align(alignment_type(cell.alignment)),
                        )
                    })
                    .collect(),
            )
        })
        .collect();

    Table::new(rows)
        .width(FULL_WIDTH_PCT, WidthType::Pct)
        .set_borders(borders())
}

fn borders() -> TableBorders {
    let border = |position: TableBorderPosition, color: &str| {
        TableBorder::new(position)
            .size(BORDER_SIZE)
            .color(color)
            .border_type(BorderType::Single)
    };
    TableBorders::new()
        .set(border(TableBorderPosition::Top, OUTER_BORDER_COLOR))
        .set(border(TableBorderPosition::Left, OUTER_BORDER_COLOR))
        .set(border(TableBorderPosition::Bottom, OUTER_BORDER_COLOR))
        .set(border(TableBorderPosition::Right, OUTER_BORDER_COLOR))
        .set(border(TableBorderPosition::InsideH, INNER_BORDER_COLOR))
        .set(border(TableBorderPosition::InsideV, INNER_BORDER_COLOR))
}
