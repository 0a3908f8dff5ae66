//! Block sequence to target constructs.

use crate::layout::{is_numeric_cell, LayoutProfile};
use crate::model::{Alignment, Block, Document, ImageBlock, Table};
use crate::report::{ReconstructionReport, WarningKind};

use super::construct::{Construct, StyledCell, StyledParagraph, StyledRun, StyledTable};
use super::image::prepare_image;
use super::RenderOptions;

/// Text of the block emitted for a document without content.
pub const EMPTY_PLACEHOLDER: &str = "No text content could be extracted from this document.";

const BULLET_PREFIX: &str = "• ";
const BULLET_HANGING: u32 = 360;
const NOTE_SIZE: usize = 18;
const NOTE_COLOR: &str = "666666";

/// Walks blocks and emits constructs, honoring upstream layout decisions.
pub struct Renderer<'a> {
    options: &'a RenderOptions,
    profile: &'a LayoutProfile,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a RenderOptions, profile: &'a LayoutProfile) -> Self {
        Self { options, profile }
    }

    /// Render a document. Recovered problems are recorded in `report`.
    pub fn render(&self, document: &Document, report: &mut ReconstructionReport) -> Vec<Construct> {
        let mut out = Vec::new();

        if let Some(banner) = &self.options.banner {
            out.push(Construct::Paragraph(
                self.note(banner.text())
                    .aligned(Alignment::Left)
                    .spacing(0, 240),
            ));
        }

        let mut body = Vec::new();
        let mut image_index = 0;
        for block in &document.blocks {
            self.render_block(block, &mut image_index, report, &mut body);
        }

        let visible = body.iter().any(|c| !matches!(c, Construct::PageBreak));
        if !document.has_text() || !visible {
            report.warn(
                WarningKind::EmptyDocument,
                None,
                "document has no usable text; emitting placeholder",
            );
            out.push(Construct::Paragraph(self.note(EMPTY_PLACEHOLDER.to_string())));
            if !visible {
                return out;
            }
        }

        out.extend(body);
        log::debug!("rendered {} constructs", out.len());
        out
    }

    fn render_block(
        &self,
        block: &Block,
        image_index: &mut usize,
        report: &mut ReconstructionReport,
        out: &mut Vec<Construct>,
    ) {
        match block {
            Block::Heading {
                level,
                text,
                alignment,
            } => {
                let (before, after) = if *level <= 1 { (360, 200) } else { (240, 160) };
                out.push(Construct::Paragraph(
                    StyledParagraph::single(
                        StyledRun::new(text.clone(), self.options.heading_size(*level)).bold(true),
                    )
                    .aligned(*alignment)
                    .spacing(before, after)
                    .styled(format!("Heading{}", (*level).clamp(1, 3))),
                ));
            }
            Block::Paragraph {
                text,
                alignment,
                indent,
                bold,
                italic,
            } => {
                let alignment = if *alignment == Alignment::Left
                    && text.chars().count() > self.profile.justify_promotion_len
                {
                    Alignment::Justify
                } else {
                    *alignment
                };
                out.push(Construct::Paragraph(
                    StyledParagraph::single(
                        StyledRun::new(text.clone(), self.options.body_size)
                            .bold(*bold)
                            .italic(*italic),
                    )
                    .aligned(alignment)
                    .indented(*indent, 0)
                    .spacing(120, 120),
                ));
            }
            Block::Bullet { text, indent, bold } => {
                out.push(Construct::Paragraph(
                    StyledParagraph::single(
                        StyledRun::new(format!("{}{}", BULLET_PREFIX, text), self.options.body_size)
                            .bold(*bold),
                    )
                    .indented((*indent).max(self.profile.min_bullet_indent), BULLET_HANGING)
                    .spacing(60, 60),
                ));
            }
            Block::TableRow(row) => {
                // rows normally arrive grouped; render a stray one as its origin
                let fallback = row.clone().into_fallback();
                self.render_block(&fallback, image_index, report, out);
            }
            Block::Table(table) => {
                out.push(Construct::Table(self.table(table)));
                out.push(Construct::Paragraph(
                    StyledParagraph::single(StyledRun::new("", self.options.body_size))
                        .spacing(0, 120),
                ));
            }
            Block::Image(image) => {
                *image_index += 1;
                self.image(image, *image_index, report, out);
            }
            Block::PageBreak => out.push(Construct::PageBreak),
        }
    }

    fn table(&self, table: &Table) -> StyledTable {
        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let header_row = table.header && i == 0;
                row.cells
                    .iter()
                    .map(|text| StyledCell {
                        text: text.clone(),
                        bold: header_row,
                        alignment: if is_numeric_cell(text) {
                            Alignment::Right
                        } else if header_row {
                            table.header_alignment
                        } else {
                            Alignment::Left
                        },
                    })
                    .collect()
            })
            .collect();
        StyledTable {
            rows,
            column_count: table.column_count,
            size: self.options.body_size,
        }
    }

    fn image(
        &self,
        image: &ImageBlock,
        index: usize,
        report: &mut ReconstructionReport,
        out: &mut Vec<Construct>,
    ) {
        let limit = self.profile.full_page_image_limit;
        if image.width > limit && image.height > limit {
            report.warn(
                WarningKind::ImageDropped,
                Some(image.page),
                format!(
                    "image {} ({}x{}) looks like a full-page capture; dropped",
                    index, image.width, image.height
                ),
            );
            return;
        }

        let (max_width, max_height) = self.options.content_pixels();
        match prepare_image(image, max_width, max_height) {
            Ok(embedded) => {
                out.push(Construct::Image(embedded));
                if self.options.image_captions {
                    out.push(Construct::Paragraph(
                        self.note(format!("Image {}", index))
                            .aligned(Alignment::Center)
                            .spacing(0, 120),
                    ));
                }
            }
            Err(e) => {
                report.warn(
                    WarningKind::ImageEmbed,
                    Some(image.page),
                    format!("image {}: {}", index, e),
                );
                out.push(Construct::Paragraph(self.note(format!(
                    "[Embedded Image {}: {}x{}px - Image could not be embedded: {}]",
                    index, image.width, image.height, e
                ))));
            }
        }
    }

    /// Small grey italic centered text.
    fn note(&self, text: String) -> StyledParagraph {
        StyledParagraph::single(
            StyledRun::new(text, NOTE_SIZE)
                .italic(true)
                .color(NOTE_COLOR),
        )
        .aligned(Alignment::Center)
        .spacing(120, 120)
    }
}
