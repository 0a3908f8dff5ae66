//! Plain-text fallback: page text laid out on a monospace grid.

use crate::error::Result;
use crate::layout::{analyze, Analysis, LayoutProfile};
use crate::parser::{synthesize_page, DocumentSource, ParseOptions, PlacedImage, SourcePage};

use super::ConversionStrategy;

/// Runs the layout engine over synthesized geometry from page text.
///
/// Images come from the source's image listing and follow the text of
/// their page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFlowStrategy;

impl ConversionStrategy for TextFlowStrategy {
    fn name(&self) -> &str {
        "text-flow"
    }

    fn run(
        &self,
        source: &dyn DocumentSource,
        profile: &LayoutProfile,
        options: &ParseOptions,
    ) -> Result<Analysis> {
        let mut pages: Vec<SourcePage> = source.text_pages()?.iter().map(synthesize_page).collect();

        if options.extract_images {
            match source.images() {
                Ok(images) => {
                    for block in images {
                        if let Some(page) = pages.iter_mut().find(|p| p.number == block.page) {
                            page.images.push(PlacedImage { top: None, block });
                        }
                    }
                }
                Err(e) => log::warn!("text flow: images unavailable: {}", e),
            }
        }

        Ok(analyze(pages, source.metadata(), profile, options.parallel))
    }
}
