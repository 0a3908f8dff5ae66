//! Positioned-fragment layout recovery.

use crate::error::Result;
use crate::layout::{analyze, Analysis, LayoutProfile};
use crate::parser::{DocumentSource, ParseOptions};

use super::ConversionStrategy;

/// Runs the layout engine over the source's positioned fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutStrategy;

impl ConversionStrategy for LayoutStrategy {
    fn name(&self) -> &str {
        "layout"
    }

    fn run(
        &self,
        source: &dyn DocumentSource,
        profile: &LayoutProfile,
        options: &ParseOptions,
    ) -> Result<Analysis> {
        let pages = source.fragment_pages()?;
        Ok(analyze(pages, source.metadata(), profile, options.parallel))
    }
}
