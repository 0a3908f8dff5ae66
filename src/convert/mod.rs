//! Conversion strategies tried in order until one recovers text.
//!
//! Each [`ConversionStrategy`] turns a [`DocumentSource`] into an
//! [`Analysis`]. A [`StrategyChain`] runs its strategies in sequence and
//! keeps the first result that has at least one text-bearing block.
//!
//! # Example
//!
//! ```no_run
//! use pdfreflow::convert::StrategyChain;
//! use pdfreflow::layout::LayoutProfile;
//! use pdfreflow::parser::{ParseOptions, PdfParser};
//!
//! fn main() -> pdfreflow::Result<()> {
//!     let options = ParseOptions::default();
//!     let parser = PdfParser::open_with_options("document.pdf", options.clone())?;
//!     let analysis = StrategyChain::default().run(&parser, &LayoutProfile::default(), &options)?;
//!     println!("{} via {}", analysis.document.blocks.len(), analysis.report.strategy);
//!     Ok(())
//! }
//! ```

mod layout;
mod text_flow;

pub use layout::LayoutStrategy;
pub use text_flow::TextFlowStrategy;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::layout::{Analysis, LayoutProfile};
use crate::parser::{DocumentSource, ParseOptions};

/// One way of recovering a document from a source.
///
/// Implement this trait to add another conversion path to a chain.
pub trait ConversionStrategy: Send + Sync {
    /// Name recorded in the report of a successful run.
    fn name(&self) -> &str;

    /// Recover the document.
    fn run(
        &self,
        source: &dyn DocumentSource,
        profile: &LayoutProfile,
        options: &ParseOptions,
    ) -> Result<Analysis>;
}

/// The uniform success predicate: the run succeeded and recovered text.
pub fn is_success(result: &Result<Analysis>) -> bool {
    matches!(result, Ok(analysis) if analysis.document.has_text())
}

/// Ordered list of strategies.
#[derive(Clone)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn ConversionStrategy>>,
}

impl StrategyChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// A chain with only the positioned-layout strategy.
    pub fn layout_only() -> Self {
        let mut chain = Self::new();
        chain.register(Arc::new(LayoutStrategy));
        chain
    }

    /// Append a strategy; it runs after those already registered.
    pub fn register(&mut self, strategy: Arc<dyn ConversionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, strategy: Arc<dyn ConversionStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Strategy names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run strategies in order.
    ///
    /// Returns the first result with text. Otherwise the first
    /// successful (textless) result, otherwise the last error.
    pub fn run(
        &self,
        source: &dyn DocumentSource,
        profile: &LayoutProfile,
        options: &ParseOptions,
    ) -> Result<Analysis> {
        let mut first_ok: Option<(String, Analysis)> = None;
        let mut last_err: Option<Error> = None;

        for strategy in &self.strategies {
            log::debug!("trying strategy {}", strategy.name());
            let result = strategy.run(source, profile, options);
            if is_success(&result) {
                let mut analysis = result?;
                log::info!("strategy {} recovered the document", strategy.name());
                analysis.report.strategy = strategy.name().to_string();
                return Ok(analysis);
            }
            match result {
                Ok(analysis) => {
                    log::info!("strategy {} found no text", strategy.name());
                    if first_ok.is_none() {
                        first_ok = Some((strategy.name().to_string(), analysis));
                    }
                }
                Err(e) => {
                    log::warn!("strategy {} failed: {}", strategy.name(), e);
                    last_err = Some(e);
                }
            }
        }

        match (first_ok, last_err) {
            (Some((name, mut analysis)), _) => {
                analysis.report.strategy = name;
                Ok(analysis)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(Error::Extraction("no conversion strategy configured".into())),
        }
    }
}

impl Default for StrategyChain {
    /// Positioned layout first, then plain-text flow.
    fn default() -> Self {
        Self::new()
            .with(Arc::new(LayoutStrategy))
            .with(Arc::new(TextFlowStrategy))
    }
}
