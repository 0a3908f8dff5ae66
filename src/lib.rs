//! # pdfreflow
//!
//! Layout recovery engine that rebuilds fixed-layout PDF pages as editable
//! DOCX documents.
//!
//! PDF pages carry positioned text and no structure. pdfreflow clusters
//! fragments into lines, classifies each line (heading, paragraph, bullet,
//! table row) from geometry and whole-document statistics, assembles a
//! block sequence, groups table rows into tables and renders the result
//! with real paragraph, heading, list and table constructs.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfreflow::Result<()> {
//!     let docx = pdfreflow::reconstruct_file("document.pdf")?;
//!     std::fs::write("document.docx", docx)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structure recovery**: headings with levels, alignment, indentation, bullets
//! - **Tables**: delimiter-separated line runs become bordered grids
//! - **Images**: scaled into the content area, transparency flattened
//! - **Fallback**: plain-text layout when positioned text yields nothing
//! - **Parallel processing**: pages are read and classified with Rayon
//! - **Tunable**: every heuristic threshold lives in a [`LayoutProfile`]

pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;

// Re-export commonly used types
pub use convert::{ConversionStrategy, LayoutStrategy, StrategyChain, TextFlowStrategy};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use layout::{Analysis, DocumentStats, LayoutProfile};
pub use model::{
    Alignment, Block, Document, ImageBlock, ImageFormat, Metadata, PositionedFragment, Table,
    TableRow,
};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use render::{Banner, JsonFormat, Margins, RenderOptions};
pub use report::{ReconstructionReport, Warning, WarningKind};

use std::path::Path;

/// Rebuild PDF bytes as DOCX bytes with default settings.
///
/// Only an unreadable source is an error. A document without text still
/// produces output carrying a placeholder paragraph.
///
/// # Example
///
/// ```no_run
/// let pdf = std::fs::read("document.pdf")?;
/// let docx = pdfreflow::reconstruct(&pdf)?;
/// # Ok::<(), pdfreflow::Error>(())
/// ```
pub fn reconstruct(data: &[u8]) -> Result<Vec<u8>> {
    Ok(Reconstructor::new().run(data)?.bytes)
}

/// Rebuild a PDF file as DOCX bytes with default settings.
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(Reconstructor::new().run_file(path)?.bytes)
}

/// Recover the block sequence of a PDF without rendering it.
///
/// # Example
///
/// ```no_run
/// let pdf = std::fs::read("document.pdf")?;
/// let doc = pdfreflow::analyze_bytes(&pdf)?;
/// println!("{} blocks", doc.blocks.len());
/// # Ok::<(), pdfreflow::Error>(())
/// ```
pub fn analyze_bytes(data: &[u8]) -> Result<Document> {
    Ok(Reconstructor::new().analyze(data)?.document)
}

/// Rebuild a PDF file asynchronously.
///
/// The file is read with Tokio and the transform runs on the blocking pool.
#[cfg(feature = "async")]
pub async fn reconstruct_file_async<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let data = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || reconstruct(&data))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Builder for configured reconstructions.
///
/// # Example
///
/// ```no_run
/// use pdfreflow::{LayoutProfile, Reconstructor};
///
/// let result = Reconstructor::new()
///     .with_profile(LayoutProfile::default().with_comma_cells(false))
///     .lenient()
///     .run_file("document.pdf")?;
/// for warning in &result.report.warnings {
///     eprintln!("{}", warning.message);
/// }
/// std::fs::write("document.docx", &result.bytes)?;
/// # Ok::<(), pdfreflow::Error>(())
/// ```
#[derive(Clone)]
pub struct Reconstructor {
    profile: LayoutProfile,
    parse_options: ParseOptions,
    render_options: RenderOptions,
    chain: StrategyChain,
}

impl Reconstructor {
    /// Create a builder with default settings and the default strategy chain.
    pub fn new() -> Self {
        Self {
            profile: LayoutProfile::default(),
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            chain: StrategyChain::default(),
        }
    }

    /// Use a layout profile.
    pub fn with_profile(mut self, profile: LayoutProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Skip unreadable pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Leave images out of the output.
    pub fn without_images(mut self) -> Self {
        self.parse_options = self.parse_options.with_images(false);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Use only the positioned-layout strategy.
    pub fn without_fallback(mut self) -> Self {
        self.chain = StrategyChain::layout_only();
        self
    }

    /// Use a custom strategy chain.
    pub fn with_strategies(mut self, chain: StrategyChain) -> Self {
        self.chain = chain;
        self
    }

    /// Put a source banner at the top of the output.
    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.render_options = self.render_options.with_banner(banner);
        self
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Recover the document from PDF bytes without rendering.
    pub fn analyze(&self, data: &[u8]) -> Result<Analysis> {
        self.profile.validate()?;
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        self.analyze_source(&parser)
    }

    /// Recover the document from a PDF file without rendering.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Analysis> {
        self.profile.validate()?;
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        self.analyze_source(&parser)
    }

    /// Run the strategy chain over any document source.
    pub fn analyze_source(&self, source: &dyn parser::DocumentSource) -> Result<Analysis> {
        self.chain.run(source, &self.profile, &self.parse_options)
    }

    /// Rebuild PDF bytes.
    pub fn run(&self, data: &[u8]) -> Result<Reconstruction> {
        let analysis = self.analyze(data)?;
        self.render(analysis)
    }

    /// Rebuild a PDF file.
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<Reconstruction> {
        let analysis = self.analyze_file(path)?;
        self.render(analysis)
    }

    /// Render an analysis into DOCX bytes.
    pub fn render(&self, analysis: Analysis) -> Result<Reconstruction> {
        let Analysis {
            document,
            mut report,
            stats,
        } = analysis;
        let bytes = render::to_docx(&document, &self.render_options, &self.profile, &mut report)?;
        log::debug!(
            "{} bytes, {} warnings, strategy {}",
            bytes.len(),
            report.warnings.len(),
            report.strategy
        );
        Ok(Reconstruction {
            bytes,
            document,
            report,
            stats,
        })
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of a reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// DOCX package bytes
    pub bytes: Vec<u8>,
    /// The recovered block sequence
    pub document: Document,
    /// Counts and recovered degradations
    pub report: ReconstructionReport,
    /// Whole-document statistics used for classification
    pub stats: DocumentStats,
}

impl Reconstruction {
    /// Dump the recovered blocks as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Write the DOCX bytes to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}
