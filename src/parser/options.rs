//! Parsing options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for reading a PDF source.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to extract image XObjects
    pub extract_images: bool,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to read)
    pub pages: PageSelection,

    /// Abort when more pages than this are selected
    pub max_pages: Option<usize>,

    /// Abort when the source yields more fragments than this
    pub max_fragments: Option<usize>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Limit the number of pages processed.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Limit the number of fragments extracted.
    pub fn with_max_fragments(mut self, max: usize) -> Self {
        self.max_fragments = Some(max);
        self
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.error_mode == ErrorMode::Strict
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_images: true,
            parallel: true,
            pages: PageSelection::All,
            max_pages: None,
            max_fragments: None,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unreadable page
    #[default]
    Strict,
    /// Skip unreadable pages and continue
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    #[default]
    All,
    /// Inclusive range of pages
    Range(RangeInclusive<u32>),
    /// Explicit list of pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_page(start)?..=parse_page(end)?),
                None => pages.push(parse_page(part)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(s.trim().to_string())),
        Ok(n) => Ok(n),
    }
}
