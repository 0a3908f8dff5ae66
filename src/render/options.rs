//! Rendering options and configuration.

use chrono::{DateTime, Utc};

/// Twips per inch.
pub const TWIPS_PER_INCH: u32 = 1440;

/// Screen pixels per inch used for image sizing.
pub const PIXELS_PER_INCH: u32 = 96;

/// Options for rendering blocks into target constructs.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page width in layout units (twips)
    pub page_width: u32,

    /// Page height in layout units (twips)
    pub page_height: u32,

    /// Margins in layout units: top, right, bottom, left
    pub margins: Margins,

    /// Body text size in half-points
    pub body_size: usize,

    /// Heading sizes in half-points for levels 1, 2 and 3
    pub heading_sizes: [usize; 3],

    /// Optional line identifying the source at the top of the output
    pub banner: Option<Banner>,

    /// Add a caption paragraph under each embedded image
    pub image_captions: bool,
}

/// Page margins in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

/// Source identification placed before the content.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub source_name: String,
    /// Conversion time; leave unset for reproducible output
    pub timestamp: Option<DateTime<Utc>>,
}

impl Banner {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Banner text.
    pub fn text(&self) -> String {
        match self.timestamp {
            Some(ts) => format!(
                "Converted from {} on {}",
                self.source_name,
                ts.format("%Y-%m-%d %H:%M UTC")
            ),
            None => format!("Converted from {}", self.source_name),
        }
    }
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in layout units.
    pub fn with_page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the banner.
    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banner = Some(banner);
        self
    }

    /// Enable or disable image captions.
    pub fn with_image_captions(mut self, captions: bool) -> Self {
        self.image_captions = captions;
        self
    }

    /// Content area width in layout units.
    pub fn content_width(&self) -> u32 {
        self.page_width
            .saturating_sub(self.margins.left + self.margins.right)
    }

    /// Content area height in layout units.
    pub fn content_height(&self) -> u32 {
        self.page_height
            .saturating_sub(self.margins.top + self.margins.bottom)
    }

    /// Content area in pixels (width, height).
    pub fn content_pixels(&self) -> (u32, u32) {
        (
            self.content_width() * PIXELS_PER_INCH / TWIPS_PER_INCH,
            self.content_height() * PIXELS_PER_INCH / TWIPS_PER_INCH,
        )
    }

    /// Heading size for a level, clamped to the known tiers.
    pub fn heading_size(&self, level: u8) -> usize {
        let index = usize::from(level.clamp(1, 3)) - 1;
        self.heading_sizes[index]
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        // US Letter with one-inch margins
        Self {
            page_width: 12240,
            page_height: 15840,
            margins: Margins::uniform(TWIPS_PER_INCH),
            body_size: 22,
            heading_sizes: [32, 26, 22],
            banner: None,
            image_captions: false,
        }
    }
}
