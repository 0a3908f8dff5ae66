//! Heuristic thresholds for layout recovery.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Every threshold the layout engine uses, threaded through each stage.
///
/// Distances are in points unless noted. Swap profiles to tune recovery for
/// other page sizes or source producers without touching the stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutProfile {
    /// Vertical distance within which fragments share a line
    pub line_tolerance: f32,

    /// Max distance of a centered line's midpoint from the page center, as a
    /// fraction of the page width
    pub center_ratio: f32,

    /// How far past the left margin a centered line must start
    pub center_margin_offset: f32,

    /// How close to the right margin a right-aligned line must end
    pub right_edge_slack: f32,

    /// Fraction of the page width a right-aligned line must start past
    pub right_min_left_ratio: f32,

    /// Minimum characters of a justified line
    pub justify_min_len: usize,

    /// How close to the right margin a justified line must end
    pub justify_edge_slack: f32,

    /// How far past the left margin a justified line may start
    pub justify_left_slack: f32,

    /// Layout units per point (twentieths of a point)
    pub units_per_point: f32,

    /// Indentation floor for bullets, in layout units
    pub min_bullet_indent: u32,

    /// Font size above which a line is a level 2 heading
    pub heading_size: f32,

    /// Font size above which a line is a level 1 heading
    pub title_size: f32,

    /// Maximum characters of a bold upper-case heading
    pub bold_caps_max_len: usize,

    /// Maximum characters of a plain upper-case heading
    pub caps_max_len: usize,

    /// Percentile of fragment x positions taken as the left margin
    pub margin_percentile: f32,

    /// Left margin used when a document has no fragments
    pub default_margin: f32,

    /// Characters recognised as bullet markers
    pub bullet_glyphs: String,

    /// Whether commas delimit table cells
    pub comma_delimits_cells: bool,

    /// Indents within this many layout units of a more common indentation
    /// level snap to that level; 0 disables snapping
    pub indent_snap: u32,

    /// Horizontal gap between fragments that reads as a column break
    pub column_gap: f32,

    /// Runs wider than this are not tables
    pub max_table_columns: usize,

    /// Source images larger than this in both dimensions are page captures
    pub full_page_image_limit: u32,

    /// Left-aligned paragraphs longer than this render justified
    pub justify_promotion_len: usize,

    /// Fraction of the page height at top and bottom searched for running
    /// headers and footers
    pub furniture_band: f32,

    /// Drop running headers, footers and page numbers
    pub strip_page_furniture: bool,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            line_tolerance: 3.0,
            center_ratio: 0.06,
            center_margin_offset: 20.0,
            right_edge_slack: 10.0,
            right_min_left_ratio: 0.45,
            justify_min_len: 60,
            justify_edge_slack: 20.0,
            justify_left_slack: 30.0,
            units_per_point: 20.0,
            min_bullet_indent: 720,
            heading_size: 13.0,
            title_size: 18.0,
            bold_caps_max_len: 80,
            caps_max_len: 50,
            margin_percentile: 0.05,
            default_margin: 50.0,
            bullet_glyphs: "•·▪▫∙‣⁃◦".to_string(),
            comma_delimits_cells: true,
            indent_snap: 20,
            column_gap: 15.0,
            max_table_columns: 20,
            full_page_image_limit: 1000,
            justify_promotion_len: 100,
            furniture_band: 0.08,
            strip_page_furniture: false,
        }
    }
}

impl LayoutProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a profile from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| Error::Profile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize the profile as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Profile(e.to_string()))
    }

    /// Set the line clustering tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the heading font-size thresholds.
    pub fn with_heading_sizes(mut self, heading: f32, title: f32) -> Self {
        self.heading_size = heading;
        self.title_size = title;
        self
    }

    /// Enable or disable commas as cell delimiters.
    pub fn with_comma_cells(mut self, enabled: bool) -> Self {
        self.comma_delimits_cells = enabled;
        self
    }

    /// Enable or disable stripping of running headers and footers.
    pub fn with_furniture_stripping(mut self, strip: bool) -> Self {
        self.strip_page_furniture = strip;
        self
    }

    /// Set the indentation snapping tolerance in layout units.
    pub fn with_indent_snap(mut self, units: u32) -> Self {
        self.indent_snap = units;
        self
    }

    /// Set the bullet marker characters.
    pub fn with_bullet_glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.bullet_glyphs = glyphs.into();
        self
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("line_tolerance", self.line_tolerance),
            ("center_ratio", self.center_ratio),
            ("center_margin_offset", self.center_margin_offset),
            ("right_edge_slack", self.right_edge_slack),
            ("right_min_left_ratio", self.right_min_left_ratio),
            ("justify_edge_slack", self.justify_edge_slack),
            ("justify_left_slack", self.justify_left_slack),
            ("units_per_point", self.units_per_point),
            ("heading_size", self.heading_size),
            ("title_size", self.title_size),
            ("margin_percentile", self.margin_percentile),
            ("default_margin", self.default_margin),
            ("column_gap", self.column_gap),
            ("furniture_band", self.furniture_band),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Profile(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.line_tolerance == 0.0 {
            return Err(Error::Profile("line_tolerance must be positive".to_string()));
        }
        if self.margin_percentile > 1.0 || self.furniture_band > 0.5 {
            return Err(Error::Profile(
                "margin_percentile and furniture_band are page fractions".to_string(),
            ));
        }
        if self.title_size < self.heading_size {
            return Err(Error::Profile(format!(
                "title_size {} is below heading_size {}",
                self.title_size, self.heading_size
            )));
        }
        if self.max_table_columns < 2 {
            return Err(Error::Profile("max_table_columns must be at least 2".to_string()));
        }
        Ok(())
    }

    /// Convert points to layout units.
    pub fn to_units(&self, points: f32) -> u32 {
        (points.max(0.0) * self.units_per_point).round() as u32
    }

    /// Whether `c` is a bullet marker.
    pub fn is_bullet_glyph(&self, c: char) -> bool {
        self.bullet_glyphs.contains(c)
    }
}
