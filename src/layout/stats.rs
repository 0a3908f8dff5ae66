//! Whole-document statistics used as context for line classification.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::Line;

use super::{LayoutProfile, PageLines};

/// Aggregates computed once per document, before any line is classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentStats {
    /// Percentile left x over all fragments
    pub left_margin: f32,
    pub page_count: usize,
    pub line_count: usize,
    /// Longest line, in characters
    pub max_line_len: usize,
    /// Mean line length, in characters
    pub avg_line_len: f32,
    /// Line count per indentation (layout units past the left margin)
    pub indent_histogram: BTreeMap<u32, usize>,
    /// Normalised texts repeated in the header or footer band across pages
    pub running_texts: BTreeSet<String>,
    /// Fraction of the page height forming the header and footer bands
    pub furniture_band: f32,
}

impl DocumentStats {
    /// Compute statistics over every clustered page.
    pub fn compute(pages: &[PageLines], profile: &LayoutProfile) -> Self {
        let left_margin = left_margin(pages, profile);

        let mut line_count = 0;
        let mut max_line_len = 0;
        let mut total_len = 0;
        let mut indent_histogram = BTreeMap::new();
        let mut band_pages: HashMap<String, BTreeSet<u32>> = HashMap::new();

        for page in pages {
            for line in &page.lines {
                let len = line.text_len();
                line_count += 1;
                total_len += len;
                max_line_len = max_line_len.max(len);
                *indent_histogram
                    .entry(profile.to_units(line.left_edge - left_margin))
                    .or_insert(0) += 1;

                if in_band(line, page.height, profile.furniture_band) {
                    band_pages
                        .entry(normalize(&line.full_text))
                        .or_default()
                        .insert(page.number);
                }
            }
        }

        let page_count = pages.len();
        let running_texts = band_pages
            .into_iter()
            .filter(|(_, seen)| seen.len() >= 2 && seen.len() * 2 >= page_count)
            .map(|(text, _)| text)
            .collect();

        Self {
            left_margin,
            page_count,
            line_count,
            max_line_len,
            avg_line_len: if line_count == 0 {
                0.0
            } else {
                total_len as f32 / line_count as f32
            },
            indent_histogram,
            running_texts,
            furniture_band: profile.furniture_band,
        }
    }

    /// Right margin for a page of the given width.
    pub fn right_margin(&self, page_width: f32) -> f32 {
        page_width - self.left_margin
    }

    /// Most common indentation other than zero, if any.
    pub fn dominant_indent(&self) -> Option<u32> {
        self.indent_histogram
            .iter()
            .filter(|(indent, _)| **indent > 0)
            .max_by_key(|(indent, count)| (**count, std::cmp::Reverse(**indent)))
            .map(|(indent, _)| *indent)
    }

    /// Snap an indentation to the most common histogram level within
    /// `tolerance` layout units, so baseline jitter does not produce
    /// near-duplicate indents. Ties go to the nearer, then the smaller level.
    pub fn snap_indent(&self, indent: u32, tolerance: u32) -> u32 {
        if tolerance == 0 {
            return indent;
        }
        self.indent_histogram
            .range(indent.saturating_sub(tolerance)..=indent.saturating_add(tolerance))
            .max_by_key(|(level, count)| {
                (
                    **count,
                    std::cmp::Reverse(level.abs_diff(indent)),
                    std::cmp::Reverse(**level),
                )
            })
            .map(|(level, _)| *level)
            .unwrap_or(indent)
    }

    /// Whether a line is a running header, footer or page number.
    pub fn is_furniture(&self, line: &Line, page_height: f32) -> bool {
        if !in_band(line, page_height, self.furniture_band) {
            return false;
        }
        let key = normalize(&line.full_text);
        self.running_texts.contains(&key) || page_number_regex().is_match(&key)
    }
}

/// Percentile of fragment left edges; the profile default when empty.
fn left_margin(pages: &[PageLines], profile: &LayoutProfile) -> f32 {
    let mut xs: Vec<f32> = pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .flat_map(|l| l.fragments.iter().map(|f| f.x))
        .filter(|x| x.is_finite())
        .collect();
    if xs.is_empty() {
        return profile.default_margin;
    }
    xs.sort_by(f32::total_cmp);
    let index = ((xs.len() as f32 * profile.margin_percentile).floor() as usize).min(xs.len() - 1);
    xs[index]
}

fn in_band(line: &Line, page_height: f32, band: f32) -> bool {
    let edge = page_height * band;
    line.y > page_height - edge || line.y < edge
}

/// Lowercase the text and replace digits so page counters compare equal.
fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect::<String>()
        .to_lowercase()
}

fn page_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-–—]?\s*(page\s*)?#+(\s*(of|/)\s*#+)?\s*[-–—]?$").unwrap()
    })
}
