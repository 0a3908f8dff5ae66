//! Line clustering: fragments to lines by vertical proximity.

use std::collections::BTreeMap;

use crate::model::{Line, PositionedFragment};

use super::LayoutProfile;

/// Group one page's fragments into lines, top of page first.
///
/// Fragments are bucketed by their distance from the page top, rounded to
/// the profile's line tolerance. A fragment taller than the tolerance may
/// land in a neighbouring line's bucket; no correction is applied.
pub fn cluster_lines(
    fragments: Vec<PositionedFragment>,
    page_height: f32,
    profile: &LayoutProfile,
) -> Vec<Line> {
    let tolerance = profile.line_tolerance.max(f32::EPSILON);
    let mut buckets: BTreeMap<i64, Vec<PositionedFragment>> = BTreeMap::new();

    for fragment in fragments {
        if fragment.is_blank() || !fragment.has_finite_geometry() {
            continue;
        }
        let key = ((page_height - fragment.y) / tolerance).round() as i64;
        buckets.entry(key).or_default().push(fragment);
    }

    let lines: Vec<Line> = buckets.into_values().filter_map(Line::from_fragments).collect();
    log::debug!("clustered {} lines", lines.len());
    lines
}
