//! Layout recovery: lines, classification and document assembly.
//!
//! Analysis runs in two passes. Pass 1 clusters every page into lines and
//! computes [`DocumentStats`]; pass 2 classifies each line against those
//! statistics, assembles blocks in page order and groups table rows.
//! Per-page work may run in parallel; results are always consumed in page
//! order.

mod assemble;
mod classify;
mod cluster;
mod profile;
mod stats;
mod table;

pub use assemble::{assemble, line_block, strip_marker, ClassifiedPage};
pub use classify::{is_caps, Classifier};
pub use cluster::cluster_lines;
pub use profile::LayoutProfile;
pub use stats::DocumentStats;
pub use table::{
    build_table, delimiter_of, group_table_rows, is_numeric_cell, mark_candidates, row_cells,
    split_cells, Delimiter,
};

use rayon::prelude::*;

use crate::model::{Document, Line, Metadata};
use crate::parser::{PlacedImage, SourcePage};
use crate::report::ReconstructionReport;

/// Lines of one page after clustering.
#[derive(Debug, Clone)]
pub struct PageLines {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    /// Top to bottom
    pub lines: Vec<Line>,
    pub images: Vec<PlacedImage>,
}

/// Result of analysing a document.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub document: Document,
    pub report: ReconstructionReport,
    pub stats: DocumentStats,
}

/// Pass 1: cluster every page.
pub fn cluster_pages(pages: Vec<SourcePage>, profile: &LayoutProfile, parallel: bool) -> Vec<PageLines> {
    let cluster = |page: SourcePage| PageLines {
        number: page.number,
        width: page.width,
        height: page.height,
        lines: cluster_lines(page.fragments, page.height, profile),
        images: page.images,
    };
    if parallel {
        pages.into_par_iter().map(cluster).collect()
    } else {
        pages.into_iter().map(cluster).collect()
    }
}

/// Pass 2 for one page: drop furniture if asked, classify, mark table rows.
fn classify_page(page: PageLines, stats: &DocumentStats, profile: &LayoutProfile) -> ClassifiedPage {
    let classifier = Classifier::new(profile, stats);
    let height = page.height;
    let mut lines: Vec<_> = page
        .lines
        .into_iter()
        .filter(|line| !(profile.strip_page_furniture && stats.is_furniture(line, height)))
        .enumerate()
        .map(|(index, line)| classifier.classify(line, page.number, index, page.width))
        .collect();
    mark_candidates(&mut lines, profile);
    ClassifiedPage {
        number: page.number,
        lines,
        images: page.images,
    }
}

/// Run the whole layout engine over extracted pages.
pub fn analyze(
    pages: Vec<SourcePage>,
    metadata: Metadata,
    profile: &LayoutProfile,
    parallel: bool,
) -> Analysis {
    let mut report = ReconstructionReport::new();
    report.page_count = pages.len() as u32;
    report.fragment_count = pages.iter().map(|p| p.fragments.len()).sum();
    for page in &pages {
        report.warnings.extend(page.warnings.iter().cloned());
    }

    let clustered = cluster_pages(pages, profile, parallel);
    let stats = DocumentStats::compute(&clustered, profile);
    report.line_count = stats.line_count;
    log::debug!(
        "{} lines over {} pages, left margin {:.1}",
        stats.line_count,
        stats.page_count,
        stats.left_margin
    );

    let classified: Vec<ClassifiedPage> = if parallel {
        clustered
            .into_par_iter()
            .map(|page| classify_page(page, &stats, profile))
            .collect()
    } else {
        clustered
            .into_iter()
            .map(|page| classify_page(page, &stats, profile))
            .collect()
    };

    let blocks = assemble(classified, profile);
    let blocks = group_table_rows(blocks, profile, &mut report);
    report.record_blocks(&blocks);

    Analysis {
        document: Document::with_blocks(metadata, blocks),
        report,
        stats,
    }
}
