//! Table row candidacy and grouping.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Alignment, Block, ClassifiedLine, HeadingCue, LineRole, Table, TableRow};
use crate::report::{ReconstructionReport, WarningKind};

use super::classify::is_caps;
use super::LayoutProfile;

/// Cell delimiter, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Pipe,
    Comma,
    Tab,
    /// Two or more consecutive whitespace characters
    Spaces,
}

fn spaces_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").unwrap())
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[\d,.$%]+\s*$").unwrap())
}

/// The highest-precedence delimiter present in `text`.
pub fn delimiter_of(text: &str, profile: &LayoutProfile) -> Option<Delimiter> {
    if text.contains('|') {
        Some(Delimiter::Pipe)
    } else if profile.comma_delimits_cells && text.contains(',') {
        Some(Delimiter::Comma)
    } else if text.contains('\t') {
        Some(Delimiter::Tab)
    } else if spaces_regex().is_match(text.trim()) {
        Some(Delimiter::Spaces)
    } else {
        None
    }
}

/// Split a line into trimmed, non-empty cells.
///
/// Returns `None` when no delimiter is present or no cell has text.
pub fn split_cells(text: &str, profile: &LayoutProfile) -> Option<(Delimiter, Vec<String>)> {
    let delimiter = delimiter_of(text, profile)?;
    let parts: Vec<&str> = match delimiter {
        Delimiter::Pipe => text.split('|').collect(),
        Delimiter::Comma => text.split(',').collect(),
        Delimiter::Tab => text.split('\t').collect(),
        Delimiter::Spaces => spaces_regex().split(text.trim()).collect(),
    };
    let cells: Vec<String> = parts
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if cells.is_empty() {
        None
    } else {
        Some((delimiter, cells))
    }
}

/// Whether a cell looks like a number or an amount.
pub fn is_numeric_cell(text: &str) -> bool {
    numeric_regex().is_match(text)
}

/// Cells of a line as a table row, if the line is a candidate.
///
/// Paragraph lines qualify on any delimiter. Upper-case headings qualify
/// only when they split into at least two cells on something other than a
/// comma, so short caps titles stay headings. Bullets and size-based
/// headings never qualify.
pub fn row_cells(line: &ClassifiedLine, profile: &LayoutProfile) -> Option<Vec<String>> {
    let from_heading = match (line.role, line.heading_cue) {
        (LineRole::Paragraph, _) | (LineRole::TableRow, None) => false,
        (LineRole::Heading | LineRole::TableRow, Some(HeadingCue::Caps | HeadingCue::BoldCaps)) => {
            true
        }
        _ => return None,
    };
    let (delimiter, cells) = split_cells(&line.line.column_text(profile.column_gap), profile)?;
    if from_heading && (delimiter == Delimiter::Comma || cells.len() < 2) {
        return None;
    }
    Some(cells)
}

/// Mark table row candidates among classified lines.
pub fn mark_candidates(lines: &mut [ClassifiedLine], profile: &LayoutProfile) {
    for line in lines.iter_mut() {
        if row_cells(line, profile).is_some() {
            line.role = LineRole::TableRow;
        }
    }
}

/// Merge runs of consecutive table rows into tables.
///
/// A run of one row, or a run that cannot be normalized, degrades to the
/// blocks its rows came from.
pub fn group_table_rows(
    blocks: Vec<Block>,
    profile: &LayoutProfile,
    report: &mut ReconstructionReport,
) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut run: Vec<TableRow> = Vec::new();
    let mut page = 1u32;
    let mut runs = 0usize;

    for block in blocks {
        match block {
            Block::TableRow(row) => run.push(row),
            other => {
                if !run.is_empty() {
                    runs += 1;
                    flush_run(std::mem::take(&mut run), page, profile, report, &mut out);
                }
                if matches!(other, Block::PageBreak) {
                    page += 1;
                }
                out.push(other);
            }
        }
    }
    if !run.is_empty() {
        runs += 1;
        flush_run(run, page, profile, report, &mut out);
    }

    log::debug!("grouped {} row runs", runs);
    out
}

fn flush_run(
    run: Vec<TableRow>,
    page: u32,
    profile: &LayoutProfile,
    report: &mut ReconstructionReport,
    out: &mut Vec<Block>,
) {
    if run.len() < 2 {
        out.extend(run.into_iter().map(TableRow::into_fallback));
        return;
    }

    match build_table(&run, profile) {
        Ok(table) => out.push(Block::Table(table)),
        Err(e) => {
            report.warn(WarningKind::TableParse, Some(page), e.to_string());
            out.extend(run.into_iter().map(TableRow::into_fallback));
        }
    }
}

/// Normalize a run of two or more rows into a table.
pub fn build_table(run: &[TableRow], profile: &LayoutProfile) -> Result<Table> {
    if let Some(i) = run.iter().position(|r| !r.has_content()) {
        return Err(Error::TableParse(format!("row {} of the run has no cells", i + 1)));
    }
    let columns = run.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    if columns > profile.max_table_columns {
        return Err(Error::TableParse(format!(
            "{} columns exceeds the limit of {}",
            columns, profile.max_table_columns
        )));
    }

    let first = &run[0];
    let filled: Vec<&String> = first.cells.iter().filter(|c| !c.trim().is_empty()).collect();
    let header = filled.iter().any(|c| c.chars().any(char::is_alphabetic))
        && filled.iter().all(|c| is_caps_or_symbol(c));
    let header_alignment = match first.fallback.as_deref() {
        Some(Block::Paragraph { alignment, .. }) | Some(Block::Heading { alignment, .. })
            if *alignment != Alignment::Left =>
        {
            *alignment
        }
        _ => Alignment::Center,
    };

    let rows = run
        .iter()
        .map(|r| TableRow::new(r.cells.clone()))
        .collect();
    Ok(Table::from_rows(rows).with_header(header, header_alignment))
}

/// Cells without letters count as upper-cased in a header row.
fn is_caps_or_symbol(cell: &str) -> bool {
    is_caps(cell) || !cell.chars().any(char::is_alphabetic)
}
