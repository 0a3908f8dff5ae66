//! Layout engine scenarios over hand-placed fragments.

use pdfreflow::layout::{analyze, Analysis, LayoutProfile};
use pdfreflow::parser::SourcePage;
use pdfreflow::render::{Construct, RenderOptions, Renderer};
use pdfreflow::{Alignment, Block, Metadata, PositionedFragment, ReconstructionReport};

const WIDTH: f32 = 612.0;
const HEIGHT: f32 = 792.0;
const SIZE: f32 = 11.0;

fn frag(text: &str, x: f32, y: f32, size: f32) -> PositionedFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    PositionedFragment::new(text, x, y, width, size)
}

/// A fragment whose right edge sits at `right`.
fn frag_right(text: &str, right: f32, y: f32, size: f32) -> PositionedFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    PositionedFragment::new(text, right - width, y, width, size)
}

fn centered(text: &str, y: f32, size: f32) -> PositionedFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    PositionedFragment::new(text, (WIDTH - width) / 2.0, y, width, size)
}

fn run(pages: Vec<Vec<PositionedFragment>>) -> Analysis {
    let pages = pages
        .into_iter()
        .enumerate()
        .map(|(i, fragments)| {
            SourcePage::new(i as u32 + 1, WIDTH, HEIGHT).with_fragments(fragments)
        })
        .collect();
    analyze(pages, Metadata::default(), &LayoutProfile::default(), false)
}

/// Block kind and alignment, the parts that must stay stable.
fn signature(blocks: &[Block]) -> Vec<(&'static str, Option<Alignment>)> {
    blocks
        .iter()
        .map(|b| match b {
            Block::Heading { alignment, .. } => ("heading", Some(*alignment)),
            Block::Paragraph { alignment, .. } => ("paragraph", Some(*alignment)),
            Block::Bullet { .. } => ("bullet", None),
            Block::TableRow(_) => ("row", None),
            Block::Table(_) => ("table", None),
            Block::Image(_) => ("image", None),
            Block::PageBreak => ("break", None),
        })
        .collect()
}

#[test]
fn test_right_aligned_total() {
    let analysis = run(vec![vec![
        frag("Invoice for services rendered", 72.0, 700.0, SIZE),
        frag_right("Total:     $1,200.00", 540.0, 680.0, SIZE),
    ]]);
    assert!(matches!(
        &analysis.document.blocks[1],
        Block::Paragraph { alignment: Alignment::Right, text, .. } if text.starts_with("Total:")
    ));
}

#[test]
fn test_pipe_table_without_caps_header() {
    let analysis = run(vec![vec![
        frag("Name | Role | Years", 72.0, 700.0, SIZE),
        frag("Ann | Eng | 5", 72.0, 686.0, SIZE),
        frag("Bo | PM | 3", 72.0, 672.0, SIZE),
    ]]);
    let blocks = &analysis.document.blocks;
    assert_eq!(blocks.len(), 1);
    let Block::Table(table) = &blocks[0] else {
        panic!("expected a table, got {:?}", blocks[0]);
    };
    assert_eq!(table.column_count, 3);
    assert_eq!(table.rows[1].cells, vec!["Ann", "Eng", "5"]);
    assert!(!table.header);
    assert_eq!(analysis.report.table_count, 1);
    assert_eq!(analysis.report.paragraph_count, 0);
}

#[test]
fn test_ragged_table_is_padded() {
    let analysis = run(vec![vec![
        frag("Item\tQty\tPrice", 72.0, 700.0, SIZE),
        frag("Bolt\t4", 72.0, 686.0, SIZE),
    ]]);
    let Block::Table(table) = &analysis.document.blocks[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.column_count, 3);
    assert_eq!(table.rows[1].cells, vec!["Bolt", "4", ""]);
}

#[test]
fn test_single_delimiter_line_is_not_a_table() {
    let analysis = run(vec![vec![
        frag("Dear reader,", 72.0, 700.0, SIZE),
        frag("thank you for reading this report.", 72.0, 660.0, SIZE),
    ]]);
    assert!(analysis
        .document
        .blocks
        .iter()
        .all(|b| !matches!(b, Block::Table(_))));
    assert!(matches!(
        &analysis.document.blocks[0],
        Block::Paragraph { text, .. } if text == "Dear reader,"
    ));
}

#[test]
fn test_caps_line_is_heading() {
    let analysis = run(vec![vec![
        frag("RESULTS AND DISCUSSION", 72.0, 700.0, SIZE),
        frag("The results follow.", 72.0, 680.0, SIZE),
    ]]);
    assert!(matches!(
        &analysis.document.blocks[0],
        Block::Heading { level: 3, .. }
    ));
}

#[test]
fn test_bullets_and_numbered_items() {
    let analysis = run(vec![vec![
        frag("Steps:", 72.0, 700.0, SIZE),
        frag("• Prepare the data", 72.0, 686.0, SIZE),
        frag("2) Run the model", 72.0, 672.0, SIZE),
    ]]);
    let blocks = &analysis.document.blocks;
    assert!(matches!(&blocks[1], Block::Bullet { text, indent, .. }
        if text == "Prepare the data" && *indent >= 720));
    assert!(matches!(&blocks[2], Block::Bullet { text, .. } if text == "Run the model"));
}

#[test]
fn test_fragments_in_any_order_cluster_into_lines() {
    let analysis = run(vec![vec![
        frag("world", 110.0, 699.0, SIZE),
        frag("second line", 72.0, 680.0, SIZE),
        frag("Hello", 72.0, 700.5, SIZE),
    ]]);
    let texts: Vec<String> = analysis
        .document
        .blocks
        .iter()
        .filter_map(Block::text)
        .collect();
    assert_eq!(texts, vec!["Hello world", "second line"]);
}

#[test]
fn test_page_breaks_between_pages_only() {
    let analysis = run(vec![
        vec![frag("one", 72.0, 700.0, SIZE)],
        vec![frag("two", 72.0, 700.0, SIZE)],
    ]);
    assert_eq!(
        signature(&analysis.document.blocks),
        vec![
            ("paragraph", Some(Alignment::Left)),
            ("break", None),
            ("paragraph", Some(Alignment::Left)),
        ]
    );

    let single = run(vec![vec![frag("one", 72.0, 700.0, SIZE)]]);
    assert_eq!(single.document.blocks.len(), 1);
}

#[test]
fn test_empty_source_has_no_content() {
    let analysis = run(vec![vec![PositionedFragment::new("   ", 72.0, 700.0, 10.0, SIZE)]]);
    assert!(!analysis.document.has_content());
}

/// Lay the rendered constructs back out as fragments on a fresh page.
fn reprint(constructs: &[Construct], margin: f32) -> Vec<PositionedFragment> {
    let mut fragments = Vec::new();
    let mut y = HEIGHT - margin;
    for construct in constructs {
        let Construct::Paragraph(para) = construct else {
            continue;
        };
        let text = para.text();
        if text.trim().is_empty() {
            continue;
        }
        let run = &para.runs[0];
        let size = run.size as f32 / 2.0;
        let width = text.chars().count() as f32 * size * 0.5;
        let x = match para.alignment {
            Alignment::Left | Alignment::Justify => margin + para.indent as f32 / 20.0,
            Alignment::Center => (WIDTH - width) / 2.0,
            Alignment::Right => WIDTH - margin - width,
        };
        fragments.push(PositionedFragment::new(text, x, y, width, size).with_bold(run.bold));
        y -= size * 2.0;
    }
    fragments
}

#[test]
fn test_classification_is_stable_through_rendering() {
    let first = run(vec![vec![
        centered("ANNUAL SUMMARY", 720.0, 20.0).with_bold(true),
        frag("This paragraph starts at the margin.", 72.0, 690.0, SIZE),
        frag("• First point", 90.0, 670.0, SIZE),
        frag_right("Total: $1,200.00", 540.0, 650.0, SIZE),
    ]]);

    let options = RenderOptions::default();
    let profile = LayoutProfile::default();
    let mut report = ReconstructionReport::new();
    let constructs = Renderer::new(&options, &profile).render(&first.document, &mut report);

    let second = run(vec![reprint(&constructs, 72.0)]);

    let expected = vec![
        ("heading", Some(Alignment::Center)),
        ("paragraph", Some(Alignment::Left)),
        ("bullet", None),
        ("paragraph", Some(Alignment::Right)),
    ];
    assert_eq!(signature(&first.document.blocks), expected);
    assert_eq!(signature(&second.document.blocks), expected);
}

#[test]
fn test_profile_thresholds_change_decisions() {
    let fragments = vec![frag("Subsection title", 72.0, 700.0, 12.5)];
    let default = run(vec![fragments.clone()]);
    assert!(matches!(default.document.blocks[0], Block::Paragraph { .. }));

    let profile = LayoutProfile::default().with_heading_sizes(12.0, 18.0);
    let page = SourcePage::new(1, WIDTH, HEIGHT).with_fragments(fragments);
    let tuned = analyze(vec![page], Metadata::default(), &profile, false);
    assert!(matches!(tuned.document.blocks[0], Block::Heading { .. }));
}
