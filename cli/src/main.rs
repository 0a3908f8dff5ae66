//! pdfreflow CLI - rebuild PDF documents as editable DOCX files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfreflow::{
    Analysis, Banner, JsonFormat, LayoutProfile, PageSelection, Reconstructor, WarningKind,
};

#[derive(Parser)]
#[command(name = "pdfreflow")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild PDF documents as editable DOCX files", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to DOCX
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input name with .docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,

        /// Only use positioned text, no plain-text fallback
        #[arg(long)]
        no_fallback: bool,

        /// Put a "Converted from" line at the top of the output
        #[arg(long)]
        banner: bool,
    },

    /// Print the recovered block structure as JSON
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show document information and layout statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the default layout profile as JSON
    Profile,
}

/// Options shared by commands that run the layout engine.
#[derive(clap::Args, Default)]
struct Settings {
    /// Layout profile JSON file
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip unreadable pages instead of failing
    #[arg(long)]
    lenient: bool,

    /// Leave images out
    #[arg(long)]
    no_images: bool,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,
}

impl Settings {
    fn reconstructor(&self) -> Result<Reconstructor, Box<dyn std::error::Error>> {
        let mut builder = Reconstructor::new();
        if let Some(path) = &self.profile {
            let json = fs::read_to_string(path)?;
            builder = builder.with_profile(LayoutProfile::from_json(&json)?);
        }
        if let Some(p) = &self.pages {
            let selection =
                PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
            builder = builder.with_pages(selection);
        }
        if self.lenient {
            builder = builder.lenient();
        }
        if self.no_images {
            builder = builder.without_images();
        }
        if self.sequential {
            builder = builder.sequential();
        }
        Ok(builder)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            settings,
            no_fallback,
            banner,
        }) => cmd_convert(&input, output.as_deref(), &settings, no_fallback, banner),
        Some(Commands::Inspect {
            input,
            compact,
            settings,
        }) => cmd_inspect(&input, compact, &settings),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Profile) => cmd_profile(),
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(
                    &input,
                    cli.output.as_deref(),
                    &Settings::default(),
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: pdfreflow <FILE> [OUTPUT]".yellow());
                println!("       pdfreflow --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
    no_fallback: bool,
    banner: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let mut builder = settings.reconstructor()?;
    if no_fallback {
        builder = builder.without_fallback();
    }
    if banner {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());
        builder = builder.with_banner(Banner::new(name));
    }

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Analyzing layout...");
    let analysis = builder.analyze_file(input)?;
    pb.inc(1);

    pb.set_message("Rendering DOCX...");
    let result = builder.render(analysis)?;
    pb.inc(1);

    pb.set_message("Writing output...");
    result.save(&output)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    let report = &result.report;
    log::info!(
        "{} -> {} via {} strategy, {} bytes",
        input.display(),
        output.display(),
        report.strategy,
        result.bytes.len()
    );
    println!("\n{} {}", "Saved to".green().bold(), output.display());
    println!("  {} strategy: {}", "├─".dimmed(), report.strategy);
    println!(
        "  {} {} headings, {} paragraphs, {} bullets, {} tables, {} images",
        "├─".dimmed(),
        report.heading_count,
        report.paragraph_count,
        report.bullet_count,
        report.table_count,
        report.image_count
    );
    println!("  {} {} warnings", "└─".dimmed(), report.warnings.len());

    for warning in &report.warnings {
        let location = warning
            .page
            .map(|p| format!("page {}: ", p))
            .unwrap_or_default();
        log::debug!("{:?} on page {:?}", warning.kind, warning.page);
        println!("{} {}{}", "warning:".yellow(), location, warning.message);
    }

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    compact: bool,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = settings.reconstructor()?.analyze_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", pdfreflow::render::to_json(&analysis.document, format)?);

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient, so metadata still shows when some pages are unreadable
    let Analysis {
        document,
        report,
        stats,
    } = Reconstructor::new().lenient().analyze_file(input)?;
    let metadata = &document.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Strategy".bold(), report.strategy);
    println!("{}: {}", "Fragments".bold(), report.fragment_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {:.1} pt", "Left margin".bold(), stats.left_margin);
    println!(
        "{}: {} max, {:.1} avg",
        "Line length".bold(),
        stats.max_line_len,
        stats.avg_line_len
    );
    if let Some(indent) = stats.dominant_indent() {
        println!("{}: {}", "Dominant indent".bold(), indent);
    }
    println!(
        "{}: {}",
        "Running headers/footers".bold(),
        stats.running_texts.len()
    );

    println!();
    println!("{}", "Recovered Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), report.heading_count);
    println!("{}: {}", "Paragraphs".bold(), report.paragraph_count);
    println!("{}: {}", "Bullets".bold(), report.bullet_count);
    println!("{}: {}", "Tables".bold(), report.table_count);
    println!("{}: {}", "Images".bold(), report.image_count);
    let skipped = report.count(WarningKind::PageSkipped);
    if skipped > 0 {
        println!("{}: {}", "Skipped pages".yellow().bold(), skipped);
    }

    Ok(())
}

fn cmd_profile() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", LayoutProfile::default().to_json()?);
    Ok(())
}
