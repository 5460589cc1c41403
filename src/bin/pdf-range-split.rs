//! PDF Range Split CLI tool
//!
//! Splits a PDF into multiple PDFs using page ranges from a CSV file.
//! Any path not given on the command line is prompted for.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use pdf_range_split::pdf::{output_dir_for, split_pdf, SplitOptions};

/// PDF Range Split - Split a PDF by page ranges listed in a CSV file
#[derive(Parser)]
#[command(name = "pdf-range-split")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Prompt for every path
    pdf-range-split

    # Fully non-interactive
    pdf-range-split -s submittal.pdf -r ranges.csv -o out

    # Open the output folder when done
    pdf-range-split -s submittal.pdf -r ranges.csv -o out --open")]
struct Cli {
    /// Source PDF to split
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// CSV file of page ranges (start, stop, filename)
    #[arg(short, long)]
    ranges: Option<PathBuf>,

    /// Base output directory; files go into a folder named after the source
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Don't print the CSV format instructions before prompting
    #[arg(short, long)]
    quiet: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Open the output folder after splitting
    #[arg(long)]
    open: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let interactive = cli.source.is_none() || cli.ranges.is_none() || cli.output_dir.is_none();
    if interactive && !cli.quiet {
        print_startup_instructions();
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let source = path_or_prompt(cli.source, &mut input, "Enter filepath of source PDF: ")?;
    let ranges = path_or_prompt(cli.ranges, &mut input, "Enter ranges CSV filepath: ")?;
    let output_base = path_or_prompt(
        cli.output_dir,
        &mut input,
        "Enter base output directory path: ",
    )?;

    let options = SplitOptions {
        source,
        ranges,
        output_base,
    };

    println!(
        "Output folder: {}",
        output_dir_for(&options.source, &options.output_base).display()
    );

    let report = split_pdf(&options, |slice| {
        println!(
            "[OK] {} (pages {}-{})",
            slice.path.display(),
            slice.start_page,
            slice.end_page
        );
    })?;

    println!("Done.");

    if cli.open {
        open_folder(&report.output_dir)?;
    }

    Ok(())
}

/// Use the path from the command line, or ask for one
fn path_or_prompt(
    given: Option<PathBuf>,
    input: &mut impl BufRead,
    prompt: &str,
) -> Result<PathBuf> {
    if let Some(path) = given {
        return Ok(path);
    }

    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read answer to: {}", prompt.trim()))?;
    if read == 0 {
        anyhow::bail!("No input for: {}", prompt.trim());
    }

    Ok(PathBuf::from(clean_path_input(&line)))
}

/// Strip whitespace and the quotes a file manager adds when copying a path
fn clean_path_input(line: &str) -> &str {
    line.trim().trim_matches('"').trim_matches('\'')
}

fn print_startup_instructions() {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("PDF Splitter - CSV Page Range Tool");
    println!("{}", rule);
    println!("\nThis program splits a source PDF into multiple PDFs");
    println!("based on page ranges defined in a CSV file.\n");
    println!("CSV FORMAT REQUIREMENTS:");
    println!("{}", "-".repeat(50));
    println!("Column 1: start_page  (1-based integer)");
    println!("Column 2: end_page    (1-based integer)");
    println!("Column 3: output_filename (with or without .pdf)");
    println!("\nExample CSV:");
    println!("start,stop,filename");
    println!("1,5,Introduction");
    println!("6,10,Chapter1.pdf");
    println!("11,20,Appendix");
    println!("\nNotes:");
    println!("- Pages are 1-based (first page = 1)");
    println!("- start_page must be <= end_page");
    println!("- Blank rows are ignored");
    println!("- A header row is allowed");
    println!("- Files will be saved into a new folder");
    println!("  named after the source PDF");
    println!("\n{}\n", rule);
}

/// Open a folder with the system file manager
fn open_folder(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("explorer").arg(path).spawn()?;
    }
    Ok(())
}
