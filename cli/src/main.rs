//! unoutline CLI - PDF title and heading outline extraction tool

mod batch;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoutline::{outline, render, JsonFormat, Outliner, ParseOptions, Rules};

use batch::{collect_inputs, load_source, BatchJob};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract title and heading outlines from PDF documents", long_about = None)]
struct Cli {
    /// Rules file overriding the built-in phrase lists and thresholds
    #[arg(long, global = true, value_name = "FILE", env = "UNOUTLINE_RULES")]
    rules: Option<PathBuf>,

    /// Skip pages whose content cannot be read instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Outline a single PDF (or a JSON source dump)
    Outline {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Outline every PDF in a directory, writing <stem>.json for each
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving the JSON records
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Number of worker threads (defaults to one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show body font size, detected type and candidate counts
    Profile {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump the extracted lines as a JSON source document
    Lines {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the active rules as JSON, e.g. to start a custom rules file
    Rules {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = if cli.lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    };

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            compact,
        } => cmd_outline(
            &input,
            output.as_deref(),
            compact,
            cli.rules.as_deref(),
            &options,
        ),
        Commands::Batch {
            input,
            output,
            jobs,
            compact,
        } => cmd_batch(
            &input,
            &output,
            jobs,
            compact,
            cli.rules.as_deref(),
            &options,
        ),
        Commands::Profile { input } => cmd_profile(&input, cli.rules.as_deref(), &options),
        Commands::Lines { input, output } => cmd_lines(&input, output.as_deref(), &options),
        Commands::Rules { output } => cmd_rules(output.as_deref(), cli.rules.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&Path>) -> unoutline::Result<Rules> {
    match path {
        Some(path) => Rules::from_path(path),
        None => Ok(Rules::default()),
    }
}

fn build_outliner(rules: Option<&Path>) -> unoutline::Result<Outliner> {
    Outliner::with_rules(load_rules(rules)?)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> std::io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    rules: Option<&Path>,
    options: &ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let outliner = build_outliner(rules)?;
    let source = load_source(input, options)?;
    let result = outliner.outline(&source)?;

    let json = render::to_json(&result, json_format(compact))?;
    write_or_print(output, &json)?;

    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    jobs: Option<usize>,
    compact: bool,
    rules: Option<&Path>,
    options: &ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let outliner = build_outliner(rules)?;
    let inputs = collect_inputs(input_dir)?;
    fs::create_dir_all(output_dir)?;

    if inputs.is_empty() {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            input_dir.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Outlining...");

    // One document per task; pages within a document are read sequentially.
    let options = options.clone().sequential();
    let job = BatchJob {
        outliner: &outliner,
        options: &options,
        format: json_format(compact),
    };

    let report = match jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()?
            .install(|| job.run(&inputs, output_dir, &pb)),
        None => job.run(&inputs, output_dir, &pb),
    };

    pb.finish_with_message("Done!");

    for (input, e) in &report.failed {
        eprintln!("{} {}: {}", "Failed".red(), input.display(), e);
    }

    println!(
        "\n{} {} written, {} failed",
        "Batch complete:".green().bold(),
        report.written.len(),
        report.failed.len()
    );
    println!("  {} {}", "└─".dimmed(), output_dir.display());

    Ok(())
}

fn cmd_profile(
    input: &Path,
    rules: Option<&Path>,
    options: &ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let outliner = build_outliner(rules)?;
    let source = load_source(input, options)?;
    let fragments = outline::normalize(&source)?;
    let profile = outliner.profile_fragments(&fragments, source.page_count)?;
    let result = outliner.assemble(&profile, &fragments);

    println!("{}", "Document Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), profile.page_count);
    println!("{}: {}", "Fragments".bold(), profile.fragment_count);
    println!("{}: {}", "Body font size".bold(), profile.body_font_size);
    println!("{}: {}", "Detected type".bold(), profile.detected_type);

    let matching = outliner
        .registry()
        .matching(&outline::DetectionInput::new(&fragments, source.page_count));
    if matching.len() > 1 {
        let others: Vec<_> = matching[1..].iter().map(|t| t.name()).collect();
        println!("{}: {}", "Also matched".bold(), others.join(", ").dimmed());
    }

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Title".bold(), result.title);
    for level in unoutline::HeadingLevel::ALL {
        println!("{}: {}", level.as_str().bold(), result.count_level(level));
    }

    Ok(())
}

fn cmd_lines(
    input: &Path,
    output: Option<&Path>,
    options: &ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = load_source(input, options)?;
    let json = serde_json::to_string_pretty(&source)?;
    write_or_print(output, &json)?;
    Ok(())
}

fn cmd_rules(output: Option<&Path>, rules: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = load_rules(rules)?.to_json()?;
    write_or_print(output, &json)?;
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
