//! treewalk - lazy, filtered directory-tree walking.
//!
//! Usage:
//!   twk [PATH]                   List everything under PATH
//!   twk -d 2 [PATH]              Limit depth
//!   twk -e rs -e toml [PATH]     Filter by extension
//!   twk --format json [PATH]     JSON output, one entry per line
//!   twk --stream [PATH]          Drive the async walker instead
//!   twk --help                   Show help

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use futures::StreamExt;

use treewalk_engine::{walk, walk_async, Entry, ErrorHandler, PatternSet, WalkOptions};

#[derive(Parser)]
#[command(
    name = "treewalk",
    version,
    about = "Walk a directory tree lazily with depth, extension, and pattern filters"
)]
struct Cli {
    /// Root path to walk (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Maximum depth (direct children of the root are depth 1)
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Only yield entries with one of these extensions (repeatable)
    #[arg(short = 'e', long = "ext")]
    exts: Vec<String>,

    /// Only yield entries matching one of these glob patterns (repeatable)
    #[arg(short = 'm', long = "match")]
    include: Vec<String>,

    /// Exclude entries matching one of these glob patterns (repeatable)
    #[arg(short = 's', long = "skip")]
    skip: Vec<String>,

    /// Follow symbolic links (with cycle detection)
    #[arg(short = 'L', long)]
    follow: bool,

    /// Drive the suspending walker over a tokio runtime
    #[arg(long)]
    stream: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let options = build_options(&cli)?;

    if cli.stream {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let stream = walk_async(&cli.path, options).into_stream();
            tokio::pin!(stream);
            while let Some(entry) = stream.next().await {
                print_entry(&entry?, cli.format)?;
            }
            Ok::<_, color_eyre::eyre::Error>(())
        })?;
    } else {
        for entry in walk(&cli.path, options) {
            print_entry(&entry?, cli.format)?;
        }
    }

    Ok(())
}

fn build_options(cli: &Cli) -> Result<WalkOptions> {
    let mut builder = WalkOptions::builder();
    builder.follow_symlinks(cli.follow);
    if let Some(depth) = cli.max_depth {
        builder.max_depth(depth);
    }
    if !cli.exts.is_empty() {
        builder.exts(cli.exts.clone());
    }
    if !cli.include.is_empty() {
        builder.include(PatternSet::new(cli.include.clone())?);
    }
    if !cli.skip.is_empty() {
        builder.skip(PatternSet::new(cli.skip.clone())?);
    }

    // Traversal errors become warnings; the walk keeps going.
    let handler: ErrorHandler = std::sync::Arc::new(|err| {
        eprintln!("warning: {err}");
    });
    builder.on_error(handler);

    Ok(builder.build()?)
}

fn print_entry(entry: &Entry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if entry.is_dir() {
                println!("{}/", entry.path.display());
            } else {
                println!("{}", entry.path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(entry)?);
        }
    }
    Ok(())
}
