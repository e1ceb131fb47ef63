//! Command-line interface for textsnap.
//!
//! Walks a directory tree and writes every text file's contents, binary
//! placeholders, an ASCII project tree, and a summary into one artifact.

use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use textsnap::{SnapshotBuilder, SnapshotError, snapshot};

/// textsnap — dump a source tree into one reviewable text file
#[derive(Parser)]
#[command(name = "textsnap", version, about, long_about = None)]
struct Cli {
    /// Root directory to scan
    root: PathBuf,

    /// Output file to write
    output: PathBuf,

    /// Additional directory glob patterns to prune
    #[arg(long = "exclude-dirs", value_name = "PATTERN", num_args = 1..)]
    exclude_dirs: Vec<String>,

    /// Additional file basename glob patterns to skip
    #[arg(long = "exclude-files", value_name = "PATTERN", num_args = 1..)]
    exclude_files: Vec<String>,

    /// Follow symlinked directories
    #[arg(long)]
    followlinks: bool,

    /// Disable the built-in directory/file exclusion sets
    #[arg(long)]
    no_default_excludes: bool,

    /// Derive extra exclusion globs from every .gitignore under root
    #[arg(long)]
    respect_gitignore: bool,
}

fn main() {
    let cli = Cli::parse();
    let options = SnapshotBuilder::new(cli.root, cli.output)
        .exclude_dirs(cli.exclude_dirs)
        .exclude_files(cli.exclude_files)
        .follow_links(cli.followlinks)
        .use_default_excludes(!cli.no_default_excludes)
        .respect_gitignore(cli.respect_gitignore)
        .build();

    match snapshot(&options) {
        Ok(summary) => {
            println!(
                "Done. Text={}  Non-text={}  Wrote -> '{}'.",
                summary.text_files,
                summary.skipped,
                summary.output.display()
            );
        }
        Err(SnapshotError::NoFilesFound) => {
            eprintln!("No files found.");
            exit(1);
        }
        Err(e @ SnapshotError::RootNotADirectory(_)) => {
            eprintln!("Error: {e}.");
            exit(2);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit(2);
        }
    }
}
