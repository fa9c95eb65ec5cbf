//! line-blame - per-line blame of working-copy files
//!
//! # Usage
//! ```bash
//! line-blame /path/to/repository                    # Blame every tracked file
//! line-blame /path/to/repository src/lib.rs --pretty
//! line-blame . --rev v1.2 --author name --mailmap -j 8
//! ```
//!
//! Prints a JSON array with one entry per file whose history lines up with
//! its current content. Files with local line changes, untracked files and
//! case-mismatched paths are left out silently.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use line_blame::blame::{blame_files_parallel, CollectingSink};
use line_blame::config::{AuthorField, BlameConfig};
use line_blame::git::GitAnnotationSource;
use line_blame::models::FileBlameRequest;

/// Attribute each line of tracked files to the commit that last changed it
#[derive(Parser)]
#[command(name = "line-blame")]
#[command(about = "Per-line blame validated against the working copy", long_about = None)]
struct Cli {
    /// Path to the git repository
    #[arg(value_name = "REPO_PATH")]
    repo_path: PathBuf,

    /// Files to blame, relative to the repository root; all tracked files when omitted
    #[arg(value_name = "FILES")]
    files: Vec<String>,

    /// Revision to blame
    #[arg(long, default_value = "HEAD")]
    rev: String,

    /// Author field reported per line
    #[arg(long, value_enum, default_value_t = AuthorField::Email)]
    author: AuthorField,

    /// Map authors through .mailmap
    #[arg(long)]
    mailmap: bool,

    /// Follow only the first parent of merge commits
    #[arg(long)]
    first_parent: bool,

    /// Number of worker threads
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn config(&self) -> BlameConfig {
        BlameConfig {
            revision: self.rev.clone(),
            author_field: self.author,
            use_mailmap: self.mailmap,
            first_parent: self.first_parent,
            jobs: self.jobs,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    let jobs = config.jobs();

    let source = match GitAnnotationSource::open(&cli.repo_path, config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("✗ Failed to open repository: {}", e);
            eprintln!("  Path: {}", cli.repo_path.display());
            std::process::exit(1);
        }
    };

    source
        .repository()
        .workdir()
        .context("Repository has no working tree")?;
    // File arguments and listed paths are both relative to the opened directory.
    let root = source.repository().base().to_path_buf();

    let files = if cli.files.is_empty() {
        source.tracked_paths().context("Failed to list tracked files")?
    } else {
        cli.files.clone()
    };

    let mut requests = Vec::with_capacity(files.len());
    for file in &files {
        match FileBlameRequest::from_working_copy(&root, file) {
            Ok(request) => requests.push(request),
            Err(e) => tracing::warn!("Skipping {}: {}", file, e),
        }
    }

    let mut sink = CollectingSink::new();
    let report = blame_files_parallel(&requests, &source, &mut sink, jobs);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, sink.files())?;
    } else {
        serde_json::to_writer(&mut out, sink.files())?;
    }
    writeln!(out)?;
    out.flush()?;

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("✗ {}", failure.error);
        }
        std::process::exit(1);
    }

    Ok(())
}
