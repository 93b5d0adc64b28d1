use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use phpspec_rewriter::{Config, TypeHintIndex, TypeHintRewriter};

/// Strip parameter type hints from PHP specification classes.
///
/// Every typed parameter of a spec-class method loses its type hint in the
/// output; the declared types are collected into an index that can be
/// dumped as JSON.
#[derive(Parser, Debug)]
#[command(name = "phpspec-rewrite", version, about)]
struct Cli {
    /// Files or directories to rewrite.  Directories are walked recursively,
    /// honouring `.gitignore`.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Config file to use instead of the discovered one.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the collected type-hint index to this file as JSON.
    #[arg(long, value_name = "FILE")]
    index_json: Option<PathBuf>,

    /// Overwrite each file with its rewritten source instead of printing it.
    #[arg(long)]
    in_place: bool,

    /// Log debug output to stderr (overridden by `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match Config::load(cli.config.as_deref(), &working_dir) {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            return ExitCode::from(2);
        }
    };

    let index = Arc::new(TypeHintIndex::new());
    let mut rewriter = TypeHintRewriter::new(index.clone()).with_naming(config.naming());

    let files = collect_files(&cli.paths, &config);
    tracing::debug!(files = files.len(), "collected input files");

    let mut failures = 0usize;
    let stdout = io::stdout();
    for file in &files {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                tracing::error!(file = %file.display(), error = %err, "cannot read file");
                failures += 1;
                continue;
            }
        };

        let rewritten = match rewriter.rewrite(&source) {
            Ok(rewritten) => rewritten,
            Err(err) => {
                tracing::error!(file = %file.display(), "rewrite failed");
                report(&err);
                failures += 1;
                continue;
            }
        };

        let written = if cli.in_place {
            if rewritten == source {
                Ok(())
            } else {
                std::fs::write(file, &rewritten)
            }
        } else {
            let mut out = stdout.lock();
            writeln!(out, "// {}", file.display()).and_then(|_| out.write_all(rewritten.as_bytes()))
        };
        if let Err(err) = written {
            tracing::error!(file = %file.display(), error = %err, "cannot write output");
            failures += 1;
        }
    }

    if let Some(path) = &cli.index_json
        && let Err(err) = write_index(path, &index)
    {
        tracing::error!(path = %path.display(), error = %err, "cannot write index");
        failures += 1;
    }

    if failures > 0 {
        eprintln!("{} of {} file(s) failed", failures, files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Expand directories into the files matching the configured extensions.
/// Explicit file arguments are always taken.
fn collect_files(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in ignore::WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && config.wants(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => tracing::warn!(error = %err, "skipping unreadable entry"),
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn write_index(path: &Path, index: &TypeHintIndex) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&index.snapshot())?;
    std::fs::write(path, json)
}

/// Print an error and its source chain to stderr.
fn report(err: &dyn std::error::Error) {
    eprintln!("error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
