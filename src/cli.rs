//! Command-line interface for codescope.
//!
//! The CLI owns all I/O: it walks the target tree, materializes the file
//! list, hands it to the engine, and renders the result. The engine itself
//! never touches the filesystem.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::files::{Language, SourceFile};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Default config file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["codescope.yaml", ".codescope.yaml"];

/// Directories never worth descending into.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".next",
    "out",
    "coverage",
    "target",
];

/// Files larger than this are skipped by the walk; the engine is linear in
/// input size but the CLI bounds total work up front.
const MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// Static source analysis engine - entity inventory, security findings, and
/// quality scoring for web codebases.
#[derive(Parser)]
#[command(name = "codescope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory tree
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover, fall back to defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Discover a config file in the current directory, if one exists.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Collect analyzable files under a root.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()) {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if Language::from_path(&path.to_string_lossy()) == Language::Other {
            continue;
        }
        if config.is_path_excluded(path) {
            continue;
        }
        if !config.include_tests && is_test_path(path) {
            continue;
        }
        if entry.metadata().map(|m| m.len() > MAX_FILE_BYTES).unwrap_or(true) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_test_path(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.contains(".test.")
        || name.contains(".spec.")
        || path
            .components()
            .any(|c| matches!(c.as_os_str().to_str(), Some("__tests__" | "tests" | "test")))
}

/// Read the collected paths into `SourceFile`s. Unreadable or non-UTF-8
/// files are skipped with a warning.
fn read_files(root: &Path, paths: &[PathBuf]) -> Vec<SourceFile> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} reading {pos}/{len} {wide_bar}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        bar.inc(1);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };
        let rel = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        sources.push(SourceFile::new(rel, content));
    }
    bar.finish_and_clear();
    sources
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if !matches!(args.format.as_str(), "pretty" | "json" | "sarif") {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match args.config.clone().or_else(discover_config) {
        Some(path) => match Config::parse_file(&path) {
            Ok(c) => c,
            Err(err) => {
                eprintln!("Error parsing config {:?}: {}", path, err);
                return Ok(EXIT_ERROR);
            }
        },
        None => Config::default(),
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, err);
            return Ok(EXIT_ERROR);
        }
    };

    let (root, paths) = if metadata.is_dir() {
        (args.path.clone(), collect_files(&args.path, &config)?)
    } else {
        let root = args
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (root, vec![args.path.clone()])
    };

    let sources = read_files(&root, &paths);
    let analysis = Analyzer::new(config).analyze(&sources);

    let path_str = args.path.to_string_lossy().to_string();
    match (&args.output, args.format.as_str()) {
        (Some(out_path), format) => {
            let mut out = std::fs::File::create(out_path)?;
            match format {
                "sarif" => report::write_sarif(&mut out, &analysis)?,
                // Pretty output is terminal-oriented; to a file we write
                // the JSON envelope for both "json" and "pretty".
                _ => report::write_json(&mut out, &path_str, &analysis)?,
            }
        }
        (None, "json") => report::write_json(&mut std::io::stdout(), &path_str, &analysis)?,
        (None, "sarif") => report::write_sarif(&mut std::io::stdout(), &analysis)?,
        (None, _) => report::write_pretty(&path_str, &analysis),
    }

    Ok(EXIT_SUCCESS)
}
