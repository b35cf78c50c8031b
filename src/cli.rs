//! Command-line interface for codeprobe.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::EngineOptions;
use crate::engine::Engine;
use crate::parser::SourceUnit;
use crate::report::{self, CodeReport};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into when collecting sources.
const SKIPPED_DIRS: &[&str] = &["venv", "__pycache__", "node_modules"];

/// Static structure analysis for Python snippets.
///
/// Extracts imports, calls, classes and bindings, reports common
/// anti-patterns, and snapshots a project's dependency setup.
#[derive(Parser)]
#[command(name = "codeprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract facts and findings from a file or every .py file in a directory
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// Run the same pipeline over a proposed solution file
    Validate(ValidateArgs),
    /// Report dependency manifests and installed packages for a project
    Deps(DepsArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Also report methods that take no parameters at all
    #[arg(long)]
    pub receiverless: bool,
}

/// Arguments for the validate command.
#[derive(Parser)]
pub struct ValidateArgs {
    /// Python file holding the solution
    pub file: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the deps command.
#[derive(Parser)]
pub struct DepsArgs {
    /// Project directory
    pub dir: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Bound on the package-manager query, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,
}

/// A per-file report in directory output.
#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    #[serde(flatten)]
    report: &'a CodeReport,
}

fn check_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        return false;
    }
    true
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if metadata.is_dir() {
        collect_python_files(&args.path)?
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no Python files to analyze");
        return Ok(EXIT_SUCCESS);
    }

    let mut units = Vec::with_capacity(files.len());
    for file in &files {
        match SourceUnit::from_file(file) {
            Ok(unit) => units.push(unit),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let options = EngineOptions::new().report_receiverless_methods(args.receiverless);
    let engine = Engine::new(options);
    let reports = engine.analyze_units(&units);

    if args.format == "json" {
        if metadata.is_dir() {
            let entries: Vec<FileReport> = units
                .iter()
                .zip(&reports)
                .map(|(unit, report)| FileReport {
                    path: unit.label(),
                    report,
                })
                .collect();
            report::write_json(&entries)?;
        } else {
            report::write_json(&reports[0])?;
        }
    } else {
        for (unit, report) in units.iter().zip(&reports) {
            report::write_pretty(unit.label(), report);
        }
    }

    Ok(exit_code(reports.iter().all(|r| r.success)))
}

/// Run the validate command.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let unit = match SourceUnit::from_file(&args.file) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let report = Engine::default().validate_solution(unit.text());
    if args.format == "json" {
        report::write_json(&report)?;
    } else {
        report::write_pretty(unit.label(), &report);
    }

    Ok(exit_code(report.success))
}

/// Run the deps command.
pub fn run_deps(args: &DepsArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    match std::fs::metadata(&args.dir) {
        Ok(m) if m.is_dir() => {}
        Ok(_) => {
            eprintln!("Error: {:?} is not a directory", args.dir);
            return Ok(EXIT_ERROR);
        }
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.dir, e);
            return Ok(EXIT_ERROR);
        }
    }

    let options =
        EngineOptions::new().package_query_timeout(Duration::from_millis(args.timeout_ms));
    let section = Engine::new(options).analyze_dependencies(&args.dir);

    if args.format == "json" {
        report::write_json(&section)?;
    } else {
        report::write_environment_pretty(&section);
    }

    let packages_ok = section
        .payload()
        .is_some_and(|scan| scan.installed_packages.success);
    Ok(exit_code(section.success && packages_ok))
}

fn exit_code(success: bool) -> i32 {
    if success {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    }
}

/// Collect `.py` files under `root`, sorted for stable output.
pub fn collect_python_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories, which covers .venv and .git
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "py")
        {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
