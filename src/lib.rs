//! codeprobe - static structure analysis for Python snippets.
//!
//! Given one source unit, codeprobe builds a fact base (imports, call sites,
//! classes and their methods, simple variable bindings), runs a fixed set of
//! anti-pattern detectors and a style checklist over it, and returns a
//! structured report. Given a project directory it lists the dependency
//! manifests present and snapshots the installed packages.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter front-end, rejects invalid source
//! - `analysis`: single-pass fact extraction over a closed node view
//! - `detect`: detector registry and style checklist
//! - `env`: manifest presence and package-manager query
//! - `report`: per-section results, JSON and terminal output
//! - `engine`: entry points tying the above together
//!
//! Each report section succeeds or fails on its own. A syntax error fails
//! the code sections but never the environment scan, and a missing package
//! manager fails only the package inventory.
//!
//! ```no_run
//! let report = codeprobe::analyze_code("def f(data=[]):\n    pass\n");
//! assert!(report.success);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod env;
pub mod error;
pub mod parser;
pub mod report;

use std::path::Path;

pub use analysis::{extract, Binding, CallSite, ClassFacts, FactSet};
pub use config::EngineOptions;
pub use detect::{evaluate, Finding, FindingKind, FindingsPayload, RuleInput, StyleChecklist};
pub use engine::Engine;
pub use env::{scan, scan_async, InstalledPackage, ManifestScanResult, PackageList, PackageQuery};
pub use error::{AnalysisError, ErrorKind, Result};
pub use parser::{parse, SourceUnit, SyntaxTree};
pub use report::{aggregate, AnalysisReport, CodeReport, Section};

/// Facts and findings for `text` with default options.
pub fn analyze_code(text: &str) -> CodeReport {
    Engine::default().analyze_code(text)
}

/// Same computation as [`analyze_code`], for a proposed solution.
pub fn validate_solution(text: &str) -> CodeReport {
    Engine::default().validate_solution(text)
}

/// Environment scan of `path` with the default timeout.
pub fn analyze_dependencies(path: impl AsRef<Path>) -> Section<ManifestScanResult> {
    Engine::default().analyze_dependencies(path.as_ref())
}
