//! Report sections and output formatting.
//!
//! Supports two output formats:
//! - JSON: structured output for programmatic consumption
//! - Pretty: colored terminal output for human readability
//!
//! Every section serializes as `{"success": true, ...payload}` or
//! `{"success": false, "error": "..."}`. A failed section never hides the
//! content of a successful sibling.

use std::fmt;

use colored::*;
use serde::Serialize;

use crate::analysis::FactSet;
use crate::detect::{Finding, FindingsPayload, Severity};
use crate::env::ManifestScanResult;
use crate::error::Result;

/// One independently succeeding or failing part of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Section<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<T> From<Result<T>> for Section<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => Section::ok(payload),
            Err(err) => Section::failed(err),
        }
    }
}

/// Facts and findings for one source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub facts: Section<FactSet>,
    pub findings: Section<FindingsPayload>,
}

impl CodeReport {
    pub fn new(facts: Section<FactSet>, findings: Section<FindingsPayload>) -> Self {
        let error = facts
            .error()
            .or_else(|| findings.error())
            .map(str::to_string);
        Self {
            success: facts.success && findings.success,
            error,
            facts,
            findings,
        }
    }
}

/// The full report: code sections plus the environment snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub facts: Section<FactSet>,
    pub findings: Section<FindingsPayload>,
    pub environment: Section<ManifestScanResult>,
}

/// Merge independently produced sections into one report.
///
/// Performs no analysis of its own; each section keeps its own flag.
pub fn aggregate(
    facts: Section<FactSet>,
    findings: Section<FindingsPayload>,
    environment: Section<ManifestScanResult>,
) -> AnalysisReport {
    AnalysisReport {
        success: facts.success && findings.success && environment.success,
        facts,
        findings,
        environment,
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Render any report value as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write a report to stdout as JSON.
pub fn write_json<T: Serialize>(report: &T) -> serde_json::Result<()> {
    println!("{}", to_json(report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a code report for one unit in colored terminal format.
pub fn write_pretty(label: &str, report: &CodeReport) {
    println!();
    print!("  {}", "codeprobe".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", "Source: ".dimmed());
    println!("{}", label);
    println!();

    write_status(report.success);
    if let Some(error) = &report.error {
        println!("  {}", error.red());
        println!();
        return;
    }

    if let Some(facts) = report.facts.payload() {
        write_facts(facts);
    }
    if let Some(findings) = report.findings.payload() {
        write_findings(findings);
    }
}

/// Write an environment scan in colored terminal format.
pub fn write_environment_pretty(section: &Section<ManifestScanResult>) {
    println!();
    write_status(section.success);

    let Some(scan) = section.payload() else {
        if let Some(error) = section.error() {
            println!("  {}", error.red());
        }
        println!();
        return;
    };

    print!("  {}", "Project: ".dimmed());
    println!("{}", scan.project_path);
    println!();

    println!("  {} ({}):", "Manifests".bold(), scan.manifests_found.len());
    if scan.manifests_found.is_empty() {
        println!("    {}", "none found".dimmed());
    }
    for manifest in &scan.manifests_found {
        println!("    {}", manifest.blue());
    }
    println!();

    match scan.installed_packages.payload() {
        Some(list) => {
            println!("  {} ({}):", "Installed packages".bold(), list.len());
            for package in &list.packages {
                println!("    {:<32}{}", package.name, package.version.dimmed());
            }
        }
        None => {
            println!("  {}:", "Installed packages".bold());
            if let Some(error) = scan.installed_packages.error() {
                println!("    {}", error.yellow());
            }
        }
    }
    println!();
}

fn write_status(success: bool) {
    if success {
        println!("  {}", "✓ OK".green());
    } else {
        println!("  {}", "✗ FAILED".red());
    }
    println!();
}

fn write_facts(facts: &FactSet) {
    println!(
        "  {}  {} imports, {} calls, {} classes, {} variables",
        "Facts".bold(),
        facts.imports.len(),
        facts.calls.len(),
        facts.classes.len(),
        facts.variables.len()
    );
    for class in &facts.classes {
        println!(
            "    {} {}",
            format!("class {}", class.name).blue(),
            format!("[{}]", class.methods.join(", ")).dimmed()
        );
    }
    println!();
}

fn write_findings(payload: &FindingsPayload) {
    let findings: Vec<&Finding> = payload.all().collect();
    println!("  {} ({}):", "Findings".bold(), findings.len());
    println!();

    for f in findings {
        write_severity_tag(&f.severity);
        print!("   ");
        print!("{:<26}", f.kind.as_str().dimmed());
        println!("{}", format!("{}:{}", f.line, f.column).dimmed());
        println!("            {}", f.message);
        if !f.snippet.is_empty() {
            println!("            {}", f.snippet.dimmed());
        }
        println!();
    }

    let q = &payload.quality;
    println!("  {}:", "Style".bold());
    write_check("docstring", q.has_docstring);
    write_check("type hints", q.has_type_hints);
    write_check("error handling", q.has_error_handling);
    write_check("line length", q.no_long_lines);
    write_check("trailing whitespace", q.no_trailing_whitespace);
    write_check("no tabs", q.no_tabs);
    println!();
}

fn write_check(name: &str, passed: bool) {
    if passed {
        println!("    {} {}", "✓".green(), name);
    } else {
        println!("    {} {}", "✗".yellow(), name.dimmed());
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}
