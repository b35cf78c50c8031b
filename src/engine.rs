//! Engine entry points.

use std::path::Path;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::analysis::{extract, FactSet};
use crate::config::EngineOptions;
use crate::detect::{evaluate, FindingsPayload, RuleInput};
use crate::env::{self, ManifestScanResult, PackageQuery};
use crate::parser::{parse, SourceUnit};
use crate::report::{aggregate, AnalysisReport, CodeReport, Section};

/// Runs the analysis pipeline with fixed options.
///
/// Holds no state between calls, so one engine may be shared across
/// threads and every call sees a fresh parse.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
    cancel: Option<CancellationToken>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Checked before each detector; a cancelled token fails the findings.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Facts and findings for one source unit.
    pub fn analyze_unit(&self, unit: &SourceUnit) -> CodeReport {
        let (facts, findings) = self.code_sections(unit);
        CodeReport::new(facts, findings)
    }

    /// Facts and findings for inline source text.
    pub fn analyze_code(&self, text: &str) -> CodeReport {
        self.analyze_unit(&SourceUnit::inline(text))
    }

    /// Same pipeline as [`Engine::analyze_code`], applied to a candidate fix.
    pub fn validate_solution(&self, text: &str) -> CodeReport {
        self.analyze_code(text)
    }

    /// Manifest presence and installed packages for a project directory.
    pub fn analyze_dependencies(&self, path: &Path) -> Section<ManifestScanResult> {
        env::scan(path, self.options.package_query_timeout).into()
    }

    /// Like [`Engine::analyze_dependencies`] with a custom package query.
    pub fn analyze_dependencies_with(
        &self,
        path: &Path,
        query: &PackageQuery,
    ) -> Section<ManifestScanResult> {
        env::scan_blocking(path, query).into()
    }

    /// Async variant for callers already inside a tokio runtime.
    pub async fn analyze_dependencies_async(&self, path: &Path) -> Section<ManifestScanResult> {
        env::scan_async(path, self.options.package_query_timeout)
            .await
            .into()
    }

    /// Full report: code sections for `unit` plus the scan of `project`.
    pub fn analyze(&self, unit: &SourceUnit, project: &Path) -> AnalysisReport {
        let (facts, findings) = self.code_sections(unit);
        aggregate(facts, findings, self.analyze_dependencies(project))
    }

    /// Analyze independent units in parallel. Output order matches input.
    pub fn analyze_units(&self, units: &[SourceUnit]) -> Vec<CodeReport> {
        units.par_iter().map(|unit| self.analyze_unit(unit)).collect()
    }

    fn code_sections(&self, unit: &SourceUnit) -> (Section<FactSet>, Section<FindingsPayload>) {
        let tree = match parse(unit) {
            Ok(tree) => tree,
            Err(err) => {
                // Findings need the tree, so they fail with the same error.
                let message = err.to_string();
                return (Section::failed(&message), Section::failed(message));
            }
        };

        let facts = extract(&tree);
        let findings = evaluate(
            &RuleInput::new(&tree, &facts),
            &self.options,
            self.cancel.as_ref(),
        );
        (Section::ok(facts), findings.into())
    }
}
