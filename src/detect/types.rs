//! Core types for rule findings.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use super::style::StyleChecklist;

/// Severity levels for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// The anti-pattern a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    BareExcept,
    MutableDefaultArgument,
    MissingFirstParameter,
    MissingReceiver,
    GlobalMutableState,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::BareExcept => "bare-except",
            FindingKind::MutableDefaultArgument => "mutable-default-argument",
            FindingKind::MissingFirstParameter => "missing-first-parameter",
            FindingKind::MissingReceiver => "missing-receiver",
            FindingKind::GlobalMutableState => "global-mutable-state",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bare-except" => Some(FindingKind::BareExcept),
            "mutable-default-argument" => Some(FindingKind::MutableDefaultArgument),
            "missing-first-parameter" => Some(FindingKind::MissingFirstParameter),
            "missing-receiver" => Some(FindingKind::MissingReceiver),
            "global-mutable-state" => Some(FindingKind::GlobalMutableState),
            _ => None,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            FindingKind::BareExcept => Severity::Warning,
            FindingKind::MutableDefaultArgument => Severity::Error,
            FindingKind::MissingFirstParameter => Severity::Error,
            FindingKind::MissingReceiver => Severity::Error,
            FindingKind::GlobalMutableState => Severity::Info,
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single located anti-pattern occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
    /// The offending source text, first line only.
    pub snippet: String,
}

impl Finding {
    /// Build a finding located at a tree node.
    pub fn at_node(kind: FindingKind, node: Node, source: &[u8], message: String) -> Self {
        let position = node.start_position();
        let text = node.utf8_text(source).unwrap_or("");
        Self {
            kind,
            severity: kind.default_severity(),
            message,
            line: position.row + 1,
            column: position.column + 1,
            snippet: text.lines().next().unwrap_or("").trim_end().to_string(),
        }
    }

    /// Build a finding located at the start of a source line.
    pub fn at_line(kind: FindingKind, line: usize, text: &str, message: String) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message,
            line,
            column: 1,
            snippet: text.trim_end().to_string(),
        }
    }
}

/// Findings produced by one detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorFindings {
    pub detector: String,
    pub findings: Vec<Finding>,
}

/// Whole-unit flags summarizing which anti-patterns were seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiPatternSummary {
    pub bare_except: bool,
    pub global_variables: bool,
    pub mutable_defaults: bool,
}

/// Everything the rule engine reports for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsPayload {
    /// Per-detector findings, in registry order.
    pub detectors: Vec<DetectorFindings>,
    pub anti_patterns: AntiPatternSummary,
    /// Human-readable messages from the receiver-parameter rules.
    pub class_issues: Vec<String>,
    pub quality: StyleChecklist,
}

impl FindingsPayload {
    /// All findings across detectors, in registry order.
    pub fn all(&self) -> impl Iterator<Item = &Finding> {
        self.detectors.iter().flat_map(|d| d.findings.iter())
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: FindingKind) -> Vec<&Finding> {
        self.all().filter(|f| f.kind == kind).collect()
    }

    pub fn total(&self) -> usize {
        self.detectors.iter().map(|d| d.findings.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.all().any(|f| f.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            FindingKind::BareExcept,
            FindingKind::MutableDefaultArgument,
            FindingKind::MissingFirstParameter,
            FindingKind::MissingReceiver,
            FindingKind::GlobalMutableState,
        ] {
            assert_eq!(FindingKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
        assert_eq!(FindingKind::parse("line-too-long"), None);
    }

    #[test]
    fn test_at_line() {
        let finding = Finding::at_line(
            FindingKind::GlobalMutableState,
            3,
            "cache = {}   ",
            "module-level binding 'cache'".to_string(),
        );
        assert_eq!(finding.line, 3);
        assert_eq!(finding.column, 1);
        assert_eq!(finding.snippet, "cache = {}");
        assert_eq!(finding.severity, Severity::Info);
    }
}
