//! Detector registry and sequential evaluation.

use tokio_util::sync::CancellationToken;

use crate::analysis::FactSet;
use crate::config::EngineOptions;
use crate::error::{AnalysisError, Result};
use crate::parser::SyntaxTree;

use super::style::checklist;
use super::{
    bare_except, defaults, globals, receiver, AntiPatternSummary, DetectorFindings, Finding,
    FindingKind, FindingsPayload,
};

/// Everything a detector may look at for one unit.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub source: &'a str,
    pub facts: &'a FactSet,
    pub tree: &'a SyntaxTree,
}

impl<'a> RuleInput<'a> {
    pub fn new(tree: &'a SyntaxTree, facts: &'a FactSet) -> Self {
        Self {
            source: tree.source(),
            facts,
            tree,
        }
    }
}

/// One independent rule.
///
/// Detectors share nothing; each reads its input and returns its own list.
pub struct Detector {
    pub id: &'static str,
    pub kind: FindingKind,
    pub description: &'static str,
    /// Only run when the caller asks for it.
    pub opt_in: bool,
    pub run: fn(&RuleInput) -> Vec<Finding>,
}

impl Detector {
    pub fn enabled(&self, options: &EngineOptions) -> bool {
        !self.opt_in || options.report_receiverless_methods
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("id", &self.id)
            .field("opt_in", &self.opt_in)
            .finish()
    }
}

/// The fixed detector set, in reporting order.
pub static DETECTORS: &[Detector] = &[
    Detector {
        id: "bare-except",
        kind: FindingKind::BareExcept,
        description: "exception handler without an exception type",
        opt_in: false,
        run: bare_except::detect,
    },
    Detector {
        id: "mutable-default-argument",
        kind: FindingKind::MutableDefaultArgument,
        description: "parameter defaulting to an empty list or dict literal",
        opt_in: false,
        run: defaults::detect,
    },
    Detector {
        id: "missing-first-parameter",
        kind: FindingKind::MissingFirstParameter,
        description: "method whose first parameter is not the receiver",
        opt_in: false,
        run: receiver::detect_misnamed,
    },
    Detector {
        id: "missing-receiver",
        kind: FindingKind::MissingReceiver,
        description: "method that takes no parameters at all",
        opt_in: true,
        run: receiver::detect_receiverless,
    },
    Detector {
        id: "global-mutable-state",
        kind: FindingKind::GlobalMutableState,
        description: "module-level binding that is not an UPPER_CASE constant",
        opt_in: false,
        run: globals::detect,
    },
];

/// Look up a detector by id.
pub fn detector(id: &str) -> Option<&'static Detector> {
    DETECTORS.iter().find(|d| d.id == id)
}

/// Run every enabled detector and the style checklist over one unit.
///
/// Detectors run one after another; the token is checked before each.
pub fn evaluate(
    input: &RuleInput,
    options: &EngineOptions,
    cancel: Option<&CancellationToken>,
) -> Result<FindingsPayload> {
    let mut detectors = Vec::new();

    for detector in DETECTORS.iter().filter(|d| d.enabled(options)) {
        if cancel.is_some_and(|token| token.is_cancelled()) {
            tracing::debug!(detector = detector.id, "evaluation cancelled");
            return Err(AnalysisError::Cancelled);
        }

        let findings = (detector.run)(input);
        tracing::debug!(
            detector = detector.id,
            findings = findings.len(),
            "detector finished"
        );
        detectors.push(DetectorFindings {
            detector: detector.id.to_string(),
            findings,
        });
    }

    let any = |kind: FindingKind| {
        detectors
            .iter()
            .flat_map(|d| d.findings.iter())
            .any(|f| f.kind == kind)
    };
    let anti_patterns = AntiPatternSummary {
        bare_except: any(FindingKind::BareExcept),
        global_variables: any(FindingKind::GlobalMutableState),
        mutable_defaults: any(FindingKind::MutableDefaultArgument),
    };

    let class_issues = detectors
        .iter()
        .flat_map(|d| d.findings.iter())
        .filter(|f| {
            matches!(
                f.kind,
                FindingKind::MissingFirstParameter | FindingKind::MissingReceiver
            )
        })
        .map(|f| f.message.clone())
        .collect();

    Ok(FindingsPayload {
        detectors,
        anti_patterns,
        class_issues,
        quality: checklist(input.source),
    })
}
