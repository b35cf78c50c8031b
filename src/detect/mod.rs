//! Rule engine: anti-pattern detectors and the style checklist.
//!
//! Each detector is a plain function over a [`RuleInput`] and is listed in
//! the static [`DETECTORS`] registry. [`evaluate`] runs the enabled ones in
//! registry order. Findings from different detectors are never merged, so
//! two rules may report the same line.

mod bare_except;
mod defaults;
mod globals;
mod receiver;
mod runner;
mod style;
mod types;

pub use bare_except::lexical_bare_except;
pub use runner::{detector, evaluate, Detector, RuleInput, DETECTORS};
pub use style::{checklist, StyleChecklist};
pub use types::{
    AntiPatternSummary, DetectorFindings, Finding, FindingKind, FindingsPayload, Severity,
};
