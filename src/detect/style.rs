//! Whole-unit style checklist computed from raw text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::MAX_LINE_LENGTH;

lazy_static! {
    static ref RETURN_ANNOTATION: Regex = Regex::new(r"->\s*[A-Za-z_]").unwrap();
    static ref PARAMETER_ANNOTATION: Regex =
        Regex::new(r"\bdef\s+\w+\s*\([^)]*?\w\s*:\s*[A-Za-z_]").unwrap();
    static ref VARIABLE_ANNOTATION: Regex =
        Regex::new(r"^\s*([A-Za-z_]\w*)\s*:\s*[A-Za-z_]").unwrap();
}

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Python keywords, including the soft keywords `match` and `case`.
pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Presence/absence properties of a unit, reported as a flat checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleChecklist {
    pub has_docstring: bool,
    pub has_type_hints: bool,
    pub has_error_handling: bool,
    /// 1-indexed lines longer than the limit.
    pub long_lines: Vec<usize>,
    pub trailing_whitespace: Vec<usize>,
    pub tab_lines: Vec<usize>,
    pub no_long_lines: bool,
    pub no_trailing_whitespace: bool,
    pub no_tabs: bool,
    pub follows_pep8: bool,
}

/// Compute the checklist. Each predicate looks at the text independently.
pub fn checklist(text: &str) -> StyleChecklist {
    let mut long_lines = Vec::new();
    let mut trailing_whitespace = Vec::new();
    let mut tab_lines = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let number = i + 1;
        if line.chars().count() > MAX_LINE_LENGTH {
            long_lines.push(number);
        }
        if line.ends_with([' ', '\t']) {
            trailing_whitespace.push(number);
        }
        if line.contains('\t') {
            tab_lines.push(number);
        }
    }

    let no_long_lines = long_lines.is_empty();
    let no_trailing_whitespace = trailing_whitespace.is_empty();
    let no_tabs = tab_lines.is_empty();

    StyleChecklist {
        has_docstring: text.contains("\"\"\"") || text.contains("'''"),
        has_type_hints: has_type_hints(text),
        has_error_handling: text.contains("try:") && text.contains("except"),
        long_lines,
        trailing_whitespace,
        tab_lines,
        no_long_lines,
        no_trailing_whitespace,
        no_tabs,
        follows_pep8: no_long_lines && no_trailing_whitespace && no_tabs,
    }
}

fn has_type_hints(text: &str) -> bool {
    if RETURN_ANNOTATION.is_match(text) || PARAMETER_ANNOTATION.is_match(text) {
        return true;
    }
    text.lines().any(|line| {
        VARIABLE_ANNOTATION
            .captures(line)
            .and_then(|caps| caps.get(1))
            .is_some_and(|name| !is_keyword(name.as_str()))
    })
}
