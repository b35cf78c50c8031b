//! Module-level bindings that are not named like constants.
//!
//! This is a line-pattern check: any line that starts at column 0 with
//! `name = ...` or `name: T = ...` counts as a module-level binding. It does
//! not track scope, so a matching line inside a multi-line string or a
//! bracketed continuation is reported as well.

use lazy_static::lazy_static;
use regex::Regex;

use super::style::is_keyword;
use super::{Finding, FindingKind, RuleInput};

lazy_static! {
    /// `name = ...` or `name: T = ...`; quoted annotations may contain `=`.
    static ref MODULE_BINDING: Regex = Regex::new(
        r#"^([A-Za-z_]\w*)\s*(?::(?:[^='"]|'[^']*'|"[^"]*")*)?=(?:[^=]|$)"#
    )
    .unwrap();

    /// `MAX_SIZE`, `_DEFAULT_TIMEOUT`.
    static ref CONSTANT_NAME: Regex = Regex::new(r"^_*[A-Z][A-Z0-9_]*$").unwrap();
}

pub fn detect(input: &RuleInput) -> Vec<Finding> {
    input
        .source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let name = MODULE_BINDING.captures(line)?.get(1)?.as_str();
            if is_keyword(name) || CONSTANT_NAME.is_match(name) {
                return None;
            }
            Some(Finding::at_line(
                FindingKind::GlobalMutableState,
                i + 1,
                line,
                format!("module-level binding '{}' is mutable global state", name),
            ))
        })
        .collect()
}
