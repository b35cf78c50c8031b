//! Exception handlers that catch everything.

use lazy_static::lazy_static;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::parser::python_language;

use super::{Finding, FindingKind, RuleInput};

const MESSAGE: &str = "bare 'except:' also catches SystemExit and KeyboardInterrupt";

lazy_static! {
    static ref HANDLER_QUERY: Query =
        Query::new(&python_language(), "(except_clause) @clause").expect("valid handler query");

    /// `except` followed directly by the block colon.
    static ref BARE_HANDLER_LINE: Regex = Regex::new(r"^\s*except\s*:").unwrap();
}

/// Structural check: handler clauses with no exception filter.
pub fn detect(input: &RuleInput) -> Vec<Finding> {
    let source = input.tree.source_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&HANDLER_QUERY, input.tree.root(), source);

    let mut findings = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if is_bare(capture.node) {
                findings.push(Finding::at_node(
                    FindingKind::BareExcept,
                    capture.node,
                    source,
                    MESSAGE.to_string(),
                ));
            }
        }
    }
    findings
}

fn is_bare(clause: Node) -> bool {
    let mut cursor = clause.walk();
    let bare = clause
        .named_children(&mut cursor)
        .all(|child| matches!(child.kind(), "block" | "comment"));
    bare
}

/// Line-based check for callers that only have text.
///
/// Does not understand strings, so an `except:` inside a multi-line string
/// literal is reported too.
pub fn lexical_bare_except(text: &str) -> Vec<Finding> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| BARE_HANDLER_LINE.is_match(line))
        .map(|(i, line)| {
            let mut finding =
                Finding::at_line(FindingKind::BareExcept, i + 1, line.trim_start(), MESSAGE.to_string());
            finding.column = line.len() - line.trim_start().len() + 1;
            finding
        })
        .collect()
}
