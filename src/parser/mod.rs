//! Parser front-end: Python source text to a syntax tree.
//!
//! tree-sitter never refuses input; it recovers and marks the damage with
//! ERROR and MISSING nodes. [`parse`] turns the first such node into an
//! [`AnalysisError::Syntax`] so callers see the usual "does not parse"
//! contract.
//!
//! The grammar also accepts a few things Python 3 does not: Python 2 `print`
//! and `exec` statements, and statements indented inconsistently with their
//! siblings. Those are rejected in a second pass over the tree.

mod node;

use std::fs;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::config::INLINE_LABEL;
use crate::error::{AnalysisError, Result};

pub use node::{decorator_names, undecorate, SyntaxNode};

/// Longest excerpt of offending text quoted in a syntax error message.
const ERROR_EXCERPT_LEN: usize = 24;

/// The tree-sitter grammar for Python.
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// One unit of input: source text plus a label for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    label: String,
    text: String,
}

impl SourceUnit {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// A unit that did not come from a file.
    pub fn inline(text: impl Into<String>) -> Self {
        Self::new(INLINE_LABEL, text)
    }

    /// Read a unit from disk, labelled with its path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AnalysisError::NotFound {
                path: path.to_path_buf(),
            },
            _ => AnalysisError::io(path, e),
        })?;
        Ok(Self::new(path.to_string_lossy(), text))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A parsed source unit.
///
/// Owns both the tree and a copy of the text so node text can be sliced
/// without the caller keeping the unit alive.
pub struct SyntaxTree {
    tree: Tree,
    source: String,
    label: String,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get text for a node of this tree.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("label", &self.label)
            .field("root", &self.tree.root_node().kind())
            .finish()
    }
}

/// Parse a source unit, failing with a `SyntaxError` on invalid input.
pub fn parse(unit: &SourceUnit) -> Result<SyntaxTree> {
    let mut parser = Parser::new();
    parser.set_language(&python_language())?;

    let tree = parser
        .parse(unit.text(), None)
        .ok_or_else(|| AnalysisError::Syntax {
            message: "parser produced no tree".to_string(),
            line: 1,
            column: 1,
        })?;

    let error = first_syntax_error(tree.root_node(), unit.text())
        .or_else(|| first_rejected_construct(tree.root_node(), unit.text()));
    if let Some(err) = error {
        tracing::debug!(label = unit.label(), error = %err, "rejected source unit");
        return Err(err);
    }

    tracing::debug!(
        label = unit.label(),
        bytes = unit.text().len(),
        "parsed source unit"
    );

    Ok(SyntaxTree {
        tree,
        source: unit.text().to_string(),
        label: unit.label().to_string(),
    })
}

/// Find the first ERROR or MISSING node in document order.
fn first_syntax_error(root: Node, source: &str) -> Option<AnalysisError> {
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(syntax_error_at(node, source));
        }

        // Only descend into subtrees that contain the damage.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                // has_error() was true but nothing was marked; report the root.
                return Some(syntax_error_at(root, source));
            }
        }
    }
}

/// Find the earliest construct the grammar accepts but Python 3 rejects.
fn first_rejected_construct(root: Node, source: &str) -> Option<AnalysisError> {
    let mut earliest: Option<(Node, &'static str)> = None;
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        let found = match node.kind() {
            "print_statement" => Some((node, "Missing parentheses in call to 'print'")),
            "exec_statement" => Some((node, "Missing parentheses in call to 'exec'")),
            "module" | "block" => misindented_statement(node, source),
            _ => None,
        };
        if let Some((offender, message)) = found {
            let is_earlier = earliest
                .map_or(true, |(best, _)| offender.start_byte() < best.start_byte());
            if is_earlier {
                earliest = Some((offender, message));
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return earliest.map(|(node, message)| {
                    let position = node.start_position();
                    AnalysisError::Syntax {
                        message: message.to_string(),
                        line: position.row + 1,
                        column: position.column + 1,
                    }
                });
            }
        }
    }
}

/// The first statement of a module or block whose indentation differs from
/// the statements before it. Module statements start at column 0; statements
/// sharing a line with the previous one (`a = 1; b = 2`) are not checked.
fn misindented_statement<'t>(
    container: Node<'t>,
    source: &str,
) -> Option<(Node<'t>, &'static str)> {
    let module = container.kind() == "module";
    let mut expected = module.then_some(0);
    let mut last_row: Option<usize> = None;
    let mut cursor = container.walk();

    for statement in container.named_children(&mut cursor) {
        if statement.is_extra() {
            continue;
        }
        let start = statement.start_position();
        let continues_line = last_row == Some(start.row);
        last_row = Some(statement.end_position().row);
        if continues_line {
            continue;
        }

        let mut column = start.column;
        if module && start.row == 0 && source.starts_with('\u{feff}') {
            column -= '\u{feff}'.len_utf8().min(column);
        }
        match expected {
            None => expected = Some(column),
            Some(want) if column > want => return Some((statement, "unexpected indent")),
            Some(want) if column < want => {
                return Some((statement, "unindent does not match any outer indentation level"))
            }
            Some(_) => {}
        }
    }
    None
}

fn syntax_error_at(node: Node, source: &str) -> AnalysisError {
    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing {:?}", node.kind())
    } else {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        let excerpt: String = text
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(ERROR_EXCERPT_LEN)
            .collect();
        if excerpt.trim().is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near {:?}", excerpt.trim())
        }
    };

    AnalysisError::Syntax {
        message,
        line: position.row + 1,
        column: position.column + 1,
    }
}
