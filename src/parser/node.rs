//! Closed view over the tree-sitter node kinds the engine understands.

use tree_sitter::Node;

/// The node variants fact extraction dispatches on.
///
/// Anything the engine does not model collapses to `Other`. Matching on this
/// enum must stay exhaustive so a new variant forces every consumer to
/// decide what to do with it.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'t> {
    /// `import x`, `from x import y`, `from __future__ import y`.
    Import(Node<'t>),
    /// Any call expression.
    Call(Node<'t>),
    /// `class Name(...):`
    ClassDef(Node<'t>),
    /// `def name(...):`, sync or async.
    FunctionDef(Node<'t>),
    /// An assignment that forms a whole statement (`x = ...`).
    Assign(Node<'t>),
    Other,
}

impl<'t> SyntaxNode<'t> {
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                SyntaxNode::Import(node)
            }
            "call" => SyntaxNode::Call(node),
            "class_definition" => SyntaxNode::ClassDef(node),
            "function_definition" => SyntaxNode::FunctionDef(node),
            // The right-hand side of `a = b = 1` is itself an assignment node;
            // only the statement-level one counts.
            "assignment"
                if node
                    .parent()
                    .is_some_and(|p| p.kind() == "expression_statement") =>
            {
                SyntaxNode::Assign(node)
            }
            _ => SyntaxNode::Other,
        }
    }
}

/// Unwrap a `decorated_definition` to the definition it decorates.
pub fn undecorate(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        if let Some(definition) = node.child_by_field_name("definition") {
            return definition;
        }
    }
    node
}

/// Decorator expressions applied to a definition, as written (without `@`).
pub fn decorator_names<'s>(definition: Node<'_>, source: &'s [u8]) -> Vec<&'s str> {
    let Some(parent) = definition.parent() else {
        return Vec::new();
    };
    if parent.kind() != "decorated_definition" {
        return Vec::new();
    }

    let mut cursor = parent.walk();
    parent
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| decorator.named_child(0))
        .map(|expr| expr.utf8_text(source).unwrap_or(""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, SourceUnit};

    fn kinds_of(source: &str) -> Vec<&'static str> {
        let tree = parse(&SourceUnit::inline(source)).unwrap();
        let mut found = Vec::new();
        let mut cursor = tree.root().walk();
        loop {
            let label = match SyntaxNode::classify(cursor.node()) {
                SyntaxNode::Import(_) => Some("import"),
                SyntaxNode::Call(_) => Some("call"),
                SyntaxNode::ClassDef(_) => Some("class"),
                SyntaxNode::FunctionDef(_) => Some("function"),
                SyntaxNode::Assign(_) => Some("assign"),
                SyntaxNode::Other => None,
            };
            found.extend(label);
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return found;
                }
            }
        }
    }

    #[test]
    fn test_classify_statement_kinds() {
        let kinds = kinds_of("import os\nclass A:\n    def f(self):\n        g()\nx = 1\n");
        assert_eq!(kinds, vec!["import", "class", "function", "call", "assign"]);
    }

    #[test]
    fn test_chained_assignment_classified_once() {
        let kinds = kinds_of("a = b = 1\n");
        assert_eq!(kinds, vec!["assign"]);
    }

    #[test]
    fn test_decorator_names() {
        let source = "class A:\n    @staticmethod\n    def f():\n        pass\n";
        let tree = parse(&SourceUnit::inline(source)).unwrap();
        let class = tree.root().named_child(0).unwrap();
        let body = class.child_by_field_name("body").unwrap();
        let decorated = body.named_child(0).unwrap();
        let function = undecorate(decorated);
        assert_eq!(function.kind(), "function_definition");
        assert_eq!(decorator_names(function, tree.source_bytes()), vec!["staticmethod"]);
    }
}
