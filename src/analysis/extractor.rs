//! Single-pass fact extraction.

use tree_sitter::Node;

use crate::parser::{undecorate, SyntaxNode, SyntaxTree};

use super::text::single_line;
use super::{Binding, CallSite, ClassFacts, FactSet};

/// Extract the structural facts of a parsed unit.
///
/// Visits every node exactly once in document order. Never fails: node
/// shapes the rules below do not cover are skipped.
pub fn extract(tree: &SyntaxTree) -> FactSet {
    let mut facts = FactSet::default();
    let mut cursor = tree.root().walk();

    loop {
        visit(tree, cursor.node(), &mut facts);

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                tracing::debug!(
                    label = tree.label(),
                    imports = facts.imports.len(),
                    calls = facts.calls.len(),
                    classes = facts.classes.len(),
                    variables = facts.variables.len(),
                    "extracted facts"
                );
                return facts;
            }
        }
    }
}

fn visit(tree: &SyntaxTree, node: Node, facts: &mut FactSet) {
    match SyntaxNode::classify(node) {
        SyntaxNode::Import(n) => facts.imports.push(single_line(n, tree.source())),
        SyntaxNode::Call(n) => {
            if let Some(call) = call_site(tree, n) {
                facts.calls.push(call);
            }
        }
        SyntaxNode::ClassDef(n) => {
            if let Some(class) = class_facts(tree, n) {
                facts.classes.push(class);
            }
        }
        // Methods are collected from their class; free functions carry no facts.
        SyntaxNode::FunctionDef(_) => {}
        SyntaxNode::Assign(n) => {
            if let Some(binding) = binding(tree, n) {
                facts.variables.push(binding);
            }
        }
        SyntaxNode::Other => {}
    }
}

fn call_site(tree: &SyntaxTree, call: Node) -> Option<CallSite> {
    let callee = call.child_by_field_name("function")?;
    match callee.kind() {
        "identifier" => Some(CallSite::Name {
            callee: tree.node_text(callee).to_string(),
        }),
        "attribute" => {
            let object = callee.child_by_field_name("object")?;
            let attribute = callee.child_by_field_name("attribute")?;
            Some(CallSite::Attribute {
                object: single_line(object, tree.source()),
                attribute: tree.node_text(attribute).to_string(),
            })
        }
        other => {
            tracing::trace!(kind = other, "skipping call with unsupported callee");
            None
        }
    }
}

fn class_facts(tree: &SyntaxTree, class: Node) -> Option<ClassFacts> {
    let name = class.child_by_field_name("name")?;
    let methods = class
        .child_by_field_name("body")
        .map(|body| direct_methods(body).map(|m| method_name(tree, m)).collect())
        .unwrap_or_default();

    Some(ClassFacts {
        name: tree.node_text(name).to_string(),
        methods,
    })
}

/// Function definitions declared directly in a class body, decorated or not.
pub(crate) fn direct_methods<'t>(body: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    let mut cursor = body.walk();
    let children: Vec<Node<'t>> = body.named_children(&mut cursor).collect();
    children
        .into_iter()
        .map(undecorate)
        .filter(|n| n.kind() == "function_definition")
}

fn method_name(tree: &SyntaxTree, function: Node) -> String {
    function
        .child_by_field_name("name")
        .map(|n| tree.node_text(n).to_string())
        .unwrap_or_default()
}

fn binding(tree: &SyntaxTree, assignment: Node) -> Option<Binding> {
    // `x: int = 1` is an annotated assignment, not a plain binding.
    if assignment.child_by_field_name("type").is_some() {
        return None;
    }

    let left = assignment.child_by_field_name("left")?;
    let right = assignment.child_by_field_name("right")?;
    if left.kind() != "identifier" {
        return None;
    }
    // `a = b = 1` binds more than one target.
    if right.kind() == "assignment" {
        return None;
    }

    Some(Binding {
        name: tree.node_text(left).to_string(),
        value: single_line(right, tree.source()),
    })
}
