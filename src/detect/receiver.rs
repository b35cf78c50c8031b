//! Receiver-parameter rules for methods declared in a class body.
//!
//! A method's first positional parameter should be `self`, or `cls` for a
//! `@classmethod`. `@staticmethod` methods take no receiver and are skipped.
//! Two separate rules share this walk:
//!
//! - `missing-first-parameter` fires when the first positional parameter
//!   exists and has the wrong name. Methods without a positional parameter
//!   are left alone.
//! - `missing-receiver` fires when the parameter list is empty.

use lazy_static::lazy_static;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::analysis::direct_methods;
use crate::parser::{decorator_names, python_language};

use super::{Finding, FindingKind, RuleInput};

lazy_static! {
    static ref CLASS_BODY_QUERY: Query =
        Query::new(&python_language(), "(class_definition body: (block) @body)")
            .expect("valid class query");
}

/// What sits in a method's first parameter slot.
#[derive(Debug, PartialEq, Eq)]
enum FirstParameter<'s> {
    /// `def m():`
    Empty,
    /// `def m(*args)`, `def m(*, key)` and the like.
    NotPositional,
    Named(&'s str),
}

struct Method<'t, 's> {
    node: Node<'t>,
    name: &'s str,
    receiver: Option<&'static str>,
    first: FirstParameter<'s>,
}

pub fn detect_misnamed(input: &RuleInput) -> Vec<Finding> {
    let source = input.tree.source_bytes();
    methods(input)
        .into_iter()
        .filter_map(|m| {
            let receiver = m.receiver?;
            match m.first {
                FirstParameter::Named(name) if name != receiver => Some(Finding::at_node(
                    FindingKind::MissingFirstParameter,
                    m.node,
                    source,
                    format!("Method '{}' missing '{}' parameter", m.name, receiver),
                )),
                _ => None,
            }
        })
        .collect()
}

pub fn detect_receiverless(input: &RuleInput) -> Vec<Finding> {
    let source = input.tree.source_bytes();
    methods(input)
        .into_iter()
        .filter_map(|m| {
            let receiver = m.receiver?;
            (m.first == FirstParameter::Empty).then(|| {
                Finding::at_node(
                    FindingKind::MissingReceiver,
                    m.node,
                    source,
                    format!(
                        "Method '{}' takes no parameters; expected '{}'",
                        m.name, receiver
                    ),
                )
            })
        })
        .collect()
}

fn methods<'a>(input: &RuleInput<'a>) -> Vec<Method<'a, 'a>> {
    if input.facts.classes.is_empty() {
        return Vec::new();
    }

    let source = input.tree.source_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&CLASS_BODY_QUERY, input.tree.root(), source);

    let mut found = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            for function in direct_methods(capture.node) {
                let Some(name) = function.child_by_field_name("name") else {
                    continue;
                };
                found.push(Method {
                    node: function,
                    name: name.utf8_text(source).unwrap_or(""),
                    receiver: receiver_for(function, source),
                    first: first_parameter(function, source),
                });
            }
        }
    }
    found
}

/// Expected receiver name, or `None` for static methods.
fn receiver_for(function: Node, source: &[u8]) -> Option<&'static str> {
    let decorators = decorator_names(function, source);
    if decorators.iter().any(|d| is_decorator(d, "staticmethod")) {
        None
    } else if decorators.iter().any(|d| is_decorator(d, "classmethod")) {
        Some("cls")
    } else {
        Some("self")
    }
}

/// Matches `@name` and qualified forms such as `@builtins.name`.
fn is_decorator(written: &str, name: &str) -> bool {
    written == name || written.rsplit('.').next() == Some(name)
}

fn first_parameter<'s>(function: Node, source: &'s [u8]) -> FirstParameter<'s> {
    let Some(params) = function.child_by_field_name("parameters") else {
        return FirstParameter::Empty;
    };
    let mut cursor = params.walk();
    let first = params
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    let Some(first) = first else {
        return FirstParameter::Empty;
    };

    let name = match first.kind() {
        "identifier" => Some(first),
        "typed_parameter" => first.named_child(0).filter(|n| n.kind() == "identifier"),
        "default_parameter" | "typed_default_parameter" => first.child_by_field_name("name"),
        _ => None,
    };
    match name {
        Some(node) => FirstParameter::Named(node.utf8_text(source).unwrap_or("")),
        None => FirstParameter::NotPositional,
    }
}
