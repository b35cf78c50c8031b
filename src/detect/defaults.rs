//! Parameters whose default is a shared empty list or dict.

use lazy_static::lazy_static;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::parser::python_language;

use super::{Finding, FindingKind, RuleInput};

lazy_static! {
    static ref FUNCTION_QUERY: Query = Query::new(
        &python_language(),
        "(function_definition name: (identifier) @name parameters: (parameters) @params)",
    )
    .expect("valid function query");
}

pub fn detect(input: &RuleInput) -> Vec<Finding> {
    let source = input.tree.source_bytes();
    let names = FUNCTION_QUERY.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&FUNCTION_QUERY, input.tree.root(), source);

    let mut findings = Vec::new();
    while let Some(m) = matches.next() {
        let mut function = None;
        let mut params = None;
        for capture in m.captures {
            match names[capture.index as usize] {
                "name" => function = Some(capture.node.utf8_text(source).unwrap_or("")),
                "params" => params = Some(capture.node),
                _ => {}
            }
        }

        let (Some(function), Some(params)) = (function, params) else {
            continue;
        };

        let mut walker = params.walk();
        for param in params.named_children(&mut walker) {
            if !matches!(param.kind(), "default_parameter" | "typed_default_parameter") {
                continue;
            }
            let (Some(name), Some(value)) = (
                param.child_by_field_name("name"),
                param.child_by_field_name("value"),
            ) else {
                continue;
            };
            if let Some(literal) = empty_mutable_literal(value) {
                let name = name.utf8_text(source).unwrap_or("");
                findings.push(Finding::at_node(
                    FindingKind::MutableDefaultArgument,
                    param,
                    source,
                    format!(
                        "parameter '{}' of '{}' defaults to a shared mutable {}",
                        name, function, literal
                    ),
                ));
            }
        }
    }
    findings
}

fn empty_mutable_literal(value: Node) -> Option<&'static str> {
    let literal = match value.kind() {
        "list" => "[]",
        "dictionary" => "{}",
        _ => return None,
    };
    let mut cursor = value.walk();
    let empty = value
        .named_children(&mut cursor)
        .all(|child| child.kind() == "comment");
    empty.then_some(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract;
    use crate::parser::{parse, SourceUnit};

    fn findings(source: &str) -> Vec<Finding> {
        let tree = parse(&SourceUnit::inline(source)).unwrap();
        let facts = extract(&tree);
        detect(&RuleInput::new(&tree, &facts))
    }

    #[test]
    fn test_single_list_default() {
        let found = findings("def f(data=[]): pass\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("'data'"));
        assert!(found[0].message.contains("'f'"));
        assert_eq!(found[0].snippet, "data=[]");
        assert_eq!(found[0].line, 1);
        assert_eq!(found[0].column, 7);
    }

    #[test]
    fn test_one_finding_per_parameter() {
        let source = "class A:\n    def m(self, a=[], b: dict = {}, c=None, d=(), e=[1]):\n        pass\n";
        let found = findings(source);
        assert_eq!(found.len(), 2);
        assert!(found[0].message.contains("'a'"));
        assert!(found[0].message.ends_with("[]"));
        assert!(found[1].message.contains("'b'"));
        assert!(found[1].message.ends_with("{}"));
    }

    #[test]
    fn test_lambda_and_calls_not_flagged() {
        let source = "g = lambda x=[]: x\ndef h(x=list(), y=dict()):\n    return x, y\n";
        assert!(findings(source).is_empty());
    }

    #[test]
    fn test_async_function() {
        let found = findings("async def fetch(headers={}):\n    pass\n");
        assert_eq!(found.len(), 1);
    }
}
