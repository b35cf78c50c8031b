//! Property-based tests for extraction and reporting.

use codeprobe::{analyze_code, extract, parse, SourceUnit};
use proptest::prelude::*;

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
    // Soft keywords and Python 2 statements the grammar still knows.
    "match", "case", "type", "print", "exec",
];

fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,12}".prop_filter("not a keyword", |s| !KEYWORDS.contains(&s.as_str()))
}

fn python_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        python_identifier().prop_map(|m| format!("import {m}")),
        (python_identifier(), python_identifier()).prop_map(|(m, n)| format!("from {m} import {n}")),
        (python_identifier(), 0..100i64).prop_map(|(n, v)| format!("{n} = {v}")),
        (python_identifier(), python_identifier()).prop_map(|(f, a)| format!("{f}({a})")),
        (python_identifier(), python_identifier()).prop_map(|(o, a)| format!("{o}.{a}()")),
        (python_identifier(), python_identifier())
            .prop_map(|(f, p)| format!("def {f}({p}=[]):\n    return {p}")),
        (python_identifier(), 0..4usize).prop_map(|(c, methods)| {
            let body: String = (0..methods)
                .map(|i| format!("    def method_{i}(self):\n        pass\n"))
                .collect();
            if body.is_empty() {
                format!("class {c}:\n    pass")
            } else {
                format!("class {c}:\n{body}")
            }
        }),
        Just("try:\n    run()\nexcept:\n    pass".to_string()),
    ]
}

fn python_source() -> impl Strategy<Value = String> {
    prop::collection::vec(python_statement(), 0..12).prop_map(|s| s.join("\n"))
}

proptest! {
    /// Two extractions of the same text agree.
    #[test]
    fn prop_extraction_deterministic(source in python_source()) {
        let unit = SourceUnit::inline(source);
        let first = extract(&parse(&unit).unwrap());
        let second = extract(&parse(&unit).unwrap());
        prop_assert_eq!(first, second);
    }

    /// Generated statements always parse, and extraction sees every import.
    #[test]
    fn prop_extraction_total(statements in prop::collection::vec(python_statement(), 0..12)) {
        let source = statements.join("\n");
        let tree = parse(&SourceUnit::inline(source.as_str())).unwrap();
        let facts = extract(&tree);

        let expected_imports = statements
            .iter()
            .filter(|s| s.starts_with("import ") || s.starts_with("from "))
            .count();
        prop_assert_eq!(facts.imports.len(), expected_imports);
    }

    /// Reports are identical across calls, findings included.
    #[test]
    fn prop_report_deterministic(source in python_source()) {
        let first = analyze_code(&source);
        let second = analyze_code(&source);
        prop_assert!(first.success);
        prop_assert_eq!(first, second);
    }

    /// Arbitrary text never panics; it yields either a report or a SyntaxError.
    #[test]
    fn prop_arbitrary_text_never_panics(source in "\\PC{0,64}") {
        let report = analyze_code(&source);
        if !report.success {
            let error = report.error.unwrap_or_default();
            prop_assert!(error.starts_with("SyntaxError"), "unexpected error: {}", error);
        }
    }
}
