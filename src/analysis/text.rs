//! Source text normalization for facts that quote code.

use tree_sitter::Node;

/// Collapse a node's text onto one line.
///
/// The node is read as its sequence of tokens. String literals are tokens of
/// their own and are copied verbatim, even when they span lines. Comments and
/// backslash continuations are dropped. A gap between two tokens that crosses
/// a line break becomes a single space, or nothing next to an opening or
/// closing bracket. Gaps within one line are kept as written.
pub fn single_line(node: Node, source: &str) -> String {
    let text = source.get(node.byte_range()).unwrap_or("");
    if !text.contains('\n') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut previous_end: Option<usize> = None;

    for token in tokens(node) {
        let token_text = source.get(token.byte_range()).unwrap_or("");
        if let Some(end) = previous_end {
            let gap = source.get(end..token.start_byte()).unwrap_or("");
            if !gap.contains('\n') {
                out.push_str(gap);
            } else if !out.ends_with(['(', '[', '{'])
                && !token_text.starts_with([')', ']', '}'])
            {
                out.push(' ');
            }
        }
        out.push_str(token_text);
        previous_end = Some(token.end_byte());
    }

    out
}

/// Leaf tokens under `node` in document order, with strings kept whole and
/// extras (comments, line continuations) skipped.
fn tokens(node: Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut cursor = node.walk();

    loop {
        let current = cursor.node();
        let is_token = current.child_count() == 0 || current.kind() == "string";

        if is_token {
            if !current.is_extra() && current.end_byte() > current.start_byte() {
                out.push(current);
            }
        } else if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.node() == node {
                return out;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}
