//! Whole-file validation against the tree-sitter Go grammar.
//!
//! The hand parser in [`super::source_unit`] only understands the package
//! clause and imports. Everything after them is checked here: tree-sitter
//! recovers from bad input by inserting `ERROR` and `MISSING` nodes, and any
//! such node makes the file invalid.

use std::ops::Range;

use tree_sitter::{Node, Parser};

/// First grammar violation found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    /// Byte range of the offending node. Empty for a missing token.
    pub span: Range<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Parses `source` as Go and reports the first error node, if any.
///
/// # Errors
///
/// Returns the earliest `ERROR` or `MISSING` node in document order.
pub fn check(source: &str) -> Result<(), GrammarError> {
    let (body, shift) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (rest, '\u{feff}'.len_utf8()),
        None => (source, 0),
    };

    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into()).map_err(|e| GrammarError {
        span: 0..0,
        message: format!("Go grammar unavailable: {e}"),
    })?;
    let Some(tree) = parser.parse(body, None) else {
        return Err(GrammarError { span: 0..0, message: "Go parser produced no tree".into() });
    };

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let Some(node) = first_error(root) else {
        return Err(GrammarError { span: shift..shift, message: "syntax error".into() });
    };

    let span = node.start_byte() + shift..node.end_byte() + shift;
    let message = if node.is_missing() {
        format!("syntax error: missing `{}`", node.kind())
    } else {
        let text = body[node.start_byte()..node.end_byte()].split_whitespace().next().unwrap_or("");
        if text.is_empty() {
            "syntax error: unexpected end of file".to_string()
        } else {
            format!("syntax error: unexpected `{}`", truncate(text))
        }
    };
    Err(GrammarError { span, message })
}

/// Depth-first search for the first error node, descending only into
/// subtrees that contain one.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).filter(Node::has_error).find_map(first_error);
    found
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(24) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
