//! Constructors for nodes that do not come from the file being edited.
//!
//! Programmatic constructors produce origin-less nodes rendered from their
//! fields. Snippet parsers keep the snippet text as origin, so a parsed
//! expression prints exactly as it was written.

use crate::ast::node::{LitKind, Node, NodeKind};
use crate::ast::print::quote;
use crate::go::lower::lower;
use crate::go::GoParseError;
use crate::pool::with_parser;

const EXPR_PREFIX: &str = "package snippet\n\nvar _ = ";
const STMT_PREFIX: &str = "package snippet\n\nfunc _() {\n";

/// Statement containers a statement snippet never resolves to.
const STMT_BOUNDARY: &[&str] = &[
    "block",
    "statement_list",
    "function_declaration",
    "source_file",
];

pub fn ident(name: &str) -> Node {
    Node::new(NodeKind::Ident(name.to_string()))
}

/// An interpreted string literal holding `value`.
pub fn string_lit(value: &str) -> Node {
    Node::new(NodeKind::Literal {
        kind: LitKind::String,
        text: quote(value),
    })
}

/// A fresh import spec.
pub fn import(path: &str, alias: Option<&str>) -> Node {
    Node::new(NodeKind::Import {
        path: path.to_string(),
        alias: alias.map(str::to_string),
    })
}

/// A fresh `key: value` entry.
pub fn key_value(key: Node, value: Node) -> Node {
    Node::new(NodeKind::KeyValue {
        key: Box::new(key),
        value: Box::new(value),
    })
}

/// Parse a single Go expression.
pub fn expr(source: &str) -> Result<Node, GoParseError> {
    let text = source.trim();
    if text.is_empty() {
        return Err(snippet_error(text, "expression"));
    }
    let wrapped = format!("{EXPR_PREFIX}{text}\n");
    let parsed = with_parser(|parser| parser.parse_with_source(&wrapped))??;
    parsed
        .check()
        .map_err(|_| snippet_error(text, "expression"))?;

    let range = EXPR_PREFIX.len()..EXPR_PREFIX.len() + text.len();
    let node = parsed
        .root_node()
        .named_descendant_for_byte_range(range.start, range.end)
        .filter(|node| node.byte_range() == range)
        .ok_or_else(|| snippet_error(text, "expression"))?;
    Ok(lower(node, &parsed.source))
}

/// Parse a single Go statement.
pub fn stmt(source: &str) -> Result<Node, GoParseError> {
    let text = source.trim();
    if text.is_empty() {
        return Err(snippet_error(text, "statement"));
    }
    let wrapped = format!("{STMT_PREFIX}{text}\n}}\n");
    let parsed = with_parser(|parser| parser.parse_with_source(&wrapped))??;
    parsed
        .check()
        .map_err(|_| snippet_error(text, "statement"))?;

    let range = STMT_PREFIX.len()..STMT_PREFIX.len() + text.len();
    let mut node = parsed
        .root_node()
        .named_descendant_for_byte_range(range.start, range.end)
        .filter(|node| node.byte_range() == range)
        .ok_or_else(|| snippet_error(text, "statement"))?;
    while let Some(parent) = node.parent() {
        if parent.byte_range() != range || STMT_BOUNDARY.contains(&parent.kind()) {
            break;
        }
        node = parent;
    }
    Ok(lower(node, &parsed.source))
}

fn snippet_error(snippet: &str, expected: &'static str) -> GoParseError {
    GoParseError::Snippet {
        snippet: snippet.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::Spacing;
    use crate::ast::print::print;

    #[test]
    fn expression_snippet_keeps_text() {
        let node = expr("  &auth.ServiceProvider{}\n").unwrap();
        assert!(matches!(node.kind, NodeKind::Unary { ref op, .. } if op == "&"));
        assert_eq!(print(&node), "&auth.ServiceProvider{}");
    }

    #[test]
    fn statement_snippet_is_outermost_statement() {
        let node = stmt("config.Add(\"app\", map[string]any{})").unwrap();
        assert!(node.is_kind("expression_statement"));
    }

    #[test]
    fn rejects_invalid_snippets() {
        assert!(matches!(
            expr("&auth.{"),
            Err(GoParseError::Snippet { expected: "expression", .. })
        ));
        assert!(expr("").is_err());
        assert!(expr("a b").is_err());
    }

    #[test]
    fn fresh_nodes_have_no_origin() {
        let kv = key_value(string_lit("k"), ident("v"));
        assert_eq!(kv.deco.before, Spacing::None);
        assert!(kv.deco.origin.is_none());
        assert_eq!(print(&string_lit("a\"b")), "\"a\\\"b\"");
    }
}
