//! Span-interpolating printer.
//!
//! A node that came from source is reprinted by copying the original text
//! between its child slots and recursing into the slots. Untouched subtrees
//! therefore reprint byte-identical. Sequences whose items changed are
//! re-spliced from their recorded layout: every original item keeps the gap
//! in front of it (leading blank lines and comments included), a deleted
//! item takes its gap along, and a separator derived from the surrounding
//! indentation is used for fresh items. Nodes without an origin are
//! rendered from their fields.

use crate::ast::node::{Node, NodeKind, Seq, SeqLayout, SeqStyle, SlotRef, Spacing, Span};
use std::sync::Arc;

/// Print a tree back to source text.
pub fn print(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, "", &mut out);
    out
}

/// Quote `value` as a Go interpreted string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn write_node(node: &Node, indent: &str, out: &mut String) {
    match &node.deco.origin {
        Some(origin) if can_interpolate(node) => {
            let source = &origin.source;
            let mut cursor = origin.span.start;
            for (field, slot) in node.slots() {
                let Some(span) = node.deco.slot_span(field) else {
                    continue;
                };
                out.push_str(&source[cursor..span.start]);
                match slot {
                    SlotRef::Node(child) => write_node(child, line_indent(source, span.start), out),
                    SlotRef::Seq(seq) => write_seq(seq, source, span, out),
                }
                cursor = span.end;
            }
            out.push_str(&source[cursor..origin.span.end]);
        }
        _ => render(node, indent, out),
    }
}

/// Every present slot must have a recorded span, otherwise the original
/// text cannot be split around it.
fn can_interpolate(node: &Node) -> bool {
    node.slots()
        .iter()
        .all(|(field, _)| node.deco.slot_span(*field).is_some())
}

fn write_seq(seq: &Seq, source: &Arc<str>, interior: &Span, out: &mut String) {
    let Some(layout) = &seq.layout else {
        render_items(seq, ", ", "", out);
        return;
    };

    if layout.spans.is_empty() {
        write_into_empty(seq, layout.style, source, interior, out);
        return;
    }
    if seq.items.is_empty() {
        return;
    }
    if layout.style == SeqStyle::BareSpec && !is_unchanged(seq, layout, source) {
        write_grouped(seq, out);
        return;
    }

    let spans = &layout.spans;
    let n = spans.len();
    let indent = line_indent(source, spans[0].start);
    let multiline = source[interior.clone()].contains('\n');
    let default_sep = match (layout.style, multiline) {
        (SeqStyle::Comma, true) => format!(",\n{indent}"),
        (SeqStyle::Comma, false) => ", ".to_string(),
        (_, true) => format!("\n{indent}"),
        (_, false) => "; ".to_string(),
    };
    let default_head = split_gap(&default_sep).0;
    // The gap in front of original item `j`: its separator from the previous
    // item, then its own leading blank lines and comments.
    let gap = |j: usize| {
        let start = if j == 0 { interior.start } else { spans[j - 1].end };
        &source[start..spans[j].start]
    };
    // Separator that followed original item `i`, up to its line break.
    let head_after = |i: usize| {
        if i + 1 < n {
            split_gap(gap(i + 1)).0
        } else {
            default_head
        }
    };
    let with_indent = |head: &str| {
        if head.ends_with('\n') {
            format!("{head}{indent}")
        } else {
            head.to_string()
        }
    };
    let join = |head: &str, lead: &str| {
        if lead.is_empty() || !head.ends_with('\n') {
            with_indent(head)
        } else {
            format!("{head}{lead}")
        }
    };

    let mut last: Option<usize> = None;
    let mut prev_fresh = false;
    for (pos, item) in seq.items.iter().enumerate() {
        let index = original_index(item, layout, source);
        let sep = match (pos, index) {
            (0, Some(0)) => gap(0).to_string(),
            (0, Some(j)) => join(split_gap(gap(0)).0, split_gap(gap(j)).1),
            (0, None) => with_indent(split_gap(gap(0)).0),
            (_, Some(j)) if !prev_fresh && j > 0 && last == Some(j - 1) => gap(j).to_string(),
            (_, Some(j)) => {
                let head = match last {
                    // Replaced neighbour: keep the separator that stood in its place.
                    _ if prev_fresh && j > 0 && last != Some(j - 1) => split_gap(gap(j)).0,
                    Some(i) if !prev_fresh => head_after(i),
                    _ => default_head,
                };
                join(head, split_gap(gap(j)).1)
            }
            (_, None) => match last {
                Some(i) if !prev_fresh => with_indent(head_after(i)),
                _ => default_sep.clone(),
            },
        };
        out.push_str(&sep);
        write_item(item, indent, out);
        if index.is_some() {
            last = index;
        }
        prev_fresh = index.is_none();
    }

    let tail = &source[spans[n - 1].end..interior.end];
    match last {
        // Trailing items were deleted: close after the last kept one.
        Some(i)
            if !prev_fresh && i + 1 < n && tail.contains('\n') && gap(i + 1).contains('\n') =>
        {
            out.push_str(split_gap(gap(i + 1)).0);
            out.push_str(split_gap(tail).1);
        }
        _ => out.push_str(tail),
    }
}

/// Split separator text at its first line break: the part ending the
/// previous line, and the part leading up to the next item.
fn split_gap(gap: &str) -> (&str, &str) {
    match gap.find('\n') {
        Some(nl) => gap.split_at(nl + 1),
        None => (gap, ""),
    }
}

/// Items spliced into a sequence that was empty in the source.
fn write_into_empty(seq: &Seq, style: SeqStyle, source: &str, interior: &Span, out: &mut String) {
    if seq.items.is_empty() {
        out.push_str(&source[interior.clone()]);
        return;
    }
    let outer = line_indent(source, interior.start);
    let indent = format!("{outer}\t");
    let multiline = style != SeqStyle::Comma
        || seq.items.iter().any(|item| item.deco.before == Spacing::NewLine);
    if !multiline {
        render_items(seq, ", ", "", out);
        return;
    }
    let terminator = if style == SeqStyle::Comma { "," } else { "" };
    for item in &seq.items {
        out.push('\n');
        out.push_str(&indent);
        write_item(item, &indent, out);
        out.push_str(terminator);
    }
    out.push('\n');
    out.push_str(outer);
}

/// A lone `import "x"` that gained or lost specs becomes a parenthesized group.
fn write_grouped(seq: &Seq, out: &mut String) {
    out.push_str("(\n");
    for item in &seq.items {
        out.push('\t');
        write_item(item, "\t", out);
        out.push('\n');
    }
    out.push(')');
}

fn write_item(item: &Node, indent: &str, out: &mut String) {
    for comment in &item.deco.comments {
        let comment = comment.trim();
        if comment.starts_with("//") || comment.starts_with("/*") {
            out.push_str(comment);
        } else {
            out.push_str("// ");
            out.push_str(comment);
        }
        out.push('\n');
        out.push_str(indent);
    }
    write_node(item, indent, out);
}

fn original_index(item: &Node, layout: &SeqLayout, source: &Arc<str>) -> Option<usize> {
    let origin = item.deco.origin.as_ref()?;
    layout
        .spans
        .iter()
        .position(|span| origin.same_site(source, span))
}

fn is_unchanged(seq: &Seq, layout: &SeqLayout, source: &Arc<str>) -> bool {
    seq.items.len() == layout.spans.len()
        && seq
            .items
            .iter()
            .enumerate()
            .all(|(i, item)| original_index(item, layout, source) == Some(i))
}

/// Leading whitespace of the line containing `pos`.
pub(crate) fn line_indent(source: &str, pos: usize) -> &str {
    let start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn render_items(seq: &Seq, sep: &str, indent: &str, out: &mut String) {
    for (pos, item) in seq.items.iter().enumerate() {
        if pos > 0 {
            out.push_str(sep);
        }
        write_node(item, indent, out);
    }
}

/// Render a node that has no source text of its own.
fn render(node: &Node, indent: &str, out: &mut String) {
    match &node.kind {
        NodeKind::Ident(name) => out.push_str(name),
        NodeKind::Literal { text, .. } => out.push_str(text),
        NodeKind::Selector { base, member } => {
            write_node(base, indent, out);
            out.push('.');
            write_node(member, indent, out);
        }
        NodeKind::Call { callee, args } => {
            write_node(callee, indent, out);
            out.push('(');
            render_items(args, ", ", indent, out);
            out.push(')');
        }
        NodeKind::KeyValue { key, value } => {
            write_node(key, indent, out);
            out.push_str(": ");
            write_node(value, indent, out);
        }
        NodeKind::Composite { ty, elems } => {
            if let Some(ty) = ty {
                write_node(ty, indent, out);
            }
            out.push('{');
            let broken = elems
                .items
                .iter()
                .any(|item| item.deco.before == Spacing::NewLine);
            if broken {
                let inner = format!("{indent}\t");
                for item in &elems.items {
                    out.push('\n');
                    out.push_str(&inner);
                    write_item(item, &inner, out);
                    out.push(',');
                }
                out.push('\n');
                out.push_str(indent);
            } else {
                render_items(elems, ", ", indent, out);
            }
            out.push('}');
        }
        NodeKind::ArrayType { elem, len } => {
            out.push('[');
            if let Some(len) = len {
                write_node(len, indent, out);
            }
            out.push(']');
            write_node(elem, indent, out);
        }
        NodeKind::MapType { key, value } => {
            out.push_str("map[");
            write_node(key, indent, out);
            out.push(']');
            write_node(value, indent, out);
        }
        NodeKind::Import { path, alias } => {
            if let Some(alias) = alias {
                out.push_str(alias);
                out.push(' ');
            }
            out.push_str(&quote(path));
        }
        NodeKind::FuncDecl {
            name,
            signature,
            body,
        } => {
            out.push_str("func ");
            write_node(name, indent, out);
            if signature.is_empty() {
                out.push_str("()");
            } else {
                out.push_str(&signature.join(" "));
            }
            out.push(' ');
            match body {
                Some(body) => write_node(body, indent, out),
                None => {
                    out.push_str("{\n");
                    out.push_str(indent);
                    out.push('}');
                }
            }
        }
        NodeKind::Unary { op, operand } => {
            out.push_str(op);
            write_node(operand, indent, out);
        }
        NodeKind::Other {
            tokens, children, ..
        } => {
            if children.is_empty() {
                out.push_str(&tokens.join(" "));
            } else {
                let sep = format!("\n{indent}");
                render_items(children, &sep, indent, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build;
    use crate::go::parse_source;

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("app"), "\"app\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("c:\\x"), "\"c:\\\\x\"");
    }

    #[test]
    fn line_indent_of_nested_position() {
        let src = "a\n\t\tb := 1\n";
        let pos = src.find('b').unwrap();
        assert_eq!(line_indent(src, pos), "\t\t");
        assert_eq!(line_indent(src, 0), "");
    }

    #[test]
    fn untouched_tree_round_trips() {
        let src = "package main\n\n// comment\nfunc main() {\n\tx := []int{1,  2 ,3}\n\t_ = x\n}\n";
        let root = parse_source(src).unwrap();
        assert_eq!(print(&root), src);
    }

    #[test]
    fn renders_fresh_nodes() {
        let kv = build::key_value(build::string_lit("name"), build::ident("value"));
        assert_eq!(print(&kv), "\"name\": value");
        let import = build::import("github.com/acme/lib", Some("lib"));
        assert_eq!(print(&import), "lib \"github.com/acme/lib\"");
    }

    #[test]
    fn fresh_composite_with_broken_entries() {
        let mut entry = build::key_value(build::string_lit("a"), build::ident("b"));
        crate::action::hint(&mut entry);
        let composite = Node::new(NodeKind::Composite {
            ty: Some(Box::new(Node::new(NodeKind::MapType {
                key: Box::new(build::ident("string")),
                value: Box::new(build::ident("any")),
            }))),
            elems: Seq::new(vec![entry]),
        });
        assert_eq!(print(&composite), "map[string]any{\n\t\"a\": b,\n}");
    }

    #[test]
    fn snippet_nodes_print_verbatim() {
        let node = build::expr("&auth.ServiceProvider{ }").unwrap();
        assert_eq!(print(&node), "&auth.ServiceProvider{ }");
    }
}
