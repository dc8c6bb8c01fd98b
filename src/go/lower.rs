//! Lowering from the tree-sitter Go CST into [`Node`].
//!
//! Every lowered node keeps its origin span and the spans of its child
//! slots so the printer can reproduce untouched text exactly. Productions
//! without a dedicated kind become `NodeKind::Other`, keeping their named
//! children in order and the text of their anonymous tokens.

use crate::ast::node::{
    Decoration, Field, LitKind, Node, NodeKind, Seq, SeqLayout, SeqStyle, Span,
};
use std::sync::Arc;
use tree_sitter::Node as TsNode;

/// Sequence kinds that separate items with commas even when empty.
const COMMA_KINDS: &[&str] = &[
    "argument_list",
    "literal_value",
    "expression_list",
    "parameter_list",
    "type_arguments",
    "type_parameter_list",
];

/// Lower a tree-sitter node (and its subtree) into the node model.
pub fn lower(node: TsNode<'_>, source: &Arc<str>) -> Node {
    Lowerer { source }.node(node)
}

struct Lowerer<'s> {
    source: &'s Arc<str>,
}

impl Lowerer<'_> {
    fn text(&self, ts: TsNode<'_>) -> &str {
        &self.source[ts.byte_range()]
    }

    fn node(&self, ts: TsNode<'_>) -> Node {
        self.dedicated(ts).unwrap_or_else(|| self.other(ts))
    }

    fn dedicated(&self, ts: TsNode<'_>) -> Option<Node> {
        let mut deco = Decoration::at(self.source, ts.byte_range());
        let literal = |kind| NodeKind::Literal {
            kind,
            text: self.text(ts).to_string(),
        };

        let kind = match ts.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "type_identifier"
            | "label_name" | "blank_identifier" | "iota" => {
                NodeKind::Ident(self.text(ts).to_string())
            }
            "interpreted_string_literal" => literal(LitKind::String),
            "raw_string_literal" => literal(LitKind::RawString),
            "int_literal" => literal(LitKind::Int),
            "float_literal" => literal(LitKind::Float),
            "imaginary_literal" => literal(LitKind::Imaginary),
            "rune_literal" => literal(LitKind::Rune),
            "true" => literal(LitKind::True),
            "false" => literal(LitKind::False),
            "nil" => literal(LitKind::Nil),
            "literal_element" | "element" => {
                let named = self.named(ts);
                return match named.as_slice() {
                    [inner] => Some(self.node(*inner)),
                    _ => None,
                };
            }
            "selector_expression" => {
                let base = self.node(ts.child_by_field_name("operand")?);
                let member = self.node(ts.child_by_field_name("field")?);
                deco.slots = vec![(Field::Base, span(&base)), (Field::Member, span(&member))];
                NodeKind::Selector {
                    base: Box::new(base),
                    member: Box::new(member),
                }
            }
            "qualified_type" => {
                let base = self.node(ts.child_by_field_name("package")?);
                let member = self.node(ts.child_by_field_name("name")?);
                deco.slots = vec![(Field::Base, span(&base)), (Field::Member, span(&member))];
                NodeKind::Selector {
                    base: Box::new(base),
                    member: Box::new(member),
                }
            }
            "call_expression" => {
                let callee = self.node(ts.child_by_field_name("function")?);
                let (args, interior) =
                    self.seq(ts.child_by_field_name("arguments")?, SeqStyle::Comma);
                deco.slots = vec![(Field::Callee, span(&callee)), (Field::Args, interior)];
                NodeKind::Call {
                    callee: Box::new(callee),
                    args,
                }
            }
            "keyed_element" => {
                let named = self.named(ts);
                let [key, value] = named.as_slice() else {
                    return None;
                };
                let key = self.node(*key);
                let value = self.node(*value);
                deco.slots = vec![(Field::Key, span(&key)), (Field::Value, span(&value))];
                NodeKind::KeyValue {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            "composite_literal" => {
                let ty = self.node(ts.child_by_field_name("type")?);
                let (elems, interior) =
                    self.seq(ts.child_by_field_name("body")?, SeqStyle::Comma);
                deco.slots = vec![(Field::Type, span(&ty)), (Field::Elements, interior)];
                NodeKind::Composite {
                    ty: Some(Box::new(ty)),
                    elems,
                }
            }
            "literal_value" => {
                let (elems, interior) = self.seq(ts, SeqStyle::Comma);
                deco.slots = vec![(Field::Elements, interior)];
                NodeKind::Composite { ty: None, elems }
            }
            "slice_type" => {
                let elem = self.node(ts.child_by_field_name("element")?);
                deco.slots = vec![(Field::Elem, span(&elem))];
                NodeKind::ArrayType {
                    elem: Box::new(elem),
                    len: None,
                }
            }
            "array_type" => {
                let len = self.node(ts.child_by_field_name("length")?);
                let elem = self.node(ts.child_by_field_name("element")?);
                deco.slots = vec![(Field::Len, span(&len)), (Field::Elem, span(&elem))];
                NodeKind::ArrayType {
                    elem: Box::new(elem),
                    len: Some(Box::new(len)),
                }
            }
            "map_type" => {
                let key = self.node(ts.child_by_field_name("key")?);
                let value = self.node(ts.child_by_field_name("value")?);
                deco.slots = vec![(Field::Key, span(&key)), (Field::Value, span(&value))];
                NodeKind::MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            "import_spec" => {
                let path = unquote(self.text(ts.child_by_field_name("path")?));
                let alias = ts
                    .child_by_field_name("name")
                    .map(|name| self.text(name).to_string());
                NodeKind::Import { path, alias }
            }
            "import_declaration" => {
                // Only the ungrouped form `import "x"`; groups lower generically.
                let named = self.named(ts);
                let [spec] = named.as_slice() else {
                    return None;
                };
                if spec.kind() != "import_spec" {
                    return None;
                }
                let spec = self.node(*spec);
                let interior = span(&spec);
                deco.slots = vec![(Field::Children, interior.clone())];
                NodeKind::Other {
                    kind: ts.kind().to_string(),
                    tokens: vec!["import".to_string()],
                    children: Seq {
                        items: vec![spec],
                        layout: Some(SeqLayout {
                            style: SeqStyle::BareSpec,
                            spans: vec![interior],
                        }),
                    },
                }
            }
            "function_declaration" => {
                let name = self.node(ts.child_by_field_name("name")?);
                deco.slots = vec![(Field::Name, span(&name))];
                let body = ts.child_by_field_name("body").map(|body| self.node(body));
                if let Some(body) = &body {
                    deco.slots.push((Field::Body, span(body)));
                }
                let mut signature = Vec::new();
                for field in ["type_parameters", "parameters", "result"] {
                    if let Some(part) = ts.child_by_field_name(field) {
                        self.leaves(part, &mut signature);
                    }
                }
                NodeKind::FuncDecl {
                    name: Box::new(name),
                    signature,
                    body: body.map(Box::new),
                }
            }
            "unary_expression" => {
                let op = self.text(ts.child_by_field_name("operator")?).to_string();
                let operand = self.node(ts.child_by_field_name("operand")?);
                deco.slots = vec![(Field::Operand, span(&operand))];
                NodeKind::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            _ => return None,
        };

        Some(Node::with_deco(kind, deco))
    }

    fn other(&self, ts: TsNode<'_>) -> Node {
        let mut deco = Decoration::at(self.source, ts.byte_range());
        let style = if COMMA_KINDS.contains(&ts.kind()) || self.has_token(ts, ",") {
            SeqStyle::Comma
        } else {
            SeqStyle::Line
        };
        let (children, interior) = self.seq(ts, style);
        deco.slots = vec![(Field::Children, interior)];
        Node::with_deco(
            NodeKind::Other {
                kind: ts.kind().to_string(),
                tokens: self.tokens(ts),
                children,
            },
            deco,
        )
    }

    /// Anonymous token texts, minus terminators and separators.
    fn tokens(&self, ts: TsNode<'_>) -> Vec<String> {
        if ts.child_count() == 0 {
            return vec![self.text(ts).to_string()];
        }
        let mut cursor = ts.walk();
        let tokens = ts
            .children(&mut cursor)
            .filter(|child| !child.is_named())
            .map(|child| self.text(child))
            .filter(|text| !text.trim().is_empty() && *text != ";" && *text != ",")
            .map(str::to_string)
            .collect();
        tokens
    }

    /// Leaf token texts under `ts`, in order, skipping comments.
    fn leaves(&self, ts: TsNode<'_>, out: &mut Vec<String>) {
        if ts.kind() == "comment" {
            return;
        }
        if ts.child_count() == 0 {
            out.push(self.text(ts).to_string());
            return;
        }
        let mut cursor = ts.walk();
        for child in ts.children(&mut cursor) {
            self.leaves(child, out);
        }
    }

    fn has_token(&self, ts: TsNode<'_>, token: &str) -> bool {
        let mut cursor = ts.walk();
        let found = ts
            .children(&mut cursor)
            .any(|child| !child.is_named() && self.text(child) == token);
        found
    }

    /// Named children, skipping comments.
    fn named<'t>(&self, ts: TsNode<'t>) -> Vec<TsNode<'t>> {
        let mut cursor = ts.walk();
        let named = ts
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();
        named
    }

    /// Lower the named children of `container` into a sequence and locate
    /// its interior: between the opening and closing delimiters when it has
    /// them, otherwise from the first item to the last.
    fn seq(&self, container: TsNode<'_>, style: SeqStyle) -> (Seq, Span) {
        let mut items = Vec::new();
        let mut open = None;
        let mut close = None;

        let mut cursor = container.walk();
        for child in container.children(&mut cursor) {
            if child.is_named() {
                if child.kind() == "comment" {
                    continue;
                }
                close = None;
                items.push(self.node(child));
                continue;
            }
            match self.text(child) {
                "(" | "{" | "[" if items.is_empty() && open.is_none() => {
                    open = Some(child.end_byte());
                }
                ")" | "}" | "]" if close.is_none() => close = Some(child.start_byte()),
                _ => {}
            }
        }

        let spans: Vec<Span> = items.iter().map(span).collect();
        let interior = match (open, close) {
            (Some(open), Some(close)) if open <= close => open..close,
            _ => match (spans.first(), spans.last()) {
                (Some(first), Some(last)) => first.start..last.end,
                _ => container.end_byte()..container.end_byte(),
            },
        };

        let layout = SeqLayout { style, spans };
        (
            Seq {
                items,
                layout: Some(layout),
            },
            interior,
        )
    }
}

fn span(node: &Node) -> Span {
    node.deco
        .origin
        .as_ref()
        .map(|origin| origin.span.clone())
        .unwrap_or_default()
}

fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
        .unwrap_or(text);
    inner.to_string()
}
