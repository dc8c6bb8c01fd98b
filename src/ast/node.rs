use std::ops::Range;
use std::sync::Arc;

/// Byte range into a source buffer.
pub type Span = Range<usize>;

/// Where a node came from: the shared source buffer and the node's byte range in it.
///
/// Nodes lowered from a parsed file share one buffer. Nodes parsed from a
/// snippet share the snippet's buffer. Nodes built programmatically have no
/// origin and are rendered from their fields.
#[derive(Debug, Clone)]
pub struct Origin {
    pub source: Arc<str>,
    pub span: Span,
}

impl Origin {
    pub fn new(source: Arc<str>, span: Span) -> Self {
        Self { source, span }
    }

    /// The exact text this node was parsed from.
    pub fn text(&self) -> &str {
        &self.source[self.span.clone()]
    }

    /// True if both origins point at the same bytes of the same buffer.
    pub fn same_site(&self, source: &Arc<str>, span: &Span) -> bool {
        Arc::ptr_eq(&self.source, source) && self.span == *span
    }
}

/// Line-break hint consumed by the printer for programmatically inserted nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    #[default]
    None,
    NewLine,
}

/// Printer-only metadata. Never consulted by matchers or equality.
#[derive(Debug, Clone, Default)]
pub struct Decoration {
    pub origin: Option<Origin>,
    /// Original spans of each child slot, keyed by field. Sequence slots record
    /// the interior between their delimiters.
    pub slots: Vec<(Field, Span)>,
    pub before: Spacing,
    pub after: Spacing,
    /// Comment lines emitted above a freshly inserted node.
    pub comments: Vec<String>,
}

impl Decoration {
    pub fn at(source: &Arc<str>, span: Span) -> Self {
        Self {
            origin: Some(Origin::new(source.clone(), span)),
            ..Self::default()
        }
    }

    pub fn slot_span(&self, field: Field) -> Option<&Span> {
        self.slots
            .iter()
            .find_map(|(f, span)| (*f == field).then_some(span))
    }
}

/// Named child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Pseudo-field of the tree root.
    Root,
    Base,
    Member,
    Callee,
    Args,
    Key,
    Value,
    Type,
    Elements,
    Elem,
    Len,
    Name,
    Body,
    Operand,
    Children,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Root => "root",
            Field::Base => "base",
            Field::Member => "member",
            Field::Callee => "callee",
            Field::Args => "args",
            Field::Key => "key",
            Field::Value => "value",
            Field::Type => "type",
            Field::Elements => "elements",
            Field::Elem => "elem",
            Field::Len => "len",
            Field::Name => "name",
            Field::Body => "body",
            Field::Operand => "operand",
            Field::Children => "children",
        }
    }

    /// Whether this field holds an ordered sequence of children.
    pub fn is_sequence(self) -> bool {
        matches!(self, Field::Args | Field::Elements | Field::Children)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    String,
    RawString,
    Int,
    Float,
    Imaginary,
    Rune,
    True,
    False,
    Nil,
}

/// How items of a sequence are separated in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqStyle {
    /// `a, b, c` (argument lists, composite literal bodies)
    Comma,
    /// One item per line (blocks, import groups, top-level declarations)
    Line,
    /// A single ungrouped import spec; grows into a parenthesized group.
    BareSpec,
}

/// Original placement of a sequence, recorded at parse time.
#[derive(Debug, Clone)]
pub struct SeqLayout {
    pub style: SeqStyle,
    /// Original item spans, in order.
    pub spans: Vec<Span>,
}

/// An ordered child sequence.
#[derive(Debug, Clone, Default)]
pub struct Seq {
    pub items: Vec<Node>,
    pub layout: Option<SeqLayout>,
}

impl Seq {
    pub fn new(items: Vec<Node>) -> Self {
        Self {
            items,
            layout: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of `node` in this sequence, by identity.
    pub fn index_of(&self, node: &Node) -> Option<usize> {
        self.items.iter().position(|item| std::ptr::eq(item, node))
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Ident(String),
    Literal {
        kind: LitKind,
        text: String,
    },
    Selector {
        base: Box<Node>,
        member: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Seq,
    },
    KeyValue {
        key: Box<Node>,
        value: Box<Node>,
    },
    Composite {
        ty: Option<Box<Node>>,
        elems: Seq,
    },
    ArrayType {
        elem: Box<Node>,
        len: Option<Box<Node>>,
    },
    MapType {
        key: Box<Node>,
        value: Box<Node>,
    },
    /// A single import spec. `path` is unquoted.
    Import {
        path: String,
        alias: Option<String>,
    },
    /// Plain function declaration. `signature` holds the tokens of the type
    /// parameters, parameters and result.
    FuncDecl {
        name: Box<Node>,
        signature: Vec<String>,
        body: Option<Box<Node>>,
    },
    Unary {
        op: String,
        operand: Box<Node>,
    },
    /// Any grammar production without a dedicated kind. `tokens` keeps the
    /// text of anonymous tokens (operators, keywords) for equality.
    Other {
        kind: String,
        tokens: Vec<String>,
        children: Seq,
    },
}

/// Borrowed view of one child slot.
#[derive(Debug, Clone, Copy)]
pub enum SlotRef<'a> {
    Node(&'a Node),
    Seq(&'a Seq),
}

/// One step from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub field: Field,
    pub index: Option<usize>,
}

impl Step {
    pub fn field(field: Field) -> Self {
        Self { field, index: None }
    }

    pub fn item(field: Field, index: usize) -> Self {
        Self {
            field,
            index: Some(index),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub deco: Decoration,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            deco: Decoration::default(),
        }
    }

    pub fn with_deco(kind: NodeKind, deco: Decoration) -> Self {
        Self { kind, deco }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            NodeKind::Ident(_) => "identifier",
            NodeKind::Literal { .. } => "literal",
            NodeKind::Selector { .. } => "selector",
            NodeKind::Call { .. } => "call",
            NodeKind::KeyValue { .. } => "key-value",
            NodeKind::Composite { .. } => "composite literal",
            NodeKind::ArrayType { .. } => "array type",
            NodeKind::MapType { .. } => "map type",
            NodeKind::Import { .. } => "import",
            NodeKind::FuncDecl { .. } => "function declaration",
            NodeKind::Unary { .. } => "unary expression",
            NodeKind::Other { kind, .. } => kind.as_str(),
        }
    }

    /// Child slots in document order.
    pub fn slots(&self) -> Vec<(Field, SlotRef<'_>)> {
        match &self.kind {
            NodeKind::Ident(_) | NodeKind::Literal { .. } | NodeKind::Import { .. } => Vec::new(),
            NodeKind::Selector { base, member } => vec![
                (Field::Base, SlotRef::Node(base)),
                (Field::Member, SlotRef::Node(member)),
            ],
            NodeKind::Call { callee, args } => vec![
                (Field::Callee, SlotRef::Node(callee)),
                (Field::Args, SlotRef::Seq(args)),
            ],
            NodeKind::KeyValue { key, value } => vec![
                (Field::Key, SlotRef::Node(key)),
                (Field::Value, SlotRef::Node(value)),
            ],
            NodeKind::Composite { ty, elems } => {
                let mut slots = Vec::with_capacity(2);
                if let Some(ty) = ty {
                    slots.push((Field::Type, SlotRef::Node(ty)));
                }
                slots.push((Field::Elements, SlotRef::Seq(elems)));
                slots
            }
            NodeKind::ArrayType { elem, len } => {
                let mut slots = Vec::with_capacity(2);
                if let Some(len) = len {
                    slots.push((Field::Len, SlotRef::Node(len)));
                }
                slots.push((Field::Elem, SlotRef::Node(elem)));
                slots
            }
            NodeKind::MapType { key, value } => vec![
                (Field::Key, SlotRef::Node(key)),
                (Field::Value, SlotRef::Node(value)),
            ],
            NodeKind::FuncDecl { name, body, .. } => {
                let mut slots = vec![(Field::Name, SlotRef::Node(name.as_ref()))];
                if let Some(body) = body {
                    slots.push((Field::Body, SlotRef::Node(body)));
                }
                slots
            }
            NodeKind::Unary { operand, .. } => vec![(Field::Operand, SlotRef::Node(operand))],
            NodeKind::Other { children, .. } => vec![(Field::Children, SlotRef::Seq(children))],
        }
    }

    /// Single (non-sequence) child at `field`, if present.
    pub fn child(&self, field: Field) -> Option<&Node> {
        match (&self.kind, field) {
            (NodeKind::Selector { base, .. }, Field::Base) => Some(base.as_ref()),
            (NodeKind::Selector { member, .. }, Field::Member) => Some(member.as_ref()),
            (NodeKind::Call { callee, .. }, Field::Callee) => Some(callee.as_ref()),
            (NodeKind::KeyValue { key, .. }, Field::Key) => Some(key.as_ref()),
            (NodeKind::KeyValue { value, .. }, Field::Value) => Some(value.as_ref()),
            (NodeKind::Composite { ty, .. }, Field::Type) => ty.as_deref(),
            (NodeKind::ArrayType { elem, .. }, Field::Elem) => Some(elem.as_ref()),
            (NodeKind::ArrayType { len, .. }, Field::Len) => len.as_deref(),
            (NodeKind::MapType { key, .. }, Field::Key) => Some(key.as_ref()),
            (NodeKind::MapType { value, .. }, Field::Value) => Some(value.as_ref()),
            (NodeKind::FuncDecl { name, .. }, Field::Name) => Some(name.as_ref()),
            (NodeKind::FuncDecl { body, .. }, Field::Body) => body.as_deref(),
            (NodeKind::Unary { operand, .. }, Field::Operand) => Some(operand.as_ref()),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, field: Field) -> Option<&mut Node> {
        match (&mut self.kind, field) {
            (NodeKind::Selector { base, .. }, Field::Base) => Some(base.as_mut()),
            (NodeKind::Selector { member, .. }, Field::Member) => Some(member.as_mut()),
            (NodeKind::Call { callee, .. }, Field::Callee) => Some(callee.as_mut()),
            (NodeKind::KeyValue { key, .. }, Field::Key) => Some(key.as_mut()),
            (NodeKind::KeyValue { value, .. }, Field::Value) => Some(value.as_mut()),
            (NodeKind::Composite { ty, .. }, Field::Type) => ty.as_deref_mut(),
            (NodeKind::ArrayType { elem, .. }, Field::Elem) => Some(elem.as_mut()),
            (NodeKind::ArrayType { len, .. }, Field::Len) => len.as_deref_mut(),
            (NodeKind::MapType { key, .. }, Field::Key) => Some(key.as_mut()),
            (NodeKind::MapType { value, .. }, Field::Value) => Some(value.as_mut()),
            (NodeKind::FuncDecl { name, .. }, Field::Name) => Some(name.as_mut()),
            (NodeKind::FuncDecl { body, .. }, Field::Body) => body.as_deref_mut(),
            (NodeKind::Unary { operand, .. }, Field::Operand) => Some(operand.as_mut()),
            _ => None,
        }
    }

    /// Ordered child sequence at `field`, if this kind has one there.
    pub fn sequence(&self, field: Field) -> Option<&Seq> {
        match (&self.kind, field) {
            (NodeKind::Call { args, .. }, Field::Args) => Some(args),
            (NodeKind::Composite { elems, .. }, Field::Elements) => Some(elems),
            (NodeKind::Other { children, .. }, Field::Children) => Some(children),
            _ => None,
        }
    }

    pub fn sequence_mut(&mut self, field: Field) -> Option<&mut Seq> {
        match (&mut self.kind, field) {
            (NodeKind::Call { args, .. }, Field::Args) => Some(args),
            (NodeKind::Composite { elems, .. }, Field::Elements) => Some(elems),
            (NodeKind::Other { children, .. }, Field::Children) => Some(children),
            _ => None,
        }
    }

    fn step(&self, step: &Step) -> Option<&Node> {
        match step.index {
            Some(index) => self.sequence(step.field)?.items.get(index),
            None => self.child(step.field),
        }
    }

    fn step_mut(&mut self, step: &Step) -> Option<&mut Node> {
        match step.index {
            Some(index) => self.sequence_mut(step.field)?.items.get_mut(index),
            None => self.child_mut(step.field),
        }
    }

    /// Follow `path` from this node.
    pub fn at(&self, path: &[Step]) -> Option<&Node> {
        path.iter().try_fold(self, |node, step| node.step(step))
    }

    pub fn at_mut(&mut self, path: &[Step]) -> Option<&mut Node> {
        path.iter().try_fold(self, |node, step| node.step_mut(step))
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Literal { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_kind(&self, name: &str) -> bool {
        matches!(&self.kind, NodeKind::Other { kind, .. } if kind == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Node {
        Node::new(NodeKind::Ident(name.to_string()))
    }

    #[test]
    fn slots_follow_document_order() {
        let array = Node::new(NodeKind::ArrayType {
            elem: Box::new(ident("T")),
            len: Some(Box::new(ident("N"))),
        });
        let fields: Vec<_> = array.slots().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![Field::Len, Field::Elem]);
    }

    #[test]
    fn path_navigation() {
        let call = Node::new(NodeKind::Call {
            callee: Box::new(ident("f")),
            args: Seq::new(vec![ident("a"), ident("b")]),
        });
        let b = call.at(&[Step::item(Field::Args, 1)]).unwrap();
        assert_eq!(b.as_ident(), Some("b"));
        assert_eq!(
            call.at(&[Step::field(Field::Callee)]).and_then(Node::as_ident),
            Some("f")
        );
        assert!(call.at(&[Step::item(Field::Args, 2)]).is_none());
        assert!(call.at(&[Step::field(Field::Body)]).is_none());
    }

    #[test]
    fn index_of_is_by_identity() {
        let seq = Seq::new(vec![ident("a"), ident("a")]);
        assert_eq!(seq.index_of(&seq.items[1]), Some(1));
        assert_eq!(seq.index_of(&ident("a")), None);
    }

    #[test]
    fn sequence_fields() {
        assert!(Field::Args.is_sequence());
        assert!(Field::Children.is_sequence());
        assert!(!Field::Value.is_sequence());
    }
}
