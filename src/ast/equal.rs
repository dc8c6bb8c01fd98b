//! Structural equality over syntax subtrees.
//!
//! Decoration (origin, spacing, comments) is ignored, so two snippets that
//! differ only in indentation, comments, or trailing commas compare equal.

use crate::ast::node::{Node, NodeKind, Seq};

/// Deep, decoration-insensitive equality.
pub fn equal(a: &Node, b: &Node) -> bool {
    match (&a.kind, &b.kind) {
        (NodeKind::Ident(x), NodeKind::Ident(y)) => x == y,
        (
            NodeKind::Literal { kind: k1, text: t1 },
            NodeKind::Literal { kind: k2, text: t2 },
        ) => k1 == k2 && t1 == t2,
        (
            NodeKind::Selector { base: b1, member: m1 },
            NodeKind::Selector { base: b2, member: m2 },
        ) => equal(b1, b2) && equal(m1, m2),
        (
            NodeKind::Call { callee: c1, args: a1 },
            NodeKind::Call { callee: c2, args: a2 },
        ) => equal(c1, c2) && equal_seq(a1, a2),
        (
            NodeKind::KeyValue { key: k1, value: v1 },
            NodeKind::KeyValue { key: k2, value: v2 },
        ) => equal(k1, k2) && equal(v1, v2),
        (
            NodeKind::Composite { ty: t1, elems: e1 },
            NodeKind::Composite { ty: t2, elems: e2 },
        ) => equal_opt(t1.as_deref(), t2.as_deref()) && equal_seq(e1, e2),
        (
            NodeKind::ArrayType { elem: e1, len: l1 },
            NodeKind::ArrayType { elem: e2, len: l2 },
        ) => equal(e1, e2) && equal_opt(l1.as_deref(), l2.as_deref()),
        (
            NodeKind::MapType { key: k1, value: v1 },
            NodeKind::MapType { key: k2, value: v2 },
        ) => equal(k1, k2) && equal(v1, v2),
        (
            NodeKind::Import { path: p1, alias: a1 },
            NodeKind::Import { path: p2, alias: a2 },
        ) => p1 == p2 && a1 == a2,
        (
            NodeKind::FuncDecl {
                name: n1,
                signature: s1,
                body: b1,
            },
            NodeKind::FuncDecl {
                name: n2,
                signature: s2,
                body: b2,
            },
        ) => equal(n1, n2) && s1 == s2 && equal_opt(b1.as_deref(), b2.as_deref()),
        (
            NodeKind::Unary { op: o1, operand: x1 },
            NodeKind::Unary { op: o2, operand: x2 },
        ) => o1 == o2 && equal(x1, x2),
        (
            NodeKind::Other {
                kind: k1,
                tokens: t1,
                children: c1,
            },
            NodeKind::Other {
                kind: k2,
                tokens: t2,
                children: c2,
            },
        ) => k1 == k2 && t1 == t2 && equal_seq(c1, c2),
        _ => false,
    }
}

/// Absent subtrees equal each other and nothing else.
pub fn equal_opt(a: Option<&Node>, b: Option<&Node>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => equal(a, b),
        _ => false,
    }
}

pub fn equal_seq(a: &Seq, b: &Seq) -> bool {
    a.items.len() == b.items.len() && a.items.iter().zip(&b.items).all(|(x, y)| equal(x, y))
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other)
    }
}
